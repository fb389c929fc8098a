//! Bounded, most-recent-first collection of dataset summaries.
//!
//! [`HistoryStore`] owns the summaries. The "current" dataset shown by a dashboard is kept
//! as an id rather than a second owner, so it stops resolving as soon as the summary it
//! names is removed or evicted.
//!
//! The store itself is a plain value mutated through `&mut self`. Hosts that touch it from
//! several threads wrap it in [`SharedHistory`], which serialises `add`/`remove`/`list`
//! behind a `parking_lot` mutex.
//!
//! Loading and saving history lives in [`persist`].

pub mod persist;

use crate::dataset::{DatasetId, DatasetSummary};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Default retention bound.
pub const DEFAULT_CAPACITY: usize = 5;

/// Bounded history of dataset summaries, newest first.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    capacity: usize,
    entries: VecDeque<DatasetSummary>,
    current: Option<DatasetId>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStore {
    /// Empty store retaining at most `capacity` summaries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            current: None,
        }
    }

    /// Retention bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored summaries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `summary` at the front and make it current.
    ///
    /// A stored summary with the same id is replaced. Summaries pushed past the capacity
    /// are dropped from the back.
    pub fn add(&mut self, summary: DatasetSummary) {
        let id = summary.id();
        self.entries.retain(|entry| entry.id() != id);
        self.entries.push_front(summary);
        self.entries.truncate(self.capacity);
        self.current = Some(id);
    }

    /// Remove the summary with `id`. Returns `false` and leaves the store untouched if no
    /// such summary exists.
    pub fn remove(&mut self, id: DatasetId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id() != id);
        self.entries.len() != before
    }

    /// Summaries, most recent first.
    pub fn list(&self) -> impl ExactSizeIterator<Item = &DatasetSummary> + '_ {
        self.entries.iter()
    }

    /// Look up a summary by id.
    pub fn get(&self, id: DatasetId) -> Option<&DatasetSummary> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// The dataset currently in view, if it is still stored.
    pub fn current(&self) -> Option<&DatasetSummary> {
        self.current.and_then(|id| self.get(id))
    }

    /// Point the current view at a stored summary. Returns `false` if `id` is unknown.
    pub fn select(&mut self, id: DatasetId) -> bool {
        if self.get(id).is_some() {
            self.current = Some(id);
            true
        } else {
            false
        }
    }

    /// Replace the contents with an externally supplied sequence (newest first),
    /// truncated to the capacity. A repeated id keeps only its first (newest) entry, as
    /// with [`add`](Self::add).
    ///
    /// A current pointer set by an earlier [`add`](Self::add) survives if its summary is
    /// still present after seeding; otherwise the first seeded summary becomes current.
    pub fn seed<I>(&mut self, summaries: I)
    where
        I: IntoIterator<Item = DatasetSummary>,
    {
        let mut seen = HashSet::new();
        self.entries = summaries
            .into_iter()
            .filter(|summary| seen.insert(summary.id()))
            .take(self.capacity)
            .collect();
        if self.current().is_none() {
            self.current = self.entries.front().map(DatasetSummary::id);
        }
    }

    /// Owned copy of the stored summaries, newest first.
    pub fn to_vec(&self) -> Vec<DatasetSummary> {
        self.entries.iter().cloned().collect()
    }
}

/// History store shared between threads.
pub type SharedHistory = Arc<Mutex<HistoryStore>>;

/// Wrap `store` for shared use.
pub fn shared(store: HistoryStore) -> SharedHistory {
    Arc::new(Mutex::new(store))
}
