//! State management algebras for the workspace crawl.
//!
//! Visit tracking keeps the traversal from scheduling a page twice, however
//! many parents link to it.

use crate::types::PageId;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;

use super::error::TrackError;

/// Visit tracking capability for preventing cycles during traversal.
///
/// # Laws
///
/// All implementations must satisfy these laws:
///
/// - **L1 (Idempotency)**: Visiting the same ID twice returns `false` on the second visit.
///   ```text
///   visit(id) == Ok(true)
///   visit(id) == Ok(false)
///   ```
///
/// - **L2 (Is-Visited Consistency)**: `is_visited(id)` reflects the result of `visit(id)`.
///
/// - **L3 (Persistence)**: Once visited, an ID remains visited.
///
/// - **L4 (Format-Independence)**: Dashed and compact forms of an ID are the same visit.
///
/// This trait is **object-safe** and can be used as `dyn VisitTracker`.
#[async_trait]
pub trait VisitTracker: Send + Sync {
    /// Mark an ID as visited and return whether this was the first visit.
    ///
    /// Returns `Ok(true)` if this is the first visit to this ID,
    /// `Ok(false)` if the ID was already visited, or an error.
    async fn visit(&self, id: &PageId) -> Result<bool, TrackError>;

    /// Check if an ID has been visited without marking it.
    async fn is_visited(&self, id: &PageId) -> bool;

    /// Number of distinct IDs visited so far.
    async fn visited_count(&self) -> usize;
}

/// Visit tracker backed by a set of normalized IDs, optionally bounded.
#[derive(Debug, Default)]
pub struct InMemoryVisitTracker {
    visited: Mutex<HashSet<String>>,
    capacity: Option<usize>,
}

impl InMemoryVisitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that refuses new visits once `max` IDs have been recorded.
    pub fn with_capacity_limit(max: usize) -> Self {
        Self {
            visited: Mutex::new(HashSet::new()),
            capacity: Some(max),
        }
    }
}

#[async_trait]
impl VisitTracker for InMemoryVisitTracker {
    async fn visit(&self, id: &PageId) -> Result<bool, TrackError> {
        let key = id.normalized();
        let mut visited = self.visited.lock();
        if visited.contains(&key) {
            return Ok(false);
        }
        if let Some(max) = self.capacity {
            if visited.len() >= max {
                return Err(TrackError::CapacityExceeded { max });
            }
        }
        Ok(visited.insert(key))
    }

    async fn is_visited(&self, id: &PageId) -> bool {
        self.visited.lock().contains(&id.normalized())
    }

    async fn visited_count(&self) -> usize {
        self.visited.lock().len()
    }
}
