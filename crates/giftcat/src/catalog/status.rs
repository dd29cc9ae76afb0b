//! OGP completion status for one catalog.

use super::inputs::{CatalogId, ExpectedItemCount};
use super::SLOT_COUNT;

/// Status value marking an item whose preview generation has finished.
pub const DONE_SENTINEL: &str = "done";

/// One fetch of the status row. Never cached or merged across attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub catalog_id: CatalogId,
    /// Item count as recorded in the status table (informational only).
    pub recorded_count: u32,
    pub item_statuses: [String; SLOT_COUNT],
}

/// What a status record means for a session expecting a given item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusObservation {
    Complete,
    Incomplete { done: usize, expected: usize },
}

fn is_done(status: &str) -> bool {
    status.trim() == DONE_SENTINEL
}

impl StatusRecord {
    pub fn new(catalog_id: CatalogId, recorded_count: u32, item_statuses: [String; SLOT_COUNT]) -> Self {
        Self {
            catalog_id,
            recorded_count,
            item_statuses,
        }
    }

    /// Counts the first `expected` slots, in slot order, whose trimmed status is `"done"`.
    pub fn done_count(&self, expected: ExpectedItemCount) -> usize {
        self.item_statuses
            .iter()
            .take(expected.as_usize())
            .filter(|s| is_done(s))
            .count()
    }

    /// Counts every slot reporting `"done"`, including slots beyond the expected count.
    pub fn total_done(&self) -> usize {
        self.item_statuses.iter().filter(|s| is_done(s)).count()
    }

    /// Exact-match completion test.
    ///
    /// Every expected slot must be done and no slot outside the expected range may
    /// report done. A stray `"done"` in an unused slot keeps the session waiting.
    pub fn is_complete(&self, expected: ExpectedItemCount) -> bool {
        let expected_n = expected.as_usize();
        self.done_count(expected) == expected_n && self.total_done() == expected_n
    }

    pub fn observe(&self, expected: ExpectedItemCount) -> StatusObservation {
        if self.is_complete(expected) {
            StatusObservation::Complete
        } else {
            StatusObservation::Incomplete {
                done: self.done_count(expected),
                expected: expected.as_usize(),
            }
        }
    }
}
