//! Selection engine: deterministic choice of the next 0-2 work items.
//!
//! Pure function of (catalog, completed set); no randomness, no clock reads.
//! Given identical inputs the result is always identical.

use crate::catalog::{Catalog, WorkItem};
use std::collections::HashSet;

/// Scan the catalog in order and pick the next items to process.
///
/// The first identifier not in `completed` is the primary pick. When batching
/// is enabled and the primary pick is batchable, the next not-yet-completed
/// identifier (regardless of its own batchability) becomes the secondary pick.
/// An empty result is the terminal "all items complete" state.
pub fn select<'a>(
    catalog: &'a Catalog,
    completed: &HashSet<String>,
    batch_small_items: bool,
) -> Vec<&'a WorkItem> {
    let mut remaining = catalog
        .items()
        .iter()
        .filter(|item| !completed.contains(&item.id));

    let Some(primary) = remaining.next() else {
        return Vec::new();
    };

    let mut picks = vec![primary];
    if batch_small_items && primary.batchable {
        if let Some(secondary) = remaining.next() {
            picks.push(secondary);
        }
    }
    picks
}
