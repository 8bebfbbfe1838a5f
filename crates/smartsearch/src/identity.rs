//! Client-local filter identity.
//!
//! Every filter held by a [`FilterListStore`](crate::list::FilterListStore) gets a
//! [`FilterId`] from that store's own [`IdAllocator`]. Ids exist only so the UI can
//! point at "this filter" while the list changes around it; they are never
//! serialized into a target specification.
//!
//! The allocator is a plain monotonic counter. Deleting a filter does not free
//! its id, so a stale id held by the UI can never alias a newer filter.

use std::fmt;

/// Opaque handle for one filter inside one store.
///
/// Ids support equality and hashing only. They deliberately do not implement
/// `Ord`: list position, not id, carries evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(u64);

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Issues [`FilterId`]s for a single store.
#[derive(Debug)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> FilterId {
        let id = FilterId(self.next);
        self.next += 1;
        id
    }
}
