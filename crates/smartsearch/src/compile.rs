//! Turns an edited filter list back into the payload the backend stores.

use crate::model::{FilterWithId, TargetSpecification};

/// Drops client ids and keeps everything else, in order.
pub fn compile(filters: &[FilterWithId]) -> TargetSpecification {
    filters.iter().map(|entry| entry.filter.clone()).collect()
}
