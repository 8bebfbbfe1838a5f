//! The ordered filter list behind one editing session.
//!
//! Position in the list is evaluation order, so every operation here keeps the
//! relative order of untouched entries: `add` appends, `edit` replaces in
//! place, `delete` removes exactly one entry. Nothing ever sorts.
//!
//! Failed operations leave the list exactly as it was.

use crate::error::{Result, SmartSearchError};
use crate::identity::{FilterId, IdAllocator};
use crate::model::{Filter, FilterWithId};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct FilterListStore {
    ids: IdAllocator,
    entries: Vec<FilterWithId>,
}

impl FilterListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with `filters`, in order, each under a fresh id.
    ///
    /// Filters are taken as the backend stored them; range checks only apply
    /// to filters the user adds or edits.
    pub fn hydrate<I>(&mut self, filters: I)
    where
        I: IntoIterator<Item = Filter>,
    {
        let ids = &mut self.ids;
        self.entries = filters
            .into_iter()
            .map(|filter| FilterWithId {
                id: ids.next_id(),
                filter,
            })
            .collect();
        debug!(count = self.entries.len(), "hydrated filter list");
    }

    /// Appends `filter` and returns its new id.
    pub fn add(&mut self, filter: Filter) -> Result<FilterId> {
        filter.validate()?;
        let id = self.ids.next_id();
        debug!(%id, kind = %filter.kind(), "adding filter");
        self.entries.push(FilterWithId { id, filter });
        Ok(id)
    }

    /// Replaces the content stored under `id`, keeping its position and id.
    pub fn edit(&mut self, id: FilterId, filter: Filter) -> Result<()> {
        let index = self.position(id)?;
        filter.validate()?;
        debug!(%id, index, kind = %filter.kind(), "editing filter");
        self.entries[index].filter = filter;
        Ok(())
    }

    /// Removes the entry under `id` and returns its filter.
    pub fn delete(&mut self, id: FilterId) -> Result<Filter> {
        let index = self.position(id)?;
        debug!(%id, index, "deleting filter");
        Ok(self.entries.remove(index).filter)
    }

    pub fn get(&self, id: FilterId) -> Result<&FilterWithId> {
        let index = self.position(id)?;
        Ok(&self.entries[index])
    }

    pub fn position(&self, id: FilterId) -> Result<usize> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| {
                warn!(%id, "filter id not in list");
                SmartSearchError::FilterNotFound(id)
            })
    }

    pub fn list(&self) -> &[FilterWithId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
