//! # Editing Sessions
//!
//! A [`TargetEditingSession`] is the workflow a host drives while an operator
//! edits one target: show the current filters, pick a kind to add or a filter
//! to re-configure, submit or cancel, delete, and finally save.
//!
//! ## States
//!
//! ```text
//!            select_kind            submit -> list.add
//!   Idle ───────────────▶ Drafting ─────────────────────▶ Idle
//!    │  ◀───────────────────┘ cancel
//!    │
//!    │ select_existing         submit -> list.edit
//!    └────────────────▶ EditingExisting ─────────────────▶ Idle
//!       ◀──────────────────────┘ cancel
//!
//!   Idle ── delete_filter ──▶ Idle
//!   Idle ── save ──▶ closed
//! ```
//!
//! The [`Selection`] enum holds the state, so "drafting" and "editing" can never
//! both be true. Calls that don't fit the current state fail with
//! [`SmartSearchError::Precondition`] and change nothing; they are never queued.
//!
//! A failed submit leaves the selection in place so the form can be corrected.
//! A failed save leaves the session open with every edit intact.

use crate::compile::compile;
use crate::error::{Result, SmartSearchError};
use crate::identity::FilterId;
use crate::list::FilterListStore;
use crate::model::{Filter, FilterKind, FilterWithId, Operation, TargetRef, TargetSpecification};
use crate::registry;
use crate::store::TargetStore;
use tracing::{debug, info, warn};

/// What the operator currently has open, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Idle,
    /// A new filter of this kind, not yet in the list.
    Drafting { kind: FilterKind },
    /// A copy of a stored filter being re-configured.
    EditingExisting(FilterWithId),
}

impl Selection {
    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }

    fn label(&self) -> &'static str {
        match self {
            Selection::Idle => "no filter is selected",
            Selection::Drafting { .. } => "a new filter is being drafted",
            Selection::EditingExisting(_) => "a filter is being edited",
        }
    }
}

#[derive(Debug)]
pub struct TargetEditingSession {
    target: TargetRef,
    filters: FilterListStore,
    selection: Selection,
    loaded: TargetSpecification,
    closed: bool,
}

impl TargetEditingSession {
    /// Starts a session over the filters the backend has for `target`.
    pub fn open(target: TargetRef, spec: TargetSpecification) -> Self {
        let mut filters = FilterListStore::new();
        filters.hydrate(spec.iter().cloned());
        debug!(target_ref = %target, filters = filters.len(), "opened editing session");
        Self {
            target,
            filters,
            selection: Selection::Idle,
            loaded: spec,
            closed: false,
        }
    }

    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    /// Every filter in evaluation order, including one being edited.
    pub fn filters(&self) -> &[FilterWithId] {
        self.filters.list()
    }

    /// The list as the summary view shows it: a filter that is open for
    /// editing is left out until it is submitted or cancelled.
    pub fn summary(&self) -> impl Iterator<Item = &FilterWithId> {
        let editing = match &self.selection {
            Selection::EditingExisting(entry) => Some(entry.id()),
            _ => None,
        };
        self.filters
            .list()
            .iter()
            .filter(move |entry| Some(entry.id()) != editing)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The filter an editing form should start from: registry defaults for a
    /// draft, the stored content for an existing filter.
    pub fn form_filter(&self) -> Option<Filter> {
        match &self.selection {
            Selection::Idle => None,
            Selection::Drafting { kind } => Some(Filter {
                op: Operation::default(),
                config: registry::default_config(*kind),
            }),
            Selection::EditingExisting(entry) => Some(entry.filter().clone()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether saving now would store something different from what was loaded.
    pub fn has_changes(&self) -> bool {
        compile(self.filters.list()) != self.loaded
    }

    pub fn select_kind(&mut self, kind: FilterKind) -> Result<()> {
        self.ensure_idle("start a new filter")?;
        debug!(%kind, "drafting new filter");
        self.selection = Selection::Drafting { kind };
        Ok(())
    }

    pub fn select_existing(&mut self, id: FilterId) -> Result<()> {
        self.ensure_idle("edit a filter")?;
        let entry = self.filters.get(id)?.clone();
        debug!(%id, kind = %entry.kind(), "editing existing filter");
        self.selection = Selection::EditingExisting(entry);
        Ok(())
    }

    pub fn cancel_editing(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.selection.is_idle() {
            return Err(self.precondition("cancel editing"));
        }
        debug!("editing cancelled");
        self.selection = Selection::Idle;
        Ok(())
    }

    /// Finishes the open draft or edit with the form's result.
    ///
    /// The submitted filter must be of the selected kind. Returns the id the
    /// filter is stored under.
    pub fn submit_editing(&mut self, filter: Filter) -> Result<FilterId> {
        self.ensure_open()?;
        let id = match &self.selection {
            Selection::Idle => return Err(self.precondition("submit a filter")),
            Selection::Drafting { kind } => {
                check_kind(*kind, &filter)?;
                self.filters.add(filter)?
            }
            Selection::EditingExisting(entry) => {
                check_kind(entry.kind(), &filter)?;
                let id = entry.id();
                self.filters.edit(id, filter)?;
                id
            }
        };
        self.selection = Selection::Idle;
        Ok(id)
    }

    pub fn delete_filter(&mut self, id: FilterId) -> Result<Filter> {
        self.ensure_idle("delete a filter")?;
        self.filters.delete(id)
    }

    /// Compiles the list and hands it to `store`. On success the session is
    /// closed and the saved specification returned.
    pub async fn save<S>(&mut self, store: &S) -> Result<TargetSpecification>
    where
        S: TargetStore + ?Sized,
    {
        self.ensure_idle("save")?;
        let spec = compile(self.filters.list());
        if let Err(err) = store.save(&self.target, &spec).await {
            warn!(target_ref = %self.target, error = %err, "save failed, session kept open");
            return Err(err);
        }
        info!(target_ref = %self.target, filters = spec.len(), "target saved");
        self.closed = true;
        self.selection = Selection::Idle;
        Ok(spec)
    }

    /// Discards the session without saving.
    pub fn close(self) {
        if !self.closed && self.has_changes() {
            debug!(target_ref = %self.target, "discarding unsaved edits");
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(SmartSearchError::SessionClosed);
        }
        Ok(())
    }

    fn ensure_idle(&self, action: &'static str) -> Result<()> {
        self.ensure_open()?;
        if !self.selection.is_idle() {
            return Err(self.precondition(action));
        }
        Ok(())
    }

    fn precondition(&self, action: &'static str) -> SmartSearchError {
        warn!(action, state = self.selection.label(), "rejected session call");
        SmartSearchError::Precondition {
            action,
            state: self.selection.label(),
        }
    }
}

fn check_kind(expected: FilterKind, filter: &Filter) -> Result<()> {
    if filter.kind() != expected {
        return Err(SmartSearchError::KindMismatch {
            expected,
            actual: filter.kind(),
        });
    }
    Ok(())
}
