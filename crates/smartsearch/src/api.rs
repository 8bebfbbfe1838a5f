//! # API Facade
//!
//! A thin entry point that pairs editing sessions with a [`TargetStore`].
//! Hosts (the CLI, a web handler, tests) open a session here, drive it
//! through the [`TargetEditingSession`] handlers, then save it here.
//!
//! The facade holds no editing logic of its own: state transitions live in
//! `session.rs`, list semantics in `list.rs`, kind schemas in `registry.rs`.
//!
//! ## Generic Over TargetStore
//!
//! - Production: `SmartSearchApi<FileTargetStore>` or a backend-backed store
//! - Testing: `SmartSearchApi<InMemoryTargetStore>`

use crate::error::Result;
use crate::model::{TargetRef, TargetSpecification};
use crate::registry::{self, KindSpec};
use crate::session::TargetEditingSession;
use crate::store::TargetStore;

pub struct SmartSearchApi<S: TargetStore> {
    store: S,
}

impl<S: TargetStore> SmartSearchApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the stored filters for `target` and starts a session over them.
    pub async fn open_session(&self, target: TargetRef) -> Result<TargetEditingSession> {
        let spec = self.store.load(&target).await?;
        Ok(TargetEditingSession::open(target, spec))
    }

    /// Saves and closes the session. On failure the session stays open.
    pub async fn save_session(
        &self,
        session: &mut TargetEditingSession,
    ) -> Result<TargetSpecification> {
        session.save(&self.store).await
    }

    /// The stored specification, without opening a session.
    pub async fn load(&self, target: &TargetRef) -> Result<TargetSpecification> {
        self.store.load(target).await
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static KindSpec> {
        registry::palette()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
