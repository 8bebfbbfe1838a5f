//! # Target Persistence
//!
//! Editing sessions load their starting filters from, and hand their compiled
//! result to, a [`TargetStore`]. The trait is the boundary to whatever actually
//! keeps target specifications: the platform's REST backend in production, a
//! directory of JSON files for the CLI, a map in tests.
//!
//! ## Implementations
//!
//! - [`fs::FileTargetStore`]: one JSON file per target
//!   - `orgs/{org}/tasks/{id}.json`, `orgs/{org}/campaigns/{id}.json`
//!   - Writes go through a temp file and a rename
//!
//! - [`memory::InMemoryTargetStore`]: no persistence, for tests and embedding
//!
//! ## Contract
//!
//! - `load` of a target that was never saved returns an empty specification.
//! - `save` replaces the stored specification wholesale. The store never merges.
//! - Implementations do not retry. A failed save is reported to the session,
//!   which keeps its edits so the host can try again.

use crate::error::Result;
use crate::model::{TargetRef, TargetSpecification};
use async_trait::async_trait;

pub mod fs;
pub mod memory;

#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Current specification for a target.
    async fn load(&self, target: &TargetRef) -> Result<TargetSpecification>;

    /// Replace the specification for a target.
    async fn save(&self, target: &TargetRef, spec: &TargetSpecification) -> Result<()>;
}
