//! # Smart Search Architecture
//!
//! Smart Search lets an operator describe an audience as an **ordered list of
//! filters**. The backend evaluates the list left to right: each filter's `op`
//! adds to, subtracts from, or limits the set built by the filters before it.
//! This crate owns the client side of that: the typed filter model, the
//! editable list, and the compile step back to the stored form. It never
//! evaluates filters against people.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Hosts (CLI binary, web handlers, tests)                    │
//! │  - Render the summary, the palette, and per-kind forms      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Opens sessions from a TargetStore, saves them back       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (session.rs)                                       │
//! │  - Idle / Drafting / EditingExisting state machine          │
//! │  - FilterListStore (list.rs) + compile (compile.rs)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model (model.rs, registry.rs, identity.rs)                 │
//! │  - Filter kinds, per-kind configs, client-local ids         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence sits beside the session behind the [`store::TargetStore`] trait.
//!
//! ## Data Flow
//!
//! stored spec → `FilterListStore::hydrate` (fresh ids, same order) → add / edit /
//! delete → `compile` (ids dropped) → `TargetStore::save`.
//!
//! With no edits in between, `compile(hydrate(spec))` is exactly `spec`.
//!
//! ## Module Overview
//!
//! - [`api`]: Facade pairing sessions with a store
//! - [`session`]: The editing workflow
//! - [`list`]: Ordered filter list with stable ids
//! - [`compile`]: List → backend specification
//! - [`registry`]: Per-kind config schemas, defaults, validation
//! - [`identity`]: Client-local filter ids
//! - [`model`]: Filter, config and target types
//! - [`store`]: Persistence trait and implementations
//! - [`config`]: Configuration loading
//! - [`error`]: Error types

pub mod api;
pub mod compile;
pub mod config;
pub mod error;
pub mod identity;
pub mod list;
pub mod model;
pub mod registry;
pub mod session;
pub mod store;
