//! # Smart Search CLI
//!
//! A thin host for the `smartsearch` library: every invocation opens one editing
//! session on one target, drives it through the same handlers a web dialog
//! would use, and saves it. The library stays UI-agnostic; everything about
//! terminals, arguments and exit codes lives in `src/cli/`.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/smartsearch-cli/src/cli/)                │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Session driving per command (handlers.rs)                │
//! │  - Plain-text rendering (render.rs), logging (logging.rs)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API + Session (crates/smartsearch/src/)                    │
//! │  - Opens sessions from FileTargetStore, saves them back     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Filters are addressed by their 1-based position in the stored list. Each
//! command resolves the position to the session's filter id right after
//! hydrating, so ids never appear on the command line.

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
