//! Controller subsystem.
//!
//! # Data Flow
//! ```text
//! watch stream (Trigger) ──┐
//! resync interval ─────────┼─▶ event_loop.rs ─▶ Engine::handle ─▶ StatusBoard
//! shutdown signal ─────────┘
//! ```
//!
//! # Design Decisions
//! - Single task: passes never overlap
//! - Bursts are coalesced into one pass
//! - Shutdown is only observed between passes

pub mod event_loop;

pub use event_loop::run;
