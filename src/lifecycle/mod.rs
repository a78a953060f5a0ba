//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Logging/metrics → Store → Engine → Loops
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → broadcast → controller loop and
//!     admin server stop → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A running pass is allowed to finish before the loop exits

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
