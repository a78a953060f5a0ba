//! Reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! Trigger (Created | Updated | Resync)
//!     → pass.rs (Engine::handle → run_pass)
//!         → store: list sources, list targets
//!         → manifest: render desired, select managed, diff orphans
//!         → reconciler.rs (delete orphans, create-or-update desired)
//!     → PassReport
//!     → status.rs (PassSummary published for the admin endpoint)
//!
//! Trigger (Deleted) → no-op
//! ```
//!
//! # Design Decisions
//! - Level-triggered: every pass re-lists everything
//! - At most one pass per engine at a time (enforced by the controller loop)
//! - Per-resource failures are isolated; list/parse failures abort the pass

pub mod pass;
pub mod reconciler;
pub mod status;
pub mod trigger;

pub use pass::{render, Engine, PassError, PassReport, Rendered, SkippedSource};
pub use reconciler::{
    ApplyError, ApplyOutcome, ApplyState, DeleteError, DeleteOutcome, ReconcileCounts,
    ReconcileReport, Reconciler,
};
pub use status::{PassSummary, StatusBoard};
pub use trigger::{ResourceRef, Trigger, TriggerKind};
