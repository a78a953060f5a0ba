//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Reconciliation pass produces:
//!     → logging.rs (structured log events, pass_id span)
//!     → metrics.rs (error counter, pass outcome/duration)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
