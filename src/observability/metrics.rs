//! Metrics collection and exposition.
//!
//! # Metrics
//! - `icc_operator_reconcile_errors_total` (counter): failed create/update/delete calls
//! - `ingress_reconciler_passes_total` (counter): passes by outcome
//! - `ingress_reconciler_pass_duration_seconds` (histogram): pass latency
//! - `ingress_reconciler_managed_resources` (gauge): desired resources after the last pass
//!
//! # Design Decisions
//! - The reconciler only sees the `ErrorCounter` trait; tests inject their own
//! - Exporter is optional; without it the `metrics` macros are no-ops

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

// Name predates the rename so existing dashboards keep working.
pub const RECONCILE_ERRORS: &str = "icc_operator_reconcile_errors_total";
pub const PASSES: &str = "ingress_reconciler_passes_total";
pub const PASS_DURATION: &str = "ingress_reconciler_pass_duration_seconds";
pub const MANAGED_RESOURCES: &str = "ingress_reconciler_managed_resources";

/// Sink for reconciliation failures.
pub trait ErrorCounter: Send + Sync {
    fn increment(&self);
}

/// Error counter backed by the global `metrics` recorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusErrorCounter;

impl ErrorCounter for PrometheusErrorCounter {
    fn increment(&self) {
        counter!(RECONCILE_ERRORS).increment(1);
    }
}

/// Error counter that just counts, for dry runs and tests.
#[derive(Debug, Default)]
pub struct LocalErrorCounter {
    count: AtomicU64,
}

impl LocalErrorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl ErrorCounter for LocalErrorCounter {
    fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(RECONCILE_ERRORS, "Number of errors that occurred while reconciling Ingress manifests");
            describe_counter!(PASSES, "Reconciliation passes by outcome");
            describe_histogram!(PASS_DURATION, "Duration of reconciliation passes in seconds");
            describe_gauge!(MANAGED_RESOURCES, "Desired resources rendered by the last pass");
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record the end of a reconciliation pass.
pub fn record_pass(outcome: &'static str, started: Instant, managed: Option<usize>) {
    counter!(PASSES, "outcome" => outcome).increment(1);
    histogram!(PASS_DURATION).record(started.elapsed().as_secs_f64());
    if let Some(count) = managed {
        gauge!(MANAGED_RESOURCES).set(count as f64);
    }
}
