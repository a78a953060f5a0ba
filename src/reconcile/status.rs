//! Last-pass status shared with the admin endpoint.

use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwapOption;
use serde::Serialize;
use uuid::Uuid;

use crate::reconcile::pass::{PassError, PassReport, SkippedSource};
use crate::reconcile::reconciler::ReconcileCounts;

/// Serializable summary of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub pass_id: Option<Uuid>,
    pub finished_at_unix: u64,
    pub outcome: &'static str,
    pub desired: Vec<String>,
    pub orphans: Vec<String>,
    pub counts: ReconcileCounts,
    pub skipped: Vec<SkippedSource>,
    pub failures: Vec<String>,
    pub error: Option<String>,
}

impl PassSummary {
    pub fn from_report(report: &PassReport) -> Self {
        Self {
            pass_id: Some(report.pass_id),
            finished_at_unix: now_unix(),
            outcome: report.outcome(),
            desired: report.desired.clone(),
            orphans: report.orphans.clone(),
            counts: report.reconcile.counts(),
            skipped: report.skipped.clone(),
            failures: report.reconcile.failures(),
            error: None,
        }
    }

    pub fn aborted(error: &PassError) -> Self {
        Self {
            pass_id: None,
            finished_at_unix: now_unix(),
            outcome: "aborted",
            desired: Vec::new(),
            orphans: Vec::new(),
            counts: ReconcileCounts::default(),
            skipped: Vec::new(),
            failures: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Lock-free holder of the most recent pass summary.
#[derive(Default)]
pub struct StatusBoard {
    last: ArcSwapOption<PassSummary>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, summary: PassSummary) {
        self.last.store(Some(std::sync::Arc::new(summary)));
    }

    pub fn last(&self) -> Option<PassSummary> {
        self.last.load_full().map(|summary| (*summary).clone())
    }

    /// Ready once any pass has finished, successfully or not.
    pub fn is_ready(&self) -> bool {
        self.last.load().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_board_starts_unready() {
        let board = StatusBoard::new();
        assert!(!board.is_ready());
        assert!(board.last().is_none());
    }

    #[test]
    fn test_publish_aborted() {
        let board = StatusBoard::new();
        let error = PassError::List {
            what: "source resources",
            source: StoreError::Backend("connection refused".into()),
        };
        board.publish(PassSummary::aborted(&error));

        let last = board.last().unwrap();
        assert!(board.is_ready());
        assert_eq!(last.outcome, "aborted");
        assert!(last.error.unwrap().contains("connection refused"));
    }
}
