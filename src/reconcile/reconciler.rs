//! Apply/delete phase of a reconciliation pass.
//!
//! # Per-resource state machine
//! ```text
//! Pending ──create ok──────────────────────────▶ Created
//! Pending ──create AlreadyExists──update ok────▶ Updated
//! Pending ──create other error / update error──▶ Failed
//! ```
//!
//! # Design Decisions
//! - One resource's failure never aborts the rest of the batch
//! - No retries within a pass; the next trigger recomputes everything
//! - Every failure is logged and counted exactly once

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::PhaseOrder;
use crate::manifest::DesiredResource;
use crate::observability::metrics::ErrorCounter;
use crate::store::{ObservedResource, ResourceStore, StoreError};

/// Create or update of one desired resource failed.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("failed to apply {kind} '{name}': {source}")]
    Create {
        kind: &'static str,
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to update {kind} '{name}': {source}")]
    Update {
        kind: &'static str,
        name: String,
        #[source]
        source: StoreError,
    },
}

/// Deletion of one orphan failed.
#[derive(Debug, Error)]
#[error("failed to delete {kind} '{name}': {source}")]
pub struct DeleteError {
    pub kind: &'static str,
    pub name: String,
    #[source]
    pub source: StoreError,
}

/// Terminal state of one desired resource after the apply phase.
#[derive(Debug)]
pub enum ApplyState {
    Created,
    Updated,
    Failed(ApplyError),
}

/// Outcome for one desired resource.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub name: String,
    pub state: ApplyState,
}

/// Outcome for one orphan.
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted(String),
    Failed(DeleteError),
}

/// Per-resource results of one reconcile call.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub deletions: Vec<DeleteOutcome>,
    pub applies: Vec<ApplyOutcome>,
}

/// Aggregate counts of a `ReconcileReport`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileCounts {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub fn counts(&self) -> ReconcileCounts {
        let mut counts = ReconcileCounts::default();
        for outcome in &self.deletions {
            match outcome {
                DeleteOutcome::Deleted(_) => counts.deleted += 1,
                DeleteOutcome::Failed(_) => counts.failed += 1,
            }
        }
        for outcome in &self.applies {
            match outcome.state {
                ApplyState::Created => counts.created += 1,
                ApplyState::Updated => counts.updated += 1,
                ApplyState::Failed(_) => counts.failed += 1,
            }
        }
        counts
    }

    /// Human-readable failure messages, deletions first.
    pub fn failures(&self) -> Vec<String> {
        let deletes = self.deletions.iter().filter_map(|outcome| match outcome {
            DeleteOutcome::Failed(e) => Some(e.to_string()),
            DeleteOutcome::Deleted(_) => None,
        });
        let applies = self.applies.iter().filter_map(|outcome| match &outcome.state {
            ApplyState::Failed(e) => Some(e.to_string()),
            _ => None,
        });
        deletes.chain(applies).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.counts().failed == 0
    }
}

/// Drives create/update/delete calls against a store.
pub struct Reconciler {
    store: Arc<dyn ResourceStore>,
    errors: Arc<dyn ErrorCounter>,
    order: PhaseOrder,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ResourceStore>, errors: Arc<dyn ErrorCounter>, order: PhaseOrder) -> Self {
        Self { store, errors, order }
    }

    /// Delete orphans and create-or-update desired resources.
    pub async fn reconcile(
        &self,
        desired: &[DesiredResource],
        orphans: &[ObservedResource],
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        match self.order {
            PhaseOrder::DeleteFirst => {
                report.deletions = self.delete_all(orphans).await;
                report.applies = self.apply_all(desired).await;
            }
            PhaseOrder::ApplyFirst => {
                report.applies = self.apply_all(desired).await;
                report.deletions = self.delete_all(orphans).await;
            }
        }

        report
    }

    async fn delete_all(&self, orphans: &[ObservedResource]) -> Vec<DeleteOutcome> {
        let mut outcomes = Vec::with_capacity(orphans.len());
        for orphan in orphans {
            outcomes.push(self.delete_one(orphan).await);
        }
        outcomes
    }

    async fn apply_all(&self, desired: &[DesiredResource]) -> Vec<ApplyOutcome> {
        let mut outcomes = Vec::with_capacity(desired.len());
        for resource in desired {
            outcomes.push(self.apply_one(resource).await);
        }
        outcomes
    }

    async fn delete_one(&self, orphan: &ObservedResource) -> DeleteOutcome {
        let kind = self.store.target_kind();
        match self.store.delete(orphan).await {
            Ok(()) => {
                tracing::debug!(kind, name = %orphan.name, "Deleted orphan");
                DeleteOutcome::Deleted(orphan.name.clone())
            }
            Err(source) => {
                let err = DeleteError { kind, name: orphan.name.clone(), source };
                tracing::error!(kind, name = %orphan.name, error = %err, "Delete failed");
                self.errors.increment();
                DeleteOutcome::Failed(err)
            }
        }
    }

    async fn apply_one(&self, resource: &DesiredResource) -> ApplyOutcome {
        let kind = self.store.target_kind();
        let name = resource.name.clone();

        let state = match self.store.create(resource).await {
            Ok(()) => {
                tracing::debug!(kind, name = %name, "Created");
                ApplyState::Created
            }
            Err(e) if e.is_already_exists() => match self.store.update(resource).await {
                Ok(()) => {
                    tracing::debug!(kind, name = %name, "Updated");
                    ApplyState::Updated
                }
                Err(source) => {
                    let err = ApplyError::Update { kind, name: name.clone(), source };
                    tracing::error!(kind, name = %name, error = %err, "Update failed");
                    self.errors.increment();
                    ApplyState::Failed(err)
                }
            },
            Err(source) => {
                let err = ApplyError::Create { kind, name: name.clone(), source };
                tracing::error!(kind, name = %name, error = %err, "Apply failed");
                self.errors.increment();
                ApplyState::Failed(err)
            }
        };

        ApplyOutcome { name, state }
    }
}
