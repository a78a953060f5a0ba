//! One full reconciliation pass.
//!
//! # Pipeline
//! ```text
//! list sources ──▶ render (parse → aggregate → build) ──▶ desired
//! list targets ──▶ select managed ──▶ diff against desired ──▶ orphans
//! reconcile(desired, orphans) ──▶ PassReport
//! ```
//!
//! # Design Decisions
//! - Full recompute every pass; nothing is carried over between passes
//! - List failures abort before any mutation
//! - Parse failures abort too unless `on_parse_error = "skip"`

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{AnnotationConfig, OperatorConfig, ParseFailurePolicy};
use crate::manifest::{self, declaration, DesiredResource, ParseError};
use crate::observability::metrics::{self, ErrorCounter};
use crate::reconcile::reconciler::{ReconcileReport, Reconciler};
use crate::reconcile::trigger::Trigger;
use crate::store::{ResourceStore, SourceResource, StoreError};

/// Errors that abort a whole pass.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("failed to list {what}: {source}")]
    List {
        what: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("failed to parse routing annotation on '{resource}': {source}")]
    Parse {
        resource: String,
        #[source]
        source: ParseError,
    },
}

/// A source left out of the desired state because its annotation was malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSource {
    pub name: String,
    pub reason: String,
}

/// Desired state rendered from a set of sources.
#[derive(Debug, Clone, Serialize)]
pub struct Rendered {
    pub desired: Vec<DesiredResource>,
    pub skipped: Vec<SkippedSource>,
}

/// Render source resources into desired resources.
///
/// Sources without a (non-empty) config annotation contribute nothing.
pub fn render(
    sources: &[SourceResource],
    annotations: &AnnotationConfig,
    policy: ParseFailurePolicy,
) -> Result<Rendered, PassError> {
    let mut declarations = Vec::new();
    let mut skipped = Vec::new();

    for source in sources {
        let Some(raw) = declaration::annotation(source, &annotations.config_key) else {
            continue;
        };

        match manifest::parse(raw) {
            Ok(decl) => declarations.push(decl),
            Err(e) => match policy {
                ParseFailurePolicy::Abort => {
                    return Err(PassError::Parse { resource: source.name.clone(), source: e });
                }
                ParseFailurePolicy::Skip => {
                    tracing::warn!(name = %source.name, error = %e, "Skipping malformed routing annotation");
                    skipped.push(SkippedSource { name: source.name.clone(), reason: e.to_string() });
                }
            },
        }
    }

    let desired = manifest::build(manifest::aggregate(&declarations), &annotations.managed_key);
    Ok(Rendered { desired, skipped })
}

/// Result of a completed pass.
#[derive(Debug)]
pub struct PassReport {
    pub pass_id: Uuid,
    pub desired: Vec<String>,
    pub orphans: Vec<String>,
    pub skipped: Vec<SkippedSource>,
    pub reconcile: ReconcileReport,
}

impl PassReport {
    /// `"ok"` if every store call succeeded, `"partial"` otherwise.
    pub fn outcome(&self) -> &'static str {
        if self.reconcile.is_clean() {
            "ok"
        } else {
            "partial"
        }
    }
}

/// The reconciliation engine: store + reconciler + annotation settings.
pub struct Engine {
    store: Arc<dyn ResourceStore>,
    reconciler: Reconciler,
    annotations: AnnotationConfig,
    on_parse_error: ParseFailurePolicy,
}

impl Engine {
    pub fn new(store: Arc<dyn ResourceStore>, errors: Arc<dyn ErrorCounter>, config: &OperatorConfig) -> Self {
        let reconciler = Reconciler::new(store.clone(), errors, config.reconcile.order);
        Self {
            store,
            reconciler,
            annotations: config.annotations.clone(),
            on_parse_error: config.reconcile.on_parse_error,
        }
    }

    /// Handle a change notification. Deletions are a no-op.
    pub async fn handle(&self, trigger: &Trigger) -> Result<Option<PassReport>, PassError> {
        if !trigger.starts_pass() {
            tracing::debug!(resource = %trigger.resource, "Ignoring deletion");
            return Ok(None);
        }
        self.run_pass().await.map(Some)
    }

    /// Run one full pass.
    pub async fn run_pass(&self) -> Result<PassReport, PassError> {
        let pass_id = Uuid::new_v4();
        let started = Instant::now();
        let span = tracing::info_span!("reconcile_pass", %pass_id);

        let result = self.pass(pass_id).instrument(span).await;

        match &result {
            Ok(report) => metrics::record_pass(report.outcome(), started, Some(report.desired.len())),
            Err(_) => metrics::record_pass("aborted", started, None),
        }
        result
    }

    async fn pass(&self, pass_id: Uuid) -> Result<PassReport, PassError> {
        let sources = self
            .store
            .list_sources()
            .await
            .map_err(|source| PassError::List { what: "source resources", source })?;

        let Rendered { desired, skipped } = render(&sources, &self.annotations, self.on_parse_error)?;

        let listed = self
            .store
            .list_targets()
            .await
            .map_err(|source| PassError::List { what: "target resources", source })?;

        let managed = manifest::select(listed, &self.annotations.managed_key);
        let orphans = manifest::orphans(&desired, &managed);

        tracing::debug!(
            sources = sources.len(),
            desired = desired.len(),
            managed = managed.len(),
            orphans = orphans.len(),
            "Computed desired state"
        );

        let reconcile = self.reconciler.reconcile(&desired, &orphans).await;
        let counts = reconcile.counts();

        tracing::info!(
            created = counts.created,
            updated = counts.updated,
            deleted = counts.deleted,
            failed = counts.failed,
            skipped = skipped.len(),
            "Reconciliation pass finished"
        );

        Ok(PassReport {
            pass_id,
            desired: desired.into_iter().map(|d| d.name).collect(),
            orphans: orphans.into_iter().map(|o| o.name).collect(),
            skipped,
            reconcile,
        })
    }
}
