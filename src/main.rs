//! Ingress reconciler operator.
//!
//! # Architecture Overview
//!
//! ```text
//!   Service watch ──▶ Trigger ──▶ controller loop ──▶ Engine pass
//!   resync timer  ──┘                                   │
//!                                                       ▼
//!        list Services → parse annotations → aggregate → desired Ingresses
//!        list Ingresses → keep managed → orphans = managed − desired
//!        delete orphans → create-or-update desired
//!                                                       │
//!                         StatusBoard ◀─────────────────┘──▶ metrics, logs
//!                              │
//!                       admin /healthz /readyz /status
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use ingress_reconciler::config::{load_config, override_namespace, OperatorConfig};
use ingress_reconciler::kube_store::{watch, KubeStore};
use ingress_reconciler::observability::{logging, metrics};
use ingress_reconciler::reconcile::{Engine, StatusBoard};
use ingress_reconciler::{admin, controller, lifecycle, Shutdown};

#[derive(Parser)]
#[command(name = "ingress-reconciler")]
#[command(about = "Reconciles annotated Services into Ingress resources", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "INGRESS_RECONCILER_CONFIG")]
    config: Option<PathBuf>,

    /// Namespace to watch; overrides `watch.namespace`.
    #[arg(short, long, env = "WATCH_NAMESPACE")]
    namespace: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => OperatorConfig::default(),
    };
    let config = override_namespace(config, args.namespace)?;

    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ingress-reconciler starting");
    tracing::info!(
        namespace = %config.watch.namespace,
        label_selector = %config.watch.label_selector,
        resync_secs = config.watch.resync_secs,
        on_parse_error = ?config.reconcile.on_parse_error,
        order = ?config.reconcile.order,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = kube::Client::try_default().await?;
    let store = Arc::new(KubeStore::new(client.clone(), &config.watch.namespace));
    let engine = Arc::new(Engine::new(
        store,
        Arc::new(metrics::PrometheusErrorCounter),
        &config,
    ));
    let board = Arc::new(StatusBoard::new());

    let shutdown = Shutdown::new();
    let _signals = lifecycle::signals::spawn_signal_listener(&shutdown);

    let admin_task = if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let board = board.clone();
        let admin_shutdown = shutdown.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = admin::serve(listener, board, admin_shutdown).await {
                tracing::error!(error = %e, "Admin server failed");
            }
        }))
    } else {
        None
    };

    let triggers = Box::pin(watch::service_triggers(
        client,
        &config.watch.namespace,
        &config.watch.label_selector,
    ));

    controller::run(
        engine,
        triggers,
        Duration::from_secs(config.watch.resync_secs),
        board,
        shutdown.subscribe(),
    )
    .await;

    shutdown.trigger();
    if let Some(task) = admin_task {
        let _ = task.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
