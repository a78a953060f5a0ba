//! Trigger loop driving the engine.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{FutureExt, Stream, StreamExt};
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::reconcile::{Engine, PassSummary, StatusBoard, Trigger};

/// Triggers collapsed into a single pass.
#[derive(Debug)]
struct Batch {
    trigger: Trigger,
    merged: usize,
    closed: bool,
}

/// Take `first` plus every trigger that is already queued.
///
/// The batch is represented by its first pass-starting trigger, so a burst
/// that mixes deletions with updates still runs exactly one pass.
fn coalesce<S>(first: Trigger, triggers: &mut S) -> Batch
where
    S: Stream<Item = Trigger> + Unpin,
{
    let mut batch = Batch { trigger: first, merged: 0, closed: false };

    loop {
        match triggers.next().now_or_never() {
            Some(Some(next)) => {
                batch.merged += 1;
                if !batch.trigger.starts_pass() && next.starts_pass() {
                    batch.trigger = next;
                }
            }
            Some(None) => {
                batch.closed = true;
                break;
            }
            None => break,
        }
    }

    batch
}

/// Run passes until the trigger stream ends or shutdown is signalled.
///
/// A resync pass runs immediately on start and then every `resync`, unless
/// an event-driven pass ran more recently.
pub async fn run<S>(
    engine: Arc<Engine>,
    mut triggers: S,
    resync: Duration,
    status: Arc<StatusBoard>,
    mut shutdown: broadcast::Receiver<()>,
) where
    S: Stream<Item = Trigger> + Unpin,
{
    let mut ticker = time::interval(resync);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(resync_secs = resync.as_secs(), "Controller loop starting");

    loop {
        let first = tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Controller loop received shutdown signal, exiting loop");
                break;
            }
            _ = ticker.tick() => Trigger::resync(),
            next = triggers.next() => match next {
                Some(trigger) => trigger,
                None => {
                    tracing::info!("Trigger stream ended");
                    break;
                }
            },
        };

        let batch = coalesce(first, &mut triggers);
        if batch.merged > 0 {
            tracing::debug!(merged = batch.merged, "Coalesced queued triggers");
        }

        tracing::debug!(kind = ?batch.trigger.kind, resource = %batch.trigger.resource, "Handling trigger");

        match engine.handle(&batch.trigger).await {
            Ok(Some(report)) => {
                status.publish(PassSummary::from_report(&report));
                ticker.reset();
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "Reconciliation pass aborted");
                status.publish(PassSummary::aborted(&e));
            }
        }

        if batch.closed {
            tracing::info!("Trigger stream ended");
            break;
        }
    }
}
