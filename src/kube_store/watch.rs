//! Service watch mapped to engine triggers.

use futures_util::{Stream, StreamExt};
use k8s_openapi::api::core::v1::Service;
use kube::runtime::watcher::{self, watcher, Event};
use kube::runtime::WatchStreamExt;
use kube::{Api, Client, ResourceExt};

use crate::reconcile::{Trigger, TriggerKind};

const SOURCE_KIND: &str = "Service";

/// Watch services matching `label_selector` and yield a trigger per change.
pub fn service_triggers(
    client: Client,
    namespace: &str,
    label_selector: &str,
) -> impl Stream<Item = Trigger> + Send {
    let api: Api<Service> = Api::namespaced(client, namespace);
    let config = watcher::Config::default().labels(label_selector);

    watcher(api, config)
        .default_backoff()
        .filter_map(|event| async move { to_trigger(event) })
}

/// Map one watcher event. Initial-list markers and errors produce nothing.
pub fn to_trigger(event: Result<Event<Service>, watcher::Error>) -> Option<Trigger> {
    match event {
        Ok(Event::InitApply(service)) => {
            Some(Trigger::new(TriggerKind::Created, SOURCE_KIND, service.name_any()))
        }
        Ok(Event::Apply(service)) => {
            Some(Trigger::new(TriggerKind::Updated, SOURCE_KIND, service.name_any()))
        }
        Ok(Event::Delete(service)) => {
            Some(Trigger::new(TriggerKind::Deleted, SOURCE_KIND, service.name_any()))
        }
        Ok(Event::Init) | Ok(Event::InitDone) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Service watch error");
            None
        }
    }
}
