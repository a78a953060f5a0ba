//! Kubernetes-backed resource store.
//!
//! # Responsibilities
//! - List `Service` (sources) and `Ingress` (targets) in one namespace
//! - Create Ingresses, update them with server-side apply, delete orphans
//! - Translate API errors (409 AlreadyExists, 404) into `StoreError`
//! - Turn the Service watch into engine triggers (watch.rs)

pub mod convert;
pub mod watch;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams, PostParams};
use kube::Client;

use crate::manifest::DesiredResource;
use crate::store::{ObservedResource, ResourceStore, SourceResource, StoreError};

const KIND: &str = "Ingress";
const FIELD_MANAGER: &str = "ingress-reconciler";

/// `ResourceStore` over the Services and Ingresses of one namespace.
pub struct KubeStore {
    services: Api<Service>,
    ingresses: Api<Ingress>,
    namespace: String,
}

impl KubeStore {
    /// Bind both APIs to `namespace`.
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            services: Api::namespaced(client.clone(), namespace),
            ingresses: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }
}

fn create_params() -> PostParams {
    PostParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    }
}

fn map_error(err: kube::Error, name: &str) -> StoreError {
    match err {
        kube::Error::Api(ref response) if response.code == 409 && response.reason == "AlreadyExists" => {
            StoreError::AlreadyExists { kind: KIND, name: name.to_string() }
        }
        kube::Error::Api(ref response) if response.code == 404 => {
            StoreError::NotFound { kind: KIND, name: name.to_string() }
        }
        other => StoreError::Backend(Box::new(other)),
    }
}

#[async_trait]
impl ResourceStore for KubeStore {
    fn target_kind(&self) -> &'static str {
        KIND
    }

    async fn list_sources(&self) -> Result<Vec<SourceResource>, StoreError> {
        let list = self
            .services
            .list(&ListParams::default())
            .await
            .map_err(|e| StoreError::Backend(Box::new(e)))?;
        Ok(list.items.iter().map(convert::source_from_service).collect())
    }

    async fn list_targets(&self) -> Result<Vec<ObservedResource>, StoreError> {
        let list = self
            .ingresses
            .list(&ListParams::default())
            .await
            .map_err(|e| StoreError::Backend(Box::new(e)))?;
        Ok(list.items.iter().map(convert::observed_from_ingress).collect())
    }

    async fn create(&self, resource: &DesiredResource) -> Result<(), StoreError> {
        let ingress = convert::to_ingress(resource, &self.namespace);
        self.ingresses
            .create(&create_params(), &ingress)
            .await
            .map_err(|e| map_error(e, &resource.name))?;
        Ok(())
    }

    async fn update(&self, resource: &DesiredResource) -> Result<(), StoreError> {
        let ingress = convert::to_ingress(resource, &self.namespace);
        let params = PatchParams::apply(FIELD_MANAGER).force();
        self.ingresses
            .patch(&resource.name, &params, &Patch::Apply(&ingress))
            .await
            .map_err(|e| map_error(e, &resource.name))?;
        Ok(())
    }

    async fn delete(&self, resource: &ObservedResource) -> Result<(), StoreError> {
        self.ingresses
            .delete(&resource.name, &DeleteParams::default())
            .await
            .map_err(|e| map_error(e, &resource.name))?;
        Ok(())
    }
}
