//! The create-or-update routine behind every builder's `push`.
//!
//! [`push`] looks the desired object up by name. If the cluster does not know it yet, it is
//! created. If it exists, the desired object is merged onto the current one according to the
//! kind's [`Reconcile::merge_into`] policy and the result replaces the current object. Any other
//! error while looking the object up aborts the push before anything is written.
use std::fmt::Debug;

use k8s_openapi::api::{
    apps::v1::{DaemonSet, Deployment},
    core::v1::{Namespace, Pod, Secret, Service},
    networking::v1::Ingress,
};
use kube::{Api, Resource};
use serde::{Serialize, de::DeserializeOwned};
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, field, info, instrument};

use crate::client::Client;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("object is missing key {key:?}"))]
    MissingObjectKey { key: &'static str },

    #[snafu(display("failed to get {kind} {name:?}"))]
    GetObject {
        source: kube::Error,
        kind: String,
        name: String,
    },

    #[snafu(display("failed to create {kind} {name:?}"))]
    CreateObject {
        source: kube::Error,
        kind: String,
        name: String,
    },

    #[snafu(display("failed to update {kind} {name:?}"))]
    UpdateObject {
        source: kube::Error,
        kind: String,
        name: String,
    },
}

/// A Kubernetes object [`push`] knows how to create or update.
pub trait Reconcile:
    Resource<DynamicType = ()> + Clone + Debug + DeserializeOwned + Serialize
{
    /// Returns the [`Api`] objects of this kind are read from and written to.
    fn api(client: &Client, namespace: Option<&str>) -> Api<Self>;

    /// Returns the object replacing `current` in the cluster, with `self` being the desired
    /// state.
    fn merge_into(self, current: Self) -> Self;
}

/// Creates `desired` if no object of its kind with its name exists, otherwise updates the
/// existing object. Returns the object as stored by the API server.
#[instrument(
    skip(client, desired),
    fields(kind = %K::kind(&()), name = field::Empty, namespace = field::Empty)
)]
pub async fn push<K>(client: &Client, desired: &K) -> Result<K>
where
    K: Reconcile,
{
    let kind = K::kind(&()).into_owned();
    let meta = desired.meta();
    let name = meta
        .name
        .as_deref()
        .context(MissingObjectKeySnafu { key: "name" })?;
    let namespace = meta.namespace.as_deref();

    let span = tracing::Span::current();
    span.record("name", name);
    if let Some(namespace) = namespace {
        span.record("namespace", namespace);
    }

    let api = K::api(client, namespace);
    let current = api.get_opt(name).await.context(GetObjectSnafu {
        kind: kind.clone(),
        name,
    })?;

    match current {
        None => {
            let created = api
                .create(client.post_params(), desired)
                .await
                .context(CreateObjectSnafu { kind, name })?;
            info!("created object");
            Ok(created)
        }
        Some(current) => {
            debug!("object exists, merging desired state onto it");
            let merged = desired.clone().merge_into(current);
            let updated = api
                .replace(name, client.post_params(), &merged)
                .await
                .context(UpdateObjectSnafu { kind, name })?;
            info!("updated object");
            Ok(updated)
        }
    }
}

/// Full replace.
impl Reconcile for Deployment {
    fn api(client: &Client, namespace: Option<&str>) -> Api<Self> {
        client.get_namespaced_api(namespace)
    }

    fn merge_into(self, _current: Self) -> Self {
        self
    }
}

/// Full replace.
impl Reconcile for DaemonSet {
    fn api(client: &Client, namespace: Option<&str>) -> Api<Self> {
        client.get_namespaced_api(namespace)
    }

    fn merge_into(self, _current: Self) -> Self {
        self
    }
}

/// Full replace.
impl Reconcile for Secret {
    fn api(client: &Client, namespace: Option<&str>) -> Api<Self> {
        client.get_namespaced_api(namespace)
    }

    fn merge_into(self, _current: Self) -> Self {
        self
    }
}

/// Copies type, ports, selector, labels and annotations onto the current service. Everything
/// allocated by the cluster, like the cluster IP, is kept.
impl Reconcile for Service {
    fn api(client: &Client, namespace: Option<&str>) -> Api<Self> {
        client.get_namespaced_api(namespace)
    }

    fn merge_into(self, mut current: Self) -> Self {
        current.metadata.labels = self.metadata.labels;
        current.metadata.annotations = self.metadata.annotations;

        let desired = self.spec.unwrap_or_default();
        let spec = current.spec.get_or_insert_with(Default::default);
        spec.type_ = desired.type_;
        spec.ports = desired.ports;
        spec.selector = desired.selector;
        current
    }
}

/// Copies the whole spec, labels and annotations onto the current ingress.
impl Reconcile for Ingress {
    fn api(client: &Client, namespace: Option<&str>) -> Api<Self> {
        client.get_namespaced_api(namespace)
    }

    fn merge_into(self, mut current: Self) -> Self {
        current.metadata.labels = self.metadata.labels;
        current.metadata.annotations = self.metadata.annotations;
        current.spec = self.spec;
        current
    }
}

/// Copies labels and annotations onto the current namespace.
impl Reconcile for Namespace {
    fn api(client: &Client, _namespace: Option<&str>) -> Api<Self> {
        client.get_all_api()
    }

    fn merge_into(self, mut current: Self) -> Self {
        current.metadata.labels = self.metadata.labels;
        current.metadata.annotations = self.metadata.annotations;
        current
    }
}

/// Copies labels, annotations and the images of containers with matching names onto the current
/// pod. The API server rejects changes to any other field of a running pod's spec.
impl Reconcile for Pod {
    fn api(client: &Client, namespace: Option<&str>) -> Api<Self> {
        client.get_namespaced_api(namespace)
    }

    fn merge_into(self, mut current: Self) -> Self {
        current.metadata.labels = self.metadata.labels;
        current.metadata.annotations = self.metadata.annotations;

        if let (Some(desired), Some(spec)) = (self.spec, current.spec.as_mut()) {
            for container in &mut spec.containers {
                if let Some(image) = desired
                    .containers
                    .iter()
                    .find(|desired| desired.name == container.name)
                    .and_then(|desired| desired.image.clone())
                {
                    container.image = Some(image);
                }
            }
        }

        current
    }
}
