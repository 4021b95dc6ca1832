use std::{collections::BTreeMap, fmt::Display, num::TryFromIntError, time::Duration};

use indexmap::IndexMap;
use k8s_openapi::{
    api::core::v1::{Container, LocalObjectReference, Pod, PodSpec, PodTemplateSpec, Volume},
    apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta},
};
use snafu::{ResultExt, Snafu};
use strum::Display as StrumDisplay;
use tracing::instrument;

use crate::{
    builder::{
        daemonset::DaemonSetBuilder,
        deployment::DeploymentBuilder,
        meta::ObjectMetaBuilder,
        pod::{
            container::ContainerBuilder,
            volume::{VolumeBuilder, docker_socket_volume},
        },
    },
    client::Client,
    constants::{APP_NAME_LABEL, DOCKER_PULL_SECRET},
    kvp::set_display_at_map,
    reconcile,
};

pub mod container;
pub mod volume;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("termination grace period is too long (got {duration:?}, maximum allowed is {max:?})", max = Duration::from_secs(i64::MAX as u64)))]
    TerminationGracePeriodTooLong {
        source: TryFromIntError,
        duration: Duration,
    },

    #[snafu(display("failed to build volume {name:?}"))]
    BuildVolume { source: volume::Error, name: String },

    #[snafu(display(
        "Colliding volume name {colliding_volume_name:?} in volumes with different content"
    ))]
    VolumeNameCollision { colliding_volume_name: String },
}

/// The `restartPolicy` of a [`PodSpec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay)]
pub enum RestartPolicy {
    Always,
    OnFailure,
    Never,
}

/// A builder to build [`Pod`] or [`PodTemplateSpec`] objects.
///
/// Volumes are kept in an [`IndexMap`] keyed by volume name, so they keep the order in which they
/// were added while a name can only ever occur once.
///
/// Adding the first container that mounts the Docker socket (see
/// [`ContainerBuilder::mount_docker`]) also adds the host path volume backing that mount. Later
/// containers mounting the socket share the same volume.
#[derive(Clone, Debug, PartialEq)]
pub struct PodBuilder {
    metadata: ObjectMetaBuilder,
    containers: Vec<Container>,

    /// The key is the volume name.
    volumes: IndexMap<String, Volume>,
    image_pull_secrets: Option<Vec<LocalObjectReference>>,
    termination_grace_period_seconds: Option<i64>,
    node_selector: Option<BTreeMap<String, String>>,
    restart_policy: Option<RestartPolicy>,
    host_network: Option<bool>,

    has_mounted_docker: bool,
}

impl PodBuilder {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMetaBuilder::new().name(name).namespace(namespace),
            containers: Vec::new(),
            volumes: IndexMap::new(),
            image_pull_secrets: None,
            termination_grace_period_seconds: None,
            node_selector: None,
            restart_policy: None,
            host_network: None,
            has_mounted_docker: false,
        }
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.metadata = self.metadata.with_label(key, value);
        self
    }

    pub fn annotation(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.metadata = self.metadata.with_annotation(key, value);
        self
    }

    /// Adds all `labels`, overriding labels with the same keys.
    pub fn labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.metadata = self.metadata.with_labels(labels);
        self
    }

    pub fn annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.metadata = self.metadata.with_annotations(annotations);
        self
    }

    /// Adds a container configured by `f`.
    ///
    /// ```
    /// # use kube_builders::builder::pod::PodBuilder;
    /// let pod = PodBuilder::new("web", "default")
    ///     .container("nginx", "nginx:1.27", |container| {
    ///         container.port(80, "http").env("WORKERS", 4)
    ///     })
    ///     .build();
    ///
    /// assert_eq!(pod.spec.unwrap().containers[0].name, "nginx");
    /// ```
    pub fn container(
        self,
        name: impl Into<String>,
        image: impl Into<String>,
        f: impl FnOnce(ContainerBuilder) -> ContainerBuilder,
    ) -> Self {
        self.add_container(f(ContainerBuilder::new(name, image)))
    }

    pub fn add_container(mut self, container: ContainerBuilder) -> Self {
        if container.mounts_docker() && !self.has_mounted_docker {
            let volume = docker_socket_volume();
            self.volumes.entry(volume.name.clone()).or_insert(volume);
            self.has_mounted_docker = true;
        }

        self.containers.push(container.build());
        self
    }

    /// Adds a volume configured by `f`, see [`Self::add_volume`] for details.
    pub fn volume(
        self,
        name: impl Into<String>,
        f: impl FnOnce(VolumeBuilder) -> VolumeBuilder,
    ) -> Result<Self> {
        let name = name.into();
        let volume = f(VolumeBuilder::new(name.clone()))
            .build()
            .context(BuildVolumeSnafu { name })?;
        self.add_volume(volume)
    }

    /// Adds a new [`Volume`] to the pod while ensuring that no colliding [`Volume`] exists.
    ///
    /// A colliding [`Volume`] would have the same name but a different content than another
    /// [`Volume`]. Adding an identical [`Volume`] twice is a no-op.
    #[instrument(skip(self))]
    pub fn add_volume(mut self, volume: Volume) -> Result<Self> {
        if let Some(existing_volume) = self.volumes.get(&volume.name) {
            if existing_volume != &volume {
                let colliding_volume_name = &volume.name;
                // We don't want to include the details in the error message, but instead trace them
                tracing::error!(
                    colliding_volume_name,
                    ?existing_volume,
                    "Colliding volume name in volumes with different content"
                );

                return VolumeNameCollisionSnafu {
                    colliding_volume_name,
                }
                .fail();
            }
        } else {
            self.volumes.insert(volume.name.clone(), volume);
        }

        Ok(self)
    }

    pub fn image_pull_secret(mut self, name: impl Into<String>) -> Self {
        self.image_pull_secrets
            .get_or_insert_with(Vec::new)
            .push(LocalObjectReference { name: name.into() });
        self
    }

    /// Adds the conventional `docker` registry credentials as image pull secret.
    pub fn docker_pull_secret(self) -> Self {
        self.image_pull_secret(DOCKER_PULL_SECRET)
    }

    pub fn termination_grace_period(mut self, termination_grace_period: Duration) -> Result<Self> {
        let termination_grace_period_seconds = termination_grace_period
            .as_secs()
            .try_into()
            .context(TerminationGracePeriodTooLongSnafu {
                duration: termination_grace_period,
            })?;

        self.termination_grace_period_seconds = Some(termination_grace_period_seconds);
        Ok(self)
    }

    pub fn node_selector(mut self, key: impl Into<String>, value: impl Display) -> Self {
        set_display_at_map(&mut self.node_selector, key, value);
        self
    }

    pub fn restart_policy(mut self, restart_policy: RestartPolicy) -> Self {
        self.restart_policy = Some(restart_policy);
        self
    }

    pub fn host_network(mut self, host_network: bool) -> Self {
        self.host_network = Some(host_network);
        self
    }

    /// Turns the pod into the template of a [`DeploymentBuilder`] in the pod's namespace.
    pub fn deployment(self, name: impl Into<String>) -> DeploymentBuilder {
        DeploymentBuilder::from_pod(name, &self)
    }

    /// Turns the pod into the template of a [`DaemonSetBuilder`] in the pod's namespace.
    pub fn daemon_set(self, name: impl Into<String>) -> DaemonSetBuilder {
        DaemonSetBuilder::from_pod(name, &self)
    }

    pub(crate) fn namespace(&self) -> Option<String> {
        self.metadata.get_namespace().map(str::to_owned)
    }

    /// Returns the pod template of a workload named `workload_name` together with the selector
    /// matching it.
    ///
    /// The selector matches the pod labels. A pod without labels is labelled with
    /// [`APP_NAME_LABEL`] set to the workload name, since `apps/v1` workloads require a
    /// non-empty selector.
    pub(crate) fn build_workload_template(
        &self,
        workload_name: &str,
    ) -> (PodTemplateSpec, LabelSelector) {
        let mut template = self.build_template();
        let metadata = template.metadata.get_or_insert_with(ObjectMeta::default);
        let labels = metadata
            .labels
            .get_or_insert_with(|| {
                BTreeMap::from([(APP_NAME_LABEL.to_string(), workload_name.to_string())])
            })
            .clone();

        let selector = LabelSelector {
            match_labels: Some(labels),
            ..LabelSelector::default()
        };

        (template, selector)
    }

    /// Returns a constructed [`Pod`]
    pub fn build(&self) -> Pod {
        Pod {
            metadata: self.metadata.build(),
            spec: Some(self.build_spec()),
            status: None,
        }
    }

    /// Returns a [`PodTemplateSpec`], usable for building a
    /// [`Deployment`](k8s_openapi::api::apps::v1::Deployment) or
    /// [`DaemonSet`](k8s_openapi::api::apps::v1::DaemonSet).
    ///
    /// Only the labels and annotations of the pod end up in the template metadata.
    pub fn build_template(&self) -> PodTemplateSpec {
        let metadata = self.metadata.build();
        PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: metadata.labels,
                annotations: metadata.annotations,
                ..ObjectMeta::default()
            }),
            spec: Some(self.build_spec()),
        }
    }

    fn build_spec(&self) -> PodSpec {
        let volumes = if self.volumes.is_empty() {
            None
        } else {
            Some(self.volumes.values().cloned().collect())
        };

        PodSpec {
            containers: self.containers.clone(),
            volumes,
            image_pull_secrets: self.image_pull_secrets.clone(),
            termination_grace_period_seconds: self.termination_grace_period_seconds,
            node_selector: self.node_selector.clone(),
            restart_policy: self.restart_policy.map(|policy| policy.to_string()),
            host_network: self.host_network,
            ..PodSpec::default()
        }
    }

    /// Builds the pod and creates or updates it in the cluster, see [`reconcile::push`].
    pub async fn push(&self, client: &Client) -> reconcile::Result<Pod> {
        reconcile::push(client, &self.build()).await
    }
}
