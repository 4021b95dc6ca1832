use std::{collections::BTreeMap, fmt};

use k8s_openapi::api::core::v1::{
    ConfigMapKeySelector, Container, ContainerPort, EnvVar, EnvVarSource, ObjectFieldSelector,
    ResourceFieldSelector, SecretKeySelector, VolumeMount,
};

use crate::{
    constants::{DOCKER_SOCKET_PATH, DOCKER_VOLUME_NAME},
    kvp::set_at_map,
};

/// The value of a single environment variable.
///
/// Literal values and values sourced from other objects share one namespace: setting either
/// kind for a name replaces whatever the name held before.
#[derive(Clone, Debug, PartialEq)]
enum EnvValue {
    Literal(String),
    Source(EnvVarSource),
}

/// A builder to build [`Container`] objects.
///
/// Environment variables and ports are keyed by name. Setting the same name twice keeps only the
/// last value, and the built container lists them in name order.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerBuilder {
    name: String,
    image: String,
    env: Option<BTreeMap<String, EnvValue>>,
    /// The key is the port name.
    ports: Option<BTreeMap<String, u16>>,
    mount_docker: bool,
}

impl ContainerBuilder {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            env: None,
            ports: None,
            mount_docker: false,
        }
    }

    /// Sets a literal environment variable. The value is rendered with its [`fmt::Display`]
    /// implementation.
    pub fn env(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        set_at_map(&mut self.env, name, EnvValue::Literal(value.to_string()));
        self
    }

    /// Sources an environment variable from a key of a Secret.
    pub fn secret(
        self,
        name: impl Into<String>,
        secret_name: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.env_from(
            name,
            EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: secret_name.into(),
                    key: secret_key.into(),
                    ..SecretKeySelector::default()
                }),
                ..EnvVarSource::default()
            },
        )
    }

    /// Sources an environment variable from a field of the pod, see [`FieldPathEnvVar`] for the
    /// common paths.
    pub fn field_ref(self, name: impl Into<String>, field_path: impl fmt::Display) -> Self {
        self.env_from(
            name,
            EnvVarSource {
                field_ref: Some(ObjectFieldSelector {
                    field_path: field_path.to_string(),
                    ..ObjectFieldSelector::default()
                }),
                ..EnvVarSource::default()
            },
        )
    }

    /// Sources an environment variable from a key of a ConfigMap.
    pub fn config_map_ref(
        self,
        name: impl Into<String>,
        config_map_name: impl Into<String>,
        config_map_key: impl Into<String>,
    ) -> Self {
        self.env_from(
            name,
            EnvVarSource {
                config_map_key_ref: Some(ConfigMapKeySelector {
                    name: config_map_name.into(),
                    key: config_map_key.into(),
                    ..ConfigMapKeySelector::default()
                }),
                ..EnvVarSource::default()
            },
        )
    }

    /// Sources an environment variable from a resource limit or request of the container, e.g.
    /// `limits.memory`.
    pub fn resource_ref(self, name: impl Into<String>, resource: impl Into<String>) -> Self {
        self.env_from(
            name,
            EnvVarSource {
                resource_field_ref: Some(ResourceFieldSelector {
                    resource: resource.into(),
                    ..ResourceFieldSelector::default()
                }),
                ..EnvVarSource::default()
            },
        )
    }

    fn env_from(mut self, name: impl Into<String>, source: EnvVarSource) -> Self {
        set_at_map(&mut self.env, name, EnvValue::Source(source));
        self
    }

    /// Mounts the host's Docker socket into this container.
    ///
    /// The [`PodBuilder`](super::PodBuilder) this container is added to provides the backing
    /// host path volume.
    pub fn mount_docker(mut self, mount_docker: bool) -> Self {
        self.mount_docker = mount_docker;
        self
    }

    pub fn port(mut self, number: u16, name: impl Into<String>) -> Self {
        set_at_map(&mut self.ports, name, number);
        self
    }

    pub(crate) fn mounts_docker(&self) -> bool {
        self.mount_docker
    }

    pub fn build(&self) -> Container {
        let env = self.env.as_ref().map(|env| {
            env.iter()
                .map(|(name, value)| match value {
                    EnvValue::Literal(value) => EnvVar {
                        name: name.clone(),
                        value: Some(value.clone()),
                        ..EnvVar::default()
                    },
                    EnvValue::Source(source) => EnvVar {
                        name: name.clone(),
                        value_from: Some(source.clone()),
                        ..EnvVar::default()
                    },
                })
                .collect()
        });

        let ports = self.ports.as_ref().map(|ports| {
            ports
                .iter()
                .map(|(name, number)| ContainerPort {
                    name: Some(name.clone()),
                    container_port: i32::from(*number),
                    ..ContainerPort::default()
                })
                .collect()
        });

        let volume_mounts = self.mount_docker.then(|| {
            vec![VolumeMount {
                name: DOCKER_VOLUME_NAME.to_string(),
                mount_path: DOCKER_SOCKET_PATH.to_string(),
                read_only: Some(true),
                ..VolumeMount::default()
            }]
        });

        Container {
            name: self.name.clone(),
            image: Some(self.image.clone()),
            env,
            ports,
            volume_mounts,
            ..Container::default()
        }
    }
}

/// Downward API capabilities available via `fieldRef`
/// See: <https://kubernetes.io/docs/tasks/inject-data-application/downward-api-volume-expose-pod-information/#capabilities-of-the-downward-api>
#[derive(Debug)]
pub enum FieldPathEnvVar {
    Name,
    Namespace,
    Uid,
    NodeName,
    PodIp,
    Labels(String),
    Annotations(String),
}

impl fmt::Display for FieldPathEnvVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Name => write!(f, "metadata.name"),
            Self::Namespace => write!(f, "metadata.namespace"),
            Self::Uid => write!(f, "metadata.uid"),
            Self::NodeName => write!(f, "spec.nodeName"),
            Self::PodIp => write!(f, "status.podIP"),
            Self::Labels(name) => write!(f, "metadata.labels['{name}']"),
            Self::Annotations(name) => write!(f, "metadata.annotations['{name}']"),
        }
    }
}
