use k8s_openapi::api::core::v1::{HostPathVolumeSource, Volume};
use snafu::{OptionExt, Snafu};

use crate::constants::{DOCKER_SOCKET_PATH, DOCKER_VOLUME_NAME};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("volume {name:?} has no volume source, set one (e.g. a host path) before building"))]
    MissingVolumeSource { name: String },
}

/// A builder to build [`Volume`] objects.
///
/// Host paths are the only supported volume source. Building a volume without a source is a
/// programming error and fails with [`Error::MissingVolumeSource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VolumeBuilder {
    name: String,
    volume_source: Option<VolumeSource>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum VolumeSource {
    HostPath {
        path: String,
        type_: Option<String>,
    },
}

impl VolumeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn host_path(self, path: impl Into<String>) -> Self {
        self.with_host_path(path, None::<String>)
    }

    /// Like [`Self::host_path`], but also sets the host path type, e.g. `Socket` or
    /// `DirectoryOrCreate`.
    pub fn with_host_path(
        mut self,
        path: impl Into<String>,
        type_: Option<impl Into<String>>,
    ) -> Self {
        self.volume_source = Some(VolumeSource::HostPath {
            path: path.into(),
            type_: type_.map(Into::into),
        });
        self
    }

    /// Returns the constructed [`Volume`].
    pub fn build(&self) -> Result<Volume> {
        let source = self.volume_source.as_ref().context(MissingVolumeSourceSnafu {
            name: self.name.clone(),
        })?;

        Ok(match source {
            VolumeSource::HostPath { path, type_ } => Volume {
                name: self.name.clone(),
                host_path: Some(HostPathVolumeSource {
                    path: path.clone(),
                    type_: type_.clone(),
                }),
                ..Volume::default()
            },
        })
    }
}

/// The host path volume backing containers built with
/// [`ContainerBuilder::mount_docker`](super::container::ContainerBuilder::mount_docker).
pub(crate) fn docker_socket_volume() -> Volume {
    Volume {
        name: DOCKER_VOLUME_NAME.to_string(),
        host_path: Some(HostPathVolumeSource {
            path: DOCKER_SOCKET_PATH.to_string(),
            type_: None,
        }),
        ..Volume::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_path_volume() {
        let volume = VolumeBuilder::new("data").host_path("/srv/data").build().unwrap();

        assert_eq!(volume.name, "data");
        assert_eq!(
            volume.host_path,
            Some(HostPathVolumeSource {
                path: "/srv/data".to_string(),
                type_: None,
            })
        );
    }

    #[test]
    fn host_path_volume_with_type() {
        let volume = VolumeBuilder::new("socket")
            .with_host_path("/run/containerd/containerd.sock", Some("Socket"))
            .build()
            .unwrap();

        assert_eq!(
            volume.host_path.and_then(|host_path| host_path.type_),
            Some("Socket".to_string())
        );
    }

    #[test]
    fn last_source_wins() {
        let volume = VolumeBuilder::new("data")
            .host_path("/first")
            .host_path("/second")
            .build()
            .unwrap();

        assert_eq!(volume.host_path.unwrap().path, "/second");
    }

    #[test]
    fn missing_source_is_an_error() {
        let result = VolumeBuilder::new("empty").build();

        assert_eq!(
            result,
            Err(Error::MissingVolumeSource {
                name: "empty".to_string()
            })
        );
    }

    #[test]
    fn docker_socket_volume_matches_builder() {
        let built = VolumeBuilder::new(DOCKER_VOLUME_NAME)
            .host_path(DOCKER_SOCKET_PATH)
            .build()
            .unwrap();

        assert_eq!(docker_socket_volume(), built);
    }
}
