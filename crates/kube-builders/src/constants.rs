/// Name of the volume (and volume mount) backing the Docker socket.
pub const DOCKER_VOLUME_NAME: &str = "docker.sock";

/// Location of the Docker socket, both on the host and inside containers.
pub const DOCKER_SOCKET_PATH: &str = "/var/run/docker.sock";

/// Port exposed by [`ServiceBuilder::web_port`](crate::builder::service::ServiceBuilder::web_port).
pub const WEB_PORT: u16 = 80;

/// Name of the image pull secret added by
/// [`PodBuilder::docker_pull_secret`](crate::builder::pod::PodBuilder::docker_pull_secret).
pub const DOCKER_PULL_SECRET: &str = "docker";

/// Annotation asking cert-manager (or kube-lego) to provision a certificate for an ingress.
pub const TLS_ACME_ANNOTATION: &str = "kubernetes.io/tls-acme";

/// Label used as workload selector when the pod template carries no labels of its own.
pub const APP_NAME_LABEL: &str = "app.kubernetes.io/name";

/// Field manager used when none is configured.
pub const DEFAULT_FIELD_MANAGER: &str = "kube-builders";
