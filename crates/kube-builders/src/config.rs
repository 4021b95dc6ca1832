//! Loading the cluster connection from a kubeconfig or the in-cluster environment.
use std::path::PathBuf;

use kube::config::{InferConfigError, KubeConfigOptions, Kubeconfig, KubeconfigError};
use snafu::{ResultExt, Snafu};
use tracing::{debug, instrument};

use crate::{client::Client, constants::DEFAULT_FIELD_MANAGER};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read kubeconfig from {path:?}"))]
    ReadKubeconfig {
        source: KubeconfigError,
        path: PathBuf,
    },

    #[snafu(display("failed to load kubeconfig"))]
    LoadKubeconfig { source: KubeconfigError },

    #[snafu(display("failed to infer Kubernetes client configuration"))]
    InferConfig { source: InferConfigError },

    #[snafu(display("failed to create Kubernetes client"))]
    CreateClient { source: kube::Error },
}

/// Options controlling how the [`Client`] connects to the cluster.
///
/// `--kube-context` and `--field-manager` can also be set through the environment. `KUBECONFIG`
/// is left to kubeconfig inference, which accepts a list of paths.
#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
#[command(next_help_heading = "Kubernetes Client Options")]
pub struct ClientOptions {
    /// Path of the kubeconfig to use. Without it, the kubeconfig is inferred from `KUBECONFIG`
    /// (which may list several files) or `~/.kube/config`, falling back to the in-cluster
    /// service account.
    #[arg(long, value_name = "FILE")]
    pub kubeconfig: Option<PathBuf>,

    /// Name of the kubeconfig context to use instead of the current context.
    #[arg(long, env = "KUBE_CONTEXT")]
    pub kube_context: Option<String>,

    /// Field manager recorded for every object created or replaced by this client.
    #[arg(long, env, default_value = DEFAULT_FIELD_MANAGER)]
    pub field_manager: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            kube_context: None,
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
        }
    }
}

impl ClientOptions {
    fn kubeconfig_options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: self.kube_context.clone(),
            ..KubeConfigOptions::default()
        }
    }
}

/// Creates a [`Client`] as configured by `options`.
#[instrument]
pub async fn create_client(options: &ClientOptions) -> Result<Client> {
    let config = match (&options.kubeconfig, &options.kube_context) {
        (Some(path), _) => {
            debug!("loading explicitly configured kubeconfig");
            let kubeconfig = Kubeconfig::read_from(path).context(ReadKubeconfigSnafu { path })?;
            kube::Config::from_custom_kubeconfig(kubeconfig, &options.kubeconfig_options())
                .await
                .context(LoadKubeconfigSnafu)?
        }
        (None, Some(_)) => kube::Config::from_kubeconfig(&options.kubeconfig_options())
            .await
            .context(LoadKubeconfigSnafu)?,
        (None, None) => kube::Config::infer().await.context(InferConfigSnafu)?,
    };

    let client = kube::Client::try_from(config).context(CreateClientSnafu)?;
    Ok(Client::new(client, Some(options.field_manager.clone())))
}
