//! Namespace management utilities
use k8s_openapi::api::core::v1::Namespace;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, instrument};

use crate::{
    builder::namespace::{self, NamespaceBuilder},
    client::Client,
    reconcile,
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to get namespace {name:?}"))]
    GetNamespace { source: kube::Error, name: String },

    #[snafu(display("failed to build namespace {name:?}"))]
    BuildNamespace {
        source: namespace::Error,
        name: String,
    },

    #[snafu(display("failed to create namespace {name:?}"))]
    CreateNamespace {
        source: reconcile::Error,
        name: String,
    },
}

/// Ensures the namespace `name` exists in the cluster, creating it if it doesn't.
///
/// Before creating the namespace, `customize` is handed the [`NamespaceBuilder`] to add labels
/// or annotations. An existing namespace is left untouched and `customize` is not called.
///
/// Returns whether the namespace was created.
#[instrument(skip(client, customize))]
pub async fn ensure_namespace_exists(
    client: &Client,
    name: &str,
    customize: impl FnOnce(NamespaceBuilder) -> NamespaceBuilder,
) -> Result<bool> {
    let existing = client
        .get_all_api::<Namespace>()
        .get_opt(name)
        .await
        .context(GetNamespaceSnafu { name })?;

    if existing.is_some() {
        debug!("namespace already exists");
        return Ok(false);
    }

    info!("creating namespace");
    let builder = NamespaceBuilder::new(name).context(BuildNamespaceSnafu { name })?;
    match customize(builder).push(client).await {
        Ok(_) => Ok(true),
        Err(error) if was_created_concurrently(&error) => {
            debug!("namespace was created concurrently");
            Ok(false)
        }
        Err(error) => Err(error).context(CreateNamespaceSnafu { name }),
    }
}

/// The namespace appeared between the lookup and the create.
fn was_created_concurrently(error: &reconcile::Error) -> bool {
    matches!(
        error,
        reconcile::Error::CreateObject {
            source: kube::Error::Api(response),
            ..
        } if response.code == 409 || response.reason == "AlreadyExists"
    )
}
