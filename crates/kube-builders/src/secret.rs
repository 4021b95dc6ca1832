//! Reading Secrets back from the cluster.
use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;
use snafu::{ResultExt, Snafu};
use tracing::instrument;

use crate::client::Client;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to get Secret {name:?} in namespace {namespace:?}"))]
    GetSecret {
        source: kube::Error,
        name: String,
        namespace: String,
    },
}

/// Returns whether the Secret `name` exists in `namespace`.
pub async fn secret_exists(client: &Client, name: &str, namespace: &str) -> Result<bool> {
    Ok(fetch_secret(client, name, namespace).await?.is_some())
}

/// Returns the decoded contents of the Secret `name` in `namespace`, or [`None`] if there is no
/// such Secret.
///
/// A Secret without any data yields an empty map.
pub async fn get_secret(
    client: &Client,
    name: &str,
    namespace: &str,
) -> Result<Option<BTreeMap<String, Vec<u8>>>> {
    let secret = fetch_secret(client, name, namespace).await?;

    Ok(secret.map(|secret| {
        secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect()
    }))
}

#[instrument(skip(client))]
async fn fetch_secret(client: &Client, name: &str, namespace: &str) -> Result<Option<Secret>> {
    client
        .get_namespaced_api::<Secret>(Some(namespace))
        .get_opt(name)
        .await
        .context(GetSecretSnafu { name, namespace })
}
