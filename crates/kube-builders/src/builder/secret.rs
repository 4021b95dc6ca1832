use std::{collections::BTreeMap, fmt::Display};

use k8s_openapi::{ByteString, api::core::v1::Secret};

use crate::{builder::meta::ObjectMetaBuilder, client::Client, kvp::set_at_map, reconcile};

/// A builder to build [`Secret`] objects.
///
/// Values are stored in `data`, which is base64 encoded on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretBuilder {
    metadata: ObjectMetaBuilder,
    data: Option<BTreeMap<String, ByteString>>,
}

impl SecretBuilder {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMetaBuilder::new().name(name).namespace(namespace),
            data: None,
        }
    }

    /// Stores the [`Display`] rendering of `value` at `key`.
    pub fn value(self, key: impl Into<String>, value: impl Display) -> Self {
        self.binary_value(key, value.to_string())
    }

    pub fn binary_value(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        set_at_map(&mut self.data, key, ByteString(value.into()));
        self
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.metadata = self.metadata.with_label(key, value);
        self
    }

    pub fn annotation(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.metadata = self.metadata.with_annotation(key, value);
        self
    }

    pub fn build(&self) -> Secret {
        Secret {
            metadata: self.metadata.build(),
            data: self.data.clone(),
            ..Secret::default()
        }
    }

    pub async fn push(&self, client: &Client) -> reconcile::Result<Secret> {
        reconcile::push(client, &self.build()).await
    }
}
