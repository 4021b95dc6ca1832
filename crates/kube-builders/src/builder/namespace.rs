use std::{collections::BTreeMap, fmt::Display};

use k8s_openapi::api::core::v1::Namespace;
use snafu::{ResultExt, Snafu};

use crate::{builder::meta::ObjectMetaBuilder, client::Client, reconcile, validation};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("invalid namespace name {name:?}"))]
    InvalidName {
        source: validation::Errors,
        name: String,
    },
}

/// A builder to build [`Namespace`] objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceBuilder {
    metadata: ObjectMetaBuilder,
}

impl NamespaceBuilder {
    /// Creates a builder for the namespace `name`, which has to be a valid RFC 1123 label.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validation::is_rfc_1123_label(&name).context(InvalidNameSnafu { name: name.clone() })?;

        Ok(Self {
            metadata: ObjectMetaBuilder::new().name(name),
        })
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.metadata = self.metadata.with_label(key, value);
        self
    }

    pub fn annotation(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.metadata = self.metadata.with_annotation(key, value);
        self
    }

    pub fn labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.metadata = self.metadata.with_labels(labels);
        self
    }

    pub fn annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.metadata = self.metadata.with_annotations(annotations);
        self
    }

    pub fn build(&self) -> Namespace {
        Namespace {
            metadata: self.metadata.build(),
            ..Namespace::default()
        }
    }

    pub async fn push(&self, client: &Client) -> reconcile::Result<Namespace> {
        reconcile::push(client, &self.build()).await
    }
}
