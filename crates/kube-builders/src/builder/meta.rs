use std::{collections::BTreeMap, fmt::Display};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::kvp::{extend_map, set_display_at_map};

/// A builder to build [`ObjectMeta`] objects.
///
/// Every resource builder in this crate embeds one of these for its name, namespace, labels and
/// annotations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectMetaBuilder {
    name: Option<String>,
    namespace: Option<String>,
    labels: Option<BTreeMap<String, String>>,
    annotations: Option<BTreeMap<String, String>>,
}

impl ObjectMetaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn namespace_opt(mut self, namespace: impl Into<Option<String>>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// This adds a single label to the existing labels.
    /// It'll override a label with the same key.
    pub fn with_label(mut self, label_key: impl Into<String>, label_value: impl Display) -> Self {
        set_display_at_map(&mut self.labels, label_key, label_value);
        self
    }

    /// This adds multiple labels to the existing labels.
    /// Any existing label with a key that is contained in `labels` will be overwritten
    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        extend_map(&mut self.labels, labels);
        self
    }

    /// This adds a single annotation to the existing annotations.
    /// It'll override an annotation with the same key.
    pub fn with_annotation(
        mut self,
        annotation_key: impl Into<String>,
        annotation_value: impl Display,
    ) -> Self {
        set_display_at_map(&mut self.annotations, annotation_key, annotation_value);
        self
    }

    /// This adds multiple annotations to the existing annotations.
    /// Any existing annotation with a key that is contained in `annotations` will be overwritten
    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        extend_map(&mut self.annotations, annotations);
        self
    }

    pub fn get_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn build(&self) -> ObjectMeta {
        ObjectMeta {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
            ..ObjectMeta::default()
        }
    }
}
