use std::fmt::Display;

use k8s_openapi::{
    api::{
        apps::v1::{DaemonSet, DaemonSetSpec, DaemonSetUpdateStrategy},
        core::v1::PodTemplateSpec,
    },
    apimachinery::pkg::apis::meta::v1::LabelSelector,
};

use crate::{
    builder::{meta::ObjectMetaBuilder, pod::PodBuilder},
    client::Client,
    reconcile,
};

/// This builder is used to construct [`DaemonSet`]s from a [`PodBuilder`], see
/// [`PodBuilder::daemon_set`].
#[derive(Clone, Debug, PartialEq)]
pub struct DaemonSetBuilder {
    metadata: ObjectMetaBuilder,
    template: PodTemplateSpec,
    selector: LabelSelector,
    rolling_updates: bool,
}

impl DaemonSetBuilder {
    pub(crate) fn from_pod(name: impl Into<String>, pod: &PodBuilder) -> Self {
        let name = name.into();
        let (template, selector) = pod.build_workload_template(&name);

        Self {
            metadata: ObjectMetaBuilder::new()
                .name(name)
                .namespace_opt(pod.namespace()),
            template,
            selector,
            rolling_updates: false,
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

    /// Replaces pods one node at a time when the template changes, instead of waiting for them to
    /// be deleted (`OnDelete`).
    pub fn rolling_updates(mut self) -> Self {
        self.rolling_updates = true;
        self
    }

    pub fn build(&self) -> DaemonSet {
        let update_strategy = self.rolling_updates.then(|| DaemonSetUpdateStrategy {
            type_: Some("RollingUpdate".to_string()),
            ..DaemonSetUpdateStrategy::default()
        });

        DaemonSet {
            metadata: self.metadata.build(),
            spec: Some(DaemonSetSpec {
                selector: self.selector.clone(),
                template: self.template.clone(),
                update_strategy,
                ..DaemonSetSpec::default()
            }),
            status: None,
        }
    }

    pub async fn push(&self, client: &Client) -> reconcile::Result<DaemonSet> {
        reconcile::push(client, &self.build()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod() -> PodBuilder {
        PodBuilder::new("agent", "monitoring")
            .label("app", "agent")
            .host_network(true)
            .container("agent", "agent:2", |container| container.mount_docker(true))
    }

    #[test]
    fn daemon_set_from_pod() {
        let daemon_set = pod()
            .daemon_set("node-agent")
            .label("tier", "infra")
            .annotation("owner", "team-b")
            .build();

        assert_eq!(daemon_set.metadata.name.as_deref(), Some("node-agent"));
        assert_eq!(daemon_set.metadata.namespace.as_deref(), Some("monitoring"));
        assert_eq!(daemon_set.metadata.labels.unwrap()["tier"], "infra");
        assert_eq!(daemon_set.metadata.annotations.unwrap()["owner"], "team-b");

        let spec = daemon_set.spec.unwrap();
        assert!(spec.update_strategy.is_none());
        assert_eq!(spec.selector.match_labels.unwrap()["app"], "agent");

        let pod_spec = spec.template.spec.unwrap();
        assert_eq!(pod_spec.host_network, Some(true));
        assert_eq!(pod_spec.volumes.map(|volumes| volumes.len()), Some(1));
    }

    #[test]
    fn rolling_updates() {
        let spec = pod()
            .daemon_set("node-agent")
            .rolling_updates()
            .build()
            .spec
            .unwrap();

        assert_eq!(
            spec.update_strategy.and_then(|strategy| strategy.type_),
            Some("RollingUpdate".to_string())
        );
    }
}
