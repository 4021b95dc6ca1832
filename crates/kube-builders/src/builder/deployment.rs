use std::fmt::Display;

use k8s_openapi::{
    api::{
        apps::v1::{Deployment, DeploymentSpec},
        core::v1::PodTemplateSpec,
    },
    apimachinery::pkg::apis::meta::v1::LabelSelector,
};

use crate::{
    builder::{meta::ObjectMetaBuilder, pod::PodBuilder},
    client::Client,
    reconcile,
};

/// This builder is used to construct [`Deployment`]s from a [`PodBuilder`], see
/// [`PodBuilder::deployment`].
///
/// The deployment lives in the namespace of the pod it was created from. Its labels and
/// annotations are independent of the pod template's, which keeps the labels and annotations of
/// the pod.
///
/// We use u16 for the replica count and the history limit, as both are i32 in the API and we
/// don't want to allow negative numbers. u16 will always fit in i32.
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentBuilder {
    metadata: ObjectMetaBuilder,
    template: PodTemplateSpec,
    selector: LabelSelector,
    replicas: Option<u16>,
    revision_history_limit: Option<u16>,
}

impl DeploymentBuilder {
    pub(crate) fn from_pod(name: impl Into<String>, pod: &PodBuilder) -> Self {
        let name = name.into();
        let (template, selector) = pod.build_workload_template(&name);

        Self {
            metadata: ObjectMetaBuilder::new()
                .name(name)
                .namespace_opt(pod.namespace()),
            template,
            selector,
            replicas: None,
            revision_history_limit: None,
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

    /// Sets the desired number of pods. Left unset, the cluster defaults apply.
    pub fn replicas(mut self, replicas: u16) -> Self {
        self.replicas = Some(replicas);
        self
    }

    /// Sets how many old ReplicaSets are kept around for rollbacks.
    pub fn history(mut self, revision_history_limit: u16) -> Self {
        self.revision_history_limit = Some(revision_history_limit);
        self
    }

    pub fn build(&self) -> Deployment {
        Deployment {
            metadata: self.metadata.build(),
            spec: Some(DeploymentSpec {
                replicas: self.replicas.map(i32::from),
                revision_history_limit: self.revision_history_limit.map(i32::from),
                selector: self.selector.clone(),
                template: self.template.clone(),
                ..DeploymentSpec::default()
            }),
            status: None,
        }
    }

    pub async fn push(&self, client: &Client) -> reconcile::Result<Deployment> {
        reconcile::push(client, &self.build()).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rstest::*;

    use super::*;
    use crate::constants::APP_NAME_LABEL;

    #[fixture]
    fn pod() -> PodBuilder {
        PodBuilder::new("web", "frontend")
            .label("app", "web")
            .annotation("owner", "team-a")
            .container("nginx", "nginx:1.27", |container| container.port(80, "http"))
    }

    #[rstest]
    fn deployment_from_pod(pod: PodBuilder) {
        let deployment = pod
            .clone()
            .deployment("web-deployment")
            .replicas(3)
            .history(5)
            .label("tier", "frontend")
            .build();

        assert_eq!(deployment.metadata.name.as_deref(), Some("web-deployment"));
        assert_eq!(deployment.metadata.namespace.as_deref(), Some("frontend"));
        assert_eq!(
            deployment.metadata.labels,
            Some(BTreeMap::from([("tier".to_string(), "frontend".to_string())]))
        );

        let spec = deployment.spec.unwrap();
        assert_eq!(spec.replicas, Some(3));
        assert_eq!(spec.revision_history_limit, Some(5));
        assert_eq!(spec.template, pod.build_template());
        assert_eq!(
            spec.selector.match_labels,
            Some(BTreeMap::from([("app".to_string(), "web".to_string())]))
        );
    }

    #[rstest]
    fn unset_counts_are_omitted(pod: PodBuilder) {
        let spec = pod.deployment("web").build().spec.unwrap();

        assert!(spec.replicas.is_none());
        assert!(spec.revision_history_limit.is_none());
    }

    #[rstest]
    fn explicit_zero_is_emitted(pod: PodBuilder) {
        let spec = pod.deployment("web").replicas(0).history(0).build().spec.unwrap();

        assert_eq!(spec.replicas, Some(0));
        assert_eq!(spec.revision_history_limit, Some(0));
    }

    #[test]
    fn unlabelled_pod_gets_a_selector() {
        let deployment = PodBuilder::new("worker", "jobs")
            .container("worker", "worker:1", |container| container)
            .deployment("worker")
            .build();

        let spec = deployment.spec.unwrap();
        let expected = BTreeMap::from([(APP_NAME_LABEL.to_string(), "worker".to_string())]);
        assert_eq!(spec.selector.match_labels.as_ref(), Some(&expected));
        assert_eq!(spec.template.metadata.unwrap().labels, Some(expected));
    }

    #[rstest]
    fn later_pod_changes_do_not_leak(pod: PodBuilder) {
        let deployment = pod.clone().deployment("web");
        let _changed = pod.label("app", "something-else");

        let labels = deployment.build().spec.unwrap().template.metadata.unwrap().labels;
        assert_eq!(labels.unwrap()["app"], "web");
    }
}
