use std::{collections::BTreeMap, fmt::Display};

use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};

use crate::{
    builder::meta::ObjectMetaBuilder, client::Client, constants::TLS_ACME_ANNOTATION,
    kvp::set_at_map, reconcile,
};

const PATH_TYPE: &str = "ImplementationSpecific";

#[derive(Clone, Debug, PartialEq, Eq)]
struct ServiceTarget {
    service: String,
    port: u16,
}

/// A builder to build `networking.k8s.io/v1` [`Ingress`] objects for a single host.
///
/// All paths end up in one rule for the host, sorted by path. Setting the same path twice keeps
/// the last target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngressBuilder {
    metadata: ObjectMetaBuilder,
    host: String,
    paths: Option<BTreeMap<String, ServiceTarget>>,
    tls_secret: Option<String>,
}

impl IngressBuilder {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            metadata: ObjectMetaBuilder::new().name(name).namespace(namespace),
            host: host.into(),
            paths: None,
            tls_secret: None,
        }
    }

    /// Routes requests for `path` to port `port` of the Service `service`.
    pub fn path(mut self, path: impl Into<String>, service: impl Into<String>, port: u16) -> Self {
        set_at_map(
            &mut self.paths,
            path,
            ServiceTarget {
                service: service.into(),
                port,
            },
        );
        self
    }

    /// Terminates TLS for the host with the certificate stored in the Secret `secret_name`.
    pub fn tls(mut self, secret_name: impl Into<String>) -> Self {
        self.tls_secret = Some(secret_name.into());
        self
    }

    /// Sets the [`TLS_ACME_ANNOTATION`], so that a certificate for the host is provisioned
    /// automatically.
    pub fn tls_acme(self) -> Self {
        self.annotation(TLS_ACME_ANNOTATION, true)
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.metadata = self.metadata.with_label(key, value);
        self
    }

    pub fn annotation(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.metadata = self.metadata.with_annotation(key, value);
        self
    }

    pub fn build(&self) -> Ingress {
        let rules = self.paths.as_ref().map(|paths| {
            vec![IngressRule {
                host: Some(self.host.clone()),
                http: Some(HTTPIngressRuleValue {
                    paths: paths
                        .iter()
                        .map(|(path, target)| HTTPIngressPath {
                            path: Some(path.clone()),
                            path_type: PATH_TYPE.to_string(),
                            backend: IngressBackend {
                                service: Some(IngressServiceBackend {
                                    name: target.service.clone(),
                                    port: Some(ServiceBackendPort {
                                        number: Some(i32::from(target.port)),
                                        ..ServiceBackendPort::default()
                                    }),
                                }),
                                ..IngressBackend::default()
                            },
                        })
                        .collect(),
                }),
            }]
        });

        let tls = self.tls_secret.as_ref().map(|secret_name| {
            vec![IngressTLS {
                hosts: Some(vec![self.host.clone()]),
                secret_name: Some(secret_name.clone()),
            }]
        });

        Ingress {
            metadata: self.metadata.build(),
            spec: Some(IngressSpec {
                rules,
                tls,
                ..IngressSpec::default()
            }),
            status: None,
        }
    }

    pub async fn push(&self, client: &Client) -> reconcile::Result<Ingress> {
        reconcile::push(client, &self.build()).await
    }
}
