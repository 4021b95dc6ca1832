use std::{collections::BTreeMap, fmt::Display};

use k8s_openapi::{
    api::core::v1::{Service, ServicePort, ServiceSpec},
    apimachinery::pkg::util::intstr::IntOrString,
};
use strum::Display as StrumDisplay;

use crate::{
    builder::meta::ObjectMetaBuilder,
    client::Client,
    constants::WEB_PORT,
    kvp::{set_at_map, set_display_at_map},
    reconcile,
};

/// The `type` of a [`ServiceSpec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay)]
pub enum ServiceType {
    #[strum(serialize = "ClusterIP")]
    ClusterIp,
    NodePort,
    LoadBalancer,
    ExternalName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PortSpec {
    target: IntOrString,
    port: u16,
}

/// A builder to build [`Service`] objects.
///
/// Ports are keyed by their name and emitted in name order. A port targets a container port
/// either by number ([`Self::port_by_number`]) or by the container port's name
/// ([`Self::port_by_name`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceBuilder {
    metadata: ObjectMetaBuilder,
    type_: Option<ServiceType>,
    selector: Option<BTreeMap<String, String>>,
    ports: Option<BTreeMap<String, PortSpec>>,
}

impl ServiceBuilder {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMetaBuilder::new().name(name).namespace(namespace),
            type_: None,
            selector: None,
            ports: None,
        }
    }

    pub fn type_(mut self, type_: ServiceType) -> Self {
        self.type_ = Some(type_);
        self
    }

    /// Adds a label the selected pods must carry.
    pub fn selector(mut self, key: impl Into<String>, value: impl Display) -> Self {
        set_display_at_map(&mut self.selector, key, value);
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

    /// Exposes `port`, forwarding to the container port numbered `target`.
    pub fn port_by_number(mut self, name: impl Into<String>, target: u16, port: u16) -> Self {
        set_at_map(
            &mut self.ports,
            name,
            PortSpec {
                target: IntOrString::Int(i32::from(target)),
                port,
            },
        );
        self
    }

    /// Exposes `port`, forwarding to the container port named `target`.
    pub fn port_by_name(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        port: u16,
    ) -> Self {
        set_at_map(
            &mut self.ports,
            name,
            PortSpec {
                target: IntOrString::String(target.into()),
                port,
            },
        );
        self
    }

    /// Exposes [`WEB_PORT`], forwarding to the container port named `target`.
    pub fn web_port(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.port_by_name(name, target, WEB_PORT)
    }

    pub fn build(&self) -> Service {
        let ports = self.ports.as_ref().map(|ports| {
            ports
                .iter()
                .map(|(name, spec)| ServicePort {
                    name: Some(name.clone()),
                    port: i32::from(spec.port),
                    target_port: Some(spec.target.clone()),
                    ..ServicePort::default()
                })
                .collect()
        });

        Service {
            metadata: self.metadata.build(),
            spec: Some(ServiceSpec {
                type_: self.type_.map(|type_| type_.to_string()),
                selector: self.selector.clone(),
                ports,
                ..ServiceSpec::default()
            }),
            status: None,
        }
    }

    pub async fn push(&self, client: &Client) -> reconcile::Result<Service> {
        reconcile::push(client, &self.build()).await
    }
}
