//! Fluent builders for Kubernetes objects.
//!
//! Every builder in [`builder`] is a plain value: configuration methods consume the builder and
//! return the updated one, so a partially configured chain can be cloned and reused. The terminal
//! `build` call materializes a [`k8s_openapi`] object, and `push` submits it to the cluster using
//! the create-or-update routine in [`reconcile`].
//!
//! ```
//! use kube_builders::builder::pod::PodBuilder;
//!
//! let deployment = PodBuilder::new("web", "default")
//!     .label("app", "web")
//!     .container("nginx", "nginx:1.27", |container| container.port(80, "http"))
//!     .deployment("web")
//!     .replicas(3)
//!     .build();
//!
//! assert_eq!(deployment.spec.unwrap().replicas, Some(3));
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod constants;
pub mod kvp;
pub mod logging;
pub mod namespace;
pub mod reconcile;
pub mod secret;
pub mod validation;

// External re-exports
pub use k8s_openapi;
pub use kube;
