//! This module provides builders for various (Kubernetes) objects.
//!
//! They are often not _pure_ builders but contain extra logic to set fields based on others or
//! to fill in sensible defaults.
//!
//! All builders take `self` by value and hand back the updated builder, so chains can be forked
//! by cloning a partially configured builder.
pub mod daemonset;
pub mod deployment;
pub mod ingress;
pub mod meta;
pub mod namespace;
pub mod pod;
pub mod secret;
pub mod service;
