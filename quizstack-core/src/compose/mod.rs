//! Topology composition.
//!
//! This module turns a resolved [`Configuration`](crate::env::Configuration)
//! and a [`ResourceLookup`](crate::lookup::ResourceLookup) into a
//! [`Topology`](crate::types::Topology). Steps run in a fixed order, each
//! consuming the previous step's output:
//! network → cluster → service → egress → health check → (DNS/TLS).

pub mod cluster;
pub mod composer;
pub mod dns_tls;
pub mod egress;
pub mod graph;
pub mod health;
pub mod network;
pub mod service;

#[cfg(test)]
mod composer_tests;

pub use cluster::ClusterProvisioner;
pub use composer::{realization_order, TopologyComposer};
pub use dns_tls::DnsTlsBinding;
pub use egress::{DatabaseEgress, DATABASE_SECURITY_GROUP_ID};
pub use health::HealthCheckBinding;
pub use network::NetworkLocator;
pub use service::ServiceComposer;
