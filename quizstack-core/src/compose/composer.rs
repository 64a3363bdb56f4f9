//! The composition pipeline.

use super::cluster::ClusterProvisioner;
use super::dns_tls::DnsTlsBinding;
use super::egress::DatabaseEgress;
use super::graph;
use super::health::HealthCheckBinding;
use super::network::NetworkLocator;
use super::service::ServiceComposer;
use crate::config::ComposerSettings;
use crate::env::Configuration;
use crate::error::Result;
use crate::lookup::ResourceLookup;
use crate::types::{Imports, PlanNode, Topology};
use tracing::{info, instrument};

/// Derives a [`Topology`] from configuration and external lookups.
///
/// Each run is a fresh, pure derivation: the composer holds no state between
/// calls beyond its lookup and settings.
pub struct TopologyComposer<L> {
    lookup: L,
    settings: ComposerSettings,
}

impl<L: ResourceLookup> TopologyComposer<L> {
    pub fn new(lookup: L, settings: ComposerSettings) -> Self {
        Self { lookup, settings }
    }

    /// Override whether DNS/TLS wiring is included.
    pub fn with_dns_tls(mut self, include: bool) -> Self {
        self.settings.include_dns_tls = include;
        self
    }

    pub fn settings(&self) -> &ComposerSettings {
        &self.settings
    }

    /// Run every step in dependency order.
    ///
    /// Any failure aborts the whole run; no partial topology is returned.
    #[instrument(
        skip(self, config),
        fields(stack = %self.settings.stack_name, dns_tls = self.settings.include_dns_tls)
    )]
    pub fn compose(&self, config: &Configuration) -> Result<Topology> {
        self.settings.validate()?;

        let settings = &self.settings;
        let region = config.region_or(&settings.default_region).to_string();
        info!(region = %region, "Composing topology");

        let vpc_id = config.require_vpc()?;
        let network =
            NetworkLocator::locate(&self.lookup, &settings.logical_id("Vpc"), vpc_id, &region)?;
        let cluster = ClusterProvisioner::provision(settings, &network);
        let mut service = ServiceComposer::compose(settings, &cluster, &network, config)?;
        let (database_security_group, database_egress) =
            DatabaseEgress::allow(&self.lookup, &service, &network, config, &region)?;
        HealthCheckBinding::bind(&mut service.target_group);

        let (hosted_zone, dns_tls) = if settings.include_dns_tls {
            let (zone, binding) = DnsTlsBinding::bind(&self.lookup, settings, &mut service)?;
            (Some(zone), Some(binding))
        } else {
            (None, None)
        };

        let topology = Topology {
            stack_name: settings.stack_name.clone(),
            region,
            include_dns_tls: settings.include_dns_tls,
            imports: Imports { network, database_security_group, hosted_zone },
            cluster,
            service,
            database_egress,
            dns_tls,
        };

        let nodes = topology.nodes();
        graph::validate_dependencies(&nodes)?;

        info!(resources = nodes.len(), "Topology composed");
        Ok(topology)
    }

    /// Compose, then return the nodes in realization order.
    pub fn plan(&self, config: &Configuration) -> Result<Vec<PlanNode>> {
        let topology = self.compose(config)?;
        Ok(realization_order(&topology))
    }
}

/// Nodes of `topology` ordered so dependencies come first.
pub fn realization_order(topology: &Topology) -> Vec<PlanNode> {
    graph::topological_sort(&topology.nodes())
}
