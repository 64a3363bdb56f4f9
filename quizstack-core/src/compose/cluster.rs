//! Compute cluster declaration.

use crate::config::ComposerSettings;
use crate::types::{Cluster, External, NetworkReference};
use tracing::{debug, instrument};

/// Declares the single cluster of a composition run.
pub struct ClusterProvisioner;

impl ClusterProvisioner {
    #[instrument(skip_all, fields(vpc_id = %network.vpc_id))]
    pub fn provision(settings: &ComposerSettings, network: &External<NetworkReference>) -> Cluster {
        let cluster = Cluster {
            logical_id: settings.logical_id("Cluster"),
            vpc_id: network.vpc_id.clone(),
            depends_on: vec![network.logical_id().to_string()],
        };
        debug!(cluster = %cluster.logical_id, "Declared cluster");
        cluster
    }
}
