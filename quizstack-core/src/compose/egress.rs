//! Outbound reachability from the service to the database group.

use crate::env::Configuration;
use crate::error::{QuizstackError, Result};
use crate::lookup::ResourceLookup;
use crate::types::{
    EgressRule, External, LoadBalancedService, NetworkReference, Protocol, SecurityGroupReference,
};
use tracing::{info, instrument};

/// Logical id the database group is imported under.
pub const DATABASE_SECURITY_GROUP_ID: &str = "database-security-group";

/// Grants the service's security group one outbound TCP port to the
/// externally owned database group. Nothing else is opened, and the external
/// group itself is left untouched.
pub struct DatabaseEgress;

impl DatabaseEgress {
    /// # Errors
    ///
    /// - `MissingField` if `SG_DB` is empty
    /// - `InvalidPort` if `DB_PORT` is missing, malformed or zero
    /// - `SecurityGroupNotFound` if the group does not exist in the region
    /// - `SecurityGroupVpcMismatch` if the group lives in another network
    #[instrument(skip_all, fields(sg_db = %config.sg_db, region = %region))]
    pub fn allow<L: ResourceLookup>(
        lookup: &L,
        service: &LoadBalancedService,
        network: &External<NetworkReference>,
        config: &Configuration,
        region: &str,
    ) -> Result<(External<SecurityGroupReference>, EgressRule)> {
        let group_id = config.require_security_group()?;
        let port = config.db_port.require()?;

        let group = lookup.find_security_group(group_id, region)?.ok_or_else(|| {
            QuizstackError::SecurityGroupNotFound {
                group_id: group_id.to_string(),
                region: region.to_string(),
            }
        })?;

        if let Some(actual) = group.vpc_id.as_deref().filter(|vpc| *vpc != network.vpc_id) {
            return Err(QuizstackError::SecurityGroupVpcMismatch {
                group_id: group.group_id.clone(),
                expected: network.vpc_id.clone(),
                actual: actual.to_string(),
            });
        }

        let imported = External::imported(DATABASE_SECURITY_GROUP_ID, group);
        let source = &service.security_group.logical_id;

        let rule = EgressRule {
            logical_id: format!("{}ToDatabaseTcp{}", source, port),
            source_security_group: source.clone(),
            destination: imported.logical_id().to_string(),
            destination_group_id: Some(imported.group_id.clone()),
            protocol: Protocol::Tcp,
            port,
            description: format!("to {}:{}", imported.group_id, port),
            depends_on: vec![source.clone(), imported.logical_id().to_string()],
        };

        info!(destination = %imported.group_id, port, "Declared database egress");
        Ok((imported, rule))
    }
}
