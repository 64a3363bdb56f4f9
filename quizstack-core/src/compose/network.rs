//! Network location (lookup only).

use crate::error::{QuizstackError, Result};
use crate::lookup::ResourceLookup;
use crate::types::{External, NetworkReference};
use tracing::{info, instrument};

/// Resolves the pre-existing network the topology is placed in.
pub struct NetworkLocator;

impl NetworkLocator {
    /// Look up `vpc_id` in `region`. Never creates a network.
    ///
    /// # Errors
    ///
    /// - `MissingField` if `vpc_id` is empty
    /// - `NetworkNotFound` if no such network exists in the region
    /// - whatever the lookup backend reports when it fails
    #[instrument(skip(lookup))]
    pub fn locate<L: ResourceLookup>(
        lookup: &L,
        logical_id: &str,
        vpc_id: &str,
        region: &str,
    ) -> Result<External<NetworkReference>> {
        if vpc_id.trim().is_empty() {
            return Err(QuizstackError::MissingField { field: "VPC_DB".to_string() });
        }

        let network = lookup.find_network(vpc_id, region)?.ok_or_else(|| {
            QuizstackError::NetworkNotFound {
                vpc_id: vpc_id.to_string(),
                region: region.to_string(),
            }
        })?;

        info!(
            vpc_id = %network.vpc_id,
            public_subnets = network.public_subnets.len(),
            private_subnets = network.private_subnets.len(),
            "Located network"
        );
        Ok(External::imported(logical_id, network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{ContextLookup, LookupContext};

    fn lookup() -> ContextLookup {
        ContextLookup::new(LookupContext {
            networks: vec![NetworkReference {
                vpc_id: "vpc-1".to_string(),
                region: "us-east-1".to_string(),
                cidr: Some("10.0.0.0/16".to_string()),
                public_subnets: vec![],
                private_subnets: vec![],
            }],
            ..Default::default()
        })
    }

    #[test]
    fn test_locate_existing_network() {
        let network =
            NetworkLocator::locate(&lookup(), "EasyQuizVpc", "vpc-1", "us-east-1").unwrap();
        assert_eq!(network.logical_id(), "EasyQuizVpc");
        assert_eq!(network.cidr.as_deref(), Some("10.0.0.0/16"));
    }

    #[test]
    fn test_unknown_network_is_lookup_failure() {
        let err =
            NetworkLocator::locate(&lookup(), "EasyQuizVpc", "vpc-1", "eu-west-1").unwrap_err();
        match err {
            QuizstackError::NetworkNotFound { vpc_id, region } => {
                assert_eq!(vpc_id, "vpc-1");
                assert_eq!(region, "eu-west-1");
            }
            other => panic!("expected NetworkNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_identifier_is_missing_field() {
        let err = NetworkLocator::locate(&lookup(), "EasyQuizVpc", "", "us-east-1").unwrap_err();
        assert!(matches!(err, QuizstackError::MissingField { field } if field == "VPC_DB"));
    }
}
