//! Lookup backed by a cached context document.
//!
//! The document is JSON:
//!
//! ```json
//! {
//!   "networks": [{ "vpc_id": "vpc-1", "region": "us-east-1",
//!                  "public_subnets": [
//!                      { "subnet_id": "subnet-a", "availability_zone": "us-east-1a" }
//!                  ] }],
//!   "security_groups": [{ "group_id": "sg-1", "region": "us-east-1", "vpc_id": "vpc-1" }],
//!   "hosted_zones": [{ "hosted_zone_id": "Z1", "domain": "easyquiz.click" }]
//! }
//! ```

use super::{normalize_domain, ResourceLookup};
use crate::error::{QuizstackError, Result};
use crate::types::{HostedZoneReference, NetworkReference, SecurityGroupReference};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Contents of a lookup context document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupContext {
    pub networks: Vec<NetworkReference>,
    pub security_groups: Vec<SecurityGroupReference>,
    pub hosted_zones: Vec<HostedZoneReference>,
}

/// [`ResourceLookup`] answering from a [`LookupContext`].
#[derive(Debug, Clone, Default)]
pub struct ContextLookup {
    context: LookupContext,
}

impl ContextLookup {
    pub fn new(context: LookupContext) -> Self {
        Self { context }
    }

    /// Parse a context document from a string. The top level must be an object.
    pub fn parse(content: &str) -> Result<Self> {
        let invalid = |reason: String| QuizstackError::InvalidConfig {
            reason: format!("Failed to parse lookup context: {}", reason),
        };

        let document: serde_json::Value =
            serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
        if !document.is_object() {
            return Err(invalid("expected a JSON object at the top level".to_string()));
        }
        let context: LookupContext =
            serde_json::from_value(document).map_err(|e| invalid(e.to_string()))?;
        Ok(Self::new(context))
    }

    /// Load a context document from disk.
    #[instrument]
    pub fn load<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading lookup context from {:?}", path);

        let content = std::fs::read_to_string(path)
            .map_err(|e| QuizstackError::IoError { path: path.to_path_buf(), source: e })?;
        let lookup = Self::parse(&content)?;

        debug!(
            networks = lookup.context.networks.len(),
            security_groups = lookup.context.security_groups.len(),
            hosted_zones = lookup.context.hosted_zones.len(),
            "Loaded lookup context"
        );
        Ok(lookup)
    }

    pub fn context(&self) -> &LookupContext {
        &self.context
    }
}

impl ResourceLookup for ContextLookup {
    fn find_network(&self, vpc_id: &str, region: &str) -> Result<Option<NetworkReference>> {
        Ok(self
            .context
            .networks
            .iter()
            .find(|n| n.vpc_id == vpc_id && n.region == region)
            .cloned())
    }

    fn find_security_group(
        &self,
        group_id: &str,
        region: &str,
    ) -> Result<Option<SecurityGroupReference>> {
        Ok(self
            .context
            .security_groups
            .iter()
            .find(|g| g.group_id == group_id && g.region == region)
            .cloned())
    }

    fn find_hosted_zone(&self, domain: &str) -> Result<Option<HostedZoneReference>> {
        let wanted = normalize_domain(domain);
        Ok(self
            .context
            .hosted_zones
            .iter()
            .find(|z| normalize_domain(&z.domain) == wanted)
            .map(|z| HostedZoneReference {
                hosted_zone_id: z.hosted_zone_id.clone(),
                domain: wanted.clone(),
            }))
    }
}
