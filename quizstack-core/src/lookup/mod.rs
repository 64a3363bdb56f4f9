//! External resource lookup.
//!
//! Composition never creates networks, security groups or hosted zones; it
//! asks a [`ResourceLookup`] whether they exist:
//! - `ContextLookup`: answers from a cached lookup context document
//! - tests: any in-memory implementation

pub mod context;

use crate::error::Result;
use crate::types::{HostedZoneReference, NetworkReference, SecurityGroupReference};

pub use context::{ContextLookup, LookupContext};

/// Query interface for pre-existing resources.
///
/// `Ok(None)` means the resource does not exist. `Err` is reserved for the
/// backend itself failing.
pub trait ResourceLookup {
    /// Find a network by ID within a region.
    fn find_network(&self, vpc_id: &str, region: &str) -> Result<Option<NetworkReference>>;

    /// Find a security group by ID within a region.
    fn find_security_group(
        &self,
        group_id: &str,
        region: &str,
    ) -> Result<Option<SecurityGroupReference>>;

    /// Find a public hosted zone by its domain name.
    fn find_hosted_zone(&self, domain: &str) -> Result<Option<HostedZoneReference>>;
}

impl<T: ResourceLookup + ?Sized> ResourceLookup for &T {
    fn find_network(&self, vpc_id: &str, region: &str) -> Result<Option<NetworkReference>> {
        (**self).find_network(vpc_id, region)
    }

    fn find_security_group(
        &self,
        group_id: &str,
        region: &str,
    ) -> Result<Option<SecurityGroupReference>> {
        (**self).find_security_group(group_id, region)
    }

    fn find_hosted_zone(&self, domain: &str) -> Result<Option<HostedZoneReference>> {
        (**self).find_hosted_zone(domain)
    }
}

/// Normalize a domain for comparison: lowercase, no trailing dot.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_lowercase()
}
