//! Handles to resources this system references but does not own.
//!
//! An [`External`] can only be produced by a lookup inside this crate and has
//! no mutating API, so composition code cannot modify or delete what it
//! merely points at.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Externally-owned resource handle, tagged with the logical id it is
/// imported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct External<T> {
    logical_id: String,
    #[serde(flatten)]
    handle: T,
}

impl<T> External<T> {
    pub(crate) fn imported(logical_id: impl Into<String>, handle: T) -> Self {
        Self { logical_id: logical_id.into(), handle }
    }

    /// Logical id of the import.
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }
}

impl<T> Deref for External<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.handle
    }
}

/// Subnet within a located network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    /// Subnet ID (e.g., "subnet-0a1b")
    pub subnet_id: String,

    /// Availability zone (e.g., "us-east-1a")
    pub availability_zone: String,
}

/// Pre-existing virtual network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkReference {
    /// Network ID (e.g., "vpc-0abc")
    pub vpc_id: String,

    /// Region the network lives in
    pub region: String,

    /// Primary CIDR block, when the lookup reports it
    #[serde(default)]
    pub cidr: Option<String>,

    /// Subnets with a route to the internet gateway
    #[serde(default)]
    pub public_subnets: Vec<Subnet>,

    /// Subnets without a public route
    #[serde(default)]
    pub private_subnets: Vec<Subnet>,
}

/// Pre-existing security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupReference {
    /// Group ID (e.g., "sg-0abc")
    pub group_id: String,

    /// Region the group lives in
    pub region: String,

    /// Network the group belongs to, when the lookup reports it
    #[serde(default)]
    pub vpc_id: Option<String>,
}

/// Pre-existing public DNS zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZoneReference {
    /// Zone ID (e.g., "Z0123456789")
    pub hosted_zone_id: String,

    /// Zone apex without trailing dot (e.g., "easyquiz.click")
    pub domain: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_serializes_flat() {
        let zone = External::imported(
            "EasyQuizHostedZone",
            HostedZoneReference {
                hosted_zone_id: "Z1".to_string(),
                domain: "easyquiz.click".to_string(),
            },
        );
        let json = serde_json::to_value(&zone).unwrap();
        assert_eq!(json["logical_id"], "EasyQuizHostedZone");
        assert_eq!(json["hosted_zone_id"], "Z1");
        assert_eq!(zone.domain, "easyquiz.click");
    }
}
