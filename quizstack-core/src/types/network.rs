//! Owned network resources: security groups and their rules.

use serde::{Deserialize, Serialize};

/// Network protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// Where admitted traffic may come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficSource {
    /// An IPv4 CIDR block
    Cidr(String),

    /// Another security group declared in this topology (logical id)
    SecurityGroup(String),
}

/// Inbound allow rule on an owned security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    pub source: TrafficSource,
    pub protocol: Protocol,
    pub port: u16,
    pub description: String,
}

/// Security group declared by this topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub logical_id: String,
    pub description: String,

    /// Network the group is created in
    pub vpc_id: String,

    /// Always false here: outbound traffic is denied unless a rule widens it
    pub allow_all_outbound: bool,

    pub ingress: Vec<IngressRule>,
    pub depends_on: Vec<String>,
}

/// Outbound allow rule from an owned group to another group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgressRule {
    pub logical_id: String,

    /// Owned security group the rule is attached to (logical id)
    pub source_security_group: String,

    /// Destination group (logical id), owned or imported
    pub destination: String,

    /// Physical ID of the destination group; set only for imported groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_group_id: Option<String>,

    pub protocol: Protocol,
    pub port: u16,
    pub description: String,
    pub depends_on: Vec<String>,
}
