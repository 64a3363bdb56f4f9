//! DNS and TLS resources for the public endpoint.

use serde::{Deserialize, Serialize};

/// Reference to an attribute of another resource, resolved by the
/// realization engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRef {
    /// Logical id of the referenced resource
    pub resource: String,

    /// Attribute name (e.g., "DNSName")
    pub attribute: String,
}

impl AttributeRef {
    pub fn new(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self { resource: resource.into(), attribute: attribute.into() }
    }
}

/// How certificate ownership is proven.
///
/// Validation is asynchronous and owned by the issuance mechanism; the
/// composition only declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum CertificateValidation {
    /// Challenge records are written into this hosted zone
    Dns { hosted_zone_id: String },
}

/// TLS certificate for the public listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub logical_id: String,

    /// Requested name (e.g., "*.easyquiz.click")
    pub domain_name: String,

    pub validation: CertificateValidation,
    pub depends_on: Vec<String>,
}

/// DNS record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    A,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
        }
    }
}

/// Alias target: always an indirection to another resource, never an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    /// Endpoint hostname of the target
    pub dns_name: AttributeRef,

    /// Hosted zone of the target endpoint
    pub hosted_zone_id: AttributeRef,
}

/// Alias record publishing the API hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub logical_id: String,

    /// Zone the record is written into
    pub hosted_zone_id: String,

    /// Fully qualified name (e.g., "api.easyquiz.click")
    pub record_name: String,

    pub record_type: RecordType,
    pub target: AliasTarget,
    pub ttl_seconds: u32,
    pub depends_on: Vec<String>,
}
