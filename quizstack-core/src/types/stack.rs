//! Topology domain types.

use crate::error::{QuizstackError, Result};
use crate::types::dns::{AliasRecord, Certificate};
use crate::types::external::{
    External, HostedZoneReference, NetworkReference, SecurityGroupReference,
};
use crate::types::network::{EgressRule, Protocol, SecurityGroup};
use serde::{Deserialize, Serialize};

/// Complete declarative description handed to the realization engine.
#[derive(Debug, Clone, Serialize)]
pub struct Topology {
    /// Stack name
    pub stack_name: String,

    /// Deployment region
    pub region: String,

    /// Whether DNS/TLS wiring is part of this topology
    pub include_dns_tls: bool,

    /// Externally owned resources referenced by the topology
    pub imports: Imports,

    /// Compute cluster
    pub cluster: Cluster,

    /// The public load-balanced service and its owned parts
    pub service: LoadBalancedService,

    /// The only outbound rule of the service
    pub database_egress: EgressRule,

    /// DNS/TLS binding (variant B only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_tls: Option<DnsTls>,
}

/// Imported, externally owned resources.
#[derive(Debug, Clone, Serialize)]
pub struct Imports {
    pub network: External<NetworkReference>,
    pub database_security_group: External<SecurityGroupReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosted_zone: Option<External<HostedZoneReference>>,
}

/// Compute cluster bound to a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub logical_id: String,
    pub vpc_id: String,
    pub depends_on: Vec<String>,
}

/// Environment variable passed to the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Port the container listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPort {
    pub container_port: u16,
    pub protocol: Protocol,
}

/// Container within the task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDefinition {
    pub name: String,

    /// Registry image reference
    pub image: String,

    /// Process environment, in field order, empty values included
    pub environment: Vec<EnvVar>,

    /// The single exposed port
    pub port_mapping: ContainerPort,
}

impl ContainerDefinition {
    /// Look up an environment value by name.
    pub fn env(&self, name: &str) -> Option<&str> {
        self.environment.iter().find(|var| var.name == name).map(|var| var.value.as_str())
    }
}

/// Task definition (size and container).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub logical_id: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub container: ContainerDefinition,
    pub depends_on: Vec<String>,
}

/// Compute launch type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LaunchType {
    Fargate,
}

/// Where the load balancer sends traffic for the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTarget {
    pub target_group: String,
    pub container_name: String,
    pub container_port: u16,
}

/// The replicated service itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FargateService {
    pub logical_id: String,
    pub cluster: String,
    pub task_definition: String,
    pub launch_type: LaunchType,
    pub desired_count: u32,
    pub assign_public_ip: bool,

    /// Subnet IDs the tasks land in
    pub subnets: Vec<String>,

    /// Owned security groups (logical ids)
    pub security_groups: Vec<String>,

    pub load_balancer_target: ServiceTarget,
    pub depends_on: Vec<String>,
}

/// Load balancer scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadBalancerScheme {
    InternetFacing,
    Internal,
}

/// Application load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub logical_id: String,
    pub scheme: LoadBalancerScheme,
    pub subnets: Vec<String>,
    pub security_group: String,
    pub depends_on: Vec<String>,
}

/// Listener / target group protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationProtocol {
    Http,
    Https,
}

impl std::fmt::Display for ApplicationProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationProtocol::Http => write!(f, "HTTP"),
            ApplicationProtocol::Https => write!(f, "HTTPS"),
        }
    }
}

/// Public listener on the load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub logical_id: String,
    pub load_balancer: String,
    pub protocol: ApplicationProtocol,
    pub port: u16,

    /// Certificates (logical ids); empty for plain HTTP
    pub certificates: Vec<String>,

    pub default_target_group: String,
    pub depends_on: Vec<String>,
}

/// Target registration type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Ip,
}

/// Liveness probe on the target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub enabled: bool,
    pub path: String,
    pub protocol: ApplicationProtocol,

    /// Status codes counted as healthy
    pub healthy_http_codes: Vec<u16>,
}

impl HealthCheck {
    /// Matcher string as load balancers expect it (e.g., "200" or "200,204").
    pub fn matcher(&self) -> String {
        self.healthy_http_codes.iter().map(u16::to_string).collect::<Vec<_>>().join(",")
    }
}

/// Traffic target group owned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub logical_id: String,
    pub vpc_id: String,
    pub protocol: ApplicationProtocol,
    pub port: u16,
    pub target_type: TargetType,

    /// Bound by the health check step
    pub health_check: Option<HealthCheck>,

    pub depends_on: Vec<String>,
}

/// Everything the load-balanced service pattern owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancedService {
    pub task_definition: TaskDefinition,
    pub security_group: SecurityGroup,
    pub load_balancer_security_group: SecurityGroup,

    /// Forwarding path from the load balancer group to the task group
    pub load_balancer_egress: EgressRule,

    pub load_balancer: LoadBalancer,
    pub target_group: TargetGroup,
    pub listener: Listener,
    pub service: FargateService,
}

/// DNS/TLS resources (variant B).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsTls {
    pub certificate: Certificate,
    pub record: AliasRecord,
}

/// Kind of a node in the realization graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Network,
    ImportedSecurityGroup,
    HostedZone,
    Cluster,
    TaskDefinition,
    SecurityGroup,
    LoadBalancer,
    TargetGroup,
    Listener,
    Service,
    EgressRule,
    Certificate,
    AliasRecord,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::ImportedSecurityGroup => "imported-security-group",
            Self::HostedZone => "hosted-zone",
            Self::Cluster => "cluster",
            Self::TaskDefinition => "task-definition",
            Self::SecurityGroup => "security-group",
            Self::LoadBalancer => "load-balancer",
            Self::TargetGroup => "target-group",
            Self::Listener => "listener",
            Self::Service => "service",
            Self::EgressRule => "egress-rule",
            Self::Certificate => "certificate",
            Self::AliasRecord => "alias-record",
        };
        write!(f, "{}", name)
    }
}

/// One node of the realization graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanNode {
    pub logical_id: String,
    pub kind: ResourceKind,

    /// True for imports, which the engine looks up rather than creates
    pub imported: bool,

    pub depends_on: Vec<String>,
}

impl PlanNode {
    fn owned(logical_id: &str, kind: ResourceKind, depends_on: &[String]) -> Self {
        Self {
            logical_id: logical_id.to_string(),
            kind,
            imported: false,
            depends_on: depends_on.to_vec(),
        }
    }

    fn imported(logical_id: &str, kind: ResourceKind) -> Self {
        Self { logical_id: logical_id.to_string(), kind, imported: true, depends_on: vec![] }
    }
}

impl Topology {
    /// Every import and owned resource with its dependencies, in declaration order.
    pub fn nodes(&self) -> Vec<PlanNode> {
        let imports = &self.imports;
        let svc = &self.service;

        let mut nodes = vec![
            PlanNode::imported(imports.network.logical_id(), ResourceKind::Network),
            PlanNode::imported(
                imports.database_security_group.logical_id(),
                ResourceKind::ImportedSecurityGroup,
            ),
        ];
        if let Some(zone) = &imports.hosted_zone {
            nodes.push(PlanNode::imported(zone.logical_id(), ResourceKind::HostedZone));
        }

        nodes.push(PlanNode::owned(
            &self.cluster.logical_id,
            ResourceKind::Cluster,
            &self.cluster.depends_on,
        ));
        if let Some(dns_tls) = &self.dns_tls {
            nodes.push(PlanNode::owned(
                &dns_tls.certificate.logical_id,
                ResourceKind::Certificate,
                &dns_tls.certificate.depends_on,
            ));
        }
        nodes.extend([
            PlanNode::owned(
                &svc.task_definition.logical_id,
                ResourceKind::TaskDefinition,
                &svc.task_definition.depends_on,
            ),
            PlanNode::owned(
                &svc.load_balancer_security_group.logical_id,
                ResourceKind::SecurityGroup,
                &svc.load_balancer_security_group.depends_on,
            ),
            PlanNode::owned(
                &svc.security_group.logical_id,
                ResourceKind::SecurityGroup,
                &svc.security_group.depends_on,
            ),
            PlanNode::owned(
                &svc.load_balancer_egress.logical_id,
                ResourceKind::EgressRule,
                &svc.load_balancer_egress.depends_on,
            ),
            PlanNode::owned(
                &svc.load_balancer.logical_id,
                ResourceKind::LoadBalancer,
                &svc.load_balancer.depends_on,
            ),
            PlanNode::owned(
                &svc.target_group.logical_id,
                ResourceKind::TargetGroup,
                &svc.target_group.depends_on,
            ),
            PlanNode::owned(
                &svc.listener.logical_id,
                ResourceKind::Listener,
                &svc.listener.depends_on,
            ),
            PlanNode::owned(
                &svc.service.logical_id,
                ResourceKind::Service,
                &svc.service.depends_on,
            ),
            PlanNode::owned(
                &self.database_egress.logical_id,
                ResourceKind::EgressRule,
                &self.database_egress.depends_on,
            ),
        ]);
        if let Some(dns_tls) = &self.dns_tls {
            nodes.push(PlanNode::owned(
                &dns_tls.record.logical_id,
                ResourceKind::AliasRecord,
                &dns_tls.record.depends_on,
            ));
        }
        nodes
    }

    /// Every outbound rule in the topology.
    pub fn egress_rules(&self) -> Vec<&EgressRule> {
        vec![&self.service.load_balancer_egress, &self.database_egress]
    }

    /// Serialize the topology in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| QuizstackError::RenderFailed { reason: e.to_string() }),
            OutputFormat::Yaml => serde_yaml::to_string(self)
                .map_err(|e| QuizstackError::RenderFailed { reason: e.to_string() }),
        }
    }
}

/// Serialization format for a rendered topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
