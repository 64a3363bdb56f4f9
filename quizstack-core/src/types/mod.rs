//! Core domain types for quizstack.

pub mod dns;
pub mod external;
pub mod network;
pub mod stack;

// Re-exports
pub use dns::{
    AliasRecord, AliasTarget, AttributeRef, Certificate, CertificateValidation, RecordType,
};
pub use external::{External, HostedZoneReference, NetworkReference, SecurityGroupReference, Subnet};
pub use network::{EgressRule, IngressRule, Protocol, SecurityGroup, TrafficSource};
pub use stack::{
    ApplicationProtocol, Cluster, ContainerDefinition, ContainerPort, DnsTls, EnvVar,
    FargateService, HealthCheck, Imports, LaunchType, Listener, LoadBalancedService, LoadBalancer,
    LoadBalancerScheme, OutputFormat, PlanNode, ResourceKind, ServiceTarget, TargetGroup,
    TargetType, TaskDefinition, Topology,
};
