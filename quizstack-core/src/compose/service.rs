//! Public load-balanced service declaration.
//!
//! Produces the task definition, the service, its security group, and the
//! internet-facing load balancer with a plain HTTP listener. The load
//! balancer group gets one egress rule to the task group on the container
//! port. The DNS/TLS step may later upgrade the listener.

use crate::config::ComposerSettings;
use crate::defaults;
use crate::env::Configuration;
use crate::error::{QuizstackError, Result};
use crate::types::{
    ApplicationProtocol, Cluster, ContainerDefinition, ContainerPort, EgressRule, EnvVar,
    External, FargateService, IngressRule, LaunchType, Listener, LoadBalancedService,
    LoadBalancer, LoadBalancerScheme, NetworkReference, Protocol, SecurityGroup, ServiceTarget,
    TargetGroup, TargetType, TaskDefinition, TrafficSource,
};
use tracing::{info, instrument, warn};

/// Declares the replicated, publicly reachable service.
pub struct ServiceComposer;

impl ServiceComposer {
    /// Compose the service for `cluster` on `network`.
    ///
    /// # Errors
    ///
    /// - `InvalidPort` if `PORT` is missing, malformed or zero; nothing is
    ///   declared in that case
    /// - `NoPublicSubnets` if the network cannot host a public service
    #[instrument(skip_all, fields(cluster = %cluster.logical_id))]
    pub fn compose(
        settings: &ComposerSettings,
        cluster: &Cluster,
        network: &External<NetworkReference>,
        config: &Configuration,
    ) -> Result<LoadBalancedService> {
        let container_port = config.port.require()?;

        let subnets: Vec<String> =
            network.public_subnets.iter().map(|s| s.subnet_id.clone()).collect();
        if subnets.is_empty() {
            return Err(QuizstackError::NoPublicSubnets { vpc_id: network.vpc_id.clone() });
        }

        let service_id = settings.logical_id("FargateService");
        let network_id = network.logical_id().to_string();

        let task_definition = TaskDefinition {
            logical_id: format!("{}TaskDef", service_id),
            cpu: settings.cpu,
            memory_mib: settings.memory_mib,
            container: ContainerDefinition {
                name: settings.container_name.clone(),
                image: settings.image.clone(),
                environment: Self::environment(config),
                port_mapping: ContainerPort { container_port, protocol: Protocol::Tcp },
            },
            depends_on: vec![],
        };

        let lb_id = format!("{}LB", service_id);
        let lb_security_group = SecurityGroup {
            logical_id: format!("{}SecurityGroup", lb_id),
            description: format!("Public ingress for {}", lb_id),
            vpc_id: network.vpc_id.clone(),
            allow_all_outbound: false,
            ingress: vec![IngressRule {
                source: TrafficSource::Cidr(defaults::ANY_IPV4.to_string()),
                protocol: Protocol::Tcp,
                port: defaults::PORT_HTTP,
                description: format!("Allow from anyone on port {}", defaults::PORT_HTTP),
            }],
            depends_on: vec![network_id.clone()],
        };

        let service_security_group = SecurityGroup {
            logical_id: format!("{}SecurityGroup", service_id),
            description: format!("Task traffic for {}", service_id),
            vpc_id: network.vpc_id.clone(),
            allow_all_outbound: false,
            ingress: vec![IngressRule {
                source: TrafficSource::SecurityGroup(lb_security_group.logical_id.clone()),
                protocol: Protocol::Tcp,
                port: container_port,
                description: "Load balancer to task".to_string(),
            }],
            depends_on: vec![network_id.clone(), lb_security_group.logical_id.clone()],
        };

        let load_balancer_egress = EgressRule {
            logical_id: format!("{}ToTaskTcp{}", lb_security_group.logical_id, container_port),
            source_security_group: lb_security_group.logical_id.clone(),
            destination: service_security_group.logical_id.clone(),
            destination_group_id: None,
            protocol: Protocol::Tcp,
            port: container_port,
            description: "Load balancer to target".to_string(),
            depends_on: vec![
                lb_security_group.logical_id.clone(),
                service_security_group.logical_id.clone(),
            ],
        };

        let load_balancer = LoadBalancer {
            logical_id: lb_id.clone(),
            scheme: LoadBalancerScheme::InternetFacing,
            subnets: subnets.clone(),
            security_group: lb_security_group.logical_id.clone(),
            depends_on: vec![lb_security_group.logical_id.clone()],
        };

        let listener_id = format!("{}PublicListener", lb_id);
        let target_group = TargetGroup {
            logical_id: format!("{}ECSGroup", listener_id),
            vpc_id: network.vpc_id.clone(),
            protocol: ApplicationProtocol::Http,
            port: container_port,
            target_type: TargetType::Ip,
            health_check: None,
            depends_on: vec![network_id],
        };

        let listener = Listener {
            logical_id: listener_id,
            load_balancer: load_balancer.logical_id.clone(),
            protocol: ApplicationProtocol::Http,
            port: defaults::PORT_HTTP,
            certificates: vec![],
            default_target_group: target_group.logical_id.clone(),
            depends_on: vec![load_balancer.logical_id.clone(), target_group.logical_id.clone()],
        };

        let service = FargateService {
            logical_id: format!("{}Service", service_id),
            cluster: cluster.logical_id.clone(),
            task_definition: task_definition.logical_id.clone(),
            launch_type: LaunchType::Fargate,
            desired_count: defaults::DESIRED_COUNT,
            assign_public_ip: true,
            subnets,
            security_groups: vec![service_security_group.logical_id.clone()],
            load_balancer_target: ServiceTarget {
                target_group: target_group.logical_id.clone(),
                container_name: settings.container_name.clone(),
                container_port,
            },
            depends_on: vec![
                cluster.logical_id.clone(),
                task_definition.logical_id.clone(),
                service_security_group.logical_id.clone(),
                load_balancer_egress.logical_id.clone(),
                listener.logical_id.clone(),
            ],
        };

        info!(
            image = %task_definition.container.image,
            container_port,
            desired_count = service.desired_count,
            env_vars = task_definition.container.environment.len(),
            "Declared load-balanced service"
        );

        Ok(LoadBalancedService {
            task_definition,
            security_group: service_security_group,
            load_balancer_security_group: lb_security_group,
            load_balancer_egress,
            load_balancer,
            target_group,
            listener,
            service,
        })
    }

    fn environment(config: &Configuration) -> Vec<EnvVar> {
        config
            .runtime_environment()
            .into_iter()
            .map(|(name, value)| {
                if value.is_empty() && Configuration::is_secret(name) {
                    warn!(field = name, "Secret is empty; injecting it as-is");
                }
                EnvVar { name: name.to_string(), value }
            })
            .collect()
    }
}
