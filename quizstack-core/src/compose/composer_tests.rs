//! Tests for the topology composer.

use super::*;
use crate::config::ComposerSettings;
use crate::env::{ConfigResolver, Configuration, RUNTIME_FIELDS};
use crate::error::{FailureKind, QuizstackError, Result};
use crate::lookup::{ContextLookup, LookupContext, ResourceLookup};
use crate::types::*;
use std::cell::RefCell;

fn subnet(id: &str, az: &str) -> Subnet {
    Subnet { subnet_id: id.to_string(), availability_zone: az.to_string() }
}

fn context() -> LookupContext {
    LookupContext {
        networks: vec![NetworkReference {
            vpc_id: "vpc-1".to_string(),
            region: "us-east-1".to_string(),
            cidr: Some("10.0.0.0/16".to_string()),
            public_subnets: vec![
                subnet("subnet-a", "us-east-1a"),
                subnet("subnet-b", "us-east-1b"),
            ],
            private_subnets: vec![subnet("subnet-c", "us-east-1a")],
        }],
        security_groups: vec![SecurityGroupReference {
            group_id: "sg-1".to_string(),
            region: "us-east-1".to_string(),
            vpc_id: Some("vpc-1".to_string()),
        }],
        hosted_zones: vec![HostedZoneReference {
            hosted_zone_id: "Z0EASYQUIZ".to_string(),
            domain: "easyquiz.click".to_string(),
        }],
    }
}

fn config(pairs: &[(&str, &str)]) -> Configuration {
    ConfigResolver::resolve(pairs.iter().copied())
}

fn scenario() -> Configuration {
    targets("5432", "vpc-1", "sg-1")
}

/// Valid `PORT` plus the given database port and deployment targets.
fn targets(db_port: &str, vpc_db: &str, sg_db: &str) -> Configuration {
    config(&[("PORT", "4000"), ("DB_PORT", db_port), ("VPC_DB", vpc_db), ("SG_DB", sg_db)])
}

fn composer(dns_tls: bool) -> TopologyComposer<ContextLookup> {
    TopologyComposer::new(ContextLookup::new(context()), ComposerSettings::default())
        .with_dns_tls(dns_tls)
}

#[test]
fn test_basic_scenario() {
    let topology = composer(false).compose(&scenario()).unwrap();

    assert_eq!(topology.region, "us-east-1");
    assert_eq!(topology.cluster.vpc_id, "vpc-1");
    assert_eq!(topology.imports.network.vpc_id, "vpc-1");

    let svc = &topology.service;
    assert_eq!(svc.task_definition.container.port_mapping.container_port, 4000);
    assert_eq!(svc.task_definition.container.port_mapping.protocol, Protocol::Tcp);
    assert_eq!(svc.service.desired_count, 2);
    assert_eq!(svc.service.cluster, topology.cluster.logical_id);

    let egress = &topology.database_egress;
    assert_eq!(egress.destination_group_id.as_deref(), Some("sg-1"));
    assert_eq!(egress.port, 5432);
    assert_eq!(egress.protocol, Protocol::Tcp);
    assert_eq!(egress.source_security_group, svc.security_group.logical_id);

    let check = svc.target_group.health_check.as_ref().unwrap();
    assert_eq!(check.path, "/check");
    assert_eq!(check.healthy_http_codes, vec![200]);
    assert!(check.enabled);

    assert!(topology.dns_tls.is_none());
    assert!(topology.imports.hosted_zone.is_none());
}

#[test]
fn test_environment_contains_every_field() {
    let topology = composer(false)
        .compose(&config(&[
            ("PORT", "4000"),
            ("DB_PORT", "5432"),
            ("VPC_DB", "vpc-1"),
            ("SG_DB", "sg-1"),
            ("DB_DIALECT", "postgres"),
            ("MAIL_PASS", ""),
        ]))
        .unwrap();

    let container = &topology.service.task_definition.container;
    assert_eq!(container.environment.len(), RUNTIME_FIELDS.len());
    for field in RUNTIME_FIELDS {
        assert!(container.env(field).is_some(), "{} missing from environment", field);
    }
    assert_eq!(container.env("DB_DIALECT"), Some("postgres"));
    assert_eq!(container.env("MAIL_PASS"), Some(""));
    assert_eq!(container.env("EMAIL"), Some(""));
}

#[test]
fn test_missing_port_fails_before_service() {
    let err = composer(false)
        .compose(&config(&[("DB_PORT", "5432"), ("VPC_DB", "vpc-1"), ("SG_DB", "sg-1")]))
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Validation);
    assert!(matches!(err, QuizstackError::InvalidPort { ref field, .. } if field == "PORT"));
}

#[test]
fn test_non_numeric_db_port_rejected() {
    for raw in ["", "postgres", "0"] {
        let err = composer(false).compose(&targets(raw, "vpc-1", "sg-1")).unwrap_err();
        assert!(
            matches!(err, QuizstackError::InvalidPort { ref field, .. } if field == "DB_PORT"),
            "DB_PORT {:?} gave {:?}",
            raw,
            err
        );
    }
}

#[test]
fn test_unknown_security_group_is_lookup_failure() {
    let err = composer(false).compose(&targets("5432", "vpc-1", "sg-404")).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Lookup);
    assert!(err.to_string().contains("sg-404"));
}

#[test]
fn test_unknown_network_is_lookup_failure() {
    let err = composer(false).compose(&targets("5432", "vpc-9", "sg-1")).unwrap_err();
    assert!(matches!(err, QuizstackError::NetworkNotFound { ref vpc_id, .. } if vpc_id == "vpc-9"));
}

#[test]
fn test_region_comes_from_deploy_variable() {
    let err = composer(false)
        .compose(&config(&[
            ("PORT", "4000"),
            ("DB_PORT", "5432"),
            ("VPC_DB", "vpc-1"),
            ("SG_DB", "sg-1"),
            ("CDK_DEPLOY_REGION", "eu-west-1"),
        ]))
        .unwrap_err();
    assert!(matches!(
        err,
        QuizstackError::NetworkNotFound { ref region, .. } if region == "eu-west-1"
    ));
}

#[test]
fn test_security_group_in_other_network_rejected() {
    let mut ctx = context();
    ctx.security_groups[0].vpc_id = Some("vpc-other".to_string());
    let composer = TopologyComposer::new(ContextLookup::new(ctx), ComposerSettings::default());

    let err = composer.compose(&scenario()).unwrap_err();
    assert!(matches!(err, QuizstackError::SecurityGroupVpcMismatch { .. }));
}

#[test]
fn test_only_service_outbound_rule_targets_database_group() {
    let topology = composer(true).compose(&scenario()).unwrap();

    let svc = &topology.service;
    assert!(!svc.security_group.allow_all_outbound);
    assert!(!svc.load_balancer_security_group.allow_all_outbound);

    let from_service: Vec<&EgressRule> = topology
        .egress_rules()
        .into_iter()
        .filter(|rule| rule.source_security_group == svc.security_group.logical_id)
        .collect();
    assert_eq!(from_service.len(), 1);
    assert_eq!(from_service[0].destination, DATABASE_SECURITY_GROUP_ID);
    assert_eq!(
        from_service[0].destination_group_id.as_deref(),
        Some(topology.imports.database_security_group.group_id.as_str())
    );

    let egress_nodes =
        topology.nodes().into_iter().filter(|n| n.kind == ResourceKind::EgressRule).count();
    assert_eq!(egress_nodes, topology.egress_rules().len());
}

#[test]
fn test_load_balancer_forwards_to_tasks() {
    for dns_tls in [false, true] {
        let topology = composer(dns_tls).compose(&scenario()).unwrap();
        let svc = &topology.service;
        let lb_group = &svc.load_balancer_security_group.logical_id;

        let forwarding: Vec<&EgressRule> = topology
            .egress_rules()
            .into_iter()
            .filter(|rule| &rule.source_security_group == lb_group)
            .collect();
        assert_eq!(forwarding.len(), 1, "dns_tls={}", dns_tls);
        assert_eq!(forwarding[0].destination, svc.security_group.logical_id);
        assert_eq!(forwarding[0].port, 4000);
        assert_eq!(forwarding[0].protocol, Protocol::Tcp);

        let plan = realization_order(&topology);
        let node = plan.iter().find(|n| n.logical_id == forwarding[0].logical_id).unwrap();
        assert!(node.depends_on.contains(lb_group));
    }
}

#[test]
fn test_health_check_ignores_configuration() {
    let topology = composer(false)
        .compose(&config(&[
            ("PORT", "8080"),
            ("DB_PORT", "3306"),
            ("VPC_DB", "vpc-1"),
            ("SG_DB", "sg-1"),
            ("HOST", "/health"),
        ]))
        .unwrap();
    let check = topology.service.target_group.health_check.unwrap();
    assert_eq!(check, HealthCheckBinding::probe());
}

#[test]
fn test_dns_tls_variant() {
    let topology = composer(true).compose(&scenario()).unwrap();

    let dns_tls = topology.dns_tls.as_ref().unwrap();
    assert_eq!(dns_tls.certificate.domain_name, "*.easyquiz.click");
    assert_eq!(
        dns_tls.certificate.validation,
        CertificateValidation::Dns { hosted_zone_id: "Z0EASYQUIZ".to_string() }
    );

    let listener = &topology.service.listener;
    assert_eq!(listener.protocol, ApplicationProtocol::Https);
    assert_eq!(listener.port, 443);
    assert_eq!(listener.certificates, vec![dns_tls.certificate.logical_id.clone()]);
    assert!(listener.depends_on.contains(&dns_tls.certificate.logical_id));
    assert_eq!(topology.service.load_balancer_security_group.ingress[0].port, 443);

    let record = &dns_tls.record;
    assert_eq!(record.record_name, "api.easyquiz.click");
    assert_eq!(record.ttl_seconds, 60);
    assert_eq!(record.hosted_zone_id, "Z0EASYQUIZ");
    assert_eq!(record.target.dns_name.resource, topology.service.load_balancer.logical_id);
    assert_eq!(record.target.dns_name.attribute, "DNSName");
    assert_eq!(record.target.hosted_zone_id.resource, topology.service.load_balancer.logical_id);
}

#[test]
fn test_unresolvable_zone_aborts_composition() {
    let mut ctx = context();
    ctx.hosted_zones.clear();
    let composer =
        TopologyComposer::new(ContextLookup::new(ctx), ComposerSettings::default())
            .with_dns_tls(true);

    let err = composer.compose(&scenario()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Lookup);
    assert!(matches!(
        err,
        QuizstackError::HostedZoneNotFound { ref domain } if domain == "easyquiz.click"
    ));
}

#[test]
fn test_realization_order_respects_dependencies() {
    let topology = composer(true).compose(&scenario()).unwrap();
    let order = realization_order(&topology);

    assert_eq!(order.len(), topology.nodes().len());
    let position = |id: &str| order.iter().position(|n| n.logical_id == id).unwrap();
    for node in &order {
        for dep in &node.depends_on {
            assert!(
                position(dep) < position(&node.logical_id),
                "{} before {}",
                dep,
                node.logical_id
            );
        }
    }
    assert!(position("EasyQuizVpc") < position("EasyQuizCluster"));
    assert!(position("EasyQuizCertificate") < position("EasyQuizFargateServiceLBPublicListener"));
    assert!(
        position("EasyQuizFargateServiceLBPublicListener")
            < position("EasyQuizFargateServiceService")
    );
}

#[test]
fn test_composition_is_deterministic() {
    let first = composer(true).compose(&scenario()).unwrap();
    let second = composer(true).compose(&scenario()).unwrap();
    assert_eq!(
        first.render(OutputFormat::Json).unwrap(),
        second.render(OutputFormat::Json).unwrap()
    );
}

/// Lookup that records queries and can be told to fail.
#[derive(Default)]
struct RecordingLookup {
    inner: ContextLookup,
    fail_zone_lookups: bool,
    queries: RefCell<Vec<String>>,
}

impl ResourceLookup for RecordingLookup {
    fn find_network(&self, vpc_id: &str, region: &str) -> Result<Option<NetworkReference>> {
        self.queries.borrow_mut().push(format!("network:{}", vpc_id));
        self.inner.find_network(vpc_id, region)
    }

    fn find_security_group(
        &self,
        group_id: &str,
        region: &str,
    ) -> Result<Option<SecurityGroupReference>> {
        self.queries.borrow_mut().push(format!("security-group:{}", group_id));
        self.inner.find_security_group(group_id, region)
    }

    fn find_hosted_zone(&self, domain: &str) -> Result<Option<HostedZoneReference>> {
        self.queries.borrow_mut().push(format!("zone:{}", domain));
        if self.fail_zone_lookups {
            return Err(QuizstackError::LookupFailed {
                resource: domain.to_string(),
                reason: "throttled".to_string(),
            });
        }
        self.inner.find_hosted_zone(domain)
    }
}

#[test]
fn test_plain_variant_never_queries_dns() {
    let lookup = RecordingLookup { inner: ContextLookup::new(context()), ..Default::default() };
    TopologyComposer::new(&lookup, ComposerSettings::default()).compose(&scenario()).unwrap();

    assert_eq!(*lookup.queries.borrow(), vec!["network:vpc-1", "security-group:sg-1"]);
}

#[test]
fn test_backend_failure_propagates() {
    let lookup = RecordingLookup {
        inner: ContextLookup::new(context()),
        fail_zone_lookups: true,
        ..Default::default()
    };
    let err = TopologyComposer::new(&lookup, ComposerSettings::default())
        .with_dns_tls(true)
        .compose(&scenario())
        .unwrap_err();
    assert!(matches!(err, QuizstackError::LookupFailed { .. }));
    assert_eq!(lookup.queries.borrow().last().map(String::as_str), Some("zone:easyquiz.click"));
}

#[test]
fn test_invalid_settings_rejected_before_lookup() {
    let lookup = RecordingLookup { inner: ContextLookup::new(context()), ..Default::default() };
    let settings = ComposerSettings { image: String::new(), ..Default::default() };

    let err = TopologyComposer::new(&lookup, settings).compose(&scenario()).unwrap_err();
    assert!(matches!(err, QuizstackError::InvalidConfig { .. }));
    assert!(lookup.queries.borrow().is_empty());
}

/// Lookup whose hosted zones come back exactly as a remote API spells them.
struct UnnormalizedZoneLookup {
    inner: ContextLookup,
}

impl ResourceLookup for UnnormalizedZoneLookup {
    fn find_network(&self, vpc_id: &str, region: &str) -> Result<Option<NetworkReference>> {
        self.inner.find_network(vpc_id, region)
    }

    fn find_security_group(
        &self,
        group_id: &str,
        region: &str,
    ) -> Result<Option<SecurityGroupReference>> {
        self.inner.find_security_group(group_id, region)
    }

    fn find_hosted_zone(&self, _domain: &str) -> Result<Option<HostedZoneReference>> {
        Ok(Some(HostedZoneReference {
            hosted_zone_id: "Z0EASYQUIZ".to_string(),
            domain: "EasyQuiz.click.".to_string(),
        }))
    }
}

#[test]
fn test_dns_names_use_normalized_domain() {
    let lookup = UnnormalizedZoneLookup { inner: ContextLookup::new(context()) };
    let settings =
        ComposerSettings { domain_name: "EasyQuiz.Click".to_string(), ..Default::default() };

    let topology =
        TopologyComposer::new(lookup, settings).with_dns_tls(true).compose(&scenario()).unwrap();

    let dns_tls = topology.dns_tls.as_ref().unwrap();
    assert_eq!(dns_tls.certificate.domain_name, "*.easyquiz.click");
    assert_eq!(dns_tls.record.record_name, "api.easyquiz.click");
    assert_eq!(topology.imports.hosted_zone.as_ref().unwrap().domain, "easyquiz.click");
}
