//! Hostname and TLS termination for the public endpoint (variant B).
//!
//! Order: resolve zone, declare wildcard certificate with DNS validation,
//! upgrade the listener to HTTPS, publish the alias record. Certificate
//! validation is left to the issuance mechanism; this step only declares it
//! and makes the listener depend on the certificate.

use crate::config::ComposerSettings;
use crate::defaults;
use crate::error::{QuizstackError, Result};
use crate::lookup::{normalize_domain, ResourceLookup};
use crate::types::{
    AliasRecord, AliasTarget, ApplicationProtocol, AttributeRef, Certificate,
    CertificateValidation, DnsTls, External, HostedZoneReference, LoadBalancedService,
    RecordType, TrafficSource,
};
use tracing::{info, instrument};

/// Binds a wildcard certificate and an alias record to the service.
pub struct DnsTlsBinding;

impl DnsTlsBinding {
    /// # Errors
    ///
    /// `HostedZoneNotFound` if the zone does not exist. Nothing is bound then.
    #[instrument(skip_all, fields(domain = %settings.domain_name))]
    pub fn bind<L: ResourceLookup>(
        lookup: &L,
        settings: &ComposerSettings,
        service: &mut LoadBalancedService,
    ) -> Result<(External<HostedZoneReference>, DnsTls)> {
        let domain = normalize_domain(&settings.domain_name);
        let zone = lookup
            .find_hosted_zone(&domain)?
            .ok_or_else(|| QuizstackError::HostedZoneNotFound { domain: domain.clone() })?;
        // Backends may report the apex with a trailing dot or mixed case.
        let zone = External::imported(
            settings.logical_id("HostedZone"),
            HostedZoneReference { domain: domain.clone(), ..zone },
        );

        let certificate = Certificate {
            logical_id: settings.logical_id("Certificate"),
            domain_name: format!("*.{}", domain),
            validation: CertificateValidation::Dns {
                hosted_zone_id: zone.hosted_zone_id.clone(),
            },
            depends_on: vec![zone.logical_id().to_string()],
        };

        Self::attach_certificate(service, &certificate);

        let lb = &service.load_balancer.logical_id;
        let record = AliasRecord {
            logical_id: settings.logical_id("DnsRecord"),
            hosted_zone_id: zone.hosted_zone_id.clone(),
            record_name: format!("{}.{}", defaults::API_SUBDOMAIN, domain),
            record_type: RecordType::A,
            target: AliasTarget {
                dns_name: AttributeRef::new(lb, "DNSName"),
                hosted_zone_id: AttributeRef::new(lb, "CanonicalHostedZoneID"),
            },
            ttl_seconds: defaults::RECORD_TTL_SECONDS,
            depends_on: vec![zone.logical_id().to_string(), lb.clone()],
        };

        info!(
            certificate = %certificate.domain_name,
            record = %record.record_name,
            "Bound DNS and TLS"
        );
        Ok((zone, DnsTls { certificate, record }))
    }

    /// Switch the public listener to HTTPS with `certificate` and move the
    /// load balancer's public ingress to the HTTPS port.
    fn attach_certificate(service: &mut LoadBalancedService, certificate: &Certificate) {
        let listener = &mut service.listener;
        let previous_port = listener.port;
        listener.protocol = ApplicationProtocol::Https;
        listener.port = defaults::PORT_HTTPS;
        listener.certificates = vec![certificate.logical_id.clone()];
        if !listener.depends_on.contains(&certificate.logical_id) {
            listener.depends_on.push(certificate.logical_id.clone());
        }

        for rule in &mut service.load_balancer_security_group.ingress {
            if matches!(rule.source, TrafficSource::Cidr(_)) && rule.port == previous_port {
                rule.port = defaults::PORT_HTTPS;
                rule.description = format!("Allow from anyone on port {}", defaults::PORT_HTTPS);
            }
        }
    }
}
