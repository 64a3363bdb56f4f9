//! Liveness probe binding.

use crate::defaults;
use crate::types::{ApplicationProtocol, HealthCheck, TargetGroup};
use tracing::debug;

/// Attaches the fixed probe to a target group.
pub struct HealthCheckBinding;

impl HealthCheckBinding {
    /// The probe every service gets. Not derived from configuration.
    pub fn probe() -> HealthCheck {
        HealthCheck {
            enabled: true,
            path: defaults::HEALTH_CHECK_PATH.to_string(),
            protocol: ApplicationProtocol::Http,
            healthy_http_codes: defaults::HEALTHY_HTTP_CODES.to_vec(),
        }
    }

    /// Bind the probe, replacing any earlier one.
    pub fn bind(target_group: &mut TargetGroup) {
        let probe = Self::probe();
        debug!(
            target_group = %target_group.logical_id,
            path = %probe.path,
            matcher = %probe.matcher(),
            "Bound health check"
        );
        target_group.health_check = Some(probe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TargetType;

    #[test]
    fn test_bind_sets_fixed_probe() {
        let mut group = TargetGroup {
            logical_id: "tg".to_string(),
            vpc_id: "vpc-1".to_string(),
            protocol: ApplicationProtocol::Http,
            port: 4000,
            target_type: TargetType::Ip,
            health_check: None,
            depends_on: vec![],
        };
        HealthCheckBinding::bind(&mut group);

        let check = group.health_check.unwrap();
        assert!(check.enabled);
        assert_eq!(check.path, "/check");
        assert_eq!(check.healthy_http_codes, vec![200]);
        assert_eq!(check.matcher(), "200");
    }
}
