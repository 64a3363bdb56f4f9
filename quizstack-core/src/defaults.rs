//! Fixed topology constants.
//!
//! These values are part of the topology shape and are not configurable.
//! Anything a deployment may legitimately change lives in
//! [`ComposerSettings`](crate::config::ComposerSettings) instead.

// ============================================================================
// Service
// ============================================================================

/// Number of replicas the service runs.
pub const DESIRED_COUNT: u32 = 2;

/// Default container image for the GraphQL API.
pub const DEFAULT_IMAGE: &str = "antoniocsjunior/easyquiz-graphql";

/// Default container name inside the task definition.
pub const DEFAULT_CONTAINER_NAME: &str = "easyquiz-graphql";

/// Default task CPU units.
pub const DEFAULT_TASK_CPU: u32 = 256;

/// Default task memory (MiB).
pub const DEFAULT_TASK_MEMORY_MIB: u32 = 512;

// ============================================================================
// Health checks
// ============================================================================

/// Liveness probe path on the target group.
pub const HEALTH_CHECK_PATH: &str = "/check";

/// Status codes that count as healthy.
pub const HEALTHY_HTTP_CODES: &[u16] = &[200];

// ============================================================================
// Listener ports
// ============================================================================

/// Public HTTP listener port (plain variant).
pub const PORT_HTTP: u16 = 80;

/// Public HTTPS listener port (DNS/TLS variant).
pub const PORT_HTTPS: u16 = 443;

/// CIDR admitted by the public load balancer.
pub const ANY_IPV4: &str = "0.0.0.0/0";

// ============================================================================
// DNS
// ============================================================================

/// Default hosted zone domain.
pub const DEFAULT_DOMAIN: &str = "easyquiz.click";

/// Subdomain label published for the API.
pub const API_SUBDOMAIN: &str = "api";

/// Alias record time-to-live (seconds).
pub const RECORD_TTL_SECONDS: u32 = 60;

// ============================================================================
// Naming
// ============================================================================

/// Default region when neither `CDK_DEPLOY_REGION` nor `CDK_DEFAULT_REGION` is set.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default stack name.
pub const DEFAULT_STACK_NAME: &str = "EasyquizAwsStack";

/// Default logical id prefix.
pub const DEFAULT_ID_PREFIX: &str = "EasyQuiz";
