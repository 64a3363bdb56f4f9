//! Composer settings.

use crate::defaults;
use crate::error::{QuizstackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deployment-wide settings for a composition run.
///
/// Loaded from a JSON file; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerSettings {
    pub stack_name: String,
    pub id_prefix: String,
    pub default_region: String,
    pub image: String,
    pub container_name: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub include_dns_tls: bool,
    pub domain_name: String,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            stack_name: defaults::DEFAULT_STACK_NAME.to_string(),
            id_prefix: defaults::DEFAULT_ID_PREFIX.to_string(),
            default_region: defaults::DEFAULT_REGION.to_string(),
            image: defaults::DEFAULT_IMAGE.to_string(),
            container_name: defaults::DEFAULT_CONTAINER_NAME.to_string(),
            cpu: defaults::DEFAULT_TASK_CPU,
            memory_mib: defaults::DEFAULT_TASK_MEMORY_MIB,
            include_dns_tls: false,
            domain_name: defaults::DEFAULT_DOMAIN.to_string(),
        }
    }
}

impl ComposerSettings {
    /// Load settings from disk. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| QuizstackError::IoError { path: path.to_path_buf(), source: e })?;
        let settings: Self = serde_json::from_str(&content).map_err(|e| {
            QuizstackError::InvalidConfig { reason: format!("Failed to parse settings: {}", e) }
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| QuizstackError::IoError { path: parent.to_path_buf(), source: e })?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            QuizstackError::InvalidConfig { reason: format!("Failed to serialize settings: {}", e) }
        })?;
        std::fs::write(path, content)
            .map_err(|e| QuizstackError::IoError { path: path.to_path_buf(), source: e })
    }

    /// Reject settings that could never produce a valid topology.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("stack_name", &self.stack_name),
            ("id_prefix", &self.id_prefix),
            ("default_region", &self.default_region),
            ("image", &self.image),
            ("container_name", &self.container_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(QuizstackError::InvalidConfig {
                    reason: format!("{} must not be empty", name),
                });
            }
        }
        if self.include_dns_tls && self.domain_name.trim().is_empty() {
            return Err(QuizstackError::InvalidConfig {
                reason: "domain_name is required when include_dns_tls is set".to_string(),
            });
        }
        if self.cpu == 0 || self.memory_mib == 0 {
            return Err(QuizstackError::InvalidConfig {
                reason: "cpu and memory_mib must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Scoped logical id, e.g. `EasyQuizCluster`.
    pub fn logical_id(&self, suffix: &str) -> String {
        format!("{}{}", self.id_prefix, suffix)
    }
}
