//! Configuration file handling for admin-kit.
//!
//! A single JSON document configures how resource tags are resolved and how
//! page rules are evaluated. Every field has a default, so an empty object
//! (`{}`) is a valid configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::AdminError;
use crate::types::RuleEvaluation;

/// Static resource resolution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Emit one bundle per tag unless the tag says otherwise
    pub bundling_enabled: bool,
    /// URL prefix bundles are served under
    pub bundle_url_prefix: String,
    /// URL prefix unbundled files are served under
    pub resource_url_prefix: String,
    /// Append a content hash to bundle names
    pub version_bundles: bool,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            bundling_enabled: true,
            bundle_url_prefix: "/bundles/".to_string(),
            resource_url_prefix: "/".to_string(),
            version_bundles: true,
        }
    }
}

/// Page rule settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub evaluation: RuleEvaluation,
}

/// Top-level configuration that can be saved/loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminKitConfig {
    pub resources: ResourcesConfig,
    pub rules: RulesConfig,
}

impl AdminKitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_prefix("bundle_url_prefix", &self.resources.bundle_url_prefix)?;
        validate_prefix("resource_url_prefix", &self.resources.resource_url_prefix)?;
        Ok(())
    }
}

fn validate_prefix(field: &str, prefix: &str) -> Result<(), AdminError> {
    if prefix.trim().is_empty() {
        return Err(AdminError::config(format!("{} must be specified", field)));
    }
    if prefix.contains(char::is_whitespace) {
        return Err(AdminError::config(format!("{} cannot contain whitespace", field)));
    }
    if !prefix.starts_with('/') || !prefix.ends_with('/') {
        return Err(AdminError::config(format!(
            "{} must start and end with '/' (got {:?})",
            field, prefix
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = AdminKitConfig::new();
        assert!(config.validate().is_ok());
        assert!(config.resources.bundling_enabled);
        assert_eq!(config.rules.evaluation, RuleEvaluation::Disabled);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: AdminKitConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AdminKitConfig::default());

        let config: AdminKitConfig =
            serde_json::from_str(r#"{ "rules": { "evaluation": "expression" } }"#).unwrap();
        assert_eq!(config.rules.evaluation, RuleEvaluation::Expression);
        assert_eq!(config.resources, ResourcesConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_prefixes() {
        let mut config = AdminKitConfig::new();
        config.resources.bundle_url_prefix = "bundles".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bundle_url_prefix"));
        assert!(matches!(
            err.downcast_ref::<AdminError>(),
            Some(AdminError::Config(_))
        ));

        let mut config = AdminKitConfig::new();
        config.resources.resource_url_prefix = "/static assets/".to_string();
        assert!(config.validate().is_err());

        let mut config = AdminKitConfig::new();
        config.resources.resource_url_prefix = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("admin-kit.json");

        let mut config = AdminKitConfig::new();
        config.resources.bundle_url_prefix = "/static/bundles/".to_string();
        config.rules.evaluation = RuleEvaluation::Expression;
        config.save_to_file(&path).unwrap();

        let loaded = AdminKitConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let dir = TempDir::new().unwrap();
        let err = AdminKitConfig::load_from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration"));
    }
}
