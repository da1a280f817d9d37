//! Detector settings and configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{MetadataClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::error::ConfigError;

/// Settings shared by every detector built from a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorSettings {
    /// Base URL of the metadata service.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Upper bound on response body size.
    pub max_response_size: Option<usize>,
}

impl DetectorSettings {
    /// Build the HTTP client these settings describe.
    pub fn client(&self) -> Result<MetadataClient, ConfigError> {
        Ok(MetadataClient::new(self.timeout, &self.base_url)?.with_max_size(self.max_response_size))
    }
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_response_size: None,
        }
    }
}

/// Extract the value at `path` in the raw metadata document as attribute `oci.<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeJPathConfig {
    pub name: String,
    pub path: String,
}

impl std::str::FromStr for AttributeJPathConfig {
    type Err = ConfigError;

    /// Parse `name=path`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, path) = s
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidJPath(s.to_string()))?;
        let entry = AttributeJPathConfig {
            name: name.trim().to_string(),
            path: path.trim().to_string(),
        };
        entry.validate()?;
        Ok(entry)
    }
}

impl AttributeJPathConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() || self.path.is_empty() {
            return Err(ConfigError::InvalidJPath(format!("{}={}", self.name, self.path)));
        }
        Ok(())
    }
}

/// Configuration of the OCI compute detector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OciConfig {
    #[serde(rename = "attributeJPaths")]
    pub attribute_jpaths: Vec<AttributeJPathConfig>,
}

/// Variant-specific configuration handed to a detector at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetectorConfig {
    #[default]
    None,
    Oci(OciConfig),
}

impl DetectorConfig {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            DetectorConfig::None => "empty",
            DetectorConfig::Oci(_) => "oci",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = DetectorSettings::default();
        assert_eq!(settings.base_url, "http://169.254.169.254");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.max_response_size, None);
    }

    #[test]
    fn test_settings_client() {
        let settings = DetectorSettings {
            base_url: "http://localhost:8080/".to_string(),
            max_response_size: Some(4096),
            ..Default::default()
        };
        let client = settings.client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.max_size(), Some(4096));
    }

    #[test]
    fn test_oci_config_wire_names() {
        let config: OciConfig = serde_json::from_str(
            r#"{"attributeJPaths": [{"name": "fd", "path": "faultDomain"}]}"#,
        )
        .unwrap();
        assert_eq!(
            config.attribute_jpaths,
            vec![AttributeJPathConfig {
                name: "fd".to_string(),
                path: "faultDomain".to_string(),
            }]
        );

        let empty: OciConfig = serde_json::from_str("{}").unwrap();
        assert!(empty.attribute_jpaths.is_empty());
    }

    #[test]
    fn test_parse_jpath_flag() {
        let entry: AttributeJPathConfig = "ocpus = shapeConfig.ocpus".parse().unwrap();
        assert_eq!(entry.name, "ocpus");
        assert_eq!(entry.path, "shapeConfig.ocpus");

        assert!("no-separator".parse::<AttributeJPathConfig>().is_err());
        assert!("=path".parse::<AttributeJPathConfig>().is_err());
        assert!("name=".parse::<AttributeJPathConfig>().is_err());
    }
}
