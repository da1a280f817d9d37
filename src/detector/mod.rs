//! Resource detectors and the registry that builds them.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::attributes::{AttributeSet, Detection};
use crate::config::{DetectorConfig, DetectorSettings};
use crate::error::ConfigError;

pub mod oci;
pub mod oke;

pub use oci::OciDetector;
pub use oke::OkeDetector;

/// Prefix of the OCI-specific attribute keys.
pub const ATTRIBUTE_PREFIX: &str = "oci.";

/// Produces resource attributes describing the current environment.
///
/// Detection never fails: when the platform is unreachable the detector
/// reports [`Detection::NotApplicable`].
#[async_trait]
pub trait Detector: Send + Sync {
    fn kind(&self) -> DetectorKind;

    async fn detect(&self) -> Detection;
}

/// Supported detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    /// OCI compute instance
    Oci,
    /// OKE cluster node
    Oke,
}

impl DetectorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectorKind::Oci => "oci",
            DetectorKind::Oke => "oke",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "oci" => Ok(DetectorKind::Oci),
            "oke" => Ok(DetectorKind::Oke),
            _ => Err(format!("unknown detector: {} (expected oci or oke)", s)),
        }
    }
}

/// Build the detector of the given kind.
pub fn create_detector(
    kind: DetectorKind,
    settings: &DetectorSettings,
    config: DetectorConfig,
) -> Result<Box<dyn Detector>, ConfigError> {
    match (kind, config) {
        (DetectorKind::Oci, DetectorConfig::Oci(config)) => {
            Ok(Box::new(OciDetector::new(settings, config)?))
        }
        (DetectorKind::Oci, DetectorConfig::None) => {
            Ok(Box::new(OciDetector::new(settings, Default::default())?))
        }
        (DetectorKind::Oke, DetectorConfig::None) => Ok(Box::new(OkeDetector::new(settings)?)),
        (kind, config) => Err(ConfigError::Mismatch {
            detector: kind.as_str(),
            config: config.name(),
        }),
    }
}

/// Run `detectors` in order and merge what they find.
///
/// For a key reported by several detectors the earliest one wins; the schema
/// URL is that of the first detector that detected anything.
pub async fn detect_all(detectors: &[Box<dyn Detector>]) -> Detection {
    let mut merged: Option<(AttributeSet, &'static str)> = None;

    for detector in detectors {
        let Detection::Detected {
            attributes,
            schema_url,
        } = detector.detect().await
        else {
            continue;
        };

        match merged.as_mut() {
            Some((existing, _)) => existing.merge(attributes),
            None => merged = Some((attributes, schema_url)),
        }
    }

    match merged {
        Some((attributes, schema_url)) => Detection::Detected {
            attributes,
            schema_url,
        },
        None => Detection::NotApplicable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OciConfig;

    struct Fixed(DetectorKind, Detection);

    #[async_trait]
    impl Detector for Fixed {
        fn kind(&self) -> DetectorKind {
            self.0
        }

        async fn detect(&self) -> Detection {
            self.1.clone()
        }
    }

    fn detected(pairs: &[(&str, &str)]) -> Detection {
        Detection::Detected {
            attributes: pairs.iter().copied().collect(),
            schema_url: opentelemetry_semantic_conventions::SCHEMA_URL,
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DetectorKind::Oci.to_string(), "oci");
        assert_eq!(DetectorKind::Oke.to_string(), "oke");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("OCI".parse::<DetectorKind>(), Ok(DetectorKind::Oci));
        assert_eq!("oke".parse::<DetectorKind>(), Ok(DetectorKind::Oke));
        assert!("aws".parse::<DetectorKind>().is_err());
    }

    #[test]
    fn test_create_detectors() {
        let settings = DetectorSettings::default();

        let oci = create_detector(DetectorKind::Oci, &settings, DetectorConfig::None).unwrap();
        assert_eq!(oci.kind(), DetectorKind::Oci);

        let oke = create_detector(DetectorKind::Oke, &settings, DetectorConfig::None).unwrap();
        assert_eq!(oke.kind(), DetectorKind::Oke);
    }

    #[test]
    fn test_create_rejects_mismatched_config() {
        let result = create_detector(
            DetectorKind::Oke,
            &DetectorSettings::default(),
            DetectorConfig::Oci(OciConfig::default()),
        );
        assert!(matches!(
            result,
            Err(ConfigError::Mismatch {
                detector: "oke",
                config: "oci"
            })
        ));
    }

    #[tokio::test]
    async fn test_detect_all_merges_in_order() {
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(Fixed(DetectorKind::Oci, Detection::NotApplicable)),
            Box::new(Fixed(
                DetectorKind::Oke,
                detected(&[("cloud.platform", "oci_oke"), ("k8s.cluster.name", "prod")]),
            )),
            Box::new(Fixed(
                DetectorKind::Oci,
                detected(&[("cloud.platform", "oci_compute"), ("host.id", "ocid1.instance")]),
            )),
        ];

        let (attributes, schema_url) = detect_all(&detectors).await.into_parts();
        assert_eq!(schema_url, opentelemetry_semantic_conventions::SCHEMA_URL);
        assert_eq!(attributes.get("cloud.platform"), Some("oci_oke"));
        assert_eq!(attributes.get("k8s.cluster.name"), Some("prod"));
        assert_eq!(attributes.get("host.id"), Some("ocid1.instance"));
    }

    #[tokio::test]
    async fn test_detect_all_nothing_found() {
        let detectors: Vec<Box<dyn Detector>> =
            vec![Box::new(Fixed(DetectorKind::Oci, Detection::NotApplicable))];
        assert_eq!(detect_all(&detectors).await, Detection::NotApplicable);
        assert_eq!(detect_all(&[]).await, Detection::NotApplicable);
    }
}
