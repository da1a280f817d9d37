//! OCI compute instance detector.

use async_trait::async_trait;
use opentelemetry_semantic_conventions::resource as semconv;
use tracing::debug;

use super::{Detector, DetectorKind, ATTRIBUTE_PREFIX};
use crate::attributes::{AttributeSet, Detection};
use crate::config::{AttributeJPathConfig, DetectorSettings, OciConfig};
use crate::error::ConfigError;
use crate::jpath;
use crate::providers::oci::{InstanceMetadata, OciProvider};
use crate::providers::MetadataProvider;

/// Detects OCI compute instances.
///
/// Besides the fixed attribute table, every configured
/// [`AttributeJPathConfig`] that resolves against the raw metadata document
/// adds an `oci.<name>` attribute.
#[derive(Debug)]
pub struct OciDetector<P = OciProvider> {
    provider: P,
    attribute_jpaths: Vec<AttributeJPathConfig>,
}

impl OciDetector {
    pub fn new(settings: &DetectorSettings, config: OciConfig) -> Result<Self, ConfigError> {
        Self::with_provider(OciProvider::new(settings.client()?), config)
    }
}

impl<P> OciDetector<P>
where
    P: MetadataProvider<Metadata = InstanceMetadata>,
{
    /// Build a detector around an arbitrary provider.
    pub fn with_provider(provider: P, config: OciConfig) -> Result<Self, ConfigError> {
        for entry in &config.attribute_jpaths {
            entry.validate()?;
        }
        Ok(Self {
            provider,
            attribute_jpaths: config.attribute_jpaths,
        })
    }

    fn attributes(&self, metadata: InstanceMetadata) -> AttributeSet {
        let mut attrs = AttributeSet::new();
        attrs.insert(semconv::CLOUD_PROVIDER, "oci");
        attrs.insert(semconv::CLOUD_PLATFORM, "oci_compute");
        attrs.insert(semconv::CLOUD_ACCOUNT_ID, metadata.tenant_id);
        attrs.insert(semconv::CLOUD_REGION, metadata.canonical_region_name);
        attrs.insert(semconv::CLOUD_AVAILABILITY_ZONE, metadata.availability_domain);
        attrs.insert(semconv::HOST_ID, metadata.id);
        attrs.insert(semconv::HOST_IMAGE_ID, metadata.image);
        attrs.insert("oci.compartment.id", metadata.compartment_id);
        attrs.insert("oci.shape", metadata.shape);

        for entry in &self.attribute_jpaths {
            if let Some(value) = jpath::get(&metadata.raw, &entry.path) {
                attrs.upsert(
                    format!("{ATTRIBUTE_PREFIX}{}", entry.name),
                    value.to_attribute_string(),
                );
            }
        }

        attrs
    }
}

#[async_trait]
impl<P> Detector for OciDetector<P>
where
    P: MetadataProvider<Metadata = InstanceMetadata>,
{
    fn kind(&self) -> DetectorKind {
        DetectorKind::Oci
    }

    async fn detect(&self) -> Detection {
        match self.provider.metadata().await {
            Ok(metadata) => Detection::Detected {
                attributes: self.attributes(metadata),
                schema_url: opentelemetry_semantic_conventions::SCHEMA_URL,
            },
            Err(error) => {
                debug!(%error, "OCI detector metadata retrieval failed");
                Detection::NotApplicable
            }
        }
    }
}
