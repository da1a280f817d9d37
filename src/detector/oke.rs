//! OKE cluster node detector.

use async_trait::async_trait;
use opentelemetry_semantic_conventions::resource as semconv;
use tracing::debug;

use super::{Detector, DetectorKind};
use crate::attributes::{AttributeSet, Detection};
use crate::config::DetectorSettings;
use crate::error::ConfigError;
use crate::providers::oke::{ClusterNodeMetadata, OkeProvider};
use crate::providers::MetadataProvider;

/// Detects nodes of an OKE managed Kubernetes cluster.
#[derive(Debug)]
pub struct OkeDetector<P = OkeProvider> {
    provider: P,
}

impl OkeDetector {
    pub fn new(settings: &DetectorSettings) -> Result<Self, ConfigError> {
        Ok(Self::with_provider(OkeProvider::new(settings.client()?)))
    }
}

impl<P> OkeDetector<P>
where
    P: MetadataProvider<Metadata = ClusterNodeMetadata>,
{
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }
}

fn attributes(node: ClusterNodeMetadata) -> AttributeSet {
    let mut attrs = AttributeSet::new();
    attrs.insert(semconv::CLOUD_PROVIDER, "oci");
    attrs.insert(semconv::CLOUD_PLATFORM, "oci_oke");
    attrs.insert(semconv::CLOUD_REGION, node.canonical_region_name);
    attrs.insert(semconv::K8S_CLUSTER_NAME, node.metadata.cluster_display_name);
    attrs.insert(semconv::CLOUD_ACCOUNT_ID, node.metadata.tenancy_id);
    attrs.insert("oci.oke.clusterid", node.metadata.cluster_id);
    attrs.insert("oci.oke.k8version", node.metadata.k8s_version);
    attrs
}

#[async_trait]
impl<P> Detector for OkeDetector<P>
where
    P: MetadataProvider<Metadata = ClusterNodeMetadata>,
{
    fn kind(&self) -> DetectorKind {
        DetectorKind::Oke
    }

    async fn detect(&self) -> Detection {
        match self.provider.metadata().await {
            Ok(node) => Detection::Detected {
                attributes: attributes(node),
                schema_url: opentelemetry_semantic_conventions::SCHEMA_URL,
            },
            Err(error) => {
                debug!(%error, "OKE detector metadata retrieval failed");
                Detection::NotApplicable
            }
        }
    }
}
