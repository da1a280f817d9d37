//! OKE cluster node metadata.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    fetch_instance_document, null_as_default, MetadataProvider, ShapeConfig, METADATA_PATH_V1,
    METADATA_PATH_V2,
};
use crate::client::MetadataClient;
use crate::error::MetadataError;

/// Metadata of a node belonging to an OKE cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterNodeMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub availability_domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fault_domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub compartment_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hostname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub canonical_region_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub oci_ad_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shape: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shape_config: ShapeConfig,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: OkeClusterMetadata,
    /// The decoded document as served.
    #[serde(skip)]
    pub raw: Value,
}

/// Cluster labels OKE writes into the instance `metadata` member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OkeClusterMetadata {
    #[serde(rename = "oke-tm", deserialize_with = "null_as_default")]
    pub tm: String,
    #[serde(rename = "oke-k8version", deserialize_with = "null_as_default")]
    pub k8s_version: String,
    #[serde(rename = "oke-pool-id", deserialize_with = "null_as_default")]
    pub pool_id: String,
    #[serde(rename = "oke-tenancy-id", deserialize_with = "null_as_default")]
    pub tenancy_id: String,
    #[serde(rename = "oke-cluster-display-name", deserialize_with = "null_as_default")]
    pub cluster_display_name: String,
    #[serde(rename = "oke-ad", deserialize_with = "null_as_default")]
    pub availability_domain: String,
    #[serde(rename = "oke-cluster-id", deserialize_with = "null_as_default")]
    pub cluster_id: String,
    /// `"true"` or `"false"`, as served.
    #[serde(rename = "oke-is-on-private-subnet", deserialize_with = "null_as_default")]
    pub private_subnet: String,
    #[serde(rename = "oke-image-name", deserialize_with = "null_as_default")]
    pub image_name: String,
}

/// Provider for the metadata of an OKE worker node.
#[derive(Debug, Clone)]
pub struct OkeProvider {
    client: MetadataClient,
    endpoint_v2: String,
    endpoint_v1: String,
}

impl OkeProvider {
    pub fn new(client: MetadataClient) -> Self {
        Self {
            endpoint_v2: client.url(METADATA_PATH_V2),
            endpoint_v1: client.url(METADATA_PATH_V1),
            client,
        }
    }
}

#[async_trait]
impl MetadataProvider for OkeProvider {
    type Metadata = ClusterNodeMetadata;

    async fn metadata(&self) -> Result<ClusterNodeMetadata, MetadataError> {
        let raw =
            fetch_instance_document(&self.client, &self.endpoint_v2, &self.endpoint_v1).await?;
        let mut node = ClusterNodeMetadata::deserialize(&raw)?;
        node.raw = raw;
        Ok(node)
    }
}
