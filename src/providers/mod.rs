//! Metadata providers for OCI platforms.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::MetadataClient;
use crate::error::MetadataError;

pub mod oci;
pub mod oke;

/// Instance metadata endpoint path, version 2.
pub const METADATA_PATH_V2: &str = "/opc/v2/instance/";

/// Instance metadata endpoint path, version 1.
pub const METADATA_PATH_V1: &str = "/opc/v1/instance/";

/// Source of platform metadata for a detector.
///
/// Each call queries the metadata service afresh; nothing is cached.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    type Metadata: Send;

    async fn metadata(&self) -> Result<Self::Metadata, MetadataError>;
}

/// Capacity of the instance shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub ocpus: f32,
    #[serde(rename = "memoryInGBs", deserialize_with = "null_as_default")]
    pub memory_in_gbs: f32,
    #[serde(deserialize_with = "null_as_default")]
    pub networking_bandwidth_in_gbps: f32,
    #[serde(deserialize_with = "null_as_default")]
    pub max_vnic_attachments: i64,
}

/// Decode a field, treating `null` like an absent member.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Query the instance metadata document, falling back from v2 to v1.
pub(crate) async fn fetch_instance_document(
    client: &MetadataClient,
    endpoint_v2: &str,
    endpoint_v1: &str,
) -> Result<Value, MetadataError> {
    let response = client.get_with_fallback(endpoint_v2, endpoint_v1).await?;
    let url = response.url().to_string();
    let body = client.read_body(&url, response).await?;
    Ok(serde_json::from_slice(&body)?)
}
