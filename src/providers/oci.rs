//! OCI compute instance metadata.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use super::{
    fetch_instance_document, null_as_default, MetadataProvider, ShapeConfig, METADATA_PATH_V1,
    METADATA_PATH_V2,
};
use crate::client::MetadataClient;
use crate::error::MetadataError;
use crate::identity::{resolve_tenancy_id, IDENTITY_CERT_PATH};

/// Metadata of a bare compute instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceMetadata {
    /// Resolved from the identity certificate, not from the document.
    #[serde(skip_deserializing)]
    pub tenant_id: String,
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
    /// The decoded document as served.
    #[serde(skip)]
    pub raw: Value,
}

/// Provider for the OCI compute instance metadata service.
#[derive(Debug, Clone)]
pub struct OciProvider {
    client: MetadataClient,
    endpoint_v2: String,
    endpoint_v1: String,
    identity_cert_endpoint: String,
}

impl OciProvider {
    pub fn new(client: MetadataClient) -> Self {
        Self {
            endpoint_v2: client.url(METADATA_PATH_V2),
            endpoint_v1: client.url(METADATA_PATH_V1),
            identity_cert_endpoint: client.url(IDENTITY_CERT_PATH),
            client,
        }
    }
}

#[async_trait]
impl MetadataProvider for OciProvider {
    type Metadata = InstanceMetadata;

    async fn metadata(&self) -> Result<InstanceMetadata, MetadataError> {
        let raw =
            fetch_instance_document(&self.client, &self.endpoint_v2, &self.endpoint_v1).await?;
        let mut metadata = InstanceMetadata::deserialize(&raw)?;
        metadata.raw = raw;

        metadata.tenant_id =
            resolve_tenancy_id(&self.client, &self.identity_cert_endpoint).await?;
        trace!(instance = %metadata.id, "resolved instance metadata");

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let client = MetadataClient::with_base_url("http://localhost:8080/").unwrap();
        let provider = OciProvider::new(client);
        assert_eq!(provider.endpoint_v2, "http://localhost:8080/opc/v2/instance/");
        assert_eq!(provider.endpoint_v1, "http://localhost:8080/opc/v1/instance/");
        assert_eq!(
            provider.identity_cert_endpoint,
            "http://localhost:8080/opc/v2/identity/cert.pem"
        );
    }

    #[test]
    fn test_decode_ignores_tenant_and_unknown_fields() {
        let raw: Value = serde_json::from_str(
            r#"{"id": "ocid1.instance", "tenantId": "spoofed", "extra": {"a": 1}}"#,
        )
        .unwrap();
        let metadata = InstanceMetadata::deserialize(&raw).unwrap();
        assert_eq!(metadata.id, "ocid1.instance");
        assert_eq!(metadata.tenant_id, "");
        assert_eq!(metadata.shape_config, ShapeConfig::default());
    }

    #[test]
    fn test_decode_null_fields() {
        let raw: Value = serde_json::from_str(
            r#"{"id": "ocid1.instance", "displayName": null, "shapeConfig": {"ocpus": null}}"#,
        )
        .unwrap();
        let metadata = InstanceMetadata::deserialize(&raw).unwrap();
        assert_eq!(metadata.id, "ocid1.instance");
        assert_eq!(metadata.display_name, "");
        assert_eq!(metadata.shape_config.ocpus, 0.0);
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let raw: Value = serde_json::from_str("null").unwrap();
        assert!(InstanceMetadata::deserialize(&raw).is_err());
    }
}
