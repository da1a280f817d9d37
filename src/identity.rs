//! Tenancy resolution from the instance identity certificate.
//!
//! The tenancy OCID is not part of the instance metadata document. It is
//! carried instead in the subject of the instance's identity certificate as
//! an attribute value of the form `opc-tenant:<id>`.

use x509_cert::der::asn1::{Ia5StringRef, PrintableStringRef, Utf8StringRef};
use x509_cert::der::{Any, Decode};
use x509_cert::Certificate;

use crate::client::MetadataClient;
use crate::error::MetadataError;

/// Identity certificate endpoint path.
pub const IDENTITY_CERT_PATH: &str = "/opc/v2/identity/cert.pem";

/// Subject attribute prefix marking the tenancy id.
const TENANT_PREFIX: &str = "opc-tenant:";

/// Fetch the identity certificate at `url` and extract the tenancy id.
///
/// Returns an empty string if the certificate carries no tenancy attribute.
pub async fn resolve_tenancy_id(
    client: &MetadataClient,
    url: &str,
) -> Result<String, MetadataError> {
    let response = client.get_ok(url).await?;
    let body = client.read_body(url, response).await?;
    let certificate = parse_certificate(&body)?;
    Ok(tenancy_id_from_certificate(&certificate))
}

/// Decode the first PEM certificate block in `pem` and parse it.
pub fn parse_certificate(pem: &[u8]) -> Result<Certificate, MetadataError> {
    let der = rustls_pemfile::certs(&mut &pem[..])
        .next()
        .and_then(Result::ok)
        .ok_or(MetadataError::InvalidPem)?;

    Ok(Certificate::from_der(&der)?)
}

/// Scan the certificate subject for the first `opc-tenant:` attribute.
pub fn tenancy_id_from_certificate(certificate: &Certificate) -> String {
    certificate
        .tbs_certificate
        .subject
        .0
        .iter()
        .flat_map(|rdn| rdn.0.iter())
        .filter_map(|attr| attribute_string(&attr.value))
        .find_map(|value| value.strip_prefix(TENANT_PREFIX).map(str::to_string))
        .unwrap_or_default()
}

/// String form of a directory string attribute; `None` for other types.
fn attribute_string(value: &Any) -> Option<String> {
    if let Ok(s) = Utf8StringRef::try_from(value) {
        return Some(s.as_str().to_string());
    }
    if let Ok(s) = PrintableStringRef::try_from(value) {
        return Some(s.as_str().to_string());
    }
    Ia5StringRef::try_from(value)
        .ok()
        .map(|s| s.as_str().to_string())
}
