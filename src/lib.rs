//! Resource detectors for Oracle Cloud Infrastructure.
//!
//! This crate queries the OCI instance metadata service and turns what it
//! finds into OpenTelemetry resource attributes.
//!
//! # Features
//!
//! - OCI compute instance detection, with the tenancy resolved from the
//!   instance identity certificate
//! - OKE cluster node detection
//! - v2 → v1 metadata endpoint fallback
//! - Extra attributes plucked from the raw metadata document by dotted path
//!
//! # Example
//!
//! ```ignore
//! use oci_metadata::{create_detector, DetectorConfig, DetectorKind, DetectorSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), oci_metadata::ConfigError> {
//!     let detector = create_detector(
//!         DetectorKind::Oci,
//!         &DetectorSettings::default(),
//!         DetectorConfig::None,
//!     )?;
//!
//!     // Never fails; off OCI this is `Detection::NotApplicable`.
//!     let resource = detector.detect().await.into_resource();
//!     println!("{resource:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Attributes
//!
//! | Detector | Attributes |
//! |----------|------------|
//! | `oci` | `cloud.provider`, `cloud.platform`, `cloud.account.id`, `cloud.region`, `cloud.availability_zone`, `host.id`, `host.image.id`, `oci.compartment.id`, `oci.shape`, `oci.<name>` per configured path |
//! | `oke` | `cloud.provider`, `cloud.platform`, `cloud.region`, `k8s.cluster.name`, `cloud.account.id`, `oci.oke.clusterid`, `oci.oke.k8version` |

mod attributes;
mod client;
mod config;
mod detector;
mod error;
mod identity;
pub mod jpath;
pub mod providers;

pub use attributes::{AttributeSet, Detection};
pub use client::{MetadataClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use config::{AttributeJPathConfig, DetectorConfig, DetectorSettings, OciConfig};
pub use detector::{
    create_detector, detect_all, Detector, DetectorKind, OciDetector, OkeDetector,
    ATTRIBUTE_PREFIX,
};
pub use error::{ConfigError, MetadataError};
pub use identity::{parse_certificate, resolve_tenancy_id, tenancy_id_from_certificate};
pub use providers::MetadataProvider;
