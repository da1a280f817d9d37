//! CLI binary for oci-metadata crate.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use oci_metadata::providers::oci::OciProvider;
use oci_metadata::providers::oke::OkeProvider;
use oci_metadata::{
    create_detector, detect_all, AttributeJPathConfig, ConfigError, DetectorConfig, DetectorKind,
    DetectorSettings, MetadataError, MetadataProvider, OciConfig, DEFAULT_BASE_URL,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oci-metadata")]
#[command(
    author,
    version,
    about = "Detect OCI resource attributes from the instance metadata service"
)]
struct Cli {
    /// Metadata service base URL
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true, default_value_t = 5000)]
    timeout_ms: u64,

    /// Maximum size in bytes to accept for any response
    #[arg(long, global = true)]
    max_size: Option<usize>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run detectors and print the resource attributes they produce
    Detect {
        /// Detectors to run, in priority order
        #[arg(short, long = "detector", default_values = ["oci"], value_parser = parse_kind)]
        detectors: Vec<DetectorKind>,

        /// Extra attribute as NAME=PATH into the raw metadata (oci only)
        #[arg(short, long = "attribute", value_parser = parse_jpath)]
        attributes: Vec<AttributeJPathConfig>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the metadata document a provider returns
    Fetch {
        #[arg(short, long, default_value = "oci", value_parser = parse_kind)]
        detector: DetectorKind,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown format: {}", s)),
        }
    }
}

fn parse_kind(s: &str) -> Result<DetectorKind, String> {
    s.parse()
}

fn parse_jpath(s: &str) -> Result<AttributeJPathConfig, String> {
    s.parse().map_err(|e: ConfigError| e.to_string())
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = DetectorSettings {
        base_url: cli.base_url,
        timeout: Duration::from_millis(cli.timeout_ms),
        max_response_size: cli.max_size,
    };

    match cli.command {
        Commands::Detect {
            detectors,
            attributes,
            format,
        } => {
            let detectors = detectors
                .into_iter()
                .map(|kind| {
                    let config = match kind {
                        DetectorKind::Oci => DetectorConfig::Oci(OciConfig {
                            attribute_jpaths: attributes.clone(),
                        }),
                        DetectorKind::Oke => DetectorConfig::None,
                    };
                    create_detector(kind, &settings, config)
                })
                .collect::<Result<Vec<_>, _>>()?;

            let (attributes, schema_url) = detect_all(&detectors).await.into_parts();

            match format {
                OutputFormat::Text => {
                    for (key, value) in attributes.iter() {
                        println!("{}={}", key, value);
                    }
                }
                OutputFormat::Json => {
                    let object: serde_json::Map<String, serde_json::Value> = attributes
                        .into_iter()
                        .map(|(k, v)| (k, serde_json::Value::String(v)))
                        .collect();
                    let output = serde_json::json!({
                        "schemaUrl": schema_url,
                        "attributes": object,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
            Ok(())
        }

        Commands::Fetch { detector } => {
            let client = settings.client()?;
            let output = match detector {
                DetectorKind::Oci => OciProvider::new(client).metadata().await?.raw,
                DetectorKind::Oke => OkeProvider::new(client).metadata().await?.raw,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}
