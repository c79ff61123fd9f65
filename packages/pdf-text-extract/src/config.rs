use clap::Parser;
use pdf_services_client::{ServicePrincipalCredentials, DEFAULT_BASE_URL};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PipelineError, Result};
use crate::filter::FilterMode;

const CLIENT_ID_VAR: &str = "PDF_SERVICES_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "PDF_SERVICES_CLIENT_SECRET";

/// Extract the text of a PDF through Adobe PDF Services.
#[derive(Debug, Clone, Parser)]
#[command(name = "pdf-text-extract", version)]
pub struct Args {
    /// Credentials JSON downloaded from the Adobe developer console
    #[arg(long, env = "PDF_SERVICES_CREDENTIALS", default_value = "pdfservices-api-credentials.json")]
    pub credentials: PathBuf,

    /// PDF to extract
    #[arg(long, env = "PDF_INPUT", default_value = "./files/filetoscan.pdf")]
    pub input: PathBuf,

    /// Directory for the downloaded zip, its contents and the text output
    #[arg(long, env = "PDF_OUTPUT_DIR", default_value = "./output")]
    pub output_dir: PathBuf,

    /// File name of the downloaded archive inside the output directory
    #[arg(long, default_value = "ExtractTextInfoFromPDF.zip")]
    pub zip_name: String,

    /// Structured data member to read after unpacking
    #[arg(long, default_value = "structuredData.json")]
    pub structured_data: String,

    /// File name of the filtered text output inside the output directory
    #[arg(long, default_value = "extractedText.json")]
    pub text_output: String,

    /// API endpoint (https://pdf-services-ew1.adobe.io for the EU region)
    #[arg(long, env = "PDF_SERVICES_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds between job polls when the service gives no Retry-After
    #[arg(long, default_value_t = 2)]
    pub poll_interval_secs: u64,

    /// Give up waiting for the job after this many seconds
    #[arg(long, default_value_t = 600)]
    pub poll_timeout_secs: u64,

    /// Collect text from nested elements too, not just the top-level list
    #[arg(long)]
    pub recursive: bool,

    /// Delete the uploaded input from the service once the run finishes
    #[arg(long)]
    pub delete_remote_assets: bool,
}

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub zip_path: PathBuf,
    pub structured_data_name: String,
    pub text_output_path: PathBuf,
    pub base_url: String,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub filter_mode: FilterMode,
    pub delete_remote_assets: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        Self {
            input_path: args.input.clone(),
            output_dir: args.output_dir.clone(),
            zip_path: args.output_dir.join(&args.zip_name),
            structured_data_name: args.structured_data.clone(),
            text_output_path: args.output_dir.join(&args.text_output),
            base_url: args.base_url.clone(),
            poll_interval: Duration::from_secs(args.poll_interval_secs),
            poll_timeout: Duration::from_secs(args.poll_timeout_secs),
            filter_mode: if args.recursive {
                FilterMode::Recursive
            } else {
                FilterMode::Shallow
            },
            delete_remote_assets: args.delete_remote_assets,
        }
    }
}

#[derive(Deserialize)]
struct CredentialFile {
    client_credentials: ClientCredentials,
}

#[derive(Deserialize)]
struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

/// Parse a credentials file of the form
/// `{ "client_credentials": { "client_id": ..., "client_secret": ... } }`.
pub fn load_credentials_file(path: &Path) -> Result<ServicePrincipalCredentials> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!("Error reading {}: {}", path.display(), e))
    })?;
    parse_credentials(&data)
        .map_err(|e| PipelineError::Config(format!("Error parsing {}: {}", path.display(), e)))
}

fn parse_credentials(data: &str) -> serde_json::Result<ServicePrincipalCredentials> {
    let file: CredentialFile = serde_json::from_str(data)?;
    Ok(ServicePrincipalCredentials::new(
        file.client_credentials.client_id,
        file.client_credentials.client_secret,
    ))
}

/// Credentials from `PDF_SERVICES_CLIENT_ID` / `PDF_SERVICES_CLIENT_SECRET`,
/// if both are set and non-empty.
pub fn credentials_from_env() -> Option<ServicePrincipalCredentials> {
    let id = env::var(CLIENT_ID_VAR).ok().filter(|v| !v.is_empty())?;
    let secret = env::var(CLIENT_SECRET_VAR).ok().filter(|v| !v.is_empty())?;
    Some(ServicePrincipalCredentials::new(id, secret))
}

/// Environment first (a `.env` file is loaded if present), then the file.
pub fn load_credentials(path: &Path) -> Result<ServicePrincipalCredentials> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    if let Some(credentials) = credentials_from_env() {
        tracing::info!("Using credentials from environment");
        return Ok(credentials);
    }

    let credentials = load_credentials_file(path)?;
    tracing::info!(path = %path.display(), client_id = %credentials.client_id(), "Credentials loaded");
    Ok(credentials)
}
