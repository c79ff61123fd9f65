//! Pure Adobe PDF Services REST API client.
//!
//! A minimal client for the PDF Services API. Supports uploading assets,
//! submitting extract jobs, polling for completion, downloading results,
//! and deleting assets.
//!
//! # Example
//!
//! ```rust,ignore
//! use pdf_services_client::{ExtractPdfJob, ExtractPdfParams, MimeType, PdfServicesClient};
//!
//! let client = PdfServicesClient::new(credentials);
//!
//! let input = client.upload(Path::new("files/filetoscan.pdf"), MimeType::Pdf).await?;
//! let job = ExtractPdfJob::new(&input, ExtractPdfParams::text_only());
//! let location = client.submit(&job).await?;
//! let result = client.get_job_result(&location).await?;
//! client.download_to_file(&result.resource, Path::new("output/result.zip")).await?;
//! ```

pub mod credentials;
pub mod error;
pub mod types;

pub use credentials::ServicePrincipalCredentials;
pub use error::{PdfServicesError, Result};
pub use types::{
    Asset, ExtractElementType, ExtractPdfJob, ExtractPdfParams, ExtractPdfResult,
    ExtractRenditionsElementType, JobStatus, MimeType, PollResponse, TableStructureType,
};

use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::{header, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use types::{AssetUploadRequest, AssetUploadResponse, TokenResponse};

/// Default (US) region endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pdf-services.adobe.io";

/// EU region endpoint.
pub const EU_BASE_URL: &str = "https://pdf-services-ew1.adobe.io";

/// Refresh the token this long before the service says it expires.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

struct AccessToken {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

pub struct PdfServicesClient {
    client: reqwest::Client,
    credentials: ServicePrincipalCredentials,
    base_url: String,
    poll_interval: Duration,
    poll_timeout: Duration,
    token: Mutex<Option<AccessToken>>,
}

impl PdfServicesClient {
    pub fn new(credentials: ServicePrincipalCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(2),
            poll_timeout: Duration::from_secs(600),
            token: Mutex::new(None),
        }
    }

    /// Set a custom base URL (EU region, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Delay between polls when the service sends no `Retry-After`.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Upper bound on the total time spent in [`Self::get_job_result`].
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Return a bearer token, exchanging credentials when none is cached or
    /// the cached one is about to expire.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.expose_secret().to_string());
            }
        }

        tracing::debug!(client_id = %self.credentials.client_id(), "Requesting access token");
        let resp = self
            .client
            .post(format!("{}/token", self.base_url))
            .form(&[
                ("client_id", self.credentials.client_id()),
                ("client_secret", self.credentials.expose_client_secret()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PdfServicesError::Auth {
                status: status.as_u16(),
                message: body,
            });
        }

        let token: TokenResponse = resp.json().await?;
        let value = token.access_token.clone();
        *cached = Some(AccessToken {
            value: SecretString::from(token.access_token),
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in),
        });
        tracing::debug!(expires_in = token.expires_in, "Access token acquired");

        Ok(value)
    }

    /// Attach the bearer token and API key headers.
    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(builder
            .bearer_auth(token)
            .header("X-API-Key", self.credentials.client_id()))
    }

    /// Upload a local file as a new input asset.
    pub async fn upload(&self, path: &Path, mime_type: MimeType) -> Result<Asset> {
        let bytes = tokio::fs::read(path).await?;
        tracing::info!(path = %path.display(), size = bytes.len(), "Uploading input file");
        self.upload_bytes(bytes, mime_type).await
    }

    /// Upload in-memory content as a new input asset.
    pub async fn upload_bytes(&self, bytes: Vec<u8>, mime_type: MimeType) -> Result<Asset> {
        let request = self
            .authorized(self.client.post(format!("{}/assets", self.base_url)))
            .await?;
        let resp = request
            .json(&AssetUploadRequest {
                media_type: mime_type,
            })
            .send()
            .await?;
        let upload: AssetUploadResponse = error_for_status(resp).await?.json().await?;

        // Pre-signed URI, so no auth headers.
        let resp = self
            .client
            .put(&upload.upload_uri)
            .header(header::CONTENT_TYPE, mime_type.as_str())
            .body(bytes)
            .send()
            .await?;
        error_for_status(resp).await?;

        tracing::info!(asset_id = %upload.asset_id, "Asset uploaded");
        Ok(Asset::new(upload.asset_id))
    }

    /// Submit an extract job. Returns the polling location.
    pub async fn submit(&self, job: &ExtractPdfJob) -> Result<String> {
        let request = self
            .authorized(
                self.client
                    .post(format!("{}/operation/extractpdf", self.base_url)),
            )
            .await?;
        let resp = error_for_status(request.json(job).send().await?).await?;

        let location = resp
            .headers()
            .get(header::LOCATION)
            .ok_or(PdfServicesError::MissingHeader("location"))?
            .to_str()
            .map_err(|e| PdfServicesError::Parse(format!("Invalid location header: {}", e)))?
            .to_string();

        tracing::info!(asset_id = %job.asset_id, %location, "Extract job submitted");
        Ok(location)
    }

    /// Fetch the current job state once. Also returns the `Retry-After`
    /// delay if the service sent one.
    pub async fn poll(&self, location: &str) -> Result<(PollResponse, Option<Duration>)> {
        let request = self.authorized(self.client.get(location)).await?;
        let resp = error_for_status(request.send().await?).await?;

        let retry_after = resp
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let body: PollResponse = resp.json().await?;
        Ok((body, retry_after))
    }

    /// Poll until the job completes.
    pub async fn get_job_result(&self, location: &str) -> Result<ExtractPdfResult> {
        let started = tokio::time::Instant::now();
        loop {
            let (resp, retry_after) = self.poll(location).await?;
            match resp.job_status() {
                JobStatus::Done => {
                    let resource = resp.resource.ok_or_else(|| {
                        PdfServicesError::Parse("Completed job has no resource asset".into())
                    })?;
                    tracing::info!(
                        asset_id = %resource.asset_id,
                        elapsed_secs = started.elapsed().as_secs(),
                        "Job completed"
                    );
                    return Ok(ExtractPdfResult {
                        content: resp.content,
                        resource,
                    });
                }
                JobStatus::Failed => {
                    let error = resp.error.unwrap_or_default();
                    return Err(PdfServicesError::JobFailed {
                        code: error.code,
                        message: error.message,
                    });
                }
                status => {
                    tracing::debug!(%location, ?status, "Job still in progress");
                }
            }

            let delay = retry_after.unwrap_or(self.poll_interval);
            if started.elapsed() + delay > self.poll_timeout {
                return Err(PdfServicesError::Timeout {
                    location: location.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(delay).await;
        }
    }

    /// Stream an output asset to a local file. Resolves once every byte is
    /// written and flushed; returns the byte count.
    pub async fn download_to_file(&self, asset: &Asset, dest: &Path) -> Result<u64> {
        let uri = asset.download_uri.as_deref().ok_or_else(|| {
            PdfServicesError::Parse(format!("Asset {} has no download URI", asset.asset_id))
        })?;

        let resp = error_for_status(self.client.get(uri).send().await?).await?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = resp.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;

        tracing::info!(asset_id = %asset.asset_id, path = %dest.display(), bytes = written, "Asset downloaded");
        Ok(written)
    }

    /// Delete an asset from the service's storage.
    pub async fn delete_asset(&self, asset: &Asset) -> Result<()> {
        let request = self
            .authorized(
                self.client
                    .delete(format!("{}/assets/{}", self.base_url, asset.asset_id)),
            )
            .await?;
        error_for_status(request.send().await?).await?;
        tracing::debug!(asset_id = %asset.asset_id, "Asset deleted");
        Ok(())
    }
}

async fn error_for_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(PdfServicesError::Api {
        status: status.as_u16(),
        message: body,
    })
}
