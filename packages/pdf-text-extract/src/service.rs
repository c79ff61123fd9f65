//! The remote extraction service as seen by the pipeline.
//!
//! The pipeline only needs five calls; keeping them behind a trait lets the
//! tests drive the whole run against an in-memory service.

use async_trait::async_trait;
use pdf_services_client::{
    Asset, ExtractPdfJob, ExtractPdfParams, ExtractPdfResult, MimeType, PdfServicesClient,
    Result,
};
use std::path::Path;

#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Upload a local file and return its asset handle.
    async fn upload(&self, path: &Path, mime_type: MimeType) -> Result<Asset>;

    /// Submit an extract job and return its polling location.
    async fn submit(&self, input: &Asset, params: ExtractPdfParams) -> Result<String>;

    /// Block until the job at `location` finishes.
    async fn wait_for_result(&self, location: &str) -> Result<ExtractPdfResult>;

    /// Persist an output asset to `dest`, resolving once fully written.
    async fn download(&self, asset: &Asset, dest: &Path) -> Result<u64>;

    async fn delete(&self, asset: &Asset) -> Result<()>;
}

#[async_trait]
impl ExtractionService for PdfServicesClient {
    async fn upload(&self, path: &Path, mime_type: MimeType) -> Result<Asset> {
        PdfServicesClient::upload(self, path, mime_type).await
    }

    async fn submit(&self, input: &Asset, params: ExtractPdfParams) -> Result<String> {
        PdfServicesClient::submit(self, &ExtractPdfJob::new(input, params)).await
    }

    async fn wait_for_result(&self, location: &str) -> Result<ExtractPdfResult> {
        self.get_job_result(location).await
    }

    async fn download(&self, asset: &Asset, dest: &Path) -> Result<u64> {
        self.download_to_file(asset, dest).await
    }

    async fn delete(&self, asset: &Asset) -> Result<()> {
        self.delete_asset(asset).await
    }
}
