//! Integration tests for the extraction pipeline.
//!
//! These drive a full run against an in-memory service:
//! 1. Upload the input
//! 2. Submit and wait for the job
//! 3. Download and unpack the archive
//! 4. Filter and write the text output

use async_trait::async_trait;
use pdf_services_client::{
    Asset, ExtractPdfParams, ExtractPdfResult, MimeType, PdfServicesError, Result,
};
use pdf_text_extract::{run, Config, ExtractionService, FilterMode, PipelineError};
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Upload(PathBuf),
    Submit(String, ExtractPdfParams),
    Wait(String),
    Download(String),
    Delete(String),
}

/// Serves a canned archive; optionally fails at one stage.
struct MockService {
    structured_data: Value,
    fail_job: bool,
    fail_upload: bool,
    fail_delete: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockService {
    fn new(structured_data: Value) -> Self {
        Self {
            structured_data,
            fail_job: false,
            fail_upload: false,
            fail_delete: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionService for MockService {
    async fn upload(&self, path: &Path, mime_type: MimeType) -> Result<Asset> {
        assert_eq!(mime_type, MimeType::Pdf);
        self.record(Call::Upload(path.to_path_buf()));
        if self.fail_upload {
            return Err(PdfServicesError::Api {
                status: 413,
                message: "file too large".into(),
            });
        }
        Ok(Asset::new("input-1"))
    }

    async fn submit(&self, input: &Asset, params: ExtractPdfParams) -> Result<String> {
        self.record(Call::Submit(input.asset_id.clone(), params));
        Ok("https://example.test/operation/extractpdf/job-1/status".into())
    }

    async fn wait_for_result(&self, location: &str) -> Result<ExtractPdfResult> {
        self.record(Call::Wait(location.to_string()));
        if self.fail_job {
            return Err(PdfServicesError::JobFailed {
                code: "CORRUPT_DOCUMENT".into(),
                message: "Input file is corrupted".into(),
            });
        }
        Ok(ExtractPdfResult {
            content: None,
            resource: Asset {
                asset_id: "result-1".into(),
                download_uri: Some("https://example.test/download/result-1".into()),
            },
        })
    }

    async fn download(&self, asset: &Asset, dest: &Path) -> Result<u64> {
        self.record(Call::Download(asset.asset_id.clone()));
        let mut zip = ZipWriter::new(std::fs::File::create(dest)?);
        let body = serde_json::to_vec(&self.structured_data).unwrap();
        zip.start_file("structuredData.json", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(&body)?;
        zip.start_file("tables/fileoutpart0.csv", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"a,b\n")?;
        zip.finish().unwrap();
        Ok(std::fs::metadata(dest)?.len())
    }

    async fn delete(&self, asset: &Asset) -> Result<()> {
        self.record(Call::Delete(asset.asset_id.clone()));
        if self.fail_delete {
            return Err(PdfServicesError::Api {
                status: 404,
                message: "asset not found".into(),
            });
        }
        Ok(())
    }
}

fn test_config(dir: &Path, mode: FilterMode) -> Config {
    let output_dir = dir.join("output");
    Config {
        input_path: dir.join("files/filetoscan.pdf"),
        zip_path: output_dir.join("ExtractTextInfoFromPDF.zip"),
        structured_data_name: "structuredData.json".into(),
        text_output_path: output_dir.join("extractedText.json"),
        output_dir,
        base_url: "https://example.test".into(),
        poll_interval: Duration::from_millis(10),
        poll_timeout: Duration::from_secs(1),
        filter_mode: mode,
        delete_remote_assets: false,
    }
}

fn sample_document() -> Value {
    json!({
        "version": { "json_export": "161", "page_segmentation": "5" },
        "extended_metadata": { "page_count": 1 },
        "elements": [
            { "Path": "//Document/H1", "Text": "Quarterly Report ", "Page": 0 },
            { "Path": "//Document/Figure", "Page": 0 },
            {
                "Path": "//Document/L",
                "elements": [ { "Path": "//Document/L/LI", "Text": "First item " } ]
            },
            { "Path": "//Document/P", "Text": "Revenue grew. ", "Page": 0 }
        ],
        "pages": [ { "page_number": 0 } ]
    })
}

fn read_output(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_full_run_writes_shallow_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), FilterMode::Shallow);
    let service = MockService::new(sample_document());

    let summary = run(&service, &config).await.unwrap();

    assert_eq!(summary.fragment_count, 2);
    assert_eq!(summary.unpacked_files, 2);
    assert_eq!(summary.input_asset.asset_id, "input-1");
    assert!(config.zip_path.is_file());
    assert!(config.output_dir.join("tables/fileoutpart0.csv").is_file());
    assert_eq!(
        read_output(&config.text_output_path),
        json!({ "textElements": ["Quarterly Report ", "Revenue grew. "] })
    );
}

#[tokio::test]
async fn test_full_run_recursive_includes_nested_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), FilterMode::Recursive);
    let service = MockService::new(sample_document());

    let summary = run(&service, &config).await.unwrap();

    assert_eq!(summary.fragment_count, 3);
    assert_eq!(
        read_output(&config.text_output_path),
        json!({ "textElements": ["Quarterly Report ", "First item ", "Revenue grew. "] })
    );
}

#[tokio::test]
async fn test_calls_happen_in_order_with_text_only_params() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), FilterMode::Shallow);
    let service = MockService::new(json!({ "elements": [] }));

    run(&service, &config).await.unwrap();

    assert_eq!(
        service.calls(),
        vec![
            Call::Upload(config.input_path.clone()),
            Call::Submit("input-1".into(), ExtractPdfParams::text_only()),
            Call::Wait("https://example.test/operation/extractpdf/job-1/status".into()),
            Call::Download("result-1".into()),
        ]
    );
    assert_eq!(
        read_output(&config.text_output_path),
        json!({ "textElements": [] })
    );
}

#[tokio::test]
async fn test_failed_job_surfaces_as_poll_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), FilterMode::Shallow);
    let mut service = MockService::new(sample_document());
    service.fail_job = true;

    let err = run(&service, &config).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Poll(PdfServicesError::JobFailed { ref code, .. }) if code == "CORRUPT_DOCUMENT"
    ));
    assert!(!config.text_output_path.exists());
    assert!(!service
        .calls()
        .iter()
        .any(|c| matches!(c, Call::Download(_))));
}

#[tokio::test]
async fn test_upload_failure_stops_before_submit() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), FilterMode::Shallow);
    config.delete_remote_assets = true;
    let mut service = MockService::new(sample_document());
    service.fail_upload = true;

    let err = run(&service, &config).await.unwrap_err();

    assert!(matches!(err, PipelineError::Upload(_)));
    assert_eq!(service.calls().len(), 1);
}

#[tokio::test]
async fn test_delete_runs_even_when_job_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), FilterMode::Shallow);
    config.delete_remote_assets = true;
    let mut service = MockService::new(sample_document());
    service.fail_job = true;

    assert!(run(&service, &config).await.is_err());

    assert_eq!(service.calls().last(), Some(&Call::Delete("input-1".into())));
}

#[tokio::test]
async fn test_failed_delete_does_not_fail_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), FilterMode::Shallow);
    config.delete_remote_assets = true;
    let mut service = MockService::new(sample_document());
    service.fail_delete = true;

    let summary = run(&service, &config).await.unwrap();

    assert_eq!(summary.fragment_count, 2);
    assert!(config.text_output_path.is_file());
    assert_eq!(service.calls().last(), Some(&Call::Delete("input-1".into())));
}

#[tokio::test]
async fn test_missing_structured_data_member_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), FilterMode::Shallow);
    config.structured_data_name = "renamed.json".into();
    let service = MockService::new(sample_document());

    let err = run(&service, &config).await.unwrap_err();

    assert!(matches!(err, PipelineError::Io { ref path, .. } if path.ends_with("renamed.json")));
}

#[tokio::test]
async fn test_malformed_structured_data_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), FilterMode::Shallow);
    // The csv member is not JSON.
    config.structured_data_name = "tables/fileoutpart0.csv".into();
    let service = MockService::new(sample_document());

    let err = run(&service, &config).await.unwrap_err();

    assert!(matches!(err, PipelineError::Parse { .. }));
}
