//! Extraction pipeline driver.
//!
//! Upload → submit → wait → download → unpack → filter → write, strictly in
//! that order. Any failure ends the run; nothing is retried here.

use pdf_services_client::{Asset, ExtractPdfParams, MimeType};
use std::path::PathBuf;

use crate::archive;
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::filter::{extract_text, TextOutput};
use crate::service::ExtractionService;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub input_asset: Asset,
    pub zip_path: PathBuf,
    pub unpacked_files: usize,
    pub text_output_path: PathBuf,
    pub fragment_count: usize,
}

/// Run the whole pipeline for `config.input_path`.
///
/// When `config.delete_remote_assets` is set the uploaded input is deleted
/// afterwards, whether or not the later stages succeeded.
pub async fn run<S>(service: &S, config: &Config) -> Result<RunSummary>
where
    S: ExtractionService + ?Sized,
{
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|e| PipelineError::io(&config.output_dir, e))?;

    let input = service
        .upload(&config.input_path, MimeType::Pdf)
        .await
        .map_err(PipelineError::Upload)?;

    let outcome = process(service, config, &input).await;

    if config.delete_remote_assets {
        match service.delete(&input).await {
            Ok(()) => tracing::info!(asset_id = %input.asset_id, "Deleted uploaded asset"),
            Err(e) => {
                tracing::warn!(asset_id = %input.asset_id, error = %e, "Failed to delete uploaded asset")
            }
        }
    }

    outcome
}

async fn process<S>(service: &S, config: &Config, input: &Asset) -> Result<RunSummary>
where
    S: ExtractionService + ?Sized,
{
    let location = service
        .submit(input, ExtractPdfParams::text_only())
        .await
        .map_err(PipelineError::Submit)?;

    let result = service
        .wait_for_result(&location)
        .await
        .map_err(PipelineError::Poll)?;

    tracing::info!(path = %config.zip_path.display(), "Saving asset");
    service
        .download(&result.resource, &config.zip_path)
        .await
        .map_err(PipelineError::Download)?;
    tracing::info!("Extraction complete");

    let zip_path = config.zip_path.clone();
    let output_dir = config.output_dir.clone();
    let unpacked_files = tokio::task::spawn_blocking(move || archive::unpack_all(&zip_path, &output_dir))
        .await
        .map_err(|e| PipelineError::io(&config.zip_path, std::io::Error::other(e)))??;
    tracing::info!(dir = %config.output_dir.display(), files = unpacked_files, "Files extracted");

    let structured_path = config.output_dir.join(&config.structured_data_name);
    let raw = tokio::fs::read_to_string(&structured_path)
        .await
        .map_err(|e| PipelineError::io(&structured_path, e))?;
    let document: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| PipelineError::Parse {
            path: structured_path.clone(),
            source,
        })?;

    let fragments = extract_text(&document, config.filter_mode);
    let fragment_count = fragments.len();
    tracing::debug!(fragments = fragment_count, mode = ?config.filter_mode, "Filtered structured data");

    let json = TextOutput::new(fragments)
        .to_json_pretty()
        .map_err(|source| PipelineError::Parse {
            path: config.text_output_path.clone(),
            source,
        })?;
    tokio::fs::write(&config.text_output_path, json)
        .await
        .map_err(|e| PipelineError::io(&config.text_output_path, e))?;
    tracing::info!(path = %config.text_output_path.display(), "Text successfully written");

    Ok(RunSummary {
        input_asset: input.clone(),
        zip_path: config.zip_path.clone(),
        unpacked_files,
        text_output_path: config.text_output_path.clone(),
        fragment_count,
    })
}
