//! Typed errors for the extraction pipeline.
//!
//! Each remote stage gets its own variant so the log line says which call
//! failed; the underlying client error is kept as the source.

use pdf_services_client::PdfServicesError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Credential file missing, unreadable or malformed
    #[error("config error: {0}")]
    Config(String),

    /// Input upload failed
    #[error("upload failed: {0}")]
    Upload(#[source] PdfServicesError),

    /// Job submission failed
    #[error("job submission failed: {0}")]
    Submit(#[source] PdfServicesError),

    /// Job polling failed, timed out, or the job itself failed
    #[error("job polling failed: {0}")]
    Poll(#[source] PdfServicesError),

    /// Result download failed
    #[error("download failed: {0}")]
    Download(#[source] PdfServicesError),

    /// Local file read/write failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Downloaded archive could not be unpacked
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Archive entry name would land outside the output directory
    #[error("unsafe archive entry: {0}")]
    UnsafeArchiveEntry(String),

    /// Structured data was not valid JSON
    #[error("JSON parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
