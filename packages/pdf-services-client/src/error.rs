//! Error types for the PDF Services client.

use thiserror::Error;

/// Result type for PDF Services client operations.
pub type Result<T> = std::result::Result<T, PdfServicesError>;

/// PDF Services client errors.
#[derive(Debug, Error)]
pub enum PdfServicesError {
    /// Token exchange rejected (bad client id/secret)
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// Non-2xx response from an API endpoint
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure (connection refused, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service reported the job as failed
    #[error("Job failed [{code}]: {message}")]
    JobFailed { code: String, message: String },

    /// Polling gave up before the job finished
    #[error("Timed out after {waited_secs}s waiting for job {location}")]
    Timeout { location: String, waited_secs: u64 },

    /// A response was missing a header the protocol requires
    #[error("Missing {0} header in response")]
    MissingHeader(&'static str),

    /// Local file I/O while uploading or downloading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}
