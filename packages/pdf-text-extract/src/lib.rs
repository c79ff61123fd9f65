//! PDF text extraction through Adobe PDF Services.
//!
//! Uploads a PDF, runs the extract operation, unpacks the result archive and
//! reduces `structuredData.json` to a flat list of text fragments.
//!
//! # Modules
//!
//! - [`config`] - CLI arguments and credential loading
//! - [`service`] - Trait over the remote calls the pipeline makes
//! - [`pipeline`] - The end-to-end run
//! - [`archive`] - Zip unpacking
//! - [`filter`] - Structured-text filter and output format

pub mod archive;
pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod service;

pub use config::{Args, Config};
pub use error::{PipelineError, Result};
pub use filter::{extract_text, FilterMode, TextOutput};
pub use pipeline::{run, RunSummary};
pub use service::ExtractionService;
