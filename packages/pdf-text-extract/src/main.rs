// Entry point for the PDF text extraction CLI

use anyhow::{Context, Result};
use clap::Parser;
use pdf_services_client::PdfServicesClient;
use pdf_text_extract::{config, Args, Config};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pdf_text_extract=debug,pdf_services_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match process_pdf(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "Error processing PDF");
            ExitCode::FAILURE
        }
    }
}

async fn process_pdf(args: &Args) -> Result<()> {
    let config = Config::from_args(args);

    let credentials =
        config::load_credentials(&args.credentials).context("Failed to load credentials")?;

    let client = PdfServicesClient::new(credentials)
        .with_base_url(config.base_url.clone())
        .with_poll_interval(config.poll_interval)
        .with_poll_timeout(config.poll_timeout);
    tracing::info!(base_url = %client.base_url(), "PDF Services client ready");

    let summary = pdf_text_extract::run(&client, &config)
        .await
        .with_context(|| format!("Failed to extract text from {}", config.input_path.display()))?;

    tracing::info!(
        fragments = summary.fragment_count,
        files = summary.unpacked_files,
        output = %summary.text_output_path.display(),
        "Done"
    );

    Ok(())
}
