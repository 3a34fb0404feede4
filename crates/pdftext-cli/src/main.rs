//! pdftext - command-line client for the PDF-to-text extraction service.
//!
//! # Configuration
//!
//! Every connection flag falls back to an environment variable, and a
//! `.env` file in the working directory is loaded first:
//!
//! - `PDFTEXT_BASE_URL` - service URL, defaults to `http://localhost:8000`
//! - `PDFTEXT_API_KEY` - sent as `X-API-Key`
//! - `PDFTEXT_TIMEOUT_SECS` - per-request timeout
//! - `PDFTEXT_USER_AGENT` - overrides the default user agent
//! - `PDFTEXT_DEBUG` - `true`, `1`, `yes` or `on` to log every outgoing request
//!
//! # Usage
//!
//! ```text
//! pdftext health
//! pdftext extract ./report.pdf --preview 500
//! pdftext extract-gcs gs://bucket/input/report.pdf --output gs://bucket/output/report.txt
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pdftext_client::{ClientError, ClientOption, ExtractionClient, ExtractionMethod};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "pdftext", version, about = "Extract text from PDFs with a remote service")]
struct Cli {
    /// Base URL of the extraction service.
    #[arg(
        long,
        global = true,
        env = "PDFTEXT_BASE_URL",
        default_value = "http://localhost:8000"
    )]
    url: String,

    /// API key sent as `X-API-Key`.
    #[arg(long, global = true, env = "PDFTEXT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "PDFTEXT_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// User agent sent with every request.
    #[arg(long, global = true, env = "PDFTEXT_USER_AGENT")]
    user_agent: Option<String>,

    /// Log every outgoing request.
    #[arg(
        long,
        global = true,
        env = "PDFTEXT_DEBUG",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the service is up.
    Health,
    /// Upload a local PDF and print the extracted text.
    Extract {
        /// Path to the PDF file.
        path: PathBuf,
        /// Number of characters of text to print.
        #[arg(long, default_value_t = commands::DEFAULT_PREVIEW_CHARS)]
        preview: usize,
    },
    /// Extract a PDF held in object storage.
    ExtractGcs {
        /// Input object URL, e.g. gs://bucket/input/file.pdf.
        input: String,
        /// Object URL the service should write the text to.
        #[arg(long)]
        output: Option<String>,
        /// Extraction method: auto, pypdf2 or pdfplumber.
        #[arg(long, default_value_t = ExtractionMethod::Auto)]
        method: ExtractionMethod,
        /// Cloud project the bucket belongs to.
        #[arg(long)]
        project: Option<String>,
        /// Number of characters of text to print.
        #[arg(long, default_value_t = commands::DEFAULT_PREVIEW_CHARS)]
        preview: usize,
    },
}

impl Cli {
    fn client(&self) -> Result<ExtractionClient, ClientError> {
        let mut options = vec![ClientOption::Debug(self.debug)];
        if let Some(api_key) = &self.api_key {
            options.push(ClientOption::ApiKey(api_key.clone()));
        }
        if let Some(secs) = self.timeout {
            options.push(ClientOption::Timeout(Duration::from_secs(secs)));
        }
        if let Some(user_agent) = &self.user_agent {
            options.push(ClientOption::UserAgent(user_agent.clone()));
        }
        ExtractionClient::with_options(&self.url, options)
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = cli.client()?;
    if client.config().api_key().is_some() {
        tracing::info!("Using API key authentication");
    }

    match cli.command {
        Command::Health => commands::health(&client).await,
        Command::Extract { path, preview } => commands::extract(&client, &path, preview).await,
        Command::ExtractGcs {
            input,
            output,
            method,
            project,
            preview,
        } => commands::extract_gcs(&client, input, output, method, project, preview).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so extracted text on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            commands::report(&err);
            ExitCode::FAILURE
        }
    }
}
