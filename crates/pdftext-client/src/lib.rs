//! pdftext-client - Client library for a remote PDF-to-text extraction service.
//!
//! # Example
//!
//! ```ignore
//! use pdftext_client::{ClientOption, ExtractionClient, RemoteExtractionRequest};
//! use std::time::Duration;
//!
//! let client = ExtractionClient::with_options(
//!     "localhost:8000",
//!     [
//!         ClientOption::ApiKey("my-secret-key".to_string()),
//!         ClientOption::Timeout(Duration::from_secs(30)),
//!     ],
//! )?;
//!
//! let health = client.health_check(None).await?;
//!
//! // Upload a local file
//! let result = client.extract_file("report.pdf", None).await?;
//! println!("{} pages: {}", result.page_count, result.full_text());
//!
//! // Let the service read straight from object storage
//! let request = RemoteExtractionRequest::new("gs://bucket/input/report.pdf")
//!     .with_output("gs://bucket/output/report.txt");
//! let result = client.extract_from_gcs(&request, None).await?;
//! ```

mod client;

pub use client::ExtractionClient;
pub use pdftext_core::{
    ClientConfig, ClientError, ClientOption, ClientResult, ExtractedText, ExtractionMethod,
    ExtractionResult, HealthStatus, PageText, RemoteError, RemoteErrorKind,
    RemoteExtractionRequest, RemoteExtractionResult, RequestOptions, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT,
};
