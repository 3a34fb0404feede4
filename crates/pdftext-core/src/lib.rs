//! pdftext-core - Core types for the pdftext client.
//!
//! This crate holds what the client and its front ends share: the client
//! configuration, the request and response types of the extraction service,
//! and the error taxonomy with its remote-error classifiers.
//!
//! # Example
//!
//! ```ignore
//! use pdftext_core::{ClientConfig, RemoteExtractionRequest, ExtractionMethod};
//!
//! let config = ClientConfig::new("localhost:8000")?.with_api_key("secret");
//! assert_eq!(config.base_url(), "http://localhost:8000");
//!
//! let request = RemoteExtractionRequest::new("gs://bucket/report.pdf")
//!     .with_method(ExtractionMethod::Pdfplumber);
//! ```

pub mod config;
pub mod error;
pub mod types;

pub use config::{ClientConfig, ClientOption, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use error::{ClientError, ClientResult, RemoteError, RemoteErrorKind};
pub use types::{
    ExtractedText, ExtractionMethod, ExtractionResult, HealthStatus, PageText,
    RemoteExtractionRequest, RemoteExtractionResult, RequestOptions, PAGE_SEPARATOR,
};
