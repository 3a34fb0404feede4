//! Object-storage extraction request and result.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::extraction::{ExtractedText, PageText};

/// Extraction backend the service should use.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Let the service pick.
    #[default]
    Auto,
    Pypdf2,
    Pdfplumber,
}

/// Body of `POST /extract-from-gcs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteExtractionRequest {
    pub input_gcs_url: String,
    /// Where the service should also write the extracted text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_gcs_url: Option<String>,
    #[serde(default)]
    pub method: ExtractionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl RemoteExtractionRequest {
    /// Create a request for the given object URL with the default method.
    pub fn new(input_gcs_url: impl Into<String>) -> Self {
        Self {
            input_gcs_url: input_gcs_url.into(),
            output_gcs_url: None,
            method: ExtractionMethod::default(),
            project_id: None,
        }
    }

    pub fn with_output(mut self, output_gcs_url: impl Into<String>) -> Self {
        self.output_gcs_url = Some(output_gcs_url.into());
        self
    }

    pub fn with_method(mut self, method: ExtractionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

#[derive(Deserialize)]
struct RawRemoteExtraction {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    pages: Option<Vec<PageText>>,
    page_count: usize,
    file_name: String,
    file_size: u64,
    method: String,
    #[serde(default)]
    output_location: Option<String>,
}

/// Result of `POST /extract-from-gcs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRemoteExtraction")]
pub struct RemoteExtractionResult {
    pub text: ExtractedText,
    pub page_count: usize,
    pub file_name: String,
    pub file_size: u64,
    /// Method the service actually used.
    pub method: String,
    /// Echo of the output object the service wrote, if any.
    pub output_location: Option<String>,
}

impl TryFrom<RawRemoteExtraction> for RemoteExtractionResult {
    type Error = String;

    fn try_from(raw: RawRemoteExtraction) -> Result<Self, Self::Error> {
        Ok(Self {
            text: ExtractedText::resolve(raw.text, raw.pages, raw.page_count)?,
            page_count: raw.page_count,
            file_name: raw.file_name,
            file_size: raw.file_size,
            method: raw.method,
            output_location: raw.output_location,
        })
    }
}

impl RemoteExtractionResult {
    /// The whole document text.
    pub fn full_text(&self) -> String {
        self.text.full_text()
    }

    /// Per-page fragments, when the response was paginated.
    pub fn pages(&self) -> Option<&[PageText]> {
        self.text.pages()
    }
}
