//! Text extraction results.
//!
//! The service answers either with a flat `text` field or with a list of
//! per-page fragments under `pages`. Both shapes are resolved at decode time
//! into [`ExtractedText`], so callers only ever see one accessor.

use serde::{Deserialize, Serialize};

/// Separator placed between page texts when joining paginated results.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Text of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number as reported by the service.
    pub page: u32,
    pub text: String,
}

/// Extracted text in whichever shape the service returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    Flat(String),
    Paged(Vec<PageText>),
}

impl ExtractedText {
    /// The whole document text. Pages are joined in received order.
    pub fn full_text(&self) -> String {
        match self {
            Self::Flat(text) => text.clone(),
            Self::Paged(pages) => pages
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(PAGE_SEPARATOR),
        }
    }

    /// Per-page fragments, when the response was paginated.
    pub fn pages(&self) -> Option<&[PageText]> {
        match self {
            Self::Flat(_) => None,
            Self::Paged(pages) => Some(pages),
        }
    }

    /// Resolve the two response shapes. `pages` wins when both are present.
    pub(crate) fn resolve(
        text: Option<String>,
        pages: Option<Vec<PageText>>,
        page_count: usize,
    ) -> Result<Self, String> {
        match (pages, text) {
            (Some(pages), _) => {
                if pages.len() != page_count {
                    return Err(format!(
                        "page_count is {} but {} pages were returned",
                        page_count,
                        pages.len()
                    ));
                }
                Ok(Self::Paged(pages))
            }
            (None, Some(text)) => Ok(Self::Flat(text)),
            (None, None) => Err("response has neither `text` nor `pages`".to_string()),
        }
    }
}

#[derive(Deserialize)]
struct RawExtraction {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    pages: Option<Vec<PageText>>,
    page_count: usize,
    file_name: String,
    file_size: u64,
}

/// Result of `POST /extract`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawExtraction")]
pub struct ExtractionResult {
    pub text: ExtractedText,
    pub page_count: usize,
    pub file_name: String,
    /// Size of the uploaded file in bytes.
    pub file_size: u64,
}

impl TryFrom<RawExtraction> for ExtractionResult {
    type Error = String;

    fn try_from(raw: RawExtraction) -> Result<Self, Self::Error> {
        Ok(Self {
            text: ExtractedText::resolve(raw.text, raw.pages, raw.page_count)?,
            page_count: raw.page_count,
            file_name: raw.file_name,
            file_size: raw.file_size,
        })
    }
}

impl ExtractionResult {
    /// The whole document text.
    pub fn full_text(&self) -> String {
        self.text.full_text()
    }

    /// Per-page fragments, when the response was paginated.
    pub fn pages(&self) -> Option<&[PageText]> {
        self.text.pages()
    }
}
