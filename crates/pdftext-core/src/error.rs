//! Error types for pdftext operations.
//!
//! Every failure is surfaced to the caller as a [`ClientError`]. Non-2xx
//! responses from the extraction service are carried as a [`RemoteError`],
//! which exposes heuristic classifiers over the service's `detail` message.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for pdftext operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Main error type for all client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid base URL, header value or environment configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A local file could not be opened or read.
    #[error("IO error{}: {source}", path_suffix(.path))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// Connection, DNS, TLS or transport-level timeout failure.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape we expected.
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The service answered with a non-success status.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The caller's cancellation token fired before the response arrived.
    #[error("Request cancelled")]
    Cancelled,
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

impl ClientError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an IO error for a local path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            message: message.into(),
            source,
        }
    }

    /// Create a decode error without an underlying JSON error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            source: None,
        }
    }

    /// Create a decode error from a JSON error.
    pub fn decode_json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(source),
        }
    }

    /// The remote error, if the service answered with a non-success status.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of a remote error.
    pub fn status(&self) -> Option<u16> {
        self.remote().map(|e| e.status)
    }

    /// See [`RemoteError::is_invalid_input`].
    pub fn is_invalid_input(&self) -> bool {
        self.remote().is_some_and(RemoteError::is_invalid_input)
    }

    /// See [`RemoteError::is_timeout`]. Also true for transport timeouts.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Remote(e) => e.is_timeout(),
            Self::Transport { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// See [`RemoteError::is_payload_too_large`].
    pub fn is_payload_too_large(&self) -> bool {
        self.remote().is_some_and(RemoteError::is_payload_too_large)
    }

    /// See [`RemoteError::is_permission_denied`].
    pub fn is_permission_denied(&self) -> bool {
        self.remote().is_some_and(RemoteError::is_permission_denied)
    }

    /// See [`RemoteError::is_not_found`].
    pub fn is_not_found(&self) -> bool {
        self.remote().is_some_and(RemoteError::is_not_found)
    }
}

/// Known categories of remote failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    InvalidInput,
    Timeout,
    PayloadTooLarge,
    PermissionDenied,
    NotFound,
}

impl RemoteErrorKind {
    /// Get the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteErrorKind::InvalidInput => "INVALID_INPUT",
            RemoteErrorKind::Timeout => "TIMEOUT",
            RemoteErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            RemoteErrorKind::PermissionDenied => "PERMISSION_DENIED",
            RemoteErrorKind::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Matched case-insensitively; keep in sync with the service's wording.
const INVALID_INPUT_DETAILS: &[&str] = &[
    "syntax errors",
    "corrupted",
    "incomplete or truncated",
    "invalid pdf format",
    "does not appear to be a valid",
];
const TIMEOUT_DETAILS: &[&str] = &["timed out"];
const PAYLOAD_TOO_LARGE_DETAILS: &[&str] = &["file too large"];
const PERMISSION_DENIED_DETAILS: &[&str] = &["permission denied"];
const NOT_FOUND_DETAILS: &[&str] = &["not found", "does not exist"];

/// A non-success response from the extraction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
    /// `detail` from a `{"detail": "..."}` error envelope, when present.
    pub detail: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    detail: serde_json::Value,
}

impl RemoteError {
    pub fn new(status: u16, body: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            status,
            body: body.into(),
            detail,
        }
    }

    /// Build from a status and raw body, pulling `detail` out of the body
    /// when it is a JSON object with a non-empty string `detail`.
    pub fn from_response(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let detail = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| match envelope.detail {
                serde_json::Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            });
        Self::new(status, body, detail)
    }

    fn detail_contains_any(&self, needles: &[&str]) -> bool {
        let Some(detail) = self.detail.as_deref() else {
            return false;
        };
        let detail = detail.to_lowercase();
        needles.iter().any(|needle| detail.contains(needle))
    }

    /// 400 with a detail describing a malformed or non-PDF upload.
    pub fn is_invalid_input(&self) -> bool {
        self.status == 400 && self.detail_contains_any(INVALID_INPUT_DETAILS)
    }

    /// 408 with a "timed out" detail.
    pub fn is_timeout(&self) -> bool {
        self.status == 408 && self.detail_contains_any(TIMEOUT_DETAILS)
    }

    /// 413 with a "File too large" detail.
    pub fn is_payload_too_large(&self) -> bool {
        self.status == 413 && self.detail_contains_any(PAYLOAD_TOO_LARGE_DETAILS)
    }

    /// 403 with a "Permission denied" detail.
    pub fn is_permission_denied(&self) -> bool {
        self.status == 403 && self.detail_contains_any(PERMISSION_DENIED_DETAILS)
    }

    /// 404 with a "not found" or "does not exist" detail.
    pub fn is_not_found(&self) -> bool {
        self.status == 404 && self.detail_contains_any(NOT_FOUND_DETAILS)
    }

    /// The matching category, or `None` for an uncategorized error.
    pub fn kind(&self) -> Option<RemoteErrorKind> {
        if self.is_invalid_input() {
            Some(RemoteErrorKind::InvalidInput)
        } else if self.is_timeout() {
            Some(RemoteErrorKind::Timeout)
        } else if self.is_payload_too_large() {
            Some(RemoteErrorKind::PayloadTooLarge)
        } else if self.is_permission_denied() {
            Some(RemoteErrorKind::PermissionDenied)
        } else if self.is_not_found() {
            Some(RemoteErrorKind::NotFound)
        } else {
            None
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error (HTTP {}): {}", self.status, self.body)?;
        if let Some(detail) = &self.detail {
            write!(f, " - {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for RemoteError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(status: u16, detail: &str) -> RemoteError {
        RemoteError::new(status, "", Some(detail.to_string()))
    }

    fn flags(e: &RemoteError) -> [bool; 5] {
        [
            e.is_invalid_input(),
            e.is_timeout(),
            e.is_payload_too_large(),
            e.is_permission_denied(),
            e.is_not_found(),
        ]
    }

    #[test]
    fn test_permission_denied_only() {
        let err = remote(403, "Permission denied accessing gs://b/f");
        assert_eq!(flags(&err), [false, false, false, true, false]);
        assert_eq!(err.kind(), Some(RemoteErrorKind::PermissionDenied));
    }

    #[test]
    fn test_not_found_only() {
        let err = remote(404, "Blob does not exist");
        assert_eq!(flags(&err), [false, false, false, false, true]);
        assert_eq!(err.kind(), Some(RemoteErrorKind::NotFound));
    }

    #[test]
    fn test_invalid_input_details() {
        for detail in [
            "PDF file has syntax errors",
            "PDF file appears to be corrupted",
            "PDF file is incomplete or truncated",
            "Invalid PDF format",
            "file does not appear to be a valid PDF",
        ] {
            assert!(remote(400, detail).is_invalid_input(), "{detail}");
        }
        assert!(!remote(400, "missing field").is_invalid_input());
        assert!(!remote(422, "PDF file appears to be corrupted").is_invalid_input());
    }

    #[test]
    fn test_status_and_detail_are_both_required() {
        assert!(remote(408, "Extraction TIMED OUT after 60s").is_timeout());
        assert!(!remote(500, "Extraction timed out").is_timeout());
        assert!(remote(413, "file too large: 80MB").is_payload_too_large());
        assert!(!RemoteError::new(413, "too big", None).is_payload_too_large());
    }

    #[test]
    fn test_uncategorized() {
        let err = remote(500, "Internal server error");
        assert_eq!(flags(&err), [false; 5]);
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_from_response_parses_detail() {
        let err = RemoteError::from_response(404, r#"{"detail":"File not found"}"#);
        assert_eq!(err.detail.as_deref(), Some("File not found"));
        assert_eq!(err.body, r#"{"detail":"File not found"}"#);

        let err = RemoteError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.detail, None);

        // FastAPI validation errors carry a list, not a string.
        let err = RemoteError::from_response(422, r#"{"detail":[{"msg":"field required"}]}"#);
        assert_eq!(err.detail, None);
    }

    #[test]
    fn test_display() {
        let err = RemoteError::new(403, "{}", Some("Permission denied".to_string()));
        assert_eq!(err.to_string(), "API error (HTTP 403): {} - Permission denied");
        let err = RemoteError::new(500, "boom", None);
        assert_eq!(err.to_string(), "API error (HTTP 500): boom");
    }

    #[test]
    fn test_client_error_predicates() {
        let err = ClientError::from(remote(404, "Blob does not exist"));
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));

        let err = ClientError::configuration("bad url");
        assert!(!err.is_not_found());
        assert!(!err.is_timeout());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(RemoteErrorKind::InvalidInput.as_str(), "INVALID_INPUT");
        assert_eq!(RemoteErrorKind::NotFound.to_string(), "NOT_FOUND");
    }
}
