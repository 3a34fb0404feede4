//! Extraction client implementation.

use std::path::Path;

use pdftext_core::config::ClientConfig;
use pdftext_core::error::{ClientError, ClientResult, RemoteError};
use pdftext_core::types::{
    ExtractionResult, HealthStatus, RemoteExtractionRequest, RemoteExtractionResult,
    RequestOptions,
};
use pdftext_core::ClientOption;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

const API_KEY_HEADER: &str = "x-api-key";
const FILE_FIELD: &str = "file";
const FILE_CONTENT_TYPE: &str = "application/pdf";
const FALLBACK_FILE_NAME: &str = "document.pdf";

/// Client for the PDF-to-text extraction service.
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    client: Client,
    config: ClientConfig,
    headers: HeaderMap,
}

impl ExtractionClient {
    /// Create a client with default settings.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::from_config(ClientConfig::new(base_url)?)
    }

    /// Create a client, applying `options` in order.
    pub fn with_options(
        base_url: &str,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> ClientResult<Self> {
        Self::from_config(ClientConfig::with_options(base_url, options)?)
    }

    /// Create a client from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a client from a prepared configuration.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let headers = Self::headers(&config)?;

        let client = match config.http_client() {
            Some(client) => client.clone(),
            None => Client::builder().build().map_err(|e| {
                ClientError::configuration(format!("Failed to create HTTP client: {}", e))
            })?,
        };

        Ok(Self {
            client,
            config,
            headers,
        })
    }

    fn headers(config: &ClientConfig) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        if !config.user_agent().is_empty() {
            headers.insert(
                USER_AGENT,
                HeaderValue::from_str(config.user_agent())
                    .map_err(|_| ClientError::configuration("Invalid user agent format"))?,
            );
        }
        if let Some(api_key) = config.api_key() {
            let mut value = HeaderValue::from_str(api_key)
                .map_err(|_| ClientError::configuration("Invalid API key format"))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }
        Ok(headers)
    }

    /// Normalized base URL.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url(), path)
    }

    fn log_request(&self, method: &str, url: &str, payload: Option<&str>) {
        if self.config.debug() {
            info!(method, url, payload, "Making request");
        } else {
            debug!(method, url, payload, "Making request");
        }
    }

    /// Check that the service is up.
    pub async fn health_check(&self, options: Option<RequestOptions>) -> ClientResult<HealthStatus> {
        let url = self.endpoint("health");
        self.log_request("GET", &url, None);

        self.execute(self.client.get(&url), options, "health check")
            .await
    }

    /// Upload a local file for extraction.
    ///
    /// The file name sent to the service is the last component of `path`.
    pub async fn extract_file(
        &self,
        path: impl AsRef<Path>,
        options: Option<RequestOptions>,
    ) -> ClientResult<ExtractionResult> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ClientError::io(path, e))?;
        // The file is consumed here, so it is closed before the upload starts.
        let content = read_to_end(file)
            .await
            .map_err(|e| ClientError::io(path, e))?;

        self.upload(content, file_name, options).await
    }

    /// Upload an in-memory document for extraction.
    pub async fn extract_bytes(
        &self,
        content: impl Into<Vec<u8>>,
        file_name: impl Into<String>,
        options: Option<RequestOptions>,
    ) -> ClientResult<ExtractionResult> {
        self.upload(content.into(), file_name.into(), options).await
    }

    /// Read `reader` to the end and upload the content for extraction.
    pub async fn extract_reader<R>(
        &self,
        reader: R,
        file_name: impl Into<String>,
        options: Option<RequestOptions>,
    ) -> ClientResult<ExtractionResult>
    where
        R: AsyncRead + Unpin + Send,
    {
        let content = read_to_end(reader).await.map_err(|source| ClientError::Io {
            path: None,
            source,
        })?;
        self.upload(content, file_name.into(), options).await
    }

    async fn upload(
        &self,
        content: Vec<u8>,
        file_name: String,
        options: Option<RequestOptions>,
    ) -> ClientResult<ExtractionResult> {
        let url = self.endpoint("extract");
        self.log_request("POST", &url, Some(&file_name));

        let form = Form::new().part(FILE_FIELD, file_part(content, file_name, FILE_CONTENT_TYPE)?);

        self.execute(self.client.post(&url).multipart(form), options, "extraction")
            .await
    }

    /// Ask the service to extract a document held in object storage.
    pub async fn extract_from_gcs(
        &self,
        request: &RemoteExtractionRequest,
        options: Option<RequestOptions>,
    ) -> ClientResult<RemoteExtractionResult> {
        if request.input_gcs_url.trim().is_empty() {
            return Err(ClientError::configuration("input_gcs_url must not be empty"));
        }

        let url = self.endpoint("extract-from-gcs");
        self.log_request("POST", &url, Some(&request.input_gcs_url));

        self.execute(self.client.post(&url).json(request), options, "GCS extraction")
            .await
    }

    /// Send one request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        options: Option<RequestOptions>,
        operation: &str,
    ) -> ClientResult<T> {
        let options = options.unwrap_or_default();
        let request = request
            .headers(self.headers.clone())
            .timeout(options.timeout.unwrap_or(self.config.timeout()));

        let round_trip = async {
            let response = request.send().await.map_err(|e| {
                ClientError::transport(format!("{} request failed: {}", operation, e), e)
            })?;

            let status = response.status();
            let body = response.text().await.map_err(|e| {
                ClientError::transport(format!("Failed to read {} response: {}", operation, e), e)
            })?;

            if !status.is_success() {
                let error = RemoteError::from_response(status.as_u16(), body);
                warn!(
                    status = error.status,
                    detail = error.detail.as_deref(),
                    "{} failed",
                    operation
                );
                return Err(error.into());
            }

            serde_json::from_str(&body).map_err(|e| {
                ClientError::decode_json(format!("Failed to parse {} response: {}", operation, e), e)
            })
        };

        match options.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ClientError::Cancelled),
                    result = round_trip => result,
                }
            }
            None => round_trip.await,
        }
    }
}

// Built before any request is sent, so a failure here is a local one.
fn file_part(content: Vec<u8>, file_name: String, content_type: &str) -> ClientResult<Part> {
    Part::bytes(content)
        .file_name(file_name)
        .mime_str(content_type)
        .map_err(|e| {
            ClientError::configuration(format!(
                "Invalid upload content type '{}': {}",
                content_type, e
            ))
        })
}

async fn read_to_end<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content).await?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_endpoint() {
        let client = ExtractionClient::new("localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint("health"), "http://localhost:8000/health");
        assert_eq!(
            client.endpoint("extract-from-gcs"),
            "http://localhost:8000/extract-from-gcs"
        );
    }

    #[test]
    fn test_headers_default() {
        let client = ExtractionClient::new("localhost:8000").unwrap();
        assert_eq!(
            client.headers.get(USER_AGENT).unwrap(),
            pdftext_core::DEFAULT_USER_AGENT
        );
        assert!(client.headers.get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn test_headers_configured() {
        let client = ExtractionClient::with_options(
            "localhost:8000",
            [
                ClientOption::ApiKey("secret".to_string()),
                ClientOption::UserAgent(String::new()),
            ],
        )
        .unwrap();
        let key = client.headers.get(API_KEY_HEADER).unwrap();
        assert_eq!(key, "secret");
        assert!(key.is_sensitive());
        assert!(client.headers.get(USER_AGENT).is_none());
    }

    #[test]
    fn test_invalid_header_values() {
        let err = ExtractionClient::with_options(
            "localhost:8000",
            [ClientOption::ApiKey("bad\nkey".to_string())],
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));

        let err = ExtractionClient::with_options(
            "localhost:8000",
            [ClientOption::UserAgent("agent\r\n".to_string())],
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ExtractionClient::new(":%invalid:").unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_custom_http_client() {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let client =
            ExtractionClient::from_config(ClientConfig::new("localhost").unwrap().with_http_client(http))
                .unwrap();
        assert!(client.config().http_client().is_some());
    }

    #[tokio::test]
    async fn test_empty_gcs_url_is_rejected() {
        let client = ExtractionClient::new("localhost:1").unwrap();
        let err = client
            .extract_from_gcs(&RemoteExtractionRequest::new(""), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_file_part_content_type() {
        assert!(file_part(b"%PDF".to_vec(), "a.pdf".to_string(), FILE_CONTENT_TYPE).is_ok());

        let err = file_part(b"%PDF".to_vec(), "a.pdf".to_string(), "not a mime type").unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)), "{err:?}");
        assert!(err.to_string().contains("not a mime type"));
    }

    #[tokio::test]
    async fn test_read_to_end() {
        let content = read_to_end(&b"%PDF-1.7"[..]).await.unwrap();
        assert_eq!(content, b"%PDF-1.7");
    }
}
