//! Client configuration.
//!
//! A [`ClientConfig`] is built once from a base URL and a list of
//! [`ClientOption`]s applied in order, so a later option overrides an
//! earlier one. The `with_*` builder methods are shorthands for the same
//! options.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("pdftext-client/", env!("CARGO_PKG_VERSION"));

/// Environment variable names read by [`ClientConfig::from_env`].
pub mod env {
    pub const BASE_URL: &str = "PDFTEXT_BASE_URL";
    pub const API_KEY: &str = "PDFTEXT_API_KEY";
    pub const TIMEOUT_SECS: &str = "PDFTEXT_TIMEOUT_SECS";
    pub const USER_AGENT: &str = "PDFTEXT_USER_AGENT";
    pub const DEBUG: &str = "PDFTEXT_DEBUG";
}

/// A single configuration change, applied at construction time.
#[derive(Debug, Clone)]
pub enum ClientOption {
    /// Default timeout for every request.
    Timeout(Duration),
    /// Sent as `X-API-Key`. An empty key disables the header.
    ApiKey(String),
    /// Sent as `User-Agent`. An empty value disables the header.
    UserAgent(String),
    /// Log outgoing requests at `info` instead of `debug`.
    Debug(bool),
    /// Use a caller-provided transport.
    HttpClient(reqwest::Client),
}

/// Connection configuration for the extraction service.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    api_key: Option<String>,
    user_agent: String,
    debug: bool,
    http_client: Option<reqwest::Client>,
}

impl ClientConfig {
    /// Create a configuration with defaults for the given base URL.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debug: false,
            http_client: None,
        })
    }

    /// Create a configuration and apply `options` in order.
    pub fn with_options(
        base_url: &str,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> ClientResult<Self> {
        let config = Self::new(base_url)?;
        Ok(options.into_iter().fold(config, Self::apply))
    }

    /// Create a configuration from `PDFTEXT_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let base_url = lookup(env::BASE_URL)
            .ok_or_else(|| ClientError::configuration(format!("{} not set", env::BASE_URL)))?;

        let mut options = Vec::new();
        if let Some(api_key) = lookup(env::API_KEY) {
            options.push(ClientOption::ApiKey(api_key));
        }
        if let Some(secs) = lookup(env::TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::configuration(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    env::TIMEOUT_SECS,
                    secs
                ))
            })?;
            options.push(ClientOption::Timeout(Duration::from_secs(secs)));
        }
        if let Some(user_agent) = lookup(env::USER_AGENT) {
            options.push(ClientOption::UserAgent(user_agent));
        }
        if let Some(debug) = lookup(env::DEBUG) {
            options.push(ClientOption::Debug(parse_flag(&debug)));
        }

        Self::with_options(&base_url, options)
    }

    /// Apply one option.
    pub fn apply(mut self, option: ClientOption) -> Self {
        match option {
            ClientOption::Timeout(timeout) => self.timeout = timeout,
            ClientOption::ApiKey(key) => self.api_key = Some(key).filter(|k| !k.is_empty()),
            ClientOption::UserAgent(user_agent) => self.user_agent = user_agent,
            ClientOption::Debug(debug) => self.debug = debug,
            ClientOption::HttpClient(client) => self.http_client = Some(client),
        }
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.apply(ClientOption::Timeout(timeout))
    }

    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        self.apply(ClientOption::ApiKey(api_key.into()))
    }

    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        self.apply(ClientOption::UserAgent(user_agent.into()))
    }

    pub fn with_debug(self, debug: bool) -> Self {
        self.apply(ClientOption::Debug(debug))
    }

    pub fn with_http_client(self, client: reqwest::Client) -> Self {
        self.apply(ClientOption::HttpClient(client))
    }

    /// Normalized base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Caller-provided transport, if any.
    pub fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("user_agent", &self.user_agent)
            .field("debug", &self.debug)
            .field("http_client", &self.http_client.is_some())
            .finish()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Normalize a base URL: default the scheme to `http://` and strip a single
/// trailing slash.
pub fn normalize_base_url(base_url: &str) -> ClientResult<String> {
    let with_scheme = if base_url.contains("://") {
        base_url.to_string()
    } else {
        format!("http://{}", base_url)
    };

    check_percent_escapes(&with_scheme)?;

    let parsed = Url::parse(&with_scheme)
        .map_err(|e| ClientError::configuration(format!("invalid base URL '{}': {}", base_url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::configuration(format!(
            "invalid base URL '{}': unsupported scheme '{}'",
            base_url,
            parsed.scheme()
        )));
    }

    Ok(with_scheme
        .strip_suffix('/')
        .unwrap_or(&with_scheme)
        .to_string())
}

// `url` accepts stray `%` signs; reject them so malformed escapes fail early.
fn check_percent_escapes(url: &str) -> ClientResult<()> {
    let bytes = url.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'%' {
            continue;
        }
        let valid = bytes
            .get(i + 1..i + 3)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(ClientError::configuration(format!(
                "invalid base URL '{}': invalid percent escape at byte {}",
                url, i
            )));
        }
    }
    Ok(())
}
