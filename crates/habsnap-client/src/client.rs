//! openHAB REST API client.

use crate::config::OpenHabConnectionConfig;
use habsnap_core::config::defaults;
use habsnap_core::{EnrichedRoot, Error as CoreError, RestRoot};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde_json::Value as JsonValue;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to openHAB.
#[derive(Debug, Error)]
pub enum OpenHabClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("No '{0}' link found in /rest/ root")]
    MissingLink(String),

    #[error("Invalid response from openHAB: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl From<CoreError> for OpenHabClientError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::MissingLink(t) => Self::MissingLink(t),
            CoreError::Config(s) => Self::Config(s),
            other => Self::InvalidResponse(other.to_string()),
        }
    }
}

/// Result type for openHAB client operations.
pub type OpenHabResult<T> = Result<T, OpenHabClientError>;

/// Body of a generic GET.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedBody {
    Json(JsonValue),
    Text(String),
}

impl FetchedBody {
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }
}

/// openHAB REST API client.
pub struct OpenHabClient {
    config: OpenHabConnectionConfig,
    http_client: reqwest::Client,
    base: Url,
}

impl OpenHabClient {
    /// Create a new client.
    pub fn new(config: OpenHabConnectionConfig) -> OpenHabResult<Self> {
        let base = Url::parse(&config.rest_root_url())
            .map_err(|e| OpenHabClientError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let builder = reqwest::Client::builder();
        let http_client = if !config.verify_ssl {
            builder
                .danger_accept_invalid_certs(true)
                .build()
                .map_err(|e| OpenHabClientError::ConnectionError(e.to_string()))?
        } else {
            builder
                .build()
                .map_err(|e| OpenHabClientError::ConnectionError(e.to_string()))?
        };

        Ok(Self {
            config,
            http_client,
            base,
        })
    }

    /// Get the connection config.
    pub fn config(&self) -> &OpenHabConnectionConfig {
        &self.config
    }

    /// Resolve a link from the root payload; relative links are taken
    /// relative to `{base}/rest/`.
    pub fn resolve_url(&self, link: &str) -> OpenHabResult<Url> {
        self.base
            .join(link)
            .map_err(|e| OpenHabClientError::InvalidUrl(format!("{}: {}", link, e)))
    }

    /// GET with the standard headers.
    fn get(&self, url: Url, timeout_secs: u64) -> reqwest::RequestBuilder {
        let request = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(Duration::from_secs(timeout_secs));
        match self.config.auth.auth_header() {
            Some(header) => request.header(AUTHORIZATION, header),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> OpenHabResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(OpenHabClientError::AuthenticationFailed);
        }
        Err(OpenHabClientError::HttpStatus {
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }

    /// Fetch `/rest/` and add the endpoint map.
    pub async fn fetch_rest_root(&self) -> OpenHabResult<EnrichedRoot> {
        let request = self.get(self.base.clone(), self.config.root_timeout_secs);
        let root: RestRoot = self.send(request).await?.json().await?;
        tracing::debug!(links = root.links.len(), "Fetched REST root");
        Ok(root.enrich())
    }

    /// Fetch the raw item list through the root's `items` link.
    pub async fn fetch_items(&self, root: &EnrichedRoot) -> OpenHabResult<Vec<JsonValue>> {
        let link = root.require_link(defaults::ITEMS_LINK)?;
        let url = self.resolve_url(link)?;

        let mut request = self.get(url, self.config.items_timeout_secs);
        if self.config.recursive {
            request = request.query(&[("recursive", "true")]);
        }

        let body: JsonValue = self.send(request).await?.json().await?;
        match body {
            JsonValue::Array(items) => {
                tracing::debug!(count = items.len(), "Fetched items");
                Ok(items)
            }
            other => Err(OpenHabClientError::InvalidResponse(format!(
                "expected an item array, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Generic GET; JSON bodies are parsed, anything else is returned as text.
    pub async fn fetch_json(&self, link: &str) -> OpenHabResult<FetchedBody> {
        let url = self.resolve_url(link)?;
        let response = self
            .send(self.get(url, self.config.fetch_timeout_secs))
            .await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            Ok(FetchedBody::Json(response.json().await?))
        } else {
            Ok(FetchedBody::Text(response.text().await?))
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
