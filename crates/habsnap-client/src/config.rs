//! openHAB connection configuration.

use habsnap_core::config::{defaults, env_non_empty, env_vars, normalize_base_url};
use habsnap_core::Error as CoreError;
use serde::{Deserialize, Serialize};

/// openHAB authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenHabAuth {
    /// Anonymous access
    #[default]
    #[serde(rename = "none")]
    None,
    /// API token, sent as a bearer token
    #[serde(rename = "bearer_token")]
    BearerToken { token: String },
}

impl OpenHabAuth {
    /// Bearer auth for a non-empty token, anonymous otherwise.
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => Self::BearerToken { token },
            _ => Self::None,
        }
    }

    /// Value of the `Authorization` header, if any.
    pub fn auth_header(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::BearerToken { token } => Some(format!("Bearer {}", token)),
        }
    }
}

/// Connection settings for one openHAB instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenHabConnectionConfig {
    /// Base URL (e.g., http://openhab:8080)
    pub base_url: String,

    #[serde(default)]
    pub auth: OpenHabAuth,

    /// Whether to verify TLS certificates
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Ask the items endpoint to inline group members
    #[serde(default)]
    pub recursive: bool,

    #[serde(default = "default_root_timeout")]
    pub root_timeout_secs: u64,

    #[serde(default = "default_items_timeout")]
    pub items_timeout_secs: u64,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_verify_ssl() -> bool {
    true
}
fn default_root_timeout() -> u64 {
    defaults::ROOT_TIMEOUT_SECS
}
fn default_items_timeout() -> u64 {
    defaults::ITEMS_TIMEOUT_SECS
}
fn default_fetch_timeout() -> u64 {
    defaults::FETCH_TIMEOUT_SECS
}

impl OpenHabConnectionConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            auth: OpenHabAuth::None,
            verify_ssl: true,
            recursive: false,
            root_timeout_secs: defaults::ROOT_TIMEOUT_SECS,
            items_timeout_secs: defaults::ITEMS_TIMEOUT_SECS,
            fetch_timeout_secs: defaults::FETCH_TIMEOUT_SECS,
        }
    }

    pub fn with_bearer_token(base_url: impl AsRef<str>, token: String) -> Self {
        Self::new(base_url).with_auth(OpenHabAuth::from_token(Some(token)))
    }

    pub fn with_auth(mut self, auth: OpenHabAuth) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Build from explicit values, falling back to `OPENHAB_BASE_URL` and
    /// `OPENHAB_API_TOKEN`. Fails when no base URL is available.
    pub fn resolve(base_url: Option<String>, token: Option<String>) -> Result<Self, CoreError> {
        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .or_else(|| env_non_empty(env_vars::BASE_URL))
            .ok_or_else(|| CoreError::Config(format!("{} is not set", env_vars::BASE_URL)))?;
        let token = token.or_else(|| env_non_empty(env_vars::API_TOKEN));

        Ok(Self::new(base_url).with_auth(OpenHabAuth::from_token(token)))
    }

    /// Configuration from the environment only.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::resolve(None, None)
    }

    /// URL of the REST root.
    pub fn rest_root_url(&self) -> String {
        format!("{}/rest/", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_root_url() {
        let config = OpenHabConnectionConfig::new("http://openhab:8080/");
        assert_eq!(config.rest_root_url(), "http://openhab:8080/rest/");

        let config = OpenHabConnectionConfig::new("https://home.example.com/oh");
        assert_eq!(config.rest_root_url(), "https://home.example.com/oh/rest/");
    }

    #[test]
    fn test_auth_header() {
        assert_eq!(OpenHabAuth::None.auth_header(), None);
        assert_eq!(OpenHabAuth::from_token(Some(String::new())), OpenHabAuth::None);
        assert_eq!(
            OpenHabAuth::from_token(Some("oh.token".to_string())).auth_header(),
            Some("Bearer oh.token".to_string())
        );
    }

    #[test]
    fn test_resolve_prefers_explicit_values() {
        let config = OpenHabConnectionConfig::resolve(
            Some("http://explicit:8080".to_string()),
            Some("tok".to_string()),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://explicit:8080");
        assert_eq!(config.auth.auth_header().as_deref(), Some("Bearer tok"));
        assert_eq!(config.root_timeout_secs, 10);
        assert_eq!(config.items_timeout_secs, 30);
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: OpenHabConnectionConfig =
            serde_json::from_str(r#"{"base_url": "http://oh:8080"}"#).unwrap();
        assert!(config.verify_ssl);
        assert!(!config.recursive);
        assert_eq!(config.auth, OpenHabAuth::None);
        assert_eq!(config.fetch_timeout_secs, 20);
    }
}
