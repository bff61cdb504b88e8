//! Client configuration.

/// Base URL used when `POLICYDESK_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Static configuration for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    /// Build a config against an explicit base URL.
    ///
    /// Trailing slashes are stripped so request paths can always be joined
    /// with a plain `format!("{base}{path}")`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Read the base URL from `POLICYDESK_API_URL`, falling back to the
    /// development default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("POLICYDESK_API_URL").unwrap_or_else(|_| {
            tracing::warn!("POLICYDESK_API_URL not set; using {DEFAULT_BASE_URL}");
            DEFAULT_BASE_URL.to_string()
        });

        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
