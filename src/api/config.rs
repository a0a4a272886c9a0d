use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DashError, DashResult};

use super::transport::ApiRequest;

pub const BASE_URL_ENV: &str = "BANDWATCH_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "BANDWATCH_REQUEST_TIMEOUT_SECS";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Backend client configuration.
///
/// Serializable so hosts can persist it next to their own settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_alerts_path")]
    pub alerts_stream_path: String,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            alerts_stream_path: default_alerts_path(),
        }
    }

    /// Reads the base URL and timeout from the environment.
    pub fn from_env() -> DashResult<Self> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let mut config = Self::new(base_url);
        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            config.request_timeout_secs = raw.trim().parse().map_err(|_| {
                DashError::Config(format!("{TIMEOUT_ENV} must be a whole number, got `{raw}`"))
            })?;
        }
        config.validate()
    }

    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn validate(self) -> DashResult<Self> {
        let base = self.parsed_base()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(DashError::Config(format!(
                "base url `{}` must use http or https",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(DashError::Config(
                "request timeout must be > 0 seconds".to_owned(),
            ));
        }
        if !self.alerts_stream_path.starts_with('/') {
            return Err(DashError::Config(
                "alerts stream path must start with `/`".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Resolves a request against the base URL. Segments and query values
    /// are percent-encoded; a path prefix on the base is preserved.
    pub fn endpoint(&self, request: &ApiRequest) -> DashResult<Url> {
        let mut url = self.parsed_base()?;
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| {
                DashError::Config(format!("base url `{}` cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(&request.segments);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    fn parsed_base(&self) -> DashResult<Url> {
        Url::parse(self.base_url.trim())
            .map_err(|e| DashError::Config(format!("invalid base url `{}`: {e}", self.base_url)))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("bandwatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_alerts_path() -> String {
    "/alerts/stream".to_owned()
}
