use std::io::BufRead;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DashError, DashResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Transport-level request.
///
/// Path segments and query pairs are kept raw; `ClientConfig::endpoint`
/// percent-encodes them when joining onto the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    fn new(method: Method, route: &str, body: Option<Value>) -> Self {
        Self {
            method,
            segments: route
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
            query: Vec::new(),
            body,
            bearer: None,
        }
    }

    /// `route` is a literal path such as `/summary/overview`.
    #[must_use]
    pub fn get(route: &str) -> Self {
        Self::new(Method::Get, route, None)
    }

    #[must_use]
    pub fn post(route: &str, body: Value) -> Self {
        Self::new(Method::Post, route, Some(body))
    }

    #[must_use]
    pub fn delete(route: &str, body: Value) -> Self {
        Self::new(Method::Delete, route, Some(body))
    }

    /// Appends one path segment, encoded as a single segment even if it
    /// contains `/`.
    #[must_use]
    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn with_bearer(mut self, token: Option<&str>) -> Self {
        self.bearer = token.map(str::to_owned);
        self
    }

    /// Unencoded `/a/b` form for log lines.
    #[must_use]
    pub fn route(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Raw response. Non-2xx statuses are data here, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: default_status_text(status).to_owned(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Maps non-2xx responses to `DashError::Http`, preferring the body's
    /// `error` field over the status text.
    pub fn error_for_status(self) -> DashResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| self.status_text.clone());
        Err(DashError::Http {
            status: self.status,
            message,
        })
    }

    pub fn json<T: DeserializeOwned>(&self) -> DashResult<T> {
        if self.body.trim().is_empty() {
            return serde_json::from_str("null").map_err(DashError::from);
        }
        serde_json::from_str(&self.body).map_err(DashError::from)
    }
}

/// Seam between the typed client and the network.
///
/// `send` only fails for transport problems; HTTP statuses come back as
/// responses so the client can run its 401 handling.
pub trait HttpTransport {
    fn send(&self, request: &ApiRequest) -> DashResult<ApiResponse>;

    /// Opens a long-lived streaming response (Server-Sent Events).
    fn open_stream(&self, request: &ApiRequest) -> DashResult<Box<dyn BufRead + Send>>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn send(&self, request: &ApiRequest) -> DashResult<ApiResponse> {
        (**self).send(request)
    }

    fn open_stream(&self, request: &ApiRequest) -> DashResult<Box<dyn BufRead + Send>> {
        (**self).open_stream(request)
    }
}

fn default_status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Request failed",
    }
}

#[cfg(feature = "http-client")]
pub use reqwest_transport::ReqwestTransport;

#[cfg(feature = "http-client")]
mod reqwest_transport {
    use std::io::{BufRead, BufReader};
    use std::time::Duration;

    use tracing::{debug, warn};
    use url::Url;

    use super::{ApiRequest, ApiResponse, HttpTransport, Method};
    use crate::api::config::ClientConfig;
    use crate::error::{DashError, DashResult};

    /// Blocking reqwest transport.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        config: ClientConfig,
        http: reqwest::blocking::Client,
        streaming: reqwest::blocking::Client,
    }

    impl ReqwestTransport {
        pub fn new(config: ClientConfig) -> DashResult<Self> {
            let config = config.validate()?;
            let http = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .user_agent(config.user_agent.clone())
                .build()
                .map_err(|e| DashError::Config(format!("reqwest client error: {e}")))?;
            let streaming = reqwest::blocking::Client::builder()
                .timeout(None)
                .user_agent(config.user_agent.clone())
                .build()
                .map_err(|e| DashError::Config(format!("reqwest stream client error: {e}")))?;
            Ok(Self {
                config,
                http,
                streaming,
            })
        }

        fn build(
            &self,
            client: &reqwest::blocking::Client,
            request: &ApiRequest,
            url: Url,
        ) -> reqwest::blocking::RequestBuilder {
            let mut builder = match request.method {
                Method::Get => client.get(url),
                Method::Post => client.post(url),
                Method::Delete => client.delete(url),
            };
            if let Some(token) = request.bearer.as_deref() {
                builder = builder.bearer_auth(token);
            }
            if let Some(body) = request.body.as_ref() {
                builder = builder.json(body);
            }
            builder
        }
    }

    impl HttpTransport for ReqwestTransport {
        fn send(&self, request: &ApiRequest) -> DashResult<ApiResponse> {
            let url = self.config.endpoint(request)?;
            let response = self
                .build(&self.http, request, url.clone())
                .send()
                .map_err(|e| DashError::Transport(e.to_string()))?;
            let status = response.status();
            let status_text = status.canonical_reason().unwrap_or("Request failed").to_owned();
            let body = response
                .text()
                .map_err(|e| DashError::Transport(format!("failed to read body: {e}")))?;
            debug!(
                method = request.method.as_str(),
                url = %url,
                status = status.as_u16(),
                "backend request finished"
            );
            Ok(ApiResponse {
                status: status.as_u16(),
                status_text,
                body,
            })
        }

        fn open_stream(&self, request: &ApiRequest) -> DashResult<Box<dyn BufRead + Send>> {
            let url = self.config.endpoint(request)?;
            let response = self
                .build(&self.streaming, request, url.clone())
                .header(reqwest::header::ACCEPT, "text/event-stream")
                .send()
                .map_err(|e| DashError::Transport(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                warn!(url = %url, status = status.as_u16(), "stream rejected");
                return Err(DashError::Http {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("Request failed").to_owned(),
                });
            }
            Ok(Box::new(BufReader::new(response)))
        }
    }
}
