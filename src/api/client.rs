use std::io::BufRead;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::core::TickerSummary;
use crate::error::{DashError, DashResult};

use super::auth::{AuthSession, LoginRequest, RegisterRequest, UserId, refresh_body};
use super::config::ClientConfig;
use super::sse::AlertStream;
use super::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Financial statement families served under `/financials/{kind}/{symbol}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    CashFlow,
    BalanceSheet,
    IncomeStatement,
}

impl StatementKind {
    #[must_use]
    pub fn as_path(self) -> &'static str {
        match self {
            Self::CashFlow => "cash_flow",
            Self::BalanceSheet => "balance_sheet",
            Self::IncomeStatement => "income_statement",
        }
    }
}

/// Logo lookup result for one ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerLogo {
    pub symbol: String,
    pub url: Option<String>,
}

/// Typed client for the dashboard backend.
///
/// Holds the auth session and attaches the bearer token to every call. A 401
/// triggers exactly one refresh-and-retry; a second failure logs out.
#[derive(Debug)]
pub struct ApiClient<T> {
    transport: T,
    config: ClientConfig,
    session: Option<AuthSession>,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> DashResult<Self> {
        Ok(Self {
            transport,
            config: config.validate()?,
            session: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn restore_session(&mut self, session: AuthSession) {
        self.session = Some(session);
    }

    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            debug!("auth session cleared");
        }
    }

    pub fn login(&mut self, request: &LoginRequest) -> DashResult<AuthSession> {
        self.authenticate("/login", request.to_json())
    }

    pub fn register(&mut self, request: &RegisterRequest) -> DashResult<AuthSession> {
        self.authenticate("/register", request.to_json())
    }

    /// Exchanges the refresh token for a new session.
    pub fn refresh(&mut self) -> DashResult<AuthSession> {
        let refresh_token = self
            .session
            .as_ref()
            .map(|session| session.refresh_token.clone())
            .ok_or(DashError::Unauthorized)?;
        self.authenticate("/refresh_token", refresh_body(&refresh_token))
    }

    fn authenticate(&mut self, path: &str, body: Value) -> DashResult<AuthSession> {
        let response = self
            .transport
            .send(&ApiRequest::post(path, body))?
            .error_for_status()?;
        let session: AuthSession = response.json()?;
        debug!(path, user = %session.user.id, "authenticated");
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Sends a request with the current bearer token and the one-shot 401
    /// refresh-and-retry cycle.
    pub fn execute(&mut self, request: ApiRequest) -> DashResult<ApiResponse> {
        let response = self.send_authorized(request.clone())?;
        if response.status != 401 || self.session.is_none() {
            return response.error_for_status();
        }

        debug!(route = %request.route(), "401 received, refreshing session");
        if let Err(err) = self.refresh() {
            warn!(error = %err, "token refresh failed, logging out");
            self.logout();
            return Err(DashError::Unauthorized);
        }
        let retry = self.send_authorized(request)?;
        if retry.status == 401 {
            warn!("request still unauthorized after refresh, logging out");
            self.logout();
            return Err(DashError::Unauthorized);
        }
        retry.error_for_status()
    }

    fn send_authorized(&self, request: ApiRequest) -> DashResult<ApiResponse> {
        let token = self.session.as_ref().map(|session| session.token.as_str());
        self.transport.send(&request.with_bearer(token))
    }

    fn get_json<R: serde::de::DeserializeOwned>(&mut self, request: ApiRequest) -> DashResult<R> {
        self.execute(request)?.json()
    }

    fn by_symbol<R: serde::de::DeserializeOwned>(
        &mut self,
        route: &str,
        symbol: &str,
    ) -> DashResult<R> {
        self.get_json(ApiRequest::get(route).query("symbol", symbol))
    }

    pub fn summary(&mut self, symbol: &str) -> DashResult<TickerSummary> {
        let mut summary: TickerSummary = self.by_symbol("/summary", symbol)?;
        if summary.symbol.is_empty() {
            summary.symbol = symbol.to_owned();
        }
        Ok(summary)
    }

    pub fn summary_overview(&mut self, symbol: &str) -> DashResult<Value> {
        self.by_symbol("/summary/overview", symbol)
    }

    pub fn peers(&mut self, symbol: &str) -> DashResult<Value> {
        self.by_symbol("/summary/peers", symbol)
    }

    pub fn fundamentals(&mut self, symbol: &str) -> DashResult<Value> {
        self.by_symbol("/summary/fundamentals", symbol)
    }

    pub fn peer_averages(&mut self, symbol: &str) -> DashResult<Value> {
        self.by_symbol("/summary/peer-averages", symbol)
    }

    pub fn financials(&mut self, kind: StatementKind, symbol: &str) -> DashResult<Value> {
        self.get_json(
            ApiRequest::get("/financials")
                .segment(kind.as_path())
                .segment(symbol),
        )
    }

    pub fn world_markets(&mut self, refresh: bool) -> DashResult<Value> {
        let request = ApiRequest::get("/world-markets");
        if refresh {
            self.get_json(request.query("refresh", "1"))
        } else {
            self.get_json(request)
        }
    }

    /// Watchlist symbols, for one user or the shared default list.
    pub fn tickers(&mut self, user_id: Option<&UserId>) -> DashResult<Vec<String>> {
        let mut request = ApiRequest::get("/tickers");
        if let Some(id) = user_id {
            request = request.query("user_id", id.to_string());
        }
        let body: Value = self.get_json(request)?;
        parse_ticker_list(&body)
    }

    pub fn add_ticker(&mut self, user_id: &UserId, ticker: &str) -> DashResult<()> {
        self.execute(ApiRequest::post(
            "/tickers",
            json!({ "user_id": user_id, "ticker": ticker }),
        ))?;
        Ok(())
    }

    pub fn remove_ticker(&mut self, user_id: &UserId, ticker: &str) -> DashResult<()> {
        self.execute(ApiRequest::delete(
            "/tickers",
            json!({ "user_id": user_id, "ticker": ticker }),
        ))?;
        Ok(())
    }

    pub fn ticker_logo(&mut self, symbol: &str) -> DashResult<TickerLogo> {
        let body: Value =
            self.get_json(ApiRequest::get("/tickers").segment(symbol).segment("logo"))?;
        let url = ["logo_url", "logo", "url"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .filter(|url| !url.is_empty())
            .map(str::to_owned);
        Ok(TickerLogo {
            symbol: symbol.to_owned(),
            url,
        })
    }

    pub fn option_price_ratio(&mut self) -> DashResult<Value> {
        self.get_json(ApiRequest::get("/option-price-ratio"))
    }

    pub fn backtest(&mut self, ticker: &str) -> DashResult<Value> {
        self.get_json(ApiRequest::get("/backtest").query("ticker", ticker))
    }

    pub fn opening_range_breakout(&mut self, ticker: &str) -> DashResult<Value> {
        self.get_json(ApiRequest::get("/opening_range_breakout").query("ticker", ticker))
    }

    /// Opens the alerts SSE connection.
    pub fn alerts_stream(&self) -> DashResult<AlertStream<Box<dyn BufRead + Send>>> {
        let token = self.session.as_ref().map(|session| session.token.as_str());
        let request = ApiRequest::get(&self.config.alerts_stream_path).with_bearer(token);
        let reader = self.transport.open_stream(&request)?;
        debug!(route = %request.route(), "alerts stream opened");
        Ok(AlertStream::new(reader))
    }
}

/// Accepts `["AAPL", ...]`, `[{"ticker": "AAPL"}, ...]` or `{"tickers": [...]}`.
fn parse_ticker_list(body: &Value) -> DashResult<Vec<String>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("tickers") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(DashError::Decode(
                    "ticker list response has no `tickers` array".to_owned(),
                ));
            }
        },
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(DashError::Decode(
                "ticker list response must be an array".to_owned(),
            ));
        }
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .or_else(|| item.get("ticker").and_then(Value::as_str))
                .or_else(|| item.get("symbol").and_then(Value::as_str))
                .map(str::to_owned)
                .ok_or_else(|| DashError::Decode(format!("unexpected ticker entry: {item}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_list_shapes() {
        assert_eq!(
            parse_ticker_list(&json!(["AAPL", "MSFT"])).expect("strings"),
            vec!["AAPL", "MSFT"]
        );
        assert_eq!(
            parse_ticker_list(&json!({"tickers": [{"ticker": "NVDA"}, {"symbol": "AMD"}]}))
                .expect("objects"),
            vec!["NVDA", "AMD"]
        );
        assert!(parse_ticker_list(&json!([1])).is_err());
        assert!(parse_ticker_list(&Value::Null).expect("null").is_empty());
    }
}
