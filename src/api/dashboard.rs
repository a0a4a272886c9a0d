use tracing::{debug, info, warn};

use crate::core::TickerSummary;
use crate::error::{DashError, DashResult};
use crate::render::SeriesStyle;

use super::auth::AuthSession;
use super::client::{ApiClient, TickerLogo};
use super::sse::AlertFrame;
use super::stock_view::StockView;
use super::store::{Action, AppState};
use super::transport::HttpTransport;
use super::validation::{validate_login, validate_registration, validate_ticker_symbol};

/// Wires the backend client, the state container and the chart pipeline.
///
/// Every failure is recorded in the relevant slice as a display message and
/// returned to the caller; nothing here is fatal.
#[derive(Debug)]
pub struct Dashboard<T> {
    client: ApiClient<T>,
    state: AppState,
    style: SeriesStyle,
}

impl<T: HttpTransport> Dashboard<T> {
    #[must_use]
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            client,
            state: AppState::new(),
            style: SeriesStyle::default(),
        }
    }

    pub fn with_style(mut self, style: SeriesStyle) -> DashResult<Self> {
        self.style = style.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn login(&mut self, username: &str, password: &str) -> DashResult<AuthSession> {
        let request = validate_login(username, password)?;
        self.state.dispatch(Action::AuthRequested);
        let result = self.client.login(&request);
        self.record_auth(result)
    }

    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DashResult<AuthSession> {
        let request = validate_registration(username, email, password)?;
        self.state.dispatch(Action::AuthRequested);
        let result = self.client.register(&request);
        self.record_auth(result)
    }

    fn record_auth(&mut self, result: DashResult<AuthSession>) -> DashResult<AuthSession> {
        match result {
            Ok(session) => {
                info!(user = %session.user.id, "logged in");
                self.state.dispatch(Action::LoggedIn(session.clone()));
                Ok(session)
            }
            Err(err) => {
                self.state.dispatch(Action::AuthFailed(err.display_message()));
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) {
        self.client.logout();
        self.state.dispatch(Action::LoggedOut);
    }

    /// Marks a summary fetch as started.
    ///
    /// Returns the normalized symbol, or `None` when a fetch for the same
    /// symbol is still outstanding.
    pub fn begin_summary_fetch(&mut self, symbol: &str) -> DashResult<Option<String>> {
        let symbol = validate_ticker_symbol(symbol)?;
        if self.state.dispatch(Action::SummaryRequested(symbol.clone())) {
            Ok(Some(symbol))
        } else {
            Ok(None)
        }
    }

    /// Records the outcome of a fetch started with [`Self::begin_summary_fetch`]
    /// and builds the view on success.
    pub fn complete_summary_fetch(
        &mut self,
        symbol: &str,
        result: DashResult<TickerSummary>,
    ) -> DashResult<StockView> {
        let built = result.and_then(|mut summary| {
            summary.symbol = symbol.to_owned();
            let view = StockView::build(summary.clone().into(), self.style)?;
            Ok((summary, view))
        });
        match built {
            Ok((summary, view)) => {
                self.state.dispatch(Action::SummaryLoaded(summary));
                Ok(view)
            }
            Err(err) => {
                self.sync_session();
                warn!(%symbol, error = %err, "summary load failed");
                self.state.dispatch(Action::SummaryFailed {
                    symbol: symbol.to_owned(),
                    error: err.display_message(),
                });
                Err(err)
            }
        }
    }

    /// Fetches a summary and runs the chart pipeline over it.
    ///
    /// Returns `Ok(None)` when the same symbol is already loading.
    pub fn load_stock_view(&mut self, symbol: &str) -> DashResult<Option<StockView>> {
        let Some(symbol) = self.begin_summary_fetch(symbol)? else {
            return Ok(None);
        };
        let result = self.client.summary(&symbol);
        self.complete_summary_fetch(&symbol, result).map(Some)
    }

    /// Rebuilds the view from the cached summary without a network call.
    pub fn cached_stock_view(&self, symbol: &str) -> DashResult<Option<StockView>> {
        let symbol = validate_ticker_symbol(symbol)?;
        self.state
            .summaries()
            .summary(&symbol)
            .map(|summary| StockView::build(summary, self.style))
            .transpose()
    }

    pub fn refresh_watchlist(&mut self) -> DashResult<&[String]> {
        self.state.dispatch(Action::WatchlistRequested);
        let user_id = self
            .client
            .session()
            .map(|session| session.user.id.clone());
        match self.client.tickers(user_id.as_ref()) {
            Ok(symbols) => {
                self.state.dispatch(Action::WatchlistLoaded(symbols));
                Ok(self.state.watchlist().symbols())
            }
            Err(err) => {
                self.sync_session();
                self.state
                    .dispatch(Action::WatchlistFailed(err.display_message()));
                Err(err)
            }
        }
    }

    /// Adds optimistically and rolls back if the backend rejects it.
    pub fn add_to_watchlist(&mut self, symbol: &str) -> DashResult<()> {
        let symbol = validate_ticker_symbol(symbol)?;
        let user_id = self.require_user()?;
        if self.state.watchlist().contains(&symbol) {
            return Ok(());
        }
        self.state.dispatch(Action::TickerAdded(symbol.clone()));
        if let Err(err) = self.client.add_ticker(&user_id, &symbol) {
            self.sync_session();
            self.state.dispatch(Action::TickerRemoved(symbol));
            return Err(err);
        }
        Ok(())
    }

    /// Removes optimistically and restores the symbol on failure.
    pub fn remove_from_watchlist(&mut self, symbol: &str) -> DashResult<()> {
        let symbol = validate_ticker_symbol(symbol)?;
        let user_id = self.require_user()?;
        if !self.state.watchlist().contains(&symbol) {
            return Ok(());
        }
        self.state.dispatch(Action::TickerRemoved(symbol.clone()));
        if let Err(err) = self.client.remove_ticker(&user_id, &symbol) {
            self.sync_session();
            self.state.dispatch(Action::TickerAdded(symbol));
            return Err(err);
        }
        Ok(())
    }

    /// Logo URL for a symbol, served from cache after the first lookup.
    pub fn logo(&mut self, symbol: &str) -> DashResult<Option<String>> {
        let symbol = validate_ticker_symbol(symbol)?;
        if let Some(cached) = self.state.logos().get(&symbol) {
            return Ok(cached.map(str::to_owned));
        }
        let TickerLogo { symbol, url } = self.client.ticker_logo(&symbol)?;
        self.state.dispatch(Action::LogoLoaded {
            symbol,
            url: url.clone(),
        });
        Ok(url)
    }

    pub fn apply_alert_frame(&mut self, frame: AlertFrame) {
        debug!(alerts = frame.alerts.len(), "alert frame applied");
        self.state.dispatch(Action::AlertsReceived(frame));
    }

    /// Consumes the alerts stream, replacing the alert set per frame.
    ///
    /// Stops after `max_frames` frames when given, otherwise when the server
    /// closes the stream. Malformed frames are skipped.
    pub fn follow_alerts(&mut self, max_frames: Option<usize>) -> DashResult<usize> {
        let stream = self.client.alerts_stream()?;
        let mut applied = 0;
        for frame in stream {
            match frame {
                Ok(frame) => {
                    self.apply_alert_frame(frame);
                    applied += 1;
                    if max_frames.is_some_and(|max| applied >= max) {
                        break;
                    }
                }
                Err(DashError::Stream(message)) => {
                    warn!(%message, "skipping malformed alert frame");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(applied)
    }

    fn require_user(&self) -> DashResult<super::auth::UserId> {
        self.client
            .session()
            .map(|session| session.user.id.clone())
            .ok_or_else(|| DashError::Validation("Please log in to manage your watchlist.".to_owned()))
    }

    /// Mirrors a client-side logout (failed refresh) into the auth slice.
    fn sync_session(&mut self) {
        if self.client.session().is_none() && self.state.auth().is_authenticated() {
            self.state.dispatch(Action::LoggedOut);
        }
    }
}
