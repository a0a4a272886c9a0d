//! Application state container with one typed slice per concern.
//!
//! Every mutation goes through [`AppState::dispatch`]; slices are read
//! through their accessors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::core::TickerSummary;

use super::auth::AuthSession;
use super::sse::{Alert, AlertFrame};

/// `idle -> loading -> succeeded | failed` status shared by every slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(String),
}

impl FetchStatus {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    AuthRequested,
    LoggedIn(AuthSession),
    AuthFailed(String),
    LoggedOut,
    SummaryRequested(String),
    SummaryLoaded(TickerSummary),
    SummaryFailed { symbol: String, error: String },
    WatchlistRequested,
    WatchlistLoaded(Vec<String>),
    WatchlistFailed(String),
    TickerAdded(String),
    TickerRemoved(String),
    AlertsReceived(AlertFrame),
    LogoLoaded { symbol: String, url: Option<String> },
}

#[derive(Debug, Clone, Default)]
pub struct AuthSlice {
    session: Option<AuthSession>,
    status: FetchStatus,
}

impl AuthSlice {
    #[must_use]
    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn status(&self) -> &FetchStatus {
        &self.status
    }
}

#[derive(Debug, Clone, Default)]
pub struct SummaryEntry {
    pub status: FetchStatus,
    pub summary: Option<Arc<TickerSummary>>,
}

#[derive(Debug, Clone, Default)]
pub struct SummarySlice {
    entries: HashMap<String, SummaryEntry>,
    in_flight: HashSet<String>,
}

impl SummarySlice {
    #[must_use]
    pub fn entry(&self, symbol: &str) -> Option<&SummaryEntry> {
        self.entries.get(symbol)
    }

    #[must_use]
    pub fn summary(&self, symbol: &str) -> Option<Arc<TickerSummary>> {
        self.entries.get(symbol).and_then(|entry| entry.summary.clone())
    }

    #[must_use]
    pub fn is_in_flight(&self, symbol: &str) -> bool {
        self.in_flight.contains(symbol)
    }

    fn begin(&mut self, symbol: String) -> bool {
        if !self.in_flight.insert(symbol.clone()) {
            return false;
        }
        self.entries.entry(symbol).or_default().status = FetchStatus::Loading;
        true
    }

    fn finish(&mut self, symbol: &str, status: FetchStatus, summary: Option<TickerSummary>) {
        self.in_flight.remove(symbol);
        let entry = self.entries.entry(symbol.to_owned()).or_default();
        entry.status = status;
        if let Some(summary) = summary {
            entry.summary = Some(Arc::new(summary));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WatchlistSlice {
    symbols: Vec<String>,
    status: FetchStatus,
}

impl WatchlistSlice {
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    #[must_use]
    pub fn status(&self) -> &FetchStatus {
        &self.status
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlertsSlice {
    alerts: Vec<Alert>,
    timestamp: Value,
    frames_applied: u64,
}

impl AlertsSlice {
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    #[must_use]
    pub fn timestamp(&self) -> &Value {
        &self.timestamp
    }

    #[must_use]
    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogoSlice {
    urls: HashMap<String, Option<String>>,
}

impl LogoSlice {
    /// `None` when never fetched, `Some(None)` when the backend has no logo.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<Option<&str>> {
        self.urls.get(symbol).map(Option::as_deref)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    auth: AuthSlice,
    summaries: SummarySlice,
    watchlist: WatchlistSlice,
    alerts: AlertsSlice,
    logos: LogoSlice,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn auth(&self) -> &AuthSlice {
        &self.auth
    }

    #[must_use]
    pub fn summaries(&self) -> &SummarySlice {
        &self.summaries
    }

    #[must_use]
    pub fn watchlist(&self) -> &WatchlistSlice {
        &self.watchlist
    }

    #[must_use]
    pub fn alerts(&self) -> &AlertsSlice {
        &self.alerts
    }

    #[must_use]
    pub fn logos(&self) -> &LogoSlice {
        &self.logos
    }

    /// Applies one action. Returns `false` when the action was rejected,
    /// which only happens for a duplicate in-flight summary request.
    pub fn dispatch(&mut self, action: Action) -> bool {
        trace!(?action, "dispatch");
        match action {
            Action::AuthRequested => self.auth.status = FetchStatus::Loading,
            Action::LoggedIn(session) => {
                self.auth.session = Some(session);
                self.auth.status = FetchStatus::Succeeded;
            }
            Action::AuthFailed(error) => {
                self.auth.session = None;
                self.auth.status = FetchStatus::Failed(error);
            }
            Action::LoggedOut => {
                self.auth = AuthSlice::default();
                self.watchlist = WatchlistSlice::default();
            }
            Action::SummaryRequested(symbol) => {
                if !self.summaries.begin(symbol.clone()) {
                    debug!(%symbol, "summary fetch already in flight");
                    return false;
                }
            }
            Action::SummaryLoaded(summary) => {
                let symbol = summary.symbol.clone();
                self.summaries
                    .finish(&symbol, FetchStatus::Succeeded, Some(summary));
            }
            Action::SummaryFailed { symbol, error } => {
                self.summaries
                    .finish(&symbol, FetchStatus::Failed(error), None);
            }
            Action::WatchlistRequested => self.watchlist.status = FetchStatus::Loading,
            Action::WatchlistLoaded(symbols) => {
                let mut seen = HashSet::new();
                self.watchlist.symbols = symbols
                    .into_iter()
                    .filter(|symbol| seen.insert(symbol.clone()))
                    .collect();
                self.watchlist.status = FetchStatus::Succeeded;
            }
            Action::WatchlistFailed(error) => self.watchlist.status = FetchStatus::Failed(error),
            Action::TickerAdded(symbol) => {
                if !self.watchlist.contains(&symbol) {
                    self.watchlist.symbols.push(symbol);
                }
            }
            Action::TickerRemoved(symbol) => self.watchlist.symbols.retain(|s| *s != symbol),
            Action::AlertsReceived(frame) => {
                self.alerts.alerts = frame.alerts;
                self.alerts.timestamp = frame.timestamp;
                self.alerts.frames_applied += 1;
            }
            Action::LogoLoaded { symbol, url } => {
                self.logos.urls.insert(symbol, url);
            }
        }
        true
    }
}
