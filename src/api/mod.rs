//! Backend client, application state and the stock-view facade.

pub mod auth;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod sse;
pub mod stock_view;
pub mod store;
pub mod transport;
pub mod validation;

pub use auth::{AuthSession, AuthUser, LoginRequest, RegisterRequest, UserId};
pub use client::{ApiClient, StatementKind, TickerLogo};
pub use config::ClientConfig;
pub use dashboard::Dashboard;
pub use sse::{Alert, AlertFrame, AlertStream, SseDecoder, SseMessage};
pub use stock_view::StockView;
pub use store::{
    Action, AlertsSlice, AppState, AuthSlice, FetchStatus, LogoSlice, SummaryEntry, SummarySlice,
    WatchlistSlice,
};
#[cfg(feature = "http-client")]
pub use transport::ReqwestTransport;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method};
pub use validation::{validate_login, validate_registration, validate_ticker_symbol};
