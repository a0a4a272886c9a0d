//! bandwatch: headless Bollinger-band event pipeline for stock dashboards.
//!
//! The crate turns a backend ticker summary into chart-ready data (event maps,
//! tooltips, colored series, markers), tracks pointer interaction over the
//! rendered series, and talks to the dashboard backend over REST and SSE.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ApiClient, ClientConfig, Dashboard, StockView};
pub use error::{DashError, DashResult};
