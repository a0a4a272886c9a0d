#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Cursor};

use bandwatch::api::{ApiClient, ApiRequest, ApiResponse, ClientConfig, HttpTransport};
use bandwatch::core::{HugEvent, PricePoint, TickerSummary, TouchEvent};
use bandwatch::error::{DashError, DashResult};
use serde_json::{Value, json};
use url::Position;

pub const BASE_URL: &str = "http://backend.test";

/// In-memory transport replaying scripted responses in order.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<DashResult<ApiResponse>>>,
    streams: RefCell<VecDeque<String>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body.to_string())));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(DashError::Transport(message.to_owned())));
        self
    }

    pub fn stream(self, body: &str) -> Self {
        self.streams.borrow_mut().push_back(body.to_owned());
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests.borrow().iter().map(target).collect()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> DashResult<ApiResponse> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(DashError::Transport("no scripted response".to_owned())))
    }

    fn open_stream(&self, request: &ApiRequest) -> DashResult<Box<dyn BufRead + Send>> {
        self.requests.borrow_mut().push(request.clone());
        let body = self
            .streams
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| DashError::Transport("no scripted stream".to_owned()))?;
        Ok(Box::new(Cursor::new(body.into_bytes())))
    }
}

pub fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
    ApiClient::new(transport, ClientConfig::new(BASE_URL)).expect("client")
}

/// Encoded path and query the request resolves to against `BASE_URL`.
pub fn target(request: &ApiRequest) -> String {
    let url = ClientConfig::new(BASE_URL)
        .endpoint(request)
        .expect("endpoint");
    url[Position::BeforePath..].to_owned()
}

pub fn session_json(token: &str, refresh: &str) -> Value {
    json!({
        "token": token,
        "refreshToken": refresh,
        "user": { "id": 7, "username": "ada", "email": "ada@example.com" }
    })
}

pub fn touch(date: &str, touch_price: f64) -> TouchEvent {
    TouchEvent {
        touch_date: date.to_owned(),
        touch_price,
        peak_price: None,
        trough_price: None,
        trading_days: None,
        bounce_dollars: None,
        drop_dollars: None,
    }
}

pub fn hug(start: &str, end: &str, start_price: f64, end_price: f64) -> HugEvent {
    HugEvent {
        hug_start_date: start.to_owned(),
        hug_end_date: end.to_owned(),
        hug_start_price: start_price,
        hug_end_price: end_price,
        peak_price: None,
        trough_price: None,
        peak_date: None,
        trough_date: None,
        trading_days: None,
        bounce_dollars: None,
        drop_dollars: None,
    }
}

/// Five consecutive January sessions with flat bands.
pub fn five_points() -> Vec<PricePoint> {
    ["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05", "2024-01-08"]
        .iter()
        .enumerate()
        .map(|(i, date)| PricePoint::new(*date, 100.0 + i as f64).with_bands(110.0, 90.0))
        .collect()
}

pub fn summary_with(points: Vec<PricePoint>) -> TickerSummary {
    TickerSummary {
        symbol: "AAPL".to_owned(),
        price_series: points,
        ..TickerSummary::default()
    }
}
