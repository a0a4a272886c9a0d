use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One trading day of the backend price series.
///
/// `is_touch`/`is_hug` are computed upstream; the client never recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub close: f64,
    #[serde(default)]
    pub upper: Option<f64>,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default, rename = "isTouch")]
    pub is_touch: bool,
    #[serde(default, rename = "isHug")]
    pub is_hug: bool,
}

impl PricePoint {
    #[must_use]
    pub fn new(date: impl Into<String>, close: f64) -> Self {
        Self {
            date: date.into(),
            close,
            upper: None,
            lower: None,
            is_touch: false,
            is_hug: false,
        }
    }

    #[must_use]
    pub fn with_bands(mut self, upper: f64, lower: f64) -> Self {
        self.upper = Some(upper);
        self.lower = Some(lower);
        self
    }

    #[must_use]
    pub fn with_touch(mut self, is_touch: bool) -> Self {
        self.is_touch = is_touch;
        self
    }

    #[must_use]
    pub fn with_hug(mut self, is_hug: bool) -> Self {
        self.is_hug = is_hug;
        self
    }
}

/// Which Bollinger band an event is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Upper,
    Lower,
}

impl Direction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Upper => "Upper",
            Self::Lower => "Lower",
        }
    }
}

/// Lookback window used upstream for touch/hug detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LookbackWindow {
    #[serde(rename = "5")]
    Days5,
    #[serde(rename = "10")]
    Days10,
}

impl LookbackWindow {
    /// Processing order for extraction.
    pub const ALL: [Self; 2] = [Self::Days5, Self::Days10];

    #[must_use]
    pub fn days(self) -> u32 {
        match self {
            Self::Days5 => 5,
            Self::Days10 => 10,
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        format!("{}-Day", self.days())
    }
}

/// Raw touch record as delivered by the backend.
///
/// A lower-band bounce carries `peak_price`/`bounce_dollars`, an upper-band
/// pullback carries `trough_price`/`drop_dollars`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub touch_date: String,
    pub touch_price: f64,
    #[serde(default)]
    pub peak_price: Option<f64>,
    #[serde(default)]
    pub trough_price: Option<f64>,
    #[serde(default)]
    pub trading_days: Option<u32>,
    #[serde(default)]
    pub bounce_dollars: Option<f64>,
    #[serde(default)]
    pub drop_dollars: Option<f64>,
}

/// Raw hug record as delivered by the backend, keyed by `hug_end_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HugEvent {
    pub hug_start_date: String,
    pub hug_end_date: String,
    pub hug_start_price: f64,
    pub hug_end_price: f64,
    #[serde(default)]
    pub peak_price: Option<f64>,
    #[serde(default)]
    pub trough_price: Option<f64>,
    #[serde(default)]
    pub peak_date: Option<String>,
    #[serde(default)]
    pub trough_date: Option<String>,
    #[serde(default)]
    pub trading_days: Option<u32>,
    #[serde(default)]
    pub bounce_dollars: Option<f64>,
    #[serde(default)]
    pub drop_dollars: Option<f64>,
}

/// The four event arrays the backend computes for one lookback window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowEvents {
    #[serde(default)]
    pub upper_touch_pullbacks: Vec<TouchEvent>,
    #[serde(default)]
    pub lower_touch_bounces: Vec<TouchEvent>,
    #[serde(default)]
    pub upper_hug_pullbacks: Vec<HugEvent>,
    #[serde(default)]
    pub lower_hug_bounces: Vec<HugEvent>,
}

impl WindowEvents {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper_touch_pullbacks.is_empty()
            && self.lower_touch_bounces.is_empty()
            && self.upper_hug_pullbacks.is_empty()
            && self.lower_hug_bounces.is_empty()
    }
}

/// Aggregate `/summary?symbol=` response for one ticker.
///
/// Fields the pipeline does not interpret (fundamentals, company profile,
/// ratios) are kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerSummary {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub price_series: Vec<PricePoint>,
    #[serde(default)]
    pub window_5: WindowEvents,
    #[serde(default)]
    pub window_10: WindowEvents,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TickerSummary {
    #[must_use]
    pub fn window(&self, window: LookbackWindow) -> &WindowEvents {
        match window {
            LookbackWindow::Days5 => &self.window_5,
            LookbackWindow::Days10 => &self.window_10,
        }
    }

    pub fn window_mut(&mut self, window: LookbackWindow) -> &mut WindowEvents {
        match window {
            LookbackWindow::Days5 => &mut self.window_5,
            LookbackWindow::Days10 => &mut self.window_10,
        }
    }
}
