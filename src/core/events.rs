use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::date::normalize_date_key;
use crate::core::types::{Direction, HugEvent, LookbackWindow, TickerSummary, TouchEvent};
use crate::error::DashResult;

/// Ordered events per canonical date. Insertion order is processing order.
pub type EventMap = IndexMap<String, SmallVec<[BandEvent; 2]>>;

/// Dominant event tag per date as used for point coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTypeTag {
    Upper,
    Lower,
    UpperHug,
    LowerHug,
}

impl EventTypeTag {
    #[must_use]
    pub fn new(kind: EventKind, direction: Direction) -> Self {
        match (kind, direction) {
            (EventKind::Touch, Direction::Upper) => Self::Upper,
            (EventKind::Touch, Direction::Lower) => Self::Lower,
            (EventKind::Hug, Direction::Upper) => Self::UpperHug,
            (EventKind::Hug, Direction::Lower) => Self::LowerHug,
        }
    }

    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            Self::Upper | Self::UpperHug => Direction::Upper,
            Self::Lower | Self::LowerHug => Direction::Lower,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::UpperHug => "upper_hug",
            Self::LowerHug => "lower_hug",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Touch,
    Hug,
}

/// Label of the post-event price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveLabel {
    Bounce,
    Drop,
}

impl MoveLabel {
    #[must_use]
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Lower => Self::Bounce,
            Direction::Upper => Self::Drop,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bounce => "Bounce",
            Self::Drop => "Drop",
        }
    }
}

/// Dollar move after an event, always held as a non-negative magnitude.
///
/// This is the only place the backend's signed `*_dollars` fields are
/// normalized for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DollarMove {
    pub label: MoveLabel,
    magnitude: Option<f64>,
}

impl DollarMove {
    /// Prefers the backend-reported delta and falls back to one derived from prices.
    #[must_use]
    pub fn normalized(label: MoveLabel, reported: Option<f64>, derived: Option<f64>) -> Self {
        let magnitude = reported
            .filter(|value| value.is_finite())
            .or(derived.filter(|value| value.is_finite()))
            .map(f64::abs);
        Self { label, magnitude }
    }

    #[must_use]
    pub fn magnitude(self) -> Option<f64> {
        self.magnitude
    }
}

/// Kind-specific payload of a band event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventDetail {
    Touch {
        touch_price: f64,
        /// Peak for a lower-band bounce, trough for an upper-band pullback.
        extreme_price: Option<f64>,
    },
    Hug {
        start_date: String,
        end_date: String,
        start_price: f64,
        end_price: f64,
        extreme_price: Option<f64>,
        extreme_date: Option<String>,
    },
}

/// A touch or hug event tagged once at extraction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandEvent {
    /// Canonical key: touch date for touches, hug end date for hugs.
    pub date: String,
    pub window: LookbackWindow,
    pub direction: Direction,
    pub trading_days: Option<u32>,
    pub dollar_move: DollarMove,
    pub detail: EventDetail,
}

impl BandEvent {
    pub fn from_touch(
        raw: &TouchEvent,
        window: LookbackWindow,
        direction: Direction,
    ) -> DashResult<Self> {
        let extreme_price = match direction {
            Direction::Lower => raw.peak_price,
            Direction::Upper => raw.trough_price,
        };
        let (reported, derived) = match direction {
            Direction::Lower => (raw.bounce_dollars, extreme_price.map(|p| p - raw.touch_price)),
            Direction::Upper => (raw.drop_dollars, extreme_price.map(|p| raw.touch_price - p)),
        };
        Ok(Self {
            date: normalize_date_key(&raw.touch_date)?,
            window,
            direction,
            trading_days: raw.trading_days,
            dollar_move: DollarMove::normalized(
                MoveLabel::for_direction(direction),
                reported,
                derived,
            ),
            detail: EventDetail::Touch {
                touch_price: raw.touch_price,
                extreme_price,
            },
        })
    }

    pub fn from_hug(raw: &HugEvent, window: LookbackWindow, direction: Direction) -> DashResult<Self> {
        let (extreme_price, extreme_date) = match direction {
            Direction::Lower => (raw.peak_price, raw.peak_date.as_deref()),
            Direction::Upper => (raw.trough_price, raw.trough_date.as_deref()),
        };
        let (reported, derived) = match direction {
            Direction::Lower => (raw.bounce_dollars, extreme_price.map(|p| p - raw.hug_end_price)),
            Direction::Upper => (raw.drop_dollars, extreme_price.map(|p| raw.hug_end_price - p)),
        };
        let end_date = normalize_date_key(&raw.hug_end_date)?;
        Ok(Self {
            date: end_date.clone(),
            window,
            direction,
            trading_days: raw.trading_days,
            dollar_move: DollarMove::normalized(
                MoveLabel::for_direction(direction),
                reported,
                derived,
            ),
            detail: EventDetail::Hug {
                start_date: normalize_date_key(&raw.hug_start_date)?,
                end_date,
                start_price: raw.hug_start_price,
                end_price: raw.hug_end_price,
                extreme_price,
                extreme_date: extreme_date.map(normalize_date_key).transpose()?,
            },
        })
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self.detail {
            EventDetail::Touch { .. } => EventKind::Touch,
            EventDetail::Hug { .. } => EventKind::Hug,
        }
    }

    #[must_use]
    pub fn type_tag(&self) -> EventTypeTag {
        EventTypeTag::new(self.kind(), self.direction)
    }
}

/// Date mapping and event list for one event kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLayer {
    /// Last write wins when two events land on the same date.
    pub types: IndexMap<String, EventTypeTag>,
    pub events: EventMap,
}

impl EventLayer {
    fn insert(&mut self, event: BandEvent) {
        trace!(date = %event.date, tag = event.type_tag().as_str(), "map band event");
        self.types.insert(event.date.clone(), event.type_tag());
        self.events.entry(event.date.clone()).or_default().push(event);
    }

    #[must_use]
    pub fn type_on(&self, date: &str) -> Option<EventTypeTag> {
        self.types.get(date).copied()
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.values().map(SmallVec::len).sum()
    }
}

/// Per-window aggregate counts for the summary header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub window: LookbackWindow,
    pub upper_touches: usize,
    pub lower_touches: usize,
    pub upper_hugs: usize,
    pub lower_hugs: usize,
    pub average_bounce: Option<f64>,
    pub average_drop: Option<f64>,
}

/// Everything the chart needs to annotate a price series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventIndex {
    pub touch: EventLayer,
    pub hug: EventLayer,
    /// Touch events before hug events, window 5 before 10, lower before upper.
    pub all: EventMap,
}

impl EventIndex {
    /// Walks every window's four event arrays and keys them by canonical date.
    pub fn extract(summary: &TickerSummary) -> DashResult<Self> {
        let mut index = Self::default();

        for window in LookbackWindow::ALL {
            let events = summary.window(window);
            for raw in &events.lower_touch_bounces {
                index.push(BandEvent::from_touch(raw, window, Direction::Lower)?);
            }
            for raw in &events.upper_touch_pullbacks {
                index.push(BandEvent::from_touch(raw, window, Direction::Upper)?);
            }
        }
        for window in LookbackWindow::ALL {
            let events = summary.window(window);
            for raw in &events.lower_hug_bounces {
                index.push(BandEvent::from_hug(raw, window, Direction::Lower)?);
            }
            for raw in &events.upper_hug_pullbacks {
                index.push(BandEvent::from_hug(raw, window, Direction::Upper)?);
            }
        }

        debug!(
            symbol = %summary.symbol,
            touch_events = index.touch.event_count(),
            hug_events = index.hug.event_count(),
            dates = index.all.len(),
            "extracted band events"
        );
        Ok(index)
    }

    fn push(&mut self, event: BandEvent) {
        self.all
            .entry(event.date.clone())
            .or_default()
            .push(event.clone());
        match event.kind() {
            EventKind::Touch => self.touch.insert(event),
            EventKind::Hug => self.hug.insert(event),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    #[must_use]
    pub fn events_on(&self, date: &str) -> &[BandEvent] {
        self.all
            .get(date)
            .map(|events| events.as_slice())
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn touch_type(&self, date: &str) -> Option<EventTypeTag> {
        self.touch.type_on(date)
    }

    #[must_use]
    pub fn hug_type(&self, date: &str) -> Option<EventTypeTag> {
        self.hug.type_on(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BandEvent> {
        self.all.values().flat_map(|events| events.iter())
    }

    #[must_use]
    pub fn stats(&self) -> Vec<WindowStats> {
        LookbackWindow::ALL
            .into_iter()
            .map(|window| {
                let mut stats = WindowStats {
                    window,
                    upper_touches: 0,
                    lower_touches: 0,
                    upper_hugs: 0,
                    lower_hugs: 0,
                    average_bounce: None,
                    average_drop: None,
                };
                let mut bounces = Vec::new();
                let mut drops = Vec::new();
                for event in self.iter().filter(|event| event.window == window) {
                    match event.type_tag() {
                        EventTypeTag::Upper => stats.upper_touches += 1,
                        EventTypeTag::Lower => stats.lower_touches += 1,
                        EventTypeTag::UpperHug => stats.upper_hugs += 1,
                        EventTypeTag::LowerHug => stats.lower_hugs += 1,
                    }
                    if let Some(amount) = event.dollar_move.magnitude() {
                        match event.dollar_move.label {
                            MoveLabel::Bounce => bounces.push(amount),
                            MoveLabel::Drop => drops.push(amount),
                        }
                    }
                }
                stats.average_bounce = mean(&bounces);
                stats.average_drop = mean(&drops);
                stats
            })
            .collect()
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
