use serde::{Deserialize, Serialize};

use crate::core::{BandEvent, Direction, EventDetail, EventIndex, EventKind, PricePoint};
use crate::render::{Color, SeriesStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
}

impl MarkerPosition {
    #[must_use]
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Upper => Self::AboveBar,
            Direction::Lower => Self::BelowBar,
        }
    }
}

/// Chart annotation for one band event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMarker {
    pub id: String,
    pub date: String,
    pub position: MarkerPosition,
    /// Anchor price: the band the event touched, else close, else the event's own price.
    pub price: f64,
    pub text: String,
    pub priority: i32,
    pub color: Color,
}

const HUG_PRIORITY: i32 = 2;
const TOUCH_PRIORITY: i32 = 1;

/// Builds one marker per event anchored to the matching price point.
///
/// Order is stable by date, priority (desc), then marker id.
#[must_use]
pub fn place_event_markers(
    index: &EventIndex,
    points: &[PricePoint],
    style: SeriesStyle,
) -> Vec<EventMarker> {
    let mut prepared = Vec::new();
    for (date, events) in &index.all {
        let anchor = points.iter().find(|point| &point.date == date);
        for (slot, event) in events.iter().enumerate() {
            prepared.push(build_marker(event, slot, anchor, style));
        }
    }

    prepared.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| a.id.cmp(&b.id))
    });
    prepared
}

fn build_marker(
    event: &BandEvent,
    slot: usize,
    anchor: Option<&PricePoint>,
    style: SeriesStyle,
) -> EventMarker {
    let (prefix, priority) = match event.kind() {
        EventKind::Touch => ("T", TOUCH_PRIORITY),
        EventKind::Hug => ("H", HUG_PRIORITY),
    };
    let color = match event.direction {
        Direction::Upper => style.upper_event,
        Direction::Lower => style.lower_event,
    };
    EventMarker {
        id: format!(
            "{}-{}-{}-{}-{slot}",
            event.type_tag().as_str(),
            event.window.days(),
            event.date,
            prefix.to_ascii_lowercase()
        ),
        date: event.date.clone(),
        position: MarkerPosition::for_direction(event.direction),
        price: resolve_anchor_price(event, anchor),
        text: format!("{prefix}{}", event.window.days()),
        priority,
        color,
    }
}

fn resolve_anchor_price(event: &BandEvent, anchor: Option<&PricePoint>) -> f64 {
    let band = anchor.and_then(|point| match event.direction {
        Direction::Upper => point.upper,
        Direction::Lower => point.lower,
    });
    band.or(anchor.map(|point| point.close))
        .unwrap_or(match &event.detail {
            EventDetail::Touch { touch_price, .. } => *touch_price,
            EventDetail::Hug { end_price, .. } => *end_price,
        })
}
