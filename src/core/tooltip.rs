use indexmap::IndexMap;

use crate::core::events::{BandEvent, EventDetail, EventIndex, EventKind};
use crate::core::primitives::format_dollars;
use crate::core::types::Direction;

/// Display lines per canonical date. Separate events are divided by an empty line.
pub type TooltipMap = IndexMap<String, Vec<String>>;

/// Formats one event as a labeled block of lines.
///
/// Lines whose source value is missing upstream are omitted rather than
/// rendered with placeholders.
#[must_use]
pub fn event_lines(event: &BandEvent) -> Vec<String> {
    let kind = match event.kind() {
        EventKind::Touch => "Touch",
        EventKind::Hug => "Hug",
    };
    let mut lines = vec![format!(
        "{} {} Band {kind}",
        event.window.label(),
        event.direction.label()
    )];

    let extreme_label = match event.direction {
        Direction::Lower => "Peak",
        Direction::Upper => "Trough",
    };

    match &event.detail {
        EventDetail::Touch {
            touch_price,
            extreme_price,
        } => {
            lines.push(format!("Touch Price: {}", format_dollars(*touch_price)));
            if let Some(price) = extreme_price {
                lines.push(format!("{extreme_label} Price: {}", format_dollars(*price)));
            }
        }
        EventDetail::Hug {
            start_date,
            end_date,
            start_price,
            end_price,
            extreme_price,
            extreme_date,
        } => {
            lines.push(format!(
                "Hug Start: {start_date} @ {}",
                format_dollars(*start_price)
            ));
            lines.push(format!("Hug End: {end_date} @ {}", format_dollars(*end_price)));
            match (extreme_price, extreme_date) {
                (Some(price), Some(date)) => {
                    lines.push(format!("{extreme_label}: {date} @ {}", format_dollars(*price)));
                }
                (Some(price), None) => {
                    lines.push(format!("{extreme_label} Price: {}", format_dollars(*price)));
                }
                _ => {}
            }
        }
    }

    if let Some(amount) = event.dollar_move.magnitude() {
        lines.push(format!(
            "{}: {}",
            event.dollar_move.label.as_str(),
            format_dollars(amount)
        ));
    }
    if let Some(days) = event.trading_days {
        let unit = if days == 1 { "day" } else { "days" };
        lines.push(format!("Trading Days: {days} {unit}"));
    }
    lines
}

/// Builds the date -> lines map for every event in the index.
///
/// Blocks keep the index's insertion order so collisions on one date read
/// window by window.
#[must_use]
pub fn build_tooltip_map(index: &EventIndex) -> TooltipMap {
    let mut map = TooltipMap::with_capacity(index.all.len());
    for (date, events) in &index.all {
        let mut lines = Vec::new();
        for event in events {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.extend(event_lines(event));
        }
        if !lines.is_empty() {
            map.insert(date.clone(), lines);
        }
    }
    map
}

/// Joins a date's lines into one newline-separated tooltip body.
#[must_use]
pub fn tooltip_text(map: &TooltipMap, date: &str) -> Option<String> {
    map.get(date).map(|lines| lines.join("\n"))
}
