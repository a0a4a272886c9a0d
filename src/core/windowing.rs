use serde::{Deserialize, Serialize};

use crate::core::date::parse_date_key;
use crate::core::primitives::{format_dollars, format_signed_percent};
use crate::core::types::PricePoint;
use crate::error::DashResult;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Price change between the first and last point of a visible range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeChange {
    pub start_date: String,
    pub end_date: String,
    pub start_price: f64,
    pub end_price: f64,
    pub diff: f64,
    pub pct: f64,
    pub duration_days: i64,
}

impl RangeChange {
    /// Readout line, e.g. `+$10.00 (+10.00%) over 3 days`.
    #[must_use]
    pub fn readout_text(&self) -> String {
        let sign = if self.diff > 0.0 { "+" } else { "" };
        let unit = if self.duration_days == 1 { "day" } else { "days" };
        format!(
            "{sign}{} ({}) over {} {unit}",
            format_dollars(self.diff),
            format_signed_percent(self.pct),
            self.duration_days
        )
    }
}

/// Returns the points inside an inclusive index window, clamped to the series.
#[must_use]
pub fn points_in_index_window(points: &[PricePoint], start: usize, end: usize) -> &[PricePoint] {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    if points.is_empty() || lo >= points.len() {
        return &[];
    }
    let hi = hi.min(points.len() - 1);
    &points[lo..=hi]
}

/// Computes the readout for a visible range.
///
/// Returns `Ok(None)` for ranges with fewer than two points.
pub fn range_change(visible: &[PricePoint]) -> DashResult<Option<RangeChange>> {
    let (Some(first), Some(last)) = (visible.first(), visible.last()) else {
        return Ok(None);
    };
    if visible.len() < 2 {
        return Ok(None);
    }

    let start = parse_date_key(&first.date)?;
    let end = parse_date_key(&last.date)?;
    let span_ms = (end - start).num_milliseconds() as f64;
    let diff = last.close - first.close;
    let pct = if first.close == 0.0 {
        0.0
    } else {
        diff / first.close * 100.0
    };

    Ok(Some(RangeChange {
        start_date: first.date.clone(),
        end_date: last.date.clone(),
        start_price: first.close,
        end_price: last.close,
        diff,
        pct,
        duration_days: (span_ms / MILLIS_PER_DAY).round() as i64,
    }))
}
