use std::sync::Arc;

use crate::core::{EventIndex, TickerSummary, TooltipMap, WindowStats, build_tooltip_map};
use crate::error::DashResult;
use crate::extensions::{EventMarker, place_event_markers};
use crate::render::{ChartSeries, SeriesStyle, build_chart_series};

/// Everything a stock-detail view renders, derived from one summary payload.
#[derive(Debug, Clone)]
pub struct StockView {
    pub summary: Arc<TickerSummary>,
    pub events: EventIndex,
    pub tooltips: TooltipMap,
    pub series: ChartSeries,
    pub markers: Vec<EventMarker>,
    pub stats: Vec<WindowStats>,
}

impl StockView {
    /// Runs the full pipeline: extraction, tooltips, series, markers.
    pub fn build(summary: Arc<TickerSummary>, style: SeriesStyle) -> DashResult<Self> {
        let events = EventIndex::extract(&summary)?;
        let tooltips = build_tooltip_map(&events);
        let series = build_chart_series(&summary.price_series, &events, style)?;
        let markers = place_event_markers(&events, &summary.price_series, style);
        let stats = events.stats();
        Ok(Self {
            summary,
            events,
            tooltips,
            series,
            markers,
            stats,
        })
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.summary.symbol
    }

    #[must_use]
    pub fn tooltip_for(&self, date: &str) -> Option<String> {
        crate::core::tooltip_text(&self.tooltips, date)
    }
}
