mod primitives;
mod series;

pub use primitives::{
    Color, DEFAULT_POINT_COLOR, DEFAULT_POINT_RADIUS, EVENT_POINT_RADIUS, FALLBACK_EVENT_COLOR,
    LOWER_EVENT_COLOR, PLAIN_SEGMENT_COLOR, SeriesStyle, UPPER_EVENT_COLOR,
};
pub use series::{
    ChartSeries, StyledPoint, StyledSegment, build_chart_series, point_color, segment_color,
};
