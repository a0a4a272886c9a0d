pub mod date;
pub mod events;
pub mod primitives;
pub mod series;
pub mod tooltip;
pub mod types;
pub mod windowing;

pub use date::{date_key, is_date_key, normalize_date_key, parse_date_key};
pub use events::{
    BandEvent, DollarMove, EventDetail, EventIndex, EventKind, EventLayer, EventMap, EventTypeTag,
    MoveLabel, WindowStats,
};
pub use primitives::{format_dollars, format_signed_percent};
pub use series::{PointClass, SegmentClass, classify_points, classify_segments};
pub use tooltip::{TooltipMap, build_tooltip_map, event_lines, tooltip_text};
pub use types::{
    Direction, HugEvent, LookbackWindow, PricePoint, TickerSummary, TouchEvent, WindowEvents,
};
pub use windowing::{RangeChange, points_in_index_window, range_change};
