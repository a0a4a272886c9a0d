use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    Direction, EventIndex, PointClass, PricePoint, SegmentClass, classify_points,
    classify_segments,
};
use crate::error::DashResult;

use super::primitives::{Color, SeriesStyle};

/// One renderable point of the close-price line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledPoint {
    pub date: String,
    pub close: f64,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub class: PointClass,
    pub color: Color,
    pub radius: f64,
}

/// Style of the segment joining `points[from]` and `points[from + 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyledSegment {
    pub from: usize,
    pub class: SegmentClass,
    pub color: Color,
}

/// Renderable descriptor for a price series with event annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub points: Vec<StyledPoint>,
    pub segments: Vec<StyledSegment>,
}

impl ChartSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Builds the colored/sized series. Output length always equals input length.
pub fn build_chart_series(
    points: &[PricePoint],
    index: &EventIndex,
    style: SeriesStyle,
) -> DashResult<ChartSeries> {
    let style = style.validate()?;
    let classes = classify_points(points, index);

    let styled_points: Vec<StyledPoint> = points
        .iter()
        .zip(classes)
        .map(|(point, class)| StyledPoint {
            date: point.date.clone(),
            close: point.close,
            upper_band: point.upper,
            lower_band: point.lower,
            class,
            color: point_color(class, style),
            radius: if point.is_touch || point.is_hug {
                style.event_radius
            } else {
                style.default_radius
            },
        })
        .collect();

    let segments = classify_segments(points)
        .into_iter()
        .enumerate()
        .map(|(from, class)| StyledSegment {
            from,
            class,
            color: segment_color(class, style),
        })
        .collect();

    debug!(
        points = styled_points.len(),
        event_points = styled_points.iter().filter(|p| p.class.is_event()).count(),
        "built chart series"
    );
    Ok(ChartSeries {
        points: styled_points,
        segments,
    })
}

#[must_use]
pub fn point_color(class: PointClass, style: SeriesStyle) -> Color {
    match class {
        PointClass::Plain => style.default_point,
        PointClass::Touch(direction) | PointClass::Hug(direction) => match direction {
            Some(Direction::Lower) => style.lower_event,
            Some(Direction::Upper) => style.upper_event,
            None => style.fallback_event,
        },
    }
}

#[must_use]
pub fn segment_color(class: SegmentClass, style: SeriesStyle) -> Color {
    match class {
        SegmentClass::Hug => style.hug_segment,
        SegmentClass::Touch => style.touch_segment,
        SegmentClass::Plain => style.plain_segment,
    }
}
