use serde::{Deserialize, Serialize};

use crate::core::events::EventIndex;
use crate::core::types::{Direction, PricePoint};

/// Event classification of one price point.
///
/// The direction is `None` when the backend flagged the point but no event
/// of that kind was mapped to its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "direction", rename_all = "snake_case")]
pub enum PointClass {
    Plain,
    Touch(Option<Direction>),
    Hug(Option<Direction>),
}

impl PointClass {
    /// Hug takes precedence over touch when both flags are set.
    #[must_use]
    pub fn classify(point: &PricePoint, index: &EventIndex) -> Self {
        if point.is_hug {
            Self::Hug(index.hug_type(&point.date).map(|tag| tag.direction()))
        } else if point.is_touch {
            Self::Touch(index.touch_type(&point.date).map(|tag| tag.direction()))
        } else {
            Self::Plain
        }
    }

    #[must_use]
    pub fn is_event(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// Priority class of the line segment joining two consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentClass {
    /// Both endpoints are hugging.
    Hug,
    /// At least one endpoint is touching.
    Touch,
    Plain,
}

impl SegmentClass {
    #[must_use]
    pub fn between(from: &PricePoint, to: &PricePoint) -> Self {
        if from.is_hug && to.is_hug {
            Self::Hug
        } else if from.is_touch || to.is_touch {
            Self::Touch
        } else {
            Self::Plain
        }
    }
}

/// Classifies every point, preserving length and order.
#[must_use]
pub fn classify_points(points: &[PricePoint], index: &EventIndex) -> Vec<PointClass> {
    points
        .iter()
        .map(|point| PointClass::classify(point, index))
        .collect()
}

/// Classifies each adjacent pair; yields `points.len() - 1` entries.
#[must_use]
pub fn classify_segments(points: &[PricePoint]) -> Vec<SegmentClass> {
    points
        .windows(2)
        .map(|pair| SegmentClass::between(&pair[0], &pair[1]))
        .collect()
}
