use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{PricePoint, RangeChange, points_in_index_window, range_change};
use crate::error::{DashError, DashResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
    /// Drag-to-zoom selection in progress.
    Selecting,
}

/// Point reported to the hover callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverPoint {
    pub index: usize,
    pub date: String,
    pub price: f64,
}

pub type HoverCallback = Box<dyn FnMut(Option<&HoverPoint>)>;

/// Translates pointer input over a rendered series into hover and zoom state.
///
/// Points are laid out evenly across the viewport width over the current
/// visible index range.
pub struct InteractionController {
    points: Vec<PricePoint>,
    viewport_width_px: f64,
    visible: Option<(usize, usize)>,
    mode: InteractionMode,
    hovered: Option<usize>,
    selection_anchor_px: Option<f64>,
    pan_anchor: Option<(f64, (usize, usize))>,
    readout: Option<RangeChange>,
    hover_callback: Option<HoverCallback>,
}

impl fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionController")
            .field("points", &self.points.len())
            .field("viewport_width_px", &self.viewport_width_px)
            .field("visible", &self.visible)
            .field("mode", &self.mode)
            .field("hovered", &self.hovered)
            .field("readout", &self.readout)
            .finish_non_exhaustive()
    }
}

impl InteractionController {
    pub fn new(points: Vec<PricePoint>, viewport_width_px: f64) -> DashResult<Self> {
        validate_width(viewport_width_px)?;
        let visible = full_range(points.len());
        Ok(Self {
            points,
            viewport_width_px,
            visible,
            mode: InteractionMode::Idle,
            hovered: None,
            selection_anchor_px: None,
            pan_anchor: None,
            readout: None,
            hover_callback: None,
        })
    }

    pub fn set_hover_callback<F>(&mut self, callback: F)
    where
        F: FnMut(Option<&HoverPoint>) + 'static,
    {
        self.hover_callback = Some(Box::new(callback));
    }

    pub fn clear_hover_callback(&mut self) {
        self.hover_callback = None;
    }

    /// Replaces the series (e.g. after a re-fetch) and resets all view state.
    pub fn set_points(&mut self, points: Vec<PricePoint>) {
        self.visible = full_range(points.len());
        self.points = points;
        self.mode = InteractionMode::Idle;
        self.hovered = None;
        self.selection_anchor_px = None;
        self.pan_anchor = None;
        self.readout = None;
    }

    pub fn set_viewport_width(&mut self, width_px: f64) -> DashResult<()> {
        validate_width(width_px)?;
        self.viewport_width_px = width_px;
        Ok(())
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    #[must_use]
    pub fn readout(&self) -> Option<&RangeChange> {
        self.readout.as_ref()
    }

    /// Inclusive visible index range, `None` for an empty series.
    #[must_use]
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        self.visible
    }

    #[must_use]
    pub fn visible_points(&self) -> &[PricePoint] {
        match self.visible {
            Some((start, end)) => points_in_index_window(&self.points, start, end),
            None => &[],
        }
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.visible.is_some() && self.visible != full_range(self.points.len())
    }

    /// Nearest visible point index for a pointer x coordinate.
    #[must_use]
    pub fn nearest_index(&self, x_px: f64) -> Option<usize> {
        let (start, end) = self.visible?;
        if !x_px.is_finite() {
            return None;
        }
        (start..=end).min_by_key(|&index| OrderedFloat((self.index_to_px(index) - x_px).abs()))
    }

    /// Handles pointer movement. The callback only fires when the hovered
    /// index changes.
    ///
    /// Returns `true` when the callback was invoked.
    pub fn pointer_move(&mut self, x_px: f64) -> bool {
        let Some(index) = self.nearest_index(x_px) else {
            return false;
        };
        if self.hovered == Some(index) {
            return false;
        }
        self.hovered = Some(index);
        let point = &self.points[index];
        let hover = HoverPoint {
            index,
            date: point.date.clone(),
            price: point.close,
        };
        trace!(index, date = %hover.date, "hover point changed");
        self.notify(Some(&hover))
    }

    /// Clears hover; reports `None` once if something was hovered.
    pub fn pointer_leave(&mut self) -> bool {
        if self.hovered.take().is_none() {
            return false;
        }
        self.notify(None)
    }

    pub fn selection_start(&mut self, x_px: f64) {
        if self.visible.is_none() || !x_px.is_finite() {
            return;
        }
        self.mode = InteractionMode::Selecting;
        self.selection_anchor_px = Some(x_px);
    }

    /// Completes a drag-to-zoom gesture.
    ///
    /// Selections covering fewer than two points leave the view unchanged and
    /// return `Ok(None)`.
    pub fn selection_end(&mut self, x_px: f64) -> DashResult<Option<RangeChange>> {
        let anchor = self.selection_anchor_px.take();
        self.mode = InteractionMode::Idle;
        let (Some(anchor), Some(a), Some(b)) = (
            anchor,
            anchor.and_then(|px| self.nearest_index(px)),
            self.nearest_index(x_px),
        ) else {
            return Ok(None);
        };
        trace!(anchor, x_px, "drag selection finished");
        self.zoom_to_indices(a.min(b), a.max(b))
    }

    /// Zooms to an inclusive index range and recomputes the readout.
    pub fn zoom_to_indices(&mut self, start: usize, end: usize) -> DashResult<Option<RangeChange>> {
        let (start, end) = (start.min(end), start.max(end));
        let Some(last) = self.points.len().checked_sub(1) else {
            return Ok(None);
        };
        let end = end.min(last);
        if start >= end {
            return Ok(None);
        }
        let readout = range_change(points_in_index_window(&self.points, start, end))?;
        self.visible = Some((start, end));
        self.readout = readout.clone();
        debug!(start, end, "zoomed to visible range");
        Ok(readout)
    }

    pub fn pan_start(&mut self, x_px: f64) {
        let Some(range) = self.visible else {
            return;
        };
        if !x_px.is_finite() {
            return;
        }
        self.mode = InteractionMode::Panning;
        self.pan_anchor = Some((x_px, range));
    }

    /// Shifts the visible range following the pointer, keeping its width.
    pub fn pan_move(&mut self, x_px: f64) {
        let Some((anchor_px, (start, end))) = self.pan_anchor else {
            return;
        };
        if !x_px.is_finite() || self.points.is_empty() {
            return;
        }
        let span = end - start;
        let step_px = self.step_px();
        if step_px <= 0.0 {
            return;
        }
        let shift = ((anchor_px - x_px) / step_px).round() as i64;
        let max_start = (self.points.len() - 1 - span) as i64;
        let new_start = (start as i64 + shift).clamp(0, max_start) as usize;
        self.visible = Some((new_start, new_start + span));
    }

    /// Finishes a pan and refreshes the readout when zoomed in.
    pub fn pan_end(&mut self) -> DashResult<Option<RangeChange>> {
        if self.pan_anchor.take().is_none() {
            return Ok(None);
        }
        self.mode = InteractionMode::Idle;
        if !self.is_zoomed() {
            return Ok(None);
        }
        let readout = range_change(self.visible_points())?;
        self.readout = readout.clone();
        Ok(readout)
    }

    /// Restores the full range and clears the readout.
    pub fn reset_zoom(&mut self) {
        self.visible = full_range(self.points.len());
        self.readout = None;
        self.mode = InteractionMode::Idle;
        self.selection_anchor_px = None;
        self.pan_anchor = None;
        debug!(points = self.points.len(), "zoom reset");
    }

    fn notify(&mut self, hover: Option<&HoverPoint>) -> bool {
        match self.hover_callback.as_mut() {
            Some(callback) => {
                callback(hover);
                true
            }
            None => false,
        }
    }

    fn step_px(&self) -> f64 {
        match self.visible {
            Some((start, end)) if end > start => self.viewport_width_px / (end - start) as f64,
            _ => 0.0,
        }
    }

    fn index_to_px(&self, index: usize) -> f64 {
        match self.visible {
            Some((start, end)) if end > start => (index - start) as f64 * self.step_px(),
            _ => self.viewport_width_px * 0.5,
        }
    }
}

fn full_range(len: usize) -> Option<(usize, usize)> {
    len.checked_sub(1).map(|last| (0, last))
}

fn validate_width(width_px: f64) -> DashResult<()> {
    if !width_px.is_finite() || width_px <= 0.0 {
        return Err(DashError::InvalidData(
            "viewport width must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<PricePoint> {
        (0..n)
            .map(|i| PricePoint::new(format!("2024-01-{:02}", i + 1), 100.0 + i as f64))
            .collect()
    }

    #[test]
    fn index_layout_spans_viewport() {
        let controller = InteractionController::new(points(5), 400.0).expect("controller");
        assert_eq!(controller.index_to_px(0), 0.0);
        assert_eq!(controller.index_to_px(4), 400.0);
        assert_eq!(controller.nearest_index(160.0), Some(2));
    }

    #[test]
    fn single_point_series_centers_its_point() {
        let controller = InteractionController::new(points(1), 300.0).expect("controller");
        assert_eq!(controller.index_to_px(0), 150.0);
        assert_eq!(controller.nearest_index(10.0), Some(0));
    }
}
