//! Optional annotation layers built on top of the core pipeline.

pub mod markers;

pub use markers::{EventMarker, MarkerPosition, place_event_markers};
