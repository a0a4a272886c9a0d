use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit channels.
    #[must_use]
    pub const fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
        )
    }

    /// Parses `#rrggbb` (leading `#` optional).
    pub fn from_hex(input: &str) -> DashResult<Self> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(DashError::InvalidData(format!(
                "color `{input}` must be #rrggbb"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| DashError::InvalidData(format!("color `{input}` is not hex")))
        };
        Ok(Self::rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lower-case `#rrggbb`; alpha is dropped.
    #[must_use]
    pub fn to_hex(self) -> String {
        let to_u8 = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            to_u8(self.red),
            to_u8(self.green),
            to_u8(self.blue)
        )
    }

    pub fn validate(self) -> DashResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DashError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

pub const DEFAULT_POINT_COLOR: Color = Color::rgb8(0x1f, 0x29, 0x37);
pub const LOWER_EVENT_COLOR: Color = Color::rgb8(0x16, 0xa3, 0x4a);
pub const UPPER_EVENT_COLOR: Color = Color::rgb8(0xdc, 0x26, 0x26);
pub const FALLBACK_EVENT_COLOR: Color = Color::rgb8(0xf5, 0x9e, 0x0b);
pub const PLAIN_SEGMENT_COLOR: Color = Color::rgb8(0x25, 0x63, 0xeb);

pub const EVENT_POINT_RADIUS: f64 = 6.0;
pub const DEFAULT_POINT_RADIUS: f64 = 4.0;

/// Palette and radii applied by the series builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub default_point: Color,
    pub lower_event: Color,
    pub upper_event: Color,
    pub fallback_event: Color,
    pub hug_segment: Color,
    pub touch_segment: Color,
    pub plain_segment: Color,
    pub event_radius: f64,
    pub default_radius: f64,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            default_point: DEFAULT_POINT_COLOR,
            lower_event: LOWER_EVENT_COLOR,
            upper_event: UPPER_EVENT_COLOR,
            fallback_event: FALLBACK_EVENT_COLOR,
            hug_segment: FALLBACK_EVENT_COLOR,
            touch_segment: UPPER_EVENT_COLOR,
            plain_segment: PLAIN_SEGMENT_COLOR,
            event_radius: EVENT_POINT_RADIUS,
            default_radius: DEFAULT_POINT_RADIUS,
        }
    }
}

impl SeriesStyle {
    pub fn validate(self) -> DashResult<Self> {
        for color in [
            self.default_point,
            self.lower_event,
            self.upper_event,
            self.fallback_event,
            self.hug_segment,
            self.touch_segment,
            self.plain_segment,
        ] {
            color.validate()?;
        }
        for (value, name) in [
            (self.event_radius, "event_radius"),
            (self.default_radius, "default_radius"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DashError::InvalidData(format!(
                    "series style `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(self)
    }
}
