//! Shared types for silhouette tracing and border compositing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can pass rasters in and out
/// of the compositor without depending on `image` directly.
pub use image::RgbaImage;

/// An integer pixel coordinate.
///
/// Contour points produced by the tracer are expressed in the source
/// raster's coordinate space: `x` grows to the right, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridPoint {
    /// Create a new grid point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// The shorter of the two sides.
    #[must_use]
    pub fn min_extent(self) -> u32 {
        self.width.min(self.height)
    }

    /// Returns `true` if either side is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A straight (non-premultiplied) RGBA8 color.
///
/// Serialized as a `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque red, the default border color.
    pub const RED: Self = Self::rgba(255, 0, 0, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// Create a color from its four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to a `tiny-skia` paint color.
    #[must_use]
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::RED
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}': expected #rrggbb or #rrggbbaa")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').unwrap_or_else(|| s.trim());
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) || !(hex.len() == 6 || hex.len() == 8) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Border appearance settings.
///
/// Set these before the first call to [`process`](crate::border::process)
/// on a [`BorderState`](crate::BorderState): the traced silhouette is
/// cached per state and is never re-derived when the config changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    /// Desired stroke width in logical units, before small-image scaling.
    ///
    /// Must lie within `0.0..=`[`Self::MAX_BORDER_SIZE`].
    pub border_size: f32,

    /// Stroke color used for every traced path.
    pub color: Color,
}

impl BorderConfig {
    /// Default stroke width.
    pub const DEFAULT_BORDER_SIZE: f32 = 12.0;
    /// Largest accepted stroke width; also the scale reference for small images.
    pub const MAX_BORDER_SIZE: f32 = 50.0;

    /// Check that the border size is finite and within range.
    ///
    /// # Errors
    ///
    /// Returns [`BorderError::InvalidConfig`] if `border_size` is NaN,
    /// infinite, negative, or above [`Self::MAX_BORDER_SIZE`].
    pub fn validate(&self) -> Result<(), BorderError> {
        if !self.border_size.is_finite()
            || !(0.0..=Self::MAX_BORDER_SIZE).contains(&self.border_size)
        {
            return Err(BorderError::InvalidConfig(format!(
                "border_size must be within 0..={}, got {}",
                Self::MAX_BORDER_SIZE,
                self.border_size
            )));
        }
        Ok(())
    }
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            border_size: Self::DEFAULT_BORDER_SIZE,
            color: Color::default(),
        }
    }
}

/// Errors raised at the edges of the library (decoding and configuration).
///
/// Tracing and compositing themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum BorderError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Failed to encode the composed image.
    #[error("failed to encode image: {0}")]
    ImageEncode(String),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Border configuration is invalid.
    #[error("invalid border configuration: {0}")]
    InvalidConfig(String),
}
