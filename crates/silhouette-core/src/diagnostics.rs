//! Tracing diagnostics: counts and timings for one silhouette trace.
//!
//! Collected every time a [`BorderState`](crate::BorderState) populates
//! its cache, and available standalone through [`trace_image`].
//!
//! Timestamps are captured via the `web-time` crate, which uses
//! `performance.now()` on WASM and `std::time::Instant` on native.
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility.

use std::time::Duration;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::mask::PixelMask;
use crate::tracer::{TraceResult, trace};
use crate::types::Dimensions;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Counts and timings collected from one trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDiagnostics {
    /// Source raster dimensions.
    pub dimensions: Dimensions,
    /// Pixels with alpha above the threshold.
    pub foreground_pixels: usize,
    /// Connected foreground regions (one outer contour each).
    pub regions: usize,
    /// Number of outer contours.
    pub outer_contours: usize,
    /// Number of inner (hole) contours.
    pub inner_contours: usize,
    /// Total points across all contours.
    pub contour_points: usize,
    /// Regions consisting of a single pixel.
    pub isolated_pixels: usize,
    /// Time spent building the mask.
    #[serde(with = "duration_serde")]
    pub mask_duration: Duration,
    /// Time spent scanning and following boundaries.
    #[serde(with = "duration_serde")]
    pub trace_duration: Duration,
}

impl TraceDiagnostics {
    fn collect(
        mask: &PixelMask,
        result: &TraceResult,
        mask_duration: Duration,
        trace_duration: Duration,
    ) -> Self {
        let all = || result.outer.iter().chain(&result.inner);
        Self {
            dimensions: Dimensions {
                width: mask.width(),
                height: mask.height(),
            },
            foreground_pixels: mask.foreground_count(),
            regions: result.region_count(),
            outer_contours: result.outer.len(),
            inner_contours: result.inner.len(),
            contour_points: all().map(crate::Contour::len).sum(),
            isolated_pixels: result.outer.iter().filter(|c| c.is_isolated()).count(),
            mask_duration,
            trace_duration,
        }
    }

    /// Total time spent on mask construction and tracing.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.mask_duration + self.trace_duration
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Trace Diagnostics Report\n{}", "=".repeat(48)));
        lines.push(format!(
            "Image: {}x{} ({} foreground pixels)",
            self.dimensions.width, self.dimensions.height, self.foreground_pixels,
        ));
        lines.push(format!(
            "Mask: {:.3}ms  |  Trace: {:.3}ms  |  Total: {:.3}ms",
            duration_ms(self.mask_duration),
            duration_ms(self.trace_duration),
            duration_ms(self.total_duration()),
        ));
        lines.push(format!(
            "Regions: {} ({} isolated pixels)",
            self.regions, self.isolated_pixels,
        ));
        lines.push(format!(
            "Contours: {} outer, {} inner, {} points",
            self.outer_contours, self.inner_contours, self.contour_points,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Build the alpha mask of `image`, trace it, and time both steps.
#[must_use]
pub fn trace_image(image: &RgbaImage) -> (TraceResult, TraceDiagnostics) {
    let start = web_time::Instant::now();
    let mask = PixelMask::from_rgba(image);
    let mask_duration = start.elapsed();

    let start = web_time::Instant::now();
    let result = trace(&mask);
    let trace_duration = start.elapsed();

    let diagnostics = TraceDiagnostics::collect(&mask, &result, mask_duration, trace_duration);
    (result, diagnostics)
}
