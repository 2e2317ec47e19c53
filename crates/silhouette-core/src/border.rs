//! Border compositing: stroke the traced silhouette and overlay the source.
//!
//! A [`BorderState`] owns the border appearance and a write-once cache of
//! the traced contours. The first [`process`] call fills the cache; every
//! call then shrinks the cached paths towards the image center by the
//! stroke width, strokes them, and draws the source through the same
//! transform on top, so the border shows as a ring just outside the
//! silhouette while the original pixels stay unobstructed.

use std::sync::OnceLock;

use image::RgbaImage;
use tiny_skia::{
    ColorU8, FilterQuality, LineCap, LineJoin, Paint, Path, Pixmap, PixmapPaint, Stroke,
    Transform,
};

use crate::contour::{Contour, contours_to_paths};
use crate::diagnostics::{TraceDiagnostics, trace_image};
use crate::types::{BorderConfig, Color, Dimensions};

/// Images whose shorter side is below this get a proportionally scaled
/// stroke instead of the configured width.
pub const SMALL_IMAGE_EXTENT: u32 = 150;

/// Fraction of the shorter side that a full-size border covers on a
/// small image.
pub const SMALL_IMAGE_FRACTION: f32 = 0.3;

/// Contours and drawable paths traced once per [`BorderState`].
#[derive(Debug, Clone)]
pub struct TracedBorder {
    /// Outer contours in discovery order.
    pub outer_contours: Vec<Contour>,
    /// Hole contours in discovery order.
    pub inner_contours: Vec<Contour>,
    /// One path per outer contour.
    pub outer_paths: Vec<Path>,
    /// One path per inner contour.
    pub inner_paths: Vec<Path>,
    /// Counts and timings of the trace.
    pub diagnostics: TraceDiagnostics,
}

impl TracedBorder {
    /// Trace `source` and build a path for every contour.
    #[must_use]
    pub fn trace(source: &RgbaImage) -> Self {
        let (result, diagnostics) = trace_image(source);
        let outer_paths = contours_to_paths(&result.outer);
        let inner_paths = contours_to_paths(&result.inner);
        log::debug!(
            "traced {}x{} silhouette: {} regions, {} outer / {} inner contours, {} points in {:?}",
            diagnostics.dimensions.width,
            diagnostics.dimensions.height,
            diagnostics.regions,
            diagnostics.outer_contours,
            diagnostics.inner_contours,
            diagnostics.contour_points,
            diagnostics.total_duration(),
        );
        Self {
            outer_contours: result.outer,
            inner_contours: result.inner,
            outer_paths,
            inner_paths,
            diagnostics,
        }
    }
}

/// Border settings plus the memoized silhouette of the first image
/// processed with them.
///
/// The cache is filled at most once and never invalidated: changing the
/// config or passing a different image later reuses the first trace.
/// Create a new state per distinct image.
#[derive(Debug, Default)]
pub struct BorderState {
    config: BorderConfig,
    traced: OnceLock<TracedBorder>,
}

impl BorderState {
    /// Create an untraced state with the given settings.
    #[must_use]
    pub fn new(config: BorderConfig) -> Self {
        Self {
            config,
            traced: OnceLock::new(),
        }
    }

    /// Current border settings.
    #[must_use]
    pub const fn config(&self) -> &BorderConfig {
        &self.config
    }

    /// Change the stroke width. Does not re-trace.
    pub const fn set_border_size(&mut self, border_size: f32) {
        self.config.border_size = border_size;
    }

    /// Change the stroke color. Does not re-trace.
    pub const fn set_color(&mut self, color: Color) {
        self.config.color = color;
    }

    /// Whether the silhouette has been traced yet.
    #[must_use]
    pub fn is_traced(&self) -> bool {
        self.traced.get().is_some()
    }

    /// The cached trace, if any.
    #[must_use]
    pub fn traced(&self) -> Option<&TracedBorder> {
        self.traced.get()
    }

    /// Cached outer contours; empty before the first trace.
    #[must_use]
    pub fn outer_contours(&self) -> &[Contour] {
        self.traced
            .get()
            .map(|t| t.outer_contours.as_slice())
            .unwrap_or_default()
    }

    /// Cached inner contours; empty before the first trace.
    #[must_use]
    pub fn inner_contours(&self) -> &[Contour] {
        self.traced
            .get()
            .map(|t| t.inner_contours.as_slice())
            .unwrap_or_default()
    }

    /// Return the cached trace, tracing `source` first if needed.
    #[must_use]
    pub fn traced_or_init(&self, source: &RgbaImage) -> &TracedBorder {
        self.traced.get_or_init(|| TracedBorder::trace(source))
    }
}

/// Stroke width for an image of the given size.
///
/// Small images (shorter side below [`SMALL_IMAGE_EXTENT`]) scale the
/// border to `border_size / 50` of [`SMALL_IMAGE_FRACTION`] of their
/// shorter side; larger images use `border_size` as is.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn effective_stroke_width(border_size: f32, dimensions: Dimensions) -> f32 {
    let extent = dimensions.min_extent();
    if extent < SMALL_IMAGE_EXTENT {
        (border_size / BorderConfig::MAX_BORDER_SIZE) * (extent as f32 * SMALL_IMAGE_FRACTION)
    } else {
        border_size
    }
}

/// Uniform shrink about the image center that insets the silhouette by
/// half the stroke width on each side.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn inset_transform(dimensions: Dimensions, stroke_width: f32) -> Transform {
    let width = dimensions.width as f32;
    let height = dimensions.height as f32;
    let sx = (width - stroke_width) / width;
    let sy = (height - stroke_width) / height;
    let cx = width / 2.0;
    let cy = height / 2.0;
    Transform::from_row(sx, 0.0, 0.0, sy, cx - sx * cx, cy - sy * cy)
}

/// Draw the border of `source`'s silhouette and return the composed image.
///
/// Traces `source` on the first call for `state`; later calls reuse that
/// trace. The result has the same dimensions as `source`. Images without
/// foreground, and zero-size images, pass through without a border.
#[must_use]
pub fn process(source: &RgbaImage, state: &BorderState) -> RgbaImage {
    let dimensions = Dimensions {
        width: source.width(),
        height: source.height(),
    };
    let traced = state.traced_or_init(source);
    if dimensions.is_empty() {
        return source.clone();
    }

    let Some(mut canvas) = Pixmap::new(dimensions.width, dimensions.height) else {
        return source.clone();
    };
    let Some(source_pixmap) = rgba_to_pixmap(source) else {
        return source.clone();
    };

    let stroke_width = effective_stroke_width(state.config().border_size, dimensions);
    let transform = inset_transform(dimensions, stroke_width);

    // tiny-skia treats a zero width as a hairline; zero means no border.
    if stroke_width > 0.0 {
        let stroke = Stroke {
            width: stroke_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let mut paint = Paint::default();
        paint.set_color(state.config().color.to_skia());
        paint.anti_alias = true;

        for path in traced.outer_paths.iter().chain(&traced.inner_paths) {
            if let Some(inset) = path.clone().transform(transform) {
                canvas.stroke_path(&inset, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    let image_paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    canvas.draw_pixmap(0, 0, source_pixmap.as_ref(), &image_paint, transform, None);

    pixmap_to_rgba(&canvas)
}

/// Copy a straight-alpha image into a premultiplied pixmap.
fn rgba_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Copy a premultiplied pixmap back into a straight-alpha image.
fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    image
}
