//! Binary foreground/background mask built from a raster's alpha channel.
//!
//! The mask is padded by one background cell on every side so the
//! boundary follower in [`tracer`](crate::tracer) can probe all eight
//! neighbors of any foreground cell without bounds checks.

use image::RgbaImage;

/// Alpha values strictly above this are foreground.
pub const ALPHA_THRESHOLD: u8 = 125;

/// A padded, immutable binary grid.
///
/// For a `width`×`height` raster the grid holds `(height + 2)`×`(width + 2)`
/// cells; raster pixel `(u, v)` lives at padded cell `(u + 1, v + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl PixelMask {
    /// Build a mask from an alpha accessor.
    ///
    /// `alpha_at(u, v)` is called once per raster pixel; the cell is
    /// foreground iff the value exceeds [`ALPHA_THRESHOLD`].
    #[must_use]
    pub fn build(width: u32, height: u32, mut alpha_at: impl FnMut(u32, u32) -> u8) -> Self {
        let stride = width as usize + 2;
        let mut cells = vec![false; stride * (height as usize + 2)];
        for v in 0..height {
            let row = (v as usize + 1) * stride;
            for u in 0..width {
                if alpha_at(u, v) > ALPHA_THRESHOLD {
                    cells[row + u as usize + 1] = true;
                }
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a mask from the alpha channel of an RGBA image.
    #[must_use]
    pub fn from_rgba(image: &RgbaImage) -> Self {
        Self::build(image.width(), image.height(), |u, v| {
            image.get_pixel(u, v).0[3]
        })
    }

    /// Width of the source raster (unpadded).
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the source raster (unpadded).
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width of the padded grid.
    #[must_use]
    pub const fn padded_width(&self) -> usize {
        self.width as usize + 2
    }

    /// Height of the padded grid.
    #[must_use]
    pub const fn padded_height(&self) -> usize {
        self.height as usize + 2
    }

    /// Whether the padded cell at `(px, py)` is foreground.
    ///
    /// Out-of-grid coordinates read as background.
    #[must_use]
    pub fn is_foreground(&self, px: usize, py: usize) -> bool {
        px < self.padded_width()
            && py < self.padded_height()
            && self.cells[py * self.padded_width() + px]
    }

    /// Whether raster pixel `(x, y)` is foreground.
    #[must_use]
    pub fn is_foreground_at(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.is_foreground(x as usize + 1, y as usize + 1)
    }

    /// Number of foreground cells.
    #[must_use]
    pub fn foreground_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
