//! Per-cell region labels produced as a byproduct of tracing.

use crate::contour::RegionId;

/// State of one padded grid cell during and after a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelCell {
    /// Not yet reached by the scanner or any boundary follower.
    #[default]
    Unlabeled,
    /// Background cell probed while following a boundary.
    VisitedBackground,
    /// Foreground cell owned by a region.
    Region(RegionId),
}

/// Padded label grid with the same layout as [`PixelMask`](crate::PixelMask).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    padded_width: usize,
    padded_height: usize,
    cells: Vec<LabelCell>,
}

impl LabelGrid {
    pub(crate) fn new(padded_width: usize, padded_height: usize) -> Self {
        Self {
            padded_width,
            padded_height,
            cells: vec![LabelCell::Unlabeled; padded_width * padded_height],
        }
    }

    /// Cell at padded coordinates. Out-of-grid reads as unlabeled.
    #[must_use]
    pub fn get(&self, px: usize, py: usize) -> LabelCell {
        if px < self.padded_width && py < self.padded_height {
            self.cells[py * self.padded_width + px]
        } else {
            LabelCell::Unlabeled
        }
    }

    pub(crate) fn set(&mut self, px: usize, py: usize, cell: LabelCell) {
        if px < self.padded_width && py < self.padded_height {
            self.cells[py * self.padded_width + px] = cell;
        }
    }

    /// Region id owning raster pixel `(x, y)`, or 0 for background,
    /// visited background, and out-of-range coordinates.
    #[must_use]
    pub fn label_at(&self, x: i64, y: i64) -> RegionId {
        let (Ok(px), Ok(py)) = (
            usize::try_from(x.saturating_add(1)),
            usize::try_from(y.saturating_add(1)),
        ) else {
            return 0;
        };
        if px == 0 || py == 0 || px + 1 >= self.padded_width || py + 1 >= self.padded_height {
            return 0;
        }
        match self.get(px, py) {
            LabelCell::Region(id) => id,
            LabelCell::Unlabeled | LabelCell::VisitedBackground => 0,
        }
    }

    /// Number of foreground cells carrying a region label.
    #[must_use]
    pub fn labeled_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, LabelCell::Region(_)))
            .count()
    }
}
