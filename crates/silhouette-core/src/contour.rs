//! Traced contours and their conversion to drawable paths.

use std::fmt;

use serde::{Deserialize, Serialize};
use tiny_skia::{Path, PathBuilder};

use crate::types::GridPoint;

/// Identifier of a connected foreground region. Ids start at 1.
pub type RegionId = u32;

/// Radius of the dot that stands in for a one-pixel region.
pub const ISOLATED_PIXEL_RADIUS: f32 = 0.1;

/// Which side of a region a contour was traced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContourKind {
    /// Separates a region from the background around it.
    Outer,
    /// Surrounds a hole inside a region.
    Inner,
}

/// An ordered, implicitly closed boundary polyline of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    label: RegionId,
    kind: ContourKind,
    points: Vec<GridPoint>,
}

impl Contour {
    /// Create a contour from already-traced points.
    #[must_use]
    pub const fn new(label: RegionId, kind: ContourKind, points: Vec<GridPoint>) -> Self {
        Self {
            label,
            kind,
            points,
        }
    }

    /// The region this contour belongs to.
    #[must_use]
    pub const fn label(&self) -> RegionId {
        self.label
    }

    /// Whether this is an outer or hole boundary.
    #[must_use]
    pub const fn kind(&self) -> ContourKind {
        self.kind
    }

    /// Boundary points, starting after the seed and ending at it.
    #[must_use]
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Number of boundary points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the contour has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A single-point contour: the region is one isolated pixel.
    #[must_use]
    pub const fn is_isolated(&self) -> bool {
        self.points.len() == 1
    }

    /// Returns a copy with every point shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            label: self.label,
            kind: self.kind,
            points: self.points.iter().map(|p| p.offset(dx, dy)).collect(),
        }
    }

    /// Build a drawable path for this contour.
    ///
    /// Multi-point contours become an open polyline through every point;
    /// the stroke's round caps cover the one-pixel step back to the start.
    /// A single point becomes a clockwise circle of radius
    /// [`ISOLATED_PIXEL_RADIUS`] so the region still renders as a dot.
    ///
    /// Returns `None` only for an empty contour.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_path(&self) -> Option<Path> {
        match self.points.as_slice() {
            [] => None,
            [only] => PathBuilder::from_circle(only.x as f32, only.y as f32, ISOLATED_PIXEL_RADIUS),
            [first, rest @ ..] => {
                let mut pb = PathBuilder::with_capacity(self.points.len(), self.points.len());
                pb.move_to(first.x as f32, first.y as f32);
                for p in rest {
                    pb.line_to(p.x as f32, p.y as f32);
                }
                pb.finish()
            }
        }
    }
}

impl fmt::Display for Contour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Contour {}: {} points", self.label, self.points.len())
    }
}

/// Convert every contour to a path, preserving order.
///
/// Empty contours (never produced by the tracer) are skipped.
#[must_use]
pub fn contours_to_paths(contours: &[Contour]) -> Vec<Path> {
    contours.iter().filter_map(Contour::to_path).collect()
}
