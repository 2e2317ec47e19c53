//! Region labelling and Moore-neighbor contour tracing.
//!
//! A single raster scan over a [`PixelMask`] finds every 8-connected
//! foreground region, traces its outer boundary when the region is first
//! met, and traces the boundary of every hole when the scan first leaves
//! the region into that hole. Boundary following walks the 8-neighborhood
//! in a fixed clockwise order and stops by Jacob's criterion: when the
//! walk is about to repeat the first step taken from the seed.
//!
//! Cost is `O(width * height)` for the scan plus `O(boundary points)` for
//! the tracing. The [`LabelGrid`] populated along the way is kept in the
//! result for point-in-region queries.

use crate::contour::{Contour, ContourKind, RegionId};
use crate::labels::{LabelCell, LabelGrid};
use crate::mask::PixelMask;
use crate::types::GridPoint;

/// Neighbor offsets, clockwise in image coordinates (y grows downward).
const DELTAS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// First search direction when tracing an outer boundary.
const OUTER_SEED_DIRECTION: usize = 0;

/// First search direction when tracing a hole boundary.
const INNER_SEED_DIRECTION: usize = 1;

/// Neighbors probed per step. The eighth is the one the walk can never
/// need: it was ruled out by how the current cell was reached.
const PROBES: usize = 7;

/// Padded grid cell `(column, row)`.
type Cell = (usize, usize);

/// Contours and labels extracted from one mask.
#[derive(Debug, Clone)]
pub struct TraceResult {
    /// One contour per region, in region-id order.
    pub outer: Vec<Contour>,
    /// One contour per hole, in the order the scan left a region into it.
    pub inner: Vec<Contour>,
    /// Final label of every padded cell.
    pub labels: LabelGrid,
}

impl TraceResult {
    /// Number of regions found. Region ids run from 1 to this value.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.outer.len()
    }

    /// Region id at raster pixel `(x, y)`, or 0 outside every region.
    #[must_use]
    pub fn label_at(&self, x: i64, y: i64) -> RegionId {
        self.labels.label_at(x, y)
    }
}

/// Trace every outer and inner contour of a mask.
#[must_use]
pub fn trace(mask: &PixelMask) -> TraceResult {
    RegionTracer::new(mask).run()
}

/// Scan state for one tracing pass.
struct RegionTracer<'a> {
    mask: &'a PixelMask,
    labels: LabelGrid,
    last_region: RegionId,
}

impl<'a> RegionTracer<'a> {
    fn new(mask: &'a PixelMask) -> Self {
        Self {
            mask,
            labels: LabelGrid::new(mask.padded_width(), mask.padded_height()),
            last_region: 0,
        }
    }

    fn run(mut self) -> TraceResult {
        let mut outer = Vec::new();
        let mut inner = Vec::new();

        let width = self.mask.padded_width();
        let height = self.mask.padded_height();

        for py in 1..height - 1 {
            let mut current: Option<RegionId> = None;

            for px in 1..width - 1 {
                if self.mask.is_foreground(px, py) {
                    if let Some(label) = current {
                        self.labels.set(px, py, LabelCell::Region(label));
                        continue;
                    }
                    match self.labels.get(px, py) {
                        LabelCell::Region(label) => current = Some(label),
                        LabelCell::Unlabeled | LabelCell::VisitedBackground => {
                            self.last_region += 1;
                            let label = self.last_region;
                            let contour = self.trace_contour(
                                (px, py),
                                label,
                                OUTER_SEED_DIRECTION,
                                ContourKind::Outer,
                            );
                            log::trace!("outer {contour}");
                            outer.push(contour);
                            self.labels.set(px, py, LabelCell::Region(label));
                            current = Some(label);
                        }
                    }
                } else if let Some(label) = current.take() {
                    if self.labels.get(px, py) == LabelCell::Unlabeled {
                        let contour = self.trace_contour(
                            (px - 1, py),
                            label,
                            INNER_SEED_DIRECTION,
                            ContourKind::Inner,
                        );
                        log::trace!("inner {contour}");
                        inner.push(contour);
                    }
                }
            }
        }

        // Back from padded to raster coordinates.
        TraceResult {
            outer: outer.iter().map(|c| c.translated(-1, -1)).collect(),
            inner: inner.iter().map(|c| c.translated(-1, -1)).collect(),
            labels: self.labels,
        }
    }

    /// Follow one boundary starting at `seed`.
    ///
    /// The returned points start at the seed's successor and end at the
    /// seed itself. An isolated seed yields a single-point contour.
    fn trace_contour(
        &mut self,
        seed: Cell,
        label: RegionId,
        seed_direction: usize,
        kind: ContourKind,
    ) -> Contour {
        let (first, mut direction) = self.find_next(seed, seed_direction);
        let Some(successor) = first else {
            return Contour::new(label, kind, vec![grid_point(seed)]);
        };

        let mut points = vec![grid_point(successor)];
        let mut current = successor;

        loop {
            self.labels.set(current.0, current.1, LabelCell::Region(label));

            let (next, found_direction) = self.find_next(current, (direction + 6) % 8);
            direction = found_direction;

            // Unreachable: the cell we came from is always a neighbor.
            let Some(next) = next else { break };

            if current == seed && next == successor {
                break;
            }
            points.push(grid_point(next));
            current = next;
        }

        Contour::new(label, kind, points)
    }

    /// Probe up to [`PROBES`] neighbors of `cell` clockwise from
    /// `direction`, marking background neighbors as visited.
    ///
    /// Returns the first foreground neighbor (if any) and the direction
    /// it was found in.
    fn find_next(&mut self, cell: Cell, mut direction: usize) -> (Option<Cell>, usize) {
        for _ in 0..PROBES {
            let (dx, dy) = DELTAS[direction];
            let x = cell.0.wrapping_add_signed(dx);
            let y = cell.1.wrapping_add_signed(dy);
            if self.mask.is_foreground(x, y) {
                return (Some((x, y)), direction);
            }
            self.labels.set(x, y, LabelCell::VisitedBackground);
            direction = (direction + 1) % 8;
        }
        (None, direction)
    }
}

/// Padded cell to a (still padded) contour point.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn grid_point(cell: Cell) -> GridPoint {
    GridPoint::new(cell.0 as i32, cell.1 as i32)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use image::{GrayImage, Luma};
    use imageproc::region_labelling::{Connectivity, connected_components};

    use super::*;

    /// Build a mask from ASCII art: `#` is foreground, anything else is not.
    fn mask_from_rows(rows: &[&str]) -> PixelMask {
        let height = u32::try_from(rows.len()).unwrap();
        let width = u32::try_from(rows.first().map_or(0, |r| r.len())).unwrap();
        PixelMask::build(width, height, |u, v| {
            if rows[v as usize].as_bytes()[u as usize] == b'#' {
                255
            } else {
                0
            }
        })
    }

    fn filled_rect(width: u32, height: u32, x0: u32, y0: u32, w: u32, h: u32) -> PixelMask {
        PixelMask::build(width, height, |u, v| {
            if (x0..x0 + w).contains(&u) && (y0..y0 + h).contains(&v) {
                255
            } else {
                0
            }
        })
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let result = trace(&PixelMask::build(8, 6, |_, _| 0));
        assert!(result.outer.is_empty());
        assert!(result.inner.is_empty());
        assert_eq!(result.region_count(), 0);
        assert_eq!(result.labels.labeled_count(), 0);
    }

    #[test]
    fn zero_size_mask_has_no_contours() {
        let result = trace(&PixelMask::build(0, 0, |_, _| 255));
        assert!(result.outer.is_empty());
        assert!(result.inner.is_empty());
    }

    #[test]
    fn isolated_pixel_is_single_point_outer_contour() {
        let result = trace(&mask_from_rows(&["....", "..#.", "...."]));
        assert_eq!(result.outer.len(), 1);
        assert!(result.inner.is_empty());

        let contour = &result.outer[0];
        assert!(contour.is_isolated());
        assert_eq!(contour.points(), &[GridPoint::new(2, 1)]);
        assert_eq!(contour.label(), 1);
        assert_eq!(result.label_at(2, 1), 1);
        assert_eq!(result.label_at(3, 1), 0);
    }

    #[test]
    fn pixel_in_raster_corner_is_traced() {
        let result = trace(&mask_from_rows(&["#..", "...", "..#"]));
        assert_eq!(result.outer.len(), 2);
        assert_eq!(result.outer[0].points(), &[GridPoint::new(0, 0)]);
        assert_eq!(result.outer[1].points(), &[GridPoint::new(2, 2)]);
    }

    #[test]
    fn filled_rectangle_contour_is_its_perimeter() {
        for (w, h) in [(2, 2), (5, 3), (3, 7), (10, 10)] {
            let result = trace(&filled_rect(20, 20, 4, 6, w, h));
            assert_eq!(result.outer.len(), 1, "{w}x{h}");
            assert!(result.inner.is_empty(), "{w}x{h}");
            let expected = usize::try_from(2 * (w + h) - 4).unwrap();
            assert_eq!(result.outer[0].len(), expected, "{w}x{h}");
        }
    }

    #[test]
    fn outer_contour_starts_at_successor_and_ends_at_seed() {
        let result = trace(&filled_rect(10, 10, 2, 3, 4, 4));
        let points = result.outer[0].points();
        assert_eq!(points.first(), Some(&GridPoint::new(3, 3)));
        assert_eq!(points.last(), Some(&GridPoint::new(2, 3)));
    }

    #[test]
    fn outer_contour_walks_clockwise() {
        let result = trace(&filled_rect(6, 6, 1, 1, 3, 3));
        assert_eq!(
            result.outer[0].points(),
            &[
                GridPoint::new(2, 1),
                GridPoint::new(3, 1),
                GridPoint::new(3, 2),
                GridPoint::new(3, 3),
                GridPoint::new(2, 3),
                GridPoint::new(1, 3),
                GridPoint::new(1, 2),
                GridPoint::new(1, 1),
            ]
        );
    }

    #[test]
    fn full_sixteen_square_has_sixty_points() {
        let result = trace(&PixelMask::build(16, 16, |_, _| 255));
        assert_eq!(result.outer.len(), 1);
        assert!(result.inner.is_empty());
        assert_eq!(result.outer[0].len(), 60);
        for p in result.outer[0].points() {
            assert!((0..16).contains(&p.x) && (0..16).contains(&p.y));
        }
    }

    #[test]
    fn rectangle_with_hole_has_one_inner_contour() {
        let result = trace(&mask_from_rows(&[
            ".........",
            ".#######.",
            ".#######.",
            ".##...##.",
            ".##...##.",
            ".##...##.",
            ".#######.",
            ".#######.",
            ".........",
        ]));
        assert_eq!(result.outer.len(), 1);
        assert_eq!(result.inner.len(), 1);

        let hole = &result.inner[0];
        assert_eq!(hole.kind(), ContourKind::Inner);
        assert_eq!(hole.label(), result.outer[0].label());
        for p in hole.points() {
            assert!((2..=6).contains(&p.x) && (2..=6).contains(&p.y), "{p:?}");
            assert_eq!(result.label_at(i64::from(p.x), i64::from(p.y)), 1);
        }
        assert_eq!(result.label_at(4, 4), 0);
    }

    #[test]
    fn one_pixel_hole_is_traced_once() {
        let result = trace(&mask_from_rows(&["###", "#.#", "###"]));
        assert_eq!(result.outer.len(), 1);
        assert_eq!(result.inner.len(), 1);
        assert_eq!(result.outer[0].len(), 8);
    }

    #[test]
    fn two_holes_in_one_region() {
        let result = trace(&mask_from_rows(&["#######", "#.###.#", "#######"]));
        assert_eq!(result.outer.len(), 1);
        assert_eq!(result.inner.len(), 2);
        assert!(result.inner.iter().all(|c| c.label() == 1));
    }

    #[test]
    fn diagonal_neighbors_form_one_region() {
        let result = trace(&mask_from_rows(&["#..", ".#.", "..#"]));
        assert_eq!(result.outer.len(), 1);
        assert_eq!(result.outer[0].len(), 4);
        assert_eq!(result.label_at(0, 0), 1);
        assert_eq!(result.label_at(2, 2), 1);
    }

    #[test]
    fn separate_regions_get_increasing_labels_in_scan_order() {
        let result = trace(&mask_from_rows(&[
            "....##", //
            "##..##", //
            "##....", //
            "...#..", //
        ]));
        let labels: Vec<_> = result.outer.iter().map(Contour::label).collect();
        assert_eq!(labels, vec![1, 2, 3]);
        assert_eq!(result.label_at(4, 0), 1);
        assert_eq!(result.label_at(0, 1), 2);
        assert_eq!(result.label_at(3, 3), 3);
    }

    #[test]
    fn u_shape_is_one_region_without_holes() {
        let result = trace(&mask_from_rows(&["#..#", "#..#", "####"]));
        assert_eq!(result.outer.len(), 1);
        assert!(result.inner.is_empty());
    }

    #[test]
    fn every_contour_point_belongs_to_its_region() {
        let result = trace(&mask_from_rows(&[
            "#####..#",
            "#...#..#",
            "#.#.#...",
            "#...#.##",
            "#####.##",
        ]));
        for contour in result.outer.iter().chain(&result.inner) {
            assert!(!contour.is_empty());
            for p in contour.points() {
                assert_eq!(
                    result.label_at(i64::from(p.x), i64::from(p.y)),
                    contour.label()
                );
            }
        }
        // Ring, dot inside it, vertical bar, 2x2 block.
        assert_eq!(result.outer.len(), 4);
        assert_eq!(result.inner.len(), 1);
    }

    /// Deterministic pseudo-random mask (64-bit LCG).
    fn noise_mask(width: u32, height: u32, seed: u64, density: u64) -> PixelMask {
        let mut state = seed;
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for _ in 0..width * height {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            alpha.push(if (state >> 33) % 100 < density { 255 } else { 0 });
        }
        PixelMask::build(width, height, |u, v| alpha[(v * width + u) as usize])
    }

    #[test]
    fn labels_match_eight_connected_components() {
        for seed in 1..=12 {
            let (width, height) = (37, 23);
            let mask = noise_mask(width, height, seed, 45 + seed % 4 * 5);
            let result = trace(&mask);

            let gray = GrayImage::from_fn(width, height, |x, y| {
                Luma([if mask.is_foreground_at(x, y) { 255 } else { 0 }])
            });
            let components = connected_components(&gray, Connectivity::Eight, Luma([0u8]));

            // Each component maps to exactly one tracer label and back.
            let mut forward: HashMap<u32, RegionId> = HashMap::new();
            let mut backward: HashMap<RegionId, u32> = HashMap::new();
            for (x, y, component) in components.enumerate_pixels() {
                let label = result.label_at(i64::from(x), i64::from(y));
                if component[0] == 0 {
                    assert_eq!(label, 0, "background ({x},{y}) labelled, seed {seed}");
                    continue;
                }
                assert_ne!(label, 0, "foreground ({x},{y}) unlabelled, seed {seed}");
                assert_eq!(*forward.entry(component[0]).or_insert(label), label);
                assert_eq!(*backward.entry(label).or_insert(component[0]), component[0]);
            }

            assert_eq!(result.region_count(), forward.len(), "seed {seed}");
            assert_eq!(result.labels.labeled_count(), mask.foreground_count());
            let ids: Vec<_> = result.outer.iter().map(Contour::label).collect();
            let expected: Vec<RegionId> = (1..=u32::try_from(ids.len()).unwrap()).collect();
            assert_eq!(ids, expected);
        }
    }
}
