//! Precomputed pixelated-circle offset tables.
//!
//! [`CircleIndices`] holds, per radius in `[inner, outer]`, the integer
//! offsets `(dx, dy)` of one pixelated ring around the origin. Cells use
//! the table to scale the potential in concentric rings without
//! re-rasterizing circles every step. Rings of radius 0 and 1 are the
//! direct neighborhood and are handled by the cells themselves.

use crate::error::GrowthError;
use crate::field::EdgeGrid;

/// Offset table of concentric pixelated circles.
///
/// Invariants, checked by the tests below:
/// - no offset pair appears twice anywhere in the table;
/// - the union of rings `[inner, outer]` contains every lattice point
///   whose Euclidean distance from the origin rounds to an integer in
///   that range, so ring-by-ring scaling leaves no gaps.
#[derive(Debug, Clone)]
pub struct CircleIndices {
    rings: Vec<Vec<(i32, i32)>>,
    inner: u32,
}

impl CircleIndices {
    /// Builds the rings for every radius in `[inner, outer]`.
    ///
    /// Each radius is rasterized as one octant with the integer midpoint
    /// circle algorithm and reflected into all four quadrants. A boolean
    /// logger grid over the positive quadrant records every emitted
    /// pixel; a ring pixel whose inward neighbor `(x, y-1)` was never
    /// logged sits over a single-pixel gap between this ring and the
    /// previous one, and that gap pixel is emitted (and logged) with the
    /// ring. The ring below `inner` is rasterized into the logger first,
    /// output discarded, so hole detection does not spill inward.
    pub fn new(inner: u32, outer: u32) -> Result<Self, GrowthError> {
        if inner > outer {
            return Err(GrowthError::InvalidRadii { inner, outer });
        }

        // Positive-quadrant logger; the 1-cell buffer is seeded `true` so
        // gap checks below the x axis terminate at the border.
        let side = outer as usize + 1;
        let mut logger = EdgeGrid::new(side, side, 1, false, true);
        if inner > 0 {
            rasterize_octant(inner - 1, &mut logger);
        }

        let mut rings = Vec::with_capacity((outer - inner + 1) as usize);
        for radius in inner..=outer {
            let octant = rasterize_octant(radius, &mut logger);
            let mut ring = Vec::with_capacity(octant.len() * 4);
            for (x, y) in octant {
                push_reflections(&mut ring, x, y);
                if !logger.get(x, y - 1) {
                    logger.set(x, y - 1, true);
                    push_reflections(&mut ring, x, y - 1);
                }
            }
            rings.push(ring);
        }
        Ok(Self { rings, inner })
    }

    /// Offsets of the ring at `index` (radius `inner + index`).
    pub fn ring(&self, index: usize) -> &[(i32, i32)] {
        &self.rings[index]
    }

    /// All rings, innermost first.
    pub fn rings(&self) -> &[Vec<(i32, i32)>] {
        &self.rings
    }

    /// Radius of the innermost ring.
    pub fn inner_radius(&self) -> u32 {
        self.inner
    }

    /// Number of rings in the table.
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

/// Midpoint circle rasterization of one octant (positive quadrant
/// coordinates, `x >= y` plus the mirrored `(y, x)` points).
///
/// Emits only pixels not already present in `logger`, marking everything
/// it emits, so rings drawn against a shared logger stay disjoint.
fn rasterize_octant(radius: u32, logger: &mut EdgeGrid<bool>) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let mut coords = Vec::new();

    let mut x = r;
    let mut y = 0;
    log_pixel(logger, &mut coords, x, y);
    if r > 0 {
        log_pixel(logger, &mut coords, 0, x);
    }

    let mut p = 1 - r;
    while x > y {
        y += 1;
        if p <= 0 {
            p += 2 * y + 1;
        } else {
            x -= 1;
            p += 2 * y - 2 * x + 1;
        }
        if x < y {
            break;
        }
        log_pixel(logger, &mut coords, x, y);
        if x != y {
            log_pixel(logger, &mut coords, y, x);
        }
    }
    coords
}

fn log_pixel(logger: &mut EdgeGrid<bool>, coords: &mut Vec<(i32, i32)>, x: i32, y: i32) {
    if !logger.get(x, y) {
        logger.set(x, y, true);
        coords.push((x, y));
    }
}

/// Reflects a positive-quadrant pixel into all four quadrants, skipping
/// the reflections that coincide on the axes.
fn push_reflections(ring: &mut Vec<(i32, i32)>, x: i32, y: i32) {
    ring.push((x, y));
    if x != 0 {
        ring.push((-x, y));
    }
    if y != 0 {
        ring.push((x, -y));
    }
    if x != 0 && y != 0 {
        ring.push((-x, -y));
    }
}
