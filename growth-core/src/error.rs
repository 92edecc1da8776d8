//! Error types for growth-core.
//!
//! Every variant here is a configuration error: detected while building a
//! [`crate::engine::GrowthEngine`], reported once, never retried. Contract
//! violations inside a running simulation (out-of-bounds cell spawn,
//! multiplying an exhausted cell, bookkeeping mismatches) panic at the
//! point of detection instead: they indicate a bug, not a bad config.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    /// Circle table built with an inner radius beyond the outer one.
    #[error("inner circle radius {inner} exceeds outer radius {outer}")]
    InvalidRadii { inner: u32, outer: u32 },

    /// Pixel size does not divide the window into a homogeneous grid.
    #[error("pixel size {pixel_size} does not evenly divide the {window_width}x{window_height} window")]
    PixelSize {
        window_width: u32,
        window_height: u32,
        pixel_size: u32,
    },

    /// The derived grid is too small to carry the unit-square mapping.
    #[error("grid of {size_x}x{size_y} cells is degenerate; need at least 2x2")]
    GridTooSmall { size_x: i32, size_y: i32 },

    /// Attraction factors below 1 would deplete the field around seeds.
    #[error("attraction factor {0} must be at least 1")]
    AttractFactor(f32),

    /// Deterrence factors outside [0, 1] would amplify instead of deter.
    #[error("deterrence factor {0} must lie in [0, 1]")]
    DeterFactor(f32),

    /// A step must run at least one internal iteration.
    #[error("stride {0} must be at least 1")]
    Stride(u32),

    /// The potential function produced a value the field cannot hold.
    #[error("potential function returned {value} at grid cell ({i}, {j}); potentials must be non-negative")]
    NegativePotential { i: i32, j: i32, value: f32 },

    /// A configured cell coordinate lies outside the logical grid.
    #[error("cell ({i}, {j}) lies outside the {size_x}x{size_y} grid")]
    OutOfBounds {
        i: i32,
        j: i32,
        size_x: i32,
        size_y: i32,
    },
}
