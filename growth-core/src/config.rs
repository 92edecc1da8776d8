use glam::Vec2;

use crate::error::GrowthError;

/// Potential over the unit square `[-1, 1]^2`. Must never go negative.
pub type PotentialFn = fn(Vec2) -> f32;

/// Run configuration for a growth simulation.
///
/// Constructed explicitly and handed to
/// [`GrowthEngine::new`](crate::engine::GrowthEngine::new), which
/// validates it once and threads it into every cell operation. Grid
/// dimensions are derived from the window: `window / pixel_size` cells
/// per axis, so cells have integer coordinates and the viewer can map
/// them back to pixels without rounding.
#[derive(Clone, Debug)]
pub struct GrowthConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Side length of one grid cell in pixels. Rendering-only; the core
    /// uses it solely to derive the grid dimensions.
    pub pixel_size: u32,
    /// Internal iterations per external `step()` tick.
    pub stride: u32,
    /// Multiplier applied to a new cell's surroundings; >= 1.
    pub attract_factor: f32,
    /// Radius of the attraction rings. Values below 2 disable the rings;
    /// the 4-neighborhood attraction always applies.
    pub attract_radius: u32,
    /// Multiplier applied around an aging cell; in [0, 1].
    pub deter_factor: f32,
    /// Radius of the deterrence rings. Values below 2 disable them.
    pub deter_radius: u32,
    /// Age at which a cell deters growth in its rings once. 0 disables.
    pub deter_age: u32,
    /// Potential over `[-1, 1]^2`; sampled once per grid cell at startup.
    pub potential: PotentialFn,
    /// Seed cells, in grid coordinates.
    pub initial_cells: Vec<(i32, i32)>,
    /// RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        let mut cfg = Self {
            window_width: 800,
            window_height: 800,
            pixel_size: 4,
            stride: 1,
            attract_factor: 10.0,
            attract_radius: 2,
            deter_factor: 0.9,
            deter_radius: 10,
            deter_age: 3,
            potential: |p| 0.5 * (p.y + 1.0),
            initial_cells: Vec::new(),
            seed: None,
        };
        // One seed at the bottom-center of the grid, where the default
        // potential vanishes, so growth climbs toward the top edge.
        cfg.initial_cells
            .push((cfg.grid_size_x() / 2, cfg.grid_size_y() - 1));
        cfg
    }
}

impl GrowthConfig {
    /// Grid width in cells.
    pub fn grid_size_x(&self) -> i32 {
        (self.window_width / self.pixel_size.max(1)) as i32
    }

    /// Grid height in cells.
    pub fn grid_size_y(&self) -> i32 {
        (self.window_height / self.pixel_size.max(1)) as i32
    }

    /// Whether `(i, j)` lies inside the logical grid.
    pub fn in_bounds(&self, i: i32, j: i32) -> bool {
        i >= 0 && j >= 0 && i < self.grid_size_x() && j < self.grid_size_y()
    }

    /// Largest ring radius any cell operation can touch.
    pub fn max_ring_radius(&self) -> u32 {
        self.attract_radius.max(self.deter_radius)
    }

    /// Maps grid coordinates onto `[-1, 1]^2`, the potential's domain.
    ///
    /// `j` grows downward on the grid, so the unit-square y axis is
    /// flipped: row 0 maps to `y = 1`, the bottom row to `y = -1`.
    pub fn grid_to_unit(&self, i: i32, j: i32) -> Vec2 {
        let cx = 0.5 * (self.grid_size_x() - 1) as f32;
        let cy = 0.5 * (self.grid_size_y() - 1) as f32;
        Vec2::new((i as f32 - cx) / cx, (j as f32 - cy) / -cy)
    }

    /// Maps a point of `[-1, 1]^2` back onto (fractional) grid coordinates.
    pub fn unit_to_grid(&self, p: Vec2) -> Vec2 {
        let cx = 0.5 * (self.grid_size_x() - 1) as f32;
        let cy = 0.5 * (self.grid_size_y() - 1) as f32;
        Vec2::new(p.x * cx + cx, p.y * -cy + cy)
    }

    /// Startup validation; see the error variants for the taxonomy.
    pub fn validate(&self) -> Result<(), GrowthError> {
        if self.pixel_size == 0
            || self.window_width % self.pixel_size != 0
            || self.window_height % self.pixel_size != 0
        {
            return Err(GrowthError::PixelSize {
                window_width: self.window_width,
                window_height: self.window_height,
                pixel_size: self.pixel_size,
            });
        }
        if self.grid_size_x() < 2 || self.grid_size_y() < 2 {
            return Err(GrowthError::GridTooSmall {
                size_x: self.grid_size_x(),
                size_y: self.grid_size_y(),
            });
        }
        if !(self.attract_factor >= 1.0) {
            return Err(GrowthError::AttractFactor(self.attract_factor));
        }
        if !(0.0..=1.0).contains(&self.deter_factor) {
            return Err(GrowthError::DeterFactor(self.deter_factor));
        }
        if self.stride == 0 {
            return Err(GrowthError::Stride(self.stride));
        }
        for &(i, j) in &self.initial_cells {
            if !self.in_bounds(i, j) {
                return Err(GrowthError::OutOfBounds {
                    i,
                    j,
                    size_x: self.grid_size_x(),
                    size_y: self.grid_size_y(),
                });
            }
        }
        Ok(())
    }
}
