//! The simulation driver.
//!
//! [`GrowthEngine`] owns everything a run needs (configuration, the
//! potential field, the circle offset table, the RNG and the live-cell
//! collection) and advances them in discrete steps. The typical
//! consumer loop is:
//! 1. [`GrowthEngine::new`] with a validated [`GrowthConfig`].
//! 2. Once per tick, [`GrowthEngine::step`].
//! 3. Read [`GrowthEngine::live_cells`] and render.
//!
//! Everything is single-threaded and non-blocking; a quiescent engine
//! (no live cells) makes `step` a cheap no-op.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cell::Cell;
use crate::circle::CircleIndices;
use crate::config::GrowthConfig;
use crate::error::GrowthError;
use crate::field::PotentialField;

/// Owns and advances one growth simulation.
#[derive(Debug)]
pub struct GrowthEngine {
    cfg: GrowthConfig,
    field: PotentialField,
    circles: CircleIndices,
    cells: Vec<Cell>,
    rng: StdRng,
    ticks: u64,
}

impl GrowthEngine {
    /// Builds the field, the circle table and the initial cells from a
    /// configuration.
    ///
    /// This is the single initialization boundary: the configuration is
    /// validated here (see [`GrowthConfig::validate`]), the potential
    /// function is sampled over the whole grid (a negative sample is a
    /// configuration error), and every configured seed cell is spawned.
    ///
    /// ### Returns
    /// The ready engine, or the first [`GrowthError`] encountered.
    pub fn new(cfg: GrowthConfig) -> Result<Self, GrowthError> {
        cfg.validate()?;

        // Pad by the largest ring radius so ring writes of boundary
        // cells land in the buffer instead of faulting.
        let buf = cfg.max_ring_radius().max(1) as usize;
        let mut field = PotentialField::new(
            cfg.grid_size_x() as usize,
            cfg.grid_size_y() as usize,
            buf,
            0.0,
            0.0,
        );
        for i in 0..cfg.grid_size_x() {
            for j in 0..cfg.grid_size_y() {
                let value = (cfg.potential)(cfg.grid_to_unit(i, j));
                if value < 0.0 {
                    return Err(GrowthError::NegativePotential { i, j, value });
                }
                field.set(i, j, value);
            }
        }

        // The table is indexed from radius 2 up; with both radii below 2
        // it is never consulted, a minimal table keeps the plumbing
        // uniform.
        let circles = CircleIndices::new(2, cfg.max_ring_radius().max(2))?;

        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut engine = Self {
            cfg,
            field,
            circles,
            cells: Vec::new(),
            rng,
            ticks: 0,
        };
        for (i, j) in engine.cfg.initial_cells.clone() {
            engine.cells.push(Cell::new(
                i,
                j,
                &mut engine.field,
                &engine.circles,
                &engine.cfg,
            ));
        }

        log::info!(
            "growth engine ready: {}x{} grid, {} seed cells, stride {}",
            engine.cfg.grid_size_x(),
            engine.cfg.grid_size_y(),
            engine.cells.len(),
            engine.cfg.stride,
        );
        Ok(engine)
    }

    /// Advances the simulation by one external tick (`stride` internal
    /// iterations).
    pub fn step(&mut self) {
        for _ in 0..self.cfg.stride {
            if !self.advance() {
                break;
            }
        }
        self.ticks += 1;
    }

    /// One internal iteration: prune, rank, multiply.
    ///
    /// 1. Every live cell surveys its neighborhood; cells reporting no
    ///    free neighbor are removed. The bookkeeping invariant
    ///    `remaining + removed == before` is asserted.
    /// 2. With no survivors the iteration ends early; that is the
    ///    quiescent, successfully-terminated state, not an error.
    /// 3. Survivors are ranked by summed neighbor potential and the top
    ///    half (rounded up, at least one) multiplies; their offspring
    ///    join the live set. Unselected cells simply stay alive.
    ///
    /// ### Returns
    /// `false` once no live cells remain, `true` otherwise.
    fn advance(&mut self) -> bool {
        if self.cells.is_empty() {
            return false;
        }
        let before = self.cells.len();
        let Self {
            cfg,
            field,
            circles,
            cells,
            rng,
            ..
        } = self;

        let mut removed = 0usize;
        cells.retain_mut(|cell| {
            let alive = cell.can_multiply(field, circles, cfg);
            if !alive {
                removed += 1;
            }
            alive
        });
        assert_eq!(
            cells.len() + removed,
            before,
            "live-cell bookkeeping diverged during pruning"
        );

        if cells.is_empty() {
            log::debug!("growth terminated after {} ticks: no live cells", self.ticks);
            return false;
        }

        cells.sort_unstable_by(|a, b| b.sum_pot().total_cmp(&a.sum_pot()));
        let selected = cells.len().div_ceil(2);

        let mut offspring = Vec::with_capacity(selected);
        for cell in &cells[..selected] {
            offspring.push(cell.multiply(field, circles, cfg, rng));
        }
        cells.append(&mut offspring);
        true
    }

    /// Spawns an extra seed cell mid-run.
    ///
    /// Unlike [`Cell::new`] this validates the coordinate and reports it
    /// as a configuration error, so interactive consumers can feed it
    /// unchecked input.
    pub fn add_seed(&mut self, i: i32, j: i32) -> Result<(), GrowthError> {
        if !self.cfg.in_bounds(i, j) {
            return Err(GrowthError::OutOfBounds {
                i,
                j,
                size_x: self.cfg.grid_size_x(),
                size_y: self.cfg.grid_size_y(),
            });
        }
        let cell = Cell::new(i, j, &mut self.field, &self.circles, &self.cfg);
        self.cells.push(cell);
        Ok(())
    }

    /// Positions of all live cells.
    pub fn live_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().map(Cell::pos)
    }

    /// The live cells themselves, for consumers that inspect age or
    /// potential.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Read access to the potential field.
    pub fn field(&self) -> &PotentialField {
        &self.field
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> &GrowthConfig {
        &self.cfg
    }

    /// External ticks advanced so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether growth has terminated (no live cells remain).
    pub fn is_quiescent(&self) -> bool {
        self.cells.is_empty()
    }
}
