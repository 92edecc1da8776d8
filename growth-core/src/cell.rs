//! The growth agent.
//!
//! A [`Cell`] occupies one grid coordinate for its whole life. Each
//! simulation step it re-enters its surveying phase
//! (`Spawned -> Surveying -> Alive | Dead`): [`Cell::can_multiply`]
//! scores the four orthogonal neighbors, and a cell whose summed
//! neighbor potential has collapsed to zero is surrounded by occupied or
//! depleted ground and is pruned by the engine. Survivors picked by the
//! engine spawn one offspring each via [`Cell::multiply`].
//!
//! Cells hold no reference to the field or the ring table; the engine
//! owns both and passes them into every operation.

use rand::Rng;

use crate::circle::CircleIndices;
use crate::config::GrowthConfig;
use crate::field::PotentialField;
use crate::sample::categorical_index;

/// Orthogonal neighbor offsets in the survey and selection order:
/// right, above, left, below (`j` grows downward).
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];

/// One live growth point.
#[derive(Debug)]
pub struct Cell {
    i: i32,
    j: i32,
    age: u32,
    neighbor_pot: [f32; 4],
    sum_pot: f32,
    alive: bool,
}

impl Cell {
    /// Spawns a cell at `(i, j)`, claiming that grid cell.
    ///
    /// The cell's own potential is zeroed so no later cell can be drawn
    /// onto it, the four orthogonal neighbors are scaled by the
    /// attraction factor, and for an attraction radius of at least 2
    /// each surrounding ring is scaled by the factor decayed linearly
    /// with ring distance.
    ///
    /// ### Panics
    /// Panics if `(i, j)` lies outside the logical grid; the engine
    /// validates configured seeds before construction, so reaching this
    /// is a caller bug.
    pub fn new(
        i: i32,
        j: i32,
        field: &mut PotentialField,
        circles: &CircleIndices,
        cfg: &GrowthConfig,
    ) -> Self {
        assert!(
            cfg.in_bounds(i, j),
            "spawned a cell out of bounds at ({i}, {j})"
        );

        // No cell can overlap another: occupied ground has no potential.
        field.set(i, j, 0.0);

        for (di, dj) in NEIGHBOR_OFFSETS {
            field.scale(i + di, j + dj, cfg.attract_factor);
        }
        if cfg.attract_radius >= 2 {
            let radius = cfg.attract_radius as f32;
            for k in 0..=(cfg.attract_radius - 2) {
                let factor = cfg.attract_factor * (radius - k as f32) / radius;
                for &(dx, dy) in circles.ring(k as usize) {
                    field.scale(i + dx, j + dy, factor);
                }
            }
        }

        Self {
            i,
            j,
            age: 0,
            neighbor_pot: [0.0; 4],
            sum_pot: 0.0,
            alive: true,
        }
    }

    /// Grid coordinate.
    pub fn pos(&self) -> (i32, i32) {
        (self.i, self.j)
    }

    /// Number of surveys this cell has gone through.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Summed neighbor potential from the most recent survey.
    pub fn sum_pot(&self) -> f32 {
        self.sum_pot
    }

    /// Surveys the neighborhood and decides whether the cell stays alive.
    ///
    /// Ages the cell by one survey. The first time the age reaches the
    /// configured deterrence age, the deterrence rings are scaled once:
    /// ring `k` (radius `k + 2`) by `deter_factor * (k + 2) / radius`.
    /// The multiplier grows toward `deter_factor` with distance, so the
    /// strongest reduction lands on the nearest ring; this matches the
    /// observed behavior of the growth patterns this engine reproduces.
    ///
    /// The survey itself is read-only: the four orthogonal neighbor
    /// potentials are recorded and summed. Returns whether the sum is
    /// strictly positive; `false` means the cell must be pruned.
    pub fn can_multiply(
        &mut self,
        field: &mut PotentialField,
        circles: &CircleIndices,
        cfg: &GrowthConfig,
    ) -> bool {
        self.age += 1;
        if self.age == cfg.deter_age && cfg.deter_radius >= 2 {
            let radius = cfg.deter_radius as f32;
            for k in 0..=(cfg.deter_radius - 2) {
                let factor = cfg.deter_factor * (k + 2) as f32 / radius;
                for &(dx, dy) in circles.ring(k as usize) {
                    field.scale(self.i + dx, self.j + dy, factor);
                }
            }
        }

        for (idx, (di, dj)) in NEIGHBOR_OFFSETS.iter().enumerate() {
            self.neighbor_pot[idx] = field.get(self.i + di, self.j + dj);
        }
        self.sum_pot = self.neighbor_pot.iter().sum();

        self.alive = self.sum_pot > 0.0;
        self.alive
    }

    /// The surveyed neighbor potentials normalized to probabilities.
    ///
    /// Only meaningful after a survey with a positive sum.
    pub fn neighbor_distribution(&self) -> [f32; 4] {
        self.neighbor_pot.map(|p| p / self.sum_pot)
    }

    /// Spawns one offspring at a neighbor drawn proportionally to the
    /// surveyed potentials.
    ///
    /// On floating-point rounding overrun the draw clamps to the last
    /// neighbor instead of failing.
    ///
    /// ### Panics
    /// Panics if the last survey found no free neighbor (summed
    /// potential <= 0); the engine only multiplies cells that passed
    /// [`Cell::can_multiply`] this step.
    pub fn multiply(
        &self,
        field: &mut PotentialField,
        circles: &CircleIndices,
        cfg: &GrowthConfig,
        rng: &mut impl Rng,
    ) -> Cell {
        assert!(
            self.alive && self.sum_pot > 0.0,
            "multiply called on a cell at ({}, {}) with no free neighbors",
            self.i,
            self.j
        );

        let probs = self.neighbor_distribution();
        let chosen = categorical_index(&probs, rng.random::<f32>());
        let (di, dj) = NEIGHBOR_OFFSETS[chosen];
        Cell::new(self.i + di, self.j + dj, field, circles, cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// 10x10 grid with a potential rising from 0 at the bottom row to 1
    /// at the top row, ring mechanisms off unless a test opts in.
    fn cfg() -> GrowthConfig {
        GrowthConfig {
            window_width: 10,
            window_height: 10,
            pixel_size: 1,
            attract_factor: 10.0,
            attract_radius: 0,
            deter_factor: 0.9,
            deter_radius: 0,
            deter_age: 0,
            initial_cells: Vec::new(),
            ..GrowthConfig::default()
        }
    }

    fn field_for(cfg: &GrowthConfig) -> PotentialField {
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
                field.set(i, j, (cfg.potential)(cfg.grid_to_unit(i, j)));
            }
        }
        field
    }

    fn circles_for(cfg: &GrowthConfig) -> CircleIndices {
        CircleIndices::new(2, cfg.max_ring_radius().max(2)).unwrap()
    }

    #[test]
    fn construction_zeroes_the_claimed_cell() {
        let cfg = cfg();
        let circles = circles_for(&cfg);
        for (i, j) in [(0, 0), (9, 9), (4, 2), (0, 7)] {
            let mut field = field_for(&cfg);
            let _cell = Cell::new(i, j, &mut field, &circles, &cfg);
            assert_eq!(field.get(i, j), 0.0, "cell ({i}, {j}) left potential behind");
        }
    }

    #[test]
    fn construction_attracts_the_four_neighbors() {
        let cfg = cfg();
        let circles = circles_for(&cfg);
        let mut field = field_for(&cfg);
        let before: Vec<f32> = NEIGHBOR_OFFSETS
            .iter()
            .map(|(di, dj)| field.get(4 + di, 4 + dj))
            .collect();

        let _cell = Cell::new(4, 4, &mut field, &circles, &cfg);

        for (idx, (di, dj)) in NEIGHBOR_OFFSETS.iter().enumerate() {
            assert_eq!(field.get(4 + di, 4 + dj), before[idx] * 10.0);
        }
    }

    #[test]
    fn attraction_rings_decay_with_distance() {
        let cfg = GrowthConfig {
            attract_radius: 3,
            ..cfg()
        };
        let circles = circles_for(&cfg);
        let mut field = field_for(&cfg);
        let at = |f: &PotentialField, di: i32, dj: i32| f.get(4 + di, 4 + dj);
        let ring2_before = at(&field, 2, 0);
        let ring3_before = at(&field, 3, 0);

        let _cell = Cell::new(4, 4, &mut field, &circles, &cfg);

        // Ring at radius 2 gets the full factor, radius 3 two thirds.
        assert!((at(&field, 2, 0) - ring2_before * 10.0).abs() < 1e-5);
        assert!((at(&field, 3, 0) - ring3_before * 10.0 * 2.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn survey_is_idempotent_while_the_field_is_unchanged() {
        let cfg = cfg();
        let circles = circles_for(&cfg);
        let mut field = field_for(&cfg);
        let mut cell = Cell::new(4, 4, &mut field, &circles, &cfg);

        let first = cell.can_multiply(&mut field, &circles, &cfg);
        let sum = cell.sum_pot();
        for _ in 0..3 {
            assert_eq!(cell.can_multiply(&mut field, &circles, &cfg), first);
            assert_eq!(cell.sum_pot(), sum);
        }
        assert_eq!(cell.age(), 4);
    }

    #[test]
    fn deterrence_fires_once_at_the_configured_age() {
        let cfg = GrowthConfig {
            deter_radius: 3,
            deter_age: 2,
            deter_factor: 0.5,
            ..cfg()
        };
        let circles = circles_for(&cfg);
        let mut field = field_for(&cfg);
        let mut cell = Cell::new(4, 4, &mut field, &circles, &cfg);

        let ring2_fresh = field.get(6, 4);
        cell.can_multiply(&mut field, &circles, &cfg);
        assert_eq!(field.get(6, 4), ring2_fresh, "deterred before its age");

        // Age 2: ring at radius 2 scaled by 0.5 * 2 / 3 once.
        cell.can_multiply(&mut field, &circles, &cfg);
        let deterred = ring2_fresh * 0.5 * 2.0 / 3.0;
        assert!((field.get(6, 4) - deterred).abs() < 1e-5);

        // Later surveys leave the rings alone.
        cell.can_multiply(&mut field, &circles, &cfg);
        assert!((field.get(6, 4) - deterred).abs() < 1e-5);
    }

    #[test]
    fn neighbor_distribution_is_normalized() {
        let cfg = cfg();
        let circles = circles_for(&cfg);
        let mut field = field_for(&cfg);
        let mut cell = Cell::new(4, 4, &mut field, &circles, &cfg);

        assert!(cell.can_multiply(&mut field, &circles, &cfg));
        let sum: f32 = cell.neighbor_distribution().iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "probabilities sum to {sum}");
    }

    #[test]
    fn multiply_spawns_on_the_only_free_neighbor() {
        let cfg = cfg();
        let circles = circles_for(&cfg);
        let mut field = field_for(&cfg);
        // Bottom-center seed: left, right and below carry zero potential,
        // so the offspring must appear above.
        let mut cell = Cell::new(5, 9, &mut field, &circles, &cfg);
        assert!(cell.can_multiply(&mut field, &circles, &cfg));

        let mut rng = StdRng::seed_from_u64(7);
        let child = cell.multiply(&mut field, &circles, &cfg, &mut rng);
        assert_eq!(child.pos(), (5, 8));
        assert_eq!(field.get(5, 8), 0.0);
    }

    #[test]
    #[should_panic(expected = "no free neighbors")]
    fn multiply_on_an_exhausted_cell_panics() {
        let cfg = GrowthConfig {
            potential: |_| 0.0,
            ..cfg()
        };
        let circles = circles_for(&cfg);
        let mut field = field_for(&cfg);
        let mut cell = Cell::new(4, 4, &mut field, &circles, &cfg);
        assert!(!cell.can_multiply(&mut field, &circles, &cfg));

        let mut rng = StdRng::seed_from_u64(0);
        cell.multiply(&mut field, &circles, &cfg, &mut rng);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn construction_past_the_last_column_panics() {
        let cfg = cfg();
        let circles = circles_for(&cfg);
        let mut field = field_for(&cfg);
        Cell::new(cfg.grid_size_x(), 0, &mut field, &circles, &cfg);
    }
}
