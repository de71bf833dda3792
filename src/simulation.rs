use crate::settings::ForestSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Offsets of the four orthogonal neighbors, wrapped toroidally at the edges
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Tree,
    Fire,
    Empty,
}

/// Error kinds surfaced by the simulation core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationError {
    /// A probability outside [0, 1] or a zero grid dimension
    InvalidParameter { name: &'static str, value: f64 },
    /// A coordinate outside the grid
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidParameter { name, value } => {
                write!(f, "invalid parameter {}: {} is out of range", name, value)
            }
            SimulationError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(f, "({}, {}) is outside the {}x{} grid", x, y, width, height)
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Outcome of an ignition request. `NotIgnitable` is a benign result,
/// not an error: only trees can be set alight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgniteOutcome {
    Ignited,
    NotIgnitable,
}

/// Forest-fire automaton on a toroidal grid
#[derive(Debug)]
pub struct ForestSimulation {
    pub width: usize,
    pub height: usize,
    /// Current cell states, row-major (`y * width + x`)
    grid: Vec<Cell>,
    /// Write buffer for the next tick; swapped in once every cell is decided
    scratch: Vec<Cell>,
    /// Simulation probabilities
    pub settings: ForestSettings,
    /// Ticks completed since the last (re)seed
    pub generation: u64,
    pub paused: bool,
    pub tree_count: usize,
    pub fire_count: usize,
    rng: StdRng,
}

impl ForestSimulation {
    /// Create a simulation and seed the forest from `settings.p_tree`.
    /// No cell is ever seeded burning.
    pub fn new(
        width: usize,
        height: usize,
        settings: ForestSettings,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        if width == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "width",
                value: 0.0,
            });
        }
        if height == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "height",
                value: 0.0,
            });
        }
        settings.validate()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sim = Self {
            width,
            height,
            grid: vec![Cell::Empty; width * height],
            scratch: vec![Cell::Empty; width * height],
            settings,
            generation: 0,
            paused: false,
            tree_count: 0,
            fire_count: 0,
            rng,
        };
        sim.seed_forest();
        Ok(sim)
    }

    /// Re-seed every cell from the current tree density
    fn seed_forest(&mut self) {
        let p_tree = self.settings.p_tree;
        let mut trees = 0;
        for cell in &mut self.grid {
            *cell = if self.rng.gen_bool(p_tree) {
                trees += 1;
                Cell::Tree
            } else {
                Cell::Empty
            };
        }
        self.tree_count = trees;
        self.fire_count = 0;
        self.generation = 0;
    }

    /// Advance the automaton by one tick.
    ///
    /// Every transition reads the grid as it existed when the call began;
    /// results land in the scratch buffer, which becomes the live grid only
    /// after all cells are decided. A cell ignited this tick therefore never
    /// spreads fire within the same tick.
    pub fn step(&mut self) {
        let p_fire = self.settings.p_fire;
        let p_grow = self.settings.p_grow;
        let mut trees = 0;
        let mut fires = 0;

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let next = match self.grid[idx] {
                    // Fire always burns out after exactly one tick
                    Cell::Fire => Cell::Empty,
                    Cell::Tree => {
                        // A burning neighbor ignites unconditionally; the
                        // spontaneous draw is skipped in that case
                        if self.has_burning_neighbor(x, y) || self.rng.gen_bool(p_fire) {
                            Cell::Fire
                        } else {
                            Cell::Tree
                        }
                    }
                    Cell::Empty => {
                        if self.rng.gen_bool(p_grow) {
                            Cell::Tree
                        } else {
                            Cell::Empty
                        }
                    }
                };
                match next {
                    Cell::Tree => trees += 1,
                    Cell::Fire => fires += 1,
                    Cell::Empty => {}
                }
                self.scratch[idx] = next;
            }
        }

        std::mem::swap(&mut self.grid, &mut self.scratch);
        self.tree_count = trees;
        self.fire_count = fires;
        self.generation += 1;
    }

    /// True if any of the four orthogonal toroidal neighbors is burning
    fn has_burning_neighbor(&self, x: usize, y: usize) -> bool {
        NEIGHBOR_OFFSETS.iter().any(|&(dx, dy)| {
            let nx = (x as i32 + dx).rem_euclid(self.width as i32) as usize;
            let ny = (y as i32 + dy).rem_euclid(self.height as i32) as usize;
            self.grid[ny * self.width + nx] == Cell::Fire
        })
    }

    /// Set the tree at (x, y) alight. Fire and empty cells are left
    /// untouched and reported as `NotIgnitable`.
    pub fn ignite(&mut self, x: usize, y: usize) -> Result<IgniteOutcome, SimulationError> {
        if x >= self.width || y >= self.height {
            return Err(SimulationError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let idx = y * self.width + x;
        match self.grid[idx] {
            Cell::Tree => {
                self.grid[idx] = Cell::Fire;
                self.tree_count -= 1;
                self.fire_count += 1;
                Ok(IgniteOutcome::Ignited)
            }
            Cell::Fire | Cell::Empty => Ok(IgniteOutcome::NotIgnitable),
        }
    }

    /// Read-only view of the current grid, row-major
    pub fn snapshot(&self) -> &[Cell] {
        &self.grid
    }

    /// Cell state at (x, y), or None outside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.grid[y * self.width + x])
        } else {
            None
        }
    }

    pub fn empty_count(&self) -> usize {
        self.width * self.height - self.tree_count - self.fire_count
    }

    /// Re-randomize the forest from the current tree density
    pub fn reset(&mut self) {
        self.seed_forest();
        self.paused = false;
    }

    /// Resize the grid and re-seed it
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        if new_width != self.width || new_height != self.height {
            self.width = new_width.max(1);
            self.height = new_height.max(1);
            self.grid = vec![Cell::Empty; self.width * self.height];
            self.scratch = vec![Cell::Empty; self.width * self.height];
            self.reset();
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_settings(p_tree: f64) -> ForestSettings {
        ForestSettings {
            p_tree,
            p_fire: 0.0,
            p_grow: 0.0,
        }
    }

    /// All-tree simulation with no spontaneous activity
    fn all_trees(width: usize, height: usize) -> ForestSimulation {
        ForestSimulation::new(width, height, quiet_settings(1.0), Some(7)).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        let err = ForestSimulation::new(0, 10, quiet_settings(0.5), None).unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidParameter {
                name: "width",
                value: 0.0
            }
        );
        let err = ForestSimulation::new(10, 0, quiet_settings(0.5), None).unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidParameter {
                name: "height",
                value: 0.0
            }
        );
    }

    #[test]
    fn test_new_rejects_out_of_range_density() {
        let err = ForestSimulation::new(4, 4, quiet_settings(1.5), None).unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidParameter {
                name: "p_tree",
                value: 1.5
            }
        );
    }

    #[test]
    fn test_seeding_never_produces_fire() {
        let sim = ForestSimulation::new(16, 16, quiet_settings(0.5), Some(3)).unwrap();
        assert!(sim.snapshot().iter().all(|&c| c != Cell::Fire));
        assert_eq!(sim.fire_count, 0);
    }

    #[test]
    fn test_density_extremes() {
        let full = all_trees(8, 8);
        assert!(full.snapshot().iter().all(|&c| c == Cell::Tree));
        assert_eq!(full.tree_count, 64);

        let bare = ForestSimulation::new(8, 8, quiet_settings(0.0), Some(7)).unwrap();
        assert!(bare.snapshot().iter().all(|&c| c == Cell::Empty));
        assert_eq!(bare.empty_count(), 64);
    }

    #[test]
    fn test_fire_always_burns_out_in_one_tick() {
        let mut sim = all_trees(5, 5);
        sim.ignite(2, 2).unwrap();
        sim.step();
        assert_eq!(sim.cell(2, 2), Some(Cell::Empty));
        sim.step();
        assert_eq!(sim.cell(2, 2), Some(Cell::Empty));
    }

    #[test]
    fn test_burning_neighbor_ignites_even_with_zero_fire_probability() {
        // Adjacency takes precedence over the spontaneous draw: a draw that
        // could never fire (p_fire = 0) must not prevent ignition.
        let mut sim = all_trees(5, 5);
        sim.ignite(2, 2).unwrap();
        sim.step();
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert_eq!(sim.cell(x, y), Some(Cell::Fire), "neighbor ({}, {})", x, y);
        }
    }

    #[test]
    fn test_tree_without_fire_neighbor_never_ignites_at_zero_probability() {
        let mut sim = all_trees(5, 5);
        sim.ignite(2, 2).unwrap();
        sim.step();
        // (0, 0) is not orthogonally adjacent to (2, 2) on a 5x5 torus
        assert_eq!(sim.cell(0, 0), Some(Cell::Tree));
        assert_eq!(sim.cell(4, 4), Some(Cell::Tree));
    }

    #[test]
    fn test_empty_never_grows_at_zero_probability() {
        let mut sim = ForestSimulation::new(6, 6, quiet_settings(0.0), Some(1)).unwrap();
        for _ in 0..5 {
            sim.step();
        }
        assert!(sim.snapshot().iter().all(|&c| c == Cell::Empty));
    }

    #[test]
    fn test_certain_spontaneous_ignition() {
        let settings = ForestSettings {
            p_tree: 1.0,
            p_fire: 1.0,
            p_grow: 0.0,
        };
        let mut sim = ForestSimulation::new(4, 4, settings, Some(1)).unwrap();
        sim.step();
        assert!(sim.snapshot().iter().all(|&c| c == Cell::Fire));
    }

    #[test]
    fn test_certain_regrowth() {
        let settings = ForestSettings {
            p_tree: 0.0,
            p_fire: 0.0,
            p_grow: 1.0,
        };
        let mut sim = ForestSimulation::new(4, 4, settings, Some(1)).unwrap();
        sim.step();
        assert!(sim.snapshot().iter().all(|&c| c == Cell::Tree));
    }

    #[test]
    fn test_horizontal_toroidal_wrap() {
        let mut sim = all_trees(5, 5);
        sim.ignite(0, 2).unwrap();
        sim.step();
        // Fire in column 0 must reach the tree in the last column via wrap
        assert_eq!(sim.cell(4, 2), Some(Cell::Fire));
    }

    #[test]
    fn test_vertical_toroidal_wrap() {
        let mut sim = all_trees(5, 5);
        sim.ignite(2, 0).unwrap();
        sim.step();
        assert_eq!(sim.cell(2, 4), Some(Cell::Fire));
    }

    #[test]
    fn test_ignite_changes_exactly_one_cell() {
        let mut sim = ForestSimulation::new(8, 8, quiet_settings(0.5), Some(11)).unwrap();
        let before: Vec<Cell> = sim.snapshot().to_vec();
        let idx = before.iter().position(|&c| c == Cell::Tree).unwrap();
        let (x, y) = (idx % 8, idx / 8);
        assert_eq!(sim.ignite(x, y), Ok(IgniteOutcome::Ignited));
        let after = sim.snapshot();
        for (i, (&b, &a)) in before.iter().zip(after.iter()).enumerate() {
            if i == idx {
                assert_eq!(a, Cell::Fire);
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_ignite_is_a_no_op_on_empty_and_fire() {
        let mut sim = ForestSimulation::new(4, 4, quiet_settings(0.0), Some(2)).unwrap();
        assert_eq!(sim.ignite(1, 1), Ok(IgniteOutcome::NotIgnitable));
        assert!(sim.snapshot().iter().all(|&c| c == Cell::Empty));

        let mut sim = all_trees(4, 4);
        sim.ignite(1, 1).unwrap();
        let before: Vec<Cell> = sim.snapshot().to_vec();
        assert_eq!(sim.ignite(1, 1), Ok(IgniteOutcome::NotIgnitable));
        assert_eq!(sim.snapshot(), before.as_slice());
    }

    #[test]
    fn test_ignite_out_of_bounds_leaves_grid_unmodified() {
        let mut sim = all_trees(4, 4);
        let before: Vec<Cell> = sim.snapshot().to_vec();
        let err = sim.ignite(4, 0).unwrap_err();
        assert_eq!(
            err,
            SimulationError::OutOfBounds {
                x: 4,
                y: 0,
                width: 4,
                height: 4
            }
        );
        assert!(sim.ignite(0, 99).is_err());
        assert_eq!(sim.snapshot(), before.as_slice());
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let settings = ForestSettings {
            p_tree: 0.5,
            p_fire: 0.05,
            p_grow: 0.1,
        };
        let mut a = ForestSimulation::new(20, 20, settings, Some(42)).unwrap();
        let mut b = ForestSimulation::new(20, 20, settings, Some(42)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
        for _ in 0..10 {
            a.step();
            b.step();
            assert_eq!(a.snapshot(), b.snapshot());
        }
    }

    #[test]
    fn test_population_counts_track_the_grid() {
        let settings = ForestSettings {
            p_tree: 0.4,
            p_fire: 0.02,
            p_grow: 0.05,
        };
        let mut sim = ForestSimulation::new(12, 12, settings, Some(9)).unwrap();
        for _ in 0..6 {
            sim.step();
            let trees = sim.snapshot().iter().filter(|&&c| c == Cell::Tree).count();
            let fires = sim.snapshot().iter().filter(|&&c| c == Cell::Fire).count();
            assert_eq!(sim.tree_count, trees);
            assert_eq!(sim.fire_count, fires);
            assert_eq!(sim.empty_count(), 144 - trees - fires);
        }
    }

    #[test]
    fn test_three_by_three_two_step_scenario() {
        let mut sim = all_trees(3, 3);
        sim.ignite(1, 1).unwrap();

        sim.step();
        assert_eq!(sim.cell(1, 1), Some(Cell::Empty));
        for (x, y) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
            assert_eq!(sim.cell(x, y), Some(Cell::Fire));
        }
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert_eq!(sim.cell(x, y), Some(Cell::Tree));
        }

        // On a 3x3 torus every corner touches two of the burning edge
        // midpoints via wrap, so the second tick ignites all four corners
        // while the first wave burns out.
        sim.step();
        assert_eq!(sim.cell(1, 1), Some(Cell::Empty));
        for (x, y) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
            assert_eq!(sim.cell(x, y), Some(Cell::Empty));
        }
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert_eq!(sim.cell(x, y), Some(Cell::Fire));
        }
    }

    #[test]
    fn test_reset_reseeds_and_clears_generation() {
        let mut sim = all_trees(6, 6);
        sim.ignite(3, 3).unwrap();
        sim.step();
        assert!(sim.generation > 0);
        sim.reset();
        assert_eq!(sim.generation, 0);
        assert_eq!(sim.fire_count, 0);
        assert!(sim.snapshot().iter().all(|&c| c == Cell::Tree));
    }

    #[test]
    fn test_resize_reallocates_and_reseeds() {
        let mut sim = all_trees(4, 4);
        sim.resize(6, 3);
        assert_eq!(sim.width, 6);
        assert_eq!(sim.height, 3);
        assert_eq!(sim.snapshot().len(), 18);
        assert_eq!(sim.tree_count, 18);
    }

    #[test]
    fn test_cell_query_bounds() {
        let sim = all_trees(4, 4);
        assert_eq!(sim.cell(3, 3), Some(Cell::Tree));
        assert_eq!(sim.cell(4, 0), None);
        assert_eq!(sim.cell(0, 4), None);
    }
}
