use crate::simulation::SimulationError;
use serde::{Deserialize, Serialize};

/// Simulation probabilities, all in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestSettings {
    /// Initial tree density, consulted only when (re)seeding the forest
    pub p_tree: f64,
    /// Chance per tick that a tree with no burning neighbor catches fire
    pub p_fire: f64,
    /// Chance per tick that an empty cell grows a new tree
    pub p_grow: f64,
}

impl Default for ForestSettings {
    fn default() -> Self {
        Self {
            p_tree: 0.5,
            p_fire: 0.001,
            p_grow: 0.01,
        }
    }
}

impl ForestSettings {
    /// Check every probability against [0, 1]; NaN is rejected as well
    pub fn validate(&self) -> Result<(), SimulationError> {
        check_probability("p_tree", self.p_tree)?;
        check_probability("p_fire", self.p_fire)?;
        check_probability("p_grow", self.p_grow)?;
        Ok(())
    }

    /// Replace the spontaneous-ignition probability.
    /// Out-of-range values fail with `InvalidParameter`; never clamped.
    pub fn set_fire_probability(&mut self, value: f64) -> Result<(), SimulationError> {
        self.p_fire = check_probability("p_fire", value)?;
        Ok(())
    }

    /// Replace the regrowth probability.
    /// Out-of-range values fail with `InvalidParameter`; never clamped.
    pub fn set_growth_probability(&mut self, value: f64) -> Result<(), SimulationError> {
        self.p_grow = check_probability("p_grow", value)?;
        Ok(())
    }

    /// Replace the tree density used at the next reseed.
    /// Out-of-range values fail with `InvalidParameter`; never clamped.
    pub fn set_tree_density(&mut self, value: f64) -> Result<(), SimulationError> {
        self.p_tree = check_probability("p_tree", value)?;
        Ok(())
    }

    /// Nudge the spontaneous-ignition probability, clamped to [0, 1].
    /// The clamping adjusters back the interactive controls; programmatic
    /// callers use the fallible `set_*` methods instead.
    pub fn adjust_fire_probability(&mut self, delta: f64) {
        self.p_fire = (self.p_fire + delta).clamp(0.0, 1.0);
    }

    /// Nudge the regrowth probability, clamped to [0, 1]
    pub fn adjust_growth_probability(&mut self, delta: f64) {
        self.p_grow = (self.p_grow + delta).clamp(0.0, 1.0);
    }

    /// Nudge the reseed tree density, clamped to [0, 1]
    pub fn adjust_tree_density(&mut self, delta: f64) {
        self.p_tree = (self.p_tree + delta).clamp(0.0, 1.0);
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<f64, SimulationError> {
    // NaN fails the range check as well
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SimulationError::InvalidParameter { name, value })
    }
}
