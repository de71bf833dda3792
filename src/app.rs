use crate::blocks;
use crate::color::ColorScheme;
use crate::export::{self, GifRecorder};
use crate::presets::{Preset, PresetManager};
use crate::settings::ForestSettings;
use crate::simulation::{Cell, ForestSimulation, IgniteOutcome, SimulationError};
use std::path::Path;

/// Keyboard adjustment step for the spontaneous-ignition probability
const P_FIRE_STEP: f64 = 0.0005;
/// Keyboard adjustment step for the regrowth probability
const P_GROW_STEP: f64 = 0.005;
/// Keyboard adjustment step for the reseed tree density
const P_TREE_STEP: f64 = 0.05;
/// Frames a transient status message stays visible
const STATUS_TTL: u16 = 180;

/// Focus state for parameter editing in the sidebar
/// Alphabetically ordered for consistent UI display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    // Alphabetical order
    Burn,
    ColorScheme,
    Density,
    Growth,
    Speed,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Burn,
            Focus::Burn => Focus::ColorScheme,
            Focus::ColorScheme => Focus::Density,
            Focus::Density => Focus::Growth,
            Focus::Growth => Focus::Speed,
            Focus::Speed => Focus::Burn, // Loop back
        }
    }

    /// Shift+Tab cycles through parameters in reverse alphabetical order
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Speed,
            Focus::Burn => Focus::Speed, // Loop back
            Focus::ColorScheme => Focus::Burn,
            Focus::Density => Focus::ColorScheme,
            Focus::Growth => Focus::Density,
            Focus::Speed => Focus::Growth,
        }
    }

    /// Get the line index in the parameters box for this focus
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls => 0,
            Focus::Burn => 0,
            Focus::ColorScheme => 1,
            Focus::Density => 2,
            Focus::Growth => 3,
            Focus::Speed => 4,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state: the simulation controller plus the
/// presentation state around it
pub struct App {
    pub simulation: ForestSimulation,
    pub color_scheme: ColorScheme,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub steps_per_frame: usize,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    /// Grid follows the terminal size; off when dimensions came from the CLI
    pub auto_size: bool,
    pub presets: PresetManager,
    pub recorder: Option<GifRecorder>,
    status_message: Option<String>,
    status_ttl: u16,
}

impl App {
    /// Grid sized to the canvas; follows terminal resizes
    pub fn new(
        canvas_width: u16,
        canvas_height: u16,
        settings: ForestSettings,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        let (sim_width, sim_height) = blocks::calculate_simulation_size(canvas_width, canvas_height);
        let mut app = Self::with_grid_size(sim_width, sim_height, settings, seed)?;
        app.auto_size = true;
        Ok(app)
    }

    /// Fixed grid dimensions; terminal resizes only rescale the view
    pub fn with_grid_size(
        width: usize,
        height: usize,
        settings: ForestSettings,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        Ok(Self {
            simulation: ForestSimulation::new(width, height, settings, seed)?,
            color_scheme: ColorScheme::default(),
            focus: Focus::Controls,
            fullscreen_mode: false,
            steps_per_frame: 1,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            auto_size: false,
            presets: PresetManager::new(),
            recorder: None,
            status_message: None,
            status_ttl: 0,
        })
    }

    /// Advance the simulation for the current frame. Safe at any cadence;
    /// the frame loop decides how often this fires.
    pub fn tick(&mut self) {
        if self.status_ttl > 0 {
            self.status_ttl -= 1;
            if self.status_ttl == 0 {
                self.status_message = None;
            }
        }
        if self.simulation.paused {
            return;
        }
        for _ in 0..self.steps_per_frame {
            self.simulation.step();
        }
        if let Some(recorder) = &mut self.recorder {
            recorder.push_frame(&self.simulation, self.color_scheme);
        }
    }

    /// Forward an ignition request to the engine. Grid coordinates only;
    /// the mouse handler does the screen-to-grid translation.
    pub fn ignite_at(&mut self, x: usize, y: usize) -> Result<IgniteOutcome, SimulationError> {
        self.simulation.ignite(x, y)
    }

    /// Replace the spontaneous-ignition probability (fails on out-of-range)
    pub fn set_fire_probability(&mut self, value: f64) -> Result<(), SimulationError> {
        self.simulation.settings.set_fire_probability(value)
    }

    /// Replace the regrowth probability (fails on out-of-range)
    pub fn set_growth_probability(&mut self, value: f64) -> Result<(), SimulationError> {
        self.simulation.settings.set_growth_probability(value)
    }

    /// Read-only view of the current grid for rendering
    pub fn current_snapshot(&self) -> &[Cell] {
        self.simulation.snapshot()
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Burn => self.simulation.settings.adjust_fire_probability(P_FIRE_STEP),
            Focus::ColorScheme => self.color_scheme = self.color_scheme.next(),
            Focus::Density => self.simulation.settings.adjust_tree_density(P_TREE_STEP),
            Focus::Growth => self
                .simulation
                .settings
                .adjust_growth_probability(P_GROW_STEP),
            Focus::Speed => self.increase_speed(),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Burn => self
                .simulation
                .settings
                .adjust_fire_probability(-P_FIRE_STEP),
            Focus::ColorScheme => self.color_scheme = self.color_scheme.prev(),
            Focus::Density => self.simulation.settings.adjust_tree_density(-P_TREE_STEP),
            Focus::Growth => self
                .simulation
                .settings
                .adjust_growth_probability(-P_GROW_STEP),
            Focus::Speed => self.decrease_speed(),
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.simulation.toggle_pause();
    }

    /// Re-seed the forest from the current density
    pub fn reset(&mut self) {
        self.simulation.reset();
    }

    /// Ignite the center cell (keyboard fallback for mouse ignition)
    pub fn ignite_center(&mut self) {
        let x = self.simulation.width / 2;
        let y = self.simulation.height / 2;
        // In-bounds by construction
        let _ = self.simulation.ignite(x, y);
    }

    /// Cycle color scheme
    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme = self.color_scheme.next();
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    /// Resize simulation to match new canvas size (auto-size mode only)
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        if self.auto_size {
            let (sim_width, sim_height) =
                blocks::calculate_simulation_size(canvas_width, canvas_height);
            self.simulation.resize(sim_width, sim_height);
        }
    }

    /// Increase simulation speed
    pub fn increase_speed(&mut self) {
        self.steps_per_frame = (self.steps_per_frame + 1).min(50);
    }

    /// Decrease simulation speed
    pub fn decrease_speed(&mut self) {
        self.steps_per_frame = self.steps_per_frame.saturating_sub(1).max(1);
    }

    /// Apply a preset's probabilities and re-seed the forest
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.simulation.settings = preset.settings;
        self.simulation.reset();
        self.set_status(format!("Preset: {}", preset.name));
    }

    /// Apply the nth preset (digit keys), builtin first then user
    pub fn apply_preset_index(&mut self, index: usize) {
        let preset = self.presets.all_presets().nth(index).cloned();
        if let Some(preset) = preset {
            self.apply_preset(&preset);
        }
    }

    /// Save a PNG snapshot of the grid into the working directory
    pub fn export_snapshot(&mut self) {
        let result = export::save_snapshot(&self.simulation, self.color_scheme, Path::new("."));
        match result {
            Ok(path) => self.set_status(format!("Saved {}", path.display())),
            Err(err) => self.set_status(err),
        }
    }

    /// Start a GIF recording, or stop and write the file
    pub fn toggle_recording(&mut self) {
        match self.recorder.take() {
            Some(recorder) => match recorder.write(Path::new(".")) {
                Ok(path) => self.set_status(format!("Saved {}", path.display())),
                Err(err) => self.set_status(err),
            },
            None => {
                let mut recorder = GifRecorder::new(&self.simulation);
                // Capture the starting state as the first frame
                recorder.push_frame(&self.simulation, self.color_scheme);
                self.recorder = Some(recorder);
                self.set_status("Recording GIF".to_string());
            }
        }
    }

    /// Transient message shown in the canvas title
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_ttl = STATUS_TTL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let settings = ForestSettings {
            p_tree: 1.0,
            p_fire: 0.0,
            p_grow: 0.0,
        };
        App::with_grid_size(10, 10, settings, Some(8)).unwrap()
    }

    #[test]
    fn test_tick_advances_unless_paused() {
        let mut app = test_app();
        app.steps_per_frame = 3;
        app.tick();
        assert_eq!(app.simulation.generation, 3);
        app.toggle_pause();
        app.tick();
        assert_eq!(app.simulation.generation, 3);
    }

    #[test]
    fn test_probability_setters_validate() {
        let mut app = test_app();
        assert!(app.set_fire_probability(0.5).is_ok());
        assert_eq!(app.simulation.settings.p_fire, 0.5);
        assert!(app.set_fire_probability(1.5).is_err());
        assert_eq!(app.simulation.settings.p_fire, 0.5);
        assert!(app.set_growth_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_ignite_at_forwards_to_the_engine() {
        let mut app = test_app();
        assert_eq!(app.ignite_at(2, 2), Ok(IgniteOutcome::Ignited));
        assert_eq!(app.current_snapshot()[2 * 10 + 2], Cell::Fire);
        assert!(app.ignite_at(99, 0).is_err());
    }

    #[test]
    fn test_focus_cycle_visits_every_param() {
        let mut focus = Focus::Controls;
        let mut seen = 0;
        focus = focus.next();
        let start = focus;
        loop {
            assert!(focus.is_param());
            seen += 1;
            focus = focus.next();
            if focus == start {
                break;
            }
        }
        assert_eq!(seen, 5);
        assert_eq!(start.prev().next(), start);
    }

    #[test]
    fn test_adjust_focused_changes_the_focused_parameter() {
        let mut app = test_app();
        app.focus = Focus::Burn;
        app.adjust_focused_up();
        assert!(app.simulation.settings.p_fire > 0.0);
        app.adjust_focused_down();
        assert_eq!(app.simulation.settings.p_fire, 0.0);

        app.focus = Focus::Speed;
        app.adjust_focused_up();
        assert_eq!(app.steps_per_frame, 2);
        app.adjust_focused_down();
        app.adjust_focused_down();
        assert_eq!(app.steps_per_frame, 1);
    }

    #[test]
    fn test_apply_preset_replaces_settings_and_reseeds() {
        let mut app = test_app();
        app.simulation.ignite(5, 5).unwrap();
        let preset = app.presets.all_presets().next().cloned().unwrap();
        app.apply_preset(&preset);
        assert_eq!(app.simulation.settings, preset.settings);
        assert_eq!(app.simulation.generation, 0);
        assert_eq!(app.simulation.fire_count, 0);
        assert!(app.status_message().is_some());
    }

    #[test]
    fn test_ignite_center_hits_a_tree() {
        let mut app = test_app();
        app.ignite_center();
        assert_eq!(app.simulation.cell(5, 5), Some(Cell::Fire));
    }

    #[test]
    fn test_resize_only_applies_in_auto_size_mode() {
        let mut app = test_app();
        app.resize(40, 40);
        assert_eq!(app.simulation.width, 10);

        app.auto_size = true;
        app.resize(40, 40);
        assert_eq!(app.simulation.width, 40);
        assert_eq!(app.simulation.height, 80);
    }
}
