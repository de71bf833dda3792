use crate::color::ColorScheme;
use crate::settings::ForestSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration for export/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Simulation probabilities
    pub settings: ForestSettings,
    /// Color scheme (app-level)
    pub color_scheme: ColorScheme,
    /// Ticks per frame (app-level)
    pub steps_per_frame: usize,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file. Probabilities are validated so a
    /// hand-edited file cannot smuggle out-of-range values into the engine.
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        config
            .settings
            .validate()
            .map_err(|e| format!("Invalid config: {}", e))?;
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            settings: ForestSettings::default(),
            color_scheme: ColorScheme::default(),
            steps_per_frame: 1,
        }
    }
}
