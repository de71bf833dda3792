use crate::settings::ForestSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named set of simulation probabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub settings: ForestSettings,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: ForestSettings,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        let mut manager = Self {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();
        manager.load_user_presets();
        manager
    }

    /// Load the built-in presets
    fn load_builtin_presets(&mut self) {
        self.builtin = vec![
            Preset::new(
                "Classic",
                "The canonical forest-fire parameters",
                ForestSettings::default(),
            ),
            Preset::new(
                "Old Growth",
                "Dense forest, fires are rare and slow to return",
                ForestSettings {
                    p_tree: 0.75,
                    p_fire: 0.0001,
                    p_grow: 0.003,
                },
            ),
            Preset::new(
                "Tinderbox",
                "Dry season; everything burns sooner or later",
                ForestSettings {
                    p_tree: 0.6,
                    p_fire: 0.01,
                    p_grow: 0.002,
                },
            ),
            Preset::new(
                "Lightning Season",
                "Frequent strikes on an average forest",
                ForestSettings {
                    p_tree: 0.5,
                    p_fire: 0.005,
                    p_grow: 0.01,
                },
            ),
            Preset::new(
                "Rainforest",
                "Regrowth outruns the flames",
                ForestSettings {
                    p_tree: 0.55,
                    p_fire: 0.0005,
                    p_grow: 0.05,
                },
            ),
            Preset::new(
                "Sparse Steppe",
                "Thin cover keeps fires from spreading far",
                ForestSettings {
                    p_tree: 0.2,
                    p_fire: 0.001,
                    p_grow: 0.004,
                },
            ),
            Preset::new(
                "Slash and Regrow",
                "Young forest on burned-over ground",
                ForestSettings {
                    p_tree: 0.3,
                    p_fire: 0.002,
                    p_grow: 0.08,
                },
            ),
            Preset::new(
                "Firestorm",
                "Dense fuel and constant ignition",
                ForestSettings {
                    p_tree: 0.7,
                    p_fire: 0.02,
                    p_grow: 0.01,
                },
            ),
            Preset::new(
                "Quiet Woods",
                "No spontaneous fires; ignition only where you click",
                ForestSettings {
                    p_tree: 0.45,
                    p_fire: 0.0,
                    p_grow: 0.01,
                },
            ),
        ];
    }

    /// Get the presets directory path
    fn presets_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("forest-fire-simulation").join("presets"))
    }

    /// Load user presets from disk
    fn load_user_presets(&mut self) {
        if let Some(dir) = Self::presets_dir() {
            if dir.exists() {
                if let Ok(entries) = fs::read_dir(&dir) {
                    for entry in entries.flatten() {
                        if entry.path().extension().is_some_and(|e| e == "json") {
                            if let Ok(content) = fs::read_to_string(entry.path()) {
                                if let Ok(preset) = serde_json::from_str::<Preset>(&content) {
                                    // Files edited by hand can carry bad values
                                    if preset.settings.validate().is_ok() {
                                        self.user.push(preset);
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Save a preset to disk
    #[allow(dead_code)]
    pub fn save_preset(&mut self, preset: Preset) -> Result<(), String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create presets directory: {}", e))?;

        let path = dir.join(format!("{}.json", sanitize_filename(&preset.name)));

        let json = serde_json::to_string_pretty(&preset)
            .map_err(|e| format!("Failed to serialize preset: {}", e))?;

        fs::write(&path, json).map_err(|e| format!("Failed to write preset file: {}", e))?;

        if !self.user.iter().any(|p| p.name == preset.name) {
            self.user.push(preset);
        }

        Ok(())
    }

    /// Delete a user preset
    #[allow(dead_code)]
    pub fn delete_preset(&mut self, name: &str) -> Result<(), String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;

        if let Some(pos) = self.user.iter().position(|p| p.name == name) {
            self.user.remove(pos);
        }

        let path = dir.join(format!("{}.json", sanitize_filename(name)));
        if path.exists() {
            fs::remove_file(&path).map_err(|e| format!("Failed to delete preset file: {}", e))?;
        }

        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Get preset names for display
    #[allow(dead_code)]
    pub fn preset_names(&self) -> Vec<&str> {
        self.all_presets().map(|p| p.name.as_str()).collect()
    }
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_are_all_valid() {
        let manager = PresetManager::new();
        assert!(!manager.builtin.is_empty());
        for preset in &manager.builtin {
            assert!(
                preset.settings.validate().is_ok(),
                "preset {} has invalid settings",
                preset.name
            );
        }
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let manager = PresetManager::new();
        let mut names: Vec<&str> = manager.builtin.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), manager.builtin.len());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let manager = PresetManager::new();
        assert!(manager.find("classic").is_some());
        assert!(manager.find("TINDERBOX").is_some());
        assert!(manager.find("no such preset").is_none());
    }

    #[test]
    fn test_quiet_woods_never_self_ignites() {
        let manager = PresetManager::new();
        let preset = manager.find("Quiet Woods").unwrap();
        assert_eq!(preset.settings.p_fire, 0.0);
    }

    #[test]
    fn test_filename_sanitization() {
        assert_eq!(sanitize_filename("My Preset!"), "My_Preset_");
        assert_eq!(sanitize_filename("dry-season_2"), "dry-season_2");
    }

    #[test]
    fn test_preset_serialization_roundtrip() {
        let preset = Preset::new(
            "Test",
            "Round trip",
            ForestSettings {
                p_tree: 0.33,
                p_fire: 0.004,
                p_grow: 0.02,
            },
        );
        let json = serde_json::to_string(&preset).unwrap();
        let parsed: Preset = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, preset.name);
        assert_eq!(parsed.settings, preset.settings);
    }
}
