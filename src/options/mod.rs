//! Camera, animation, culling and input settings with TOML preset support.
//!
//! Options serialize to/from TOML so a viewer can ship presets (for example
//! a desktop and a mobile profile) and load them at startup.

mod animation;
mod camera;
mod culling;
mod manipulator;

use std::path::Path;

pub use animation::AnimationOptions;
pub use camera::CameraOptions;
pub use culling::{CullingOptions, ZeroAreaMode};
pub use manipulator::ManipulatorOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SphericError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[culling]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Projection and direct-manipulation parameters.
    pub camera: CameraOptions,
    /// Animator timing.
    pub animation: AnimationOptions,
    /// Cull pipeline stages.
    pub culling: CullingOptions,
    /// Mouse, touch and keyboard sensitivities.
    pub manipulator: ManipulatorOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, SphericError> {
        toml::from_str(content)
            .map_err(|e| SphericError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SphericError> {
        let content = std::fs::read_to_string(path).map_err(SphericError::Io)?;
        let options = Self::from_toml(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SphericError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SphericError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SphericError::Io)?;
        }
        std::fs::write(path, content).map_err(SphericError::Io)?;
        log::info!("saved options to {}", path.display());
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
