//! App Configuration
//!
//! Optional JSON config file. Absent or malformed files are non-fatal; the
//! defaults describe a playable machine with no external assets at all
//! (fallback cube toys, white signature quad).

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial window size in logical pixels.
    pub window_width: u32,
    pub window_height: u32,
    /// Cap presentation to the monitor refresh rate.
    pub vsync: bool,
    /// Texture for the on-screen signature quad.
    pub signature_texture: String,
    /// Candidate OBJ paths per toy, tried in order; empty list or all
    /// failures mean the fallback cube.
    pub toy_models: Vec<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            vsync: true,
            signature_texture: "assets/signature.png".to_string(),
            toy_models: vec![
                vec![
                    "assets/teddy.obj".to_string(),
                    "assets/toy.obj".to_string(),
                ],
                vec![
                    "assets/duck.obj".to_string(),
                    "assets/toy.obj".to_string(),
                ],
            ],
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, falling back to defaults when the file is
    /// missing or does not parse.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => {
                    log::info!("loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("config {} invalid ({err}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
