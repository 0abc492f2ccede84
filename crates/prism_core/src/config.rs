use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Debug-pass startup mode. Tab cycles through these at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DebugMode {
    #[default]
    Off,
    Wireframe,
    Normals,
    Both,
}

impl DebugMode {
    pub fn next(self) -> Self {
        match self {
            DebugMode::Off => DebugMode::Wireframe,
            DebugMode::Wireframe => DebugMode::Normals,
            DebugMode::Normals => DebugMode::Both,
            DebugMode::Both => DebugMode::Off,
        }
    }

    pub fn wireframe(self) -> bool {
        matches!(self, DebugMode::Wireframe | DebugMode::Both)
    }

    pub fn normals(self) -> bool {
        matches!(self, DebugMode::Normals | DebugMode::Both)
    }
}

/// Application settings, read from a JSON file next to the binary.
/// Every field has a default so a missing or partial file still runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
    /// Path to a glTF/GLB scene. When empty or unreadable the built-in
    /// cube demo scene is used instead.
    pub scene_path: String,
    /// Number of views drawn per frame, each with its own constant-buffer
    /// slice and viewport grid cell.
    pub view_count: u32,
    pub debug_mode: DebugMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Prism Example: Geometry Pipeline".to_string(),
            window_width: 1280,
            window_height: 720,
            vsync: true,
            scene_path: String::new(),
            view_count: 1,
            debug_mode: DebugMode::Off,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Loads the config if the file exists, otherwise falls back to defaults.
    /// A present-but-broken file is an error; silence there hides typos.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: AppConfig = serde_json::from_str(r#"{ "window_width": 640 }"#).unwrap();
        assert_eq!(cfg.window_width, 640);
        assert_eq!(cfg.window_height, 720);
        assert_eq!(cfg.view_count, 1);
        assert!(cfg.vsync);
    }

    #[test]
    fn debug_mode_parses_snake_case() {
        let cfg: AppConfig = serde_json::from_str(r#"{ "debug_mode": "wireframe" }"#).unwrap();
        assert_eq!(cfg.debug_mode, DebugMode::Wireframe);
        assert!(cfg.debug_mode.wireframe());
        assert!(!cfg.debug_mode.normals());
    }

    #[test]
    fn debug_mode_cycle_returns_to_off() {
        let mut mode = DebugMode::Off;
        for _ in 0..4 {
            mode = mode.next();
        }
        assert_eq!(mode, DebugMode::Off);
    }

    #[test]
    fn broken_file_reports_parse_error() {
        let err = serde_json::from_str::<AppConfig>("{ not json").unwrap_err();
        let err = ConfigError::from(err);
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
