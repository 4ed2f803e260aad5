//! Application configuration: shortcut bindings and UI parameters.
//!
//! Lives in `config.json` beside the executable. Missing keys fall back
//! to defaults field by field, so old config files keep working; a
//! malformed file logs an error and yields the defaults.

use std::fs;
use std::path::Path;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Key bindings as displayable key strings (matched case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcuts {
    pub zoom_in: String,
    pub zoom_out: String,
    pub zoom_reset: String,
    pub pan_up: String,
    pub pan_down: String,
    pub pan_left: String,
    pub pan_right: String,
    pub create_bbox: String,
    pub undo: String,
    pub toggle_calibration: String,
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            zoom_in: "=".into(),
            zoom_out: "-".into(),
            zoom_reset: "r".into(),
            pan_up: "z".into(),
            pan_down: "s".into(),
            pan_left: "q".into(),
            pan_right: "d".into(),
            create_bbox: "n".into(),
            undo: "ctrl+z".into(),
            toggle_calibration: "c".into(),
        }
    }
}

/// Tunable interaction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiParams {
    /// Pan step per key press, in screen pixels.
    pub pan_step: f32,
    /// Zoom multiplier per zoom step.
    pub zoom_factor: f32,
    /// Resize-handle tolerance in screen pixels.
    pub bbox_resize_margin: f32,
}

impl Default for UiParams {
    fn default() -> Self {
        Self {
            pan_step: 50.0,
            zoom_factor: 1.2,
            bbox_resize_margin: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub shortcuts: Shortcuts,
    pub ui: UiParams,
}

impl Config {
    /// Load from `path`. A missing file yields the defaults and writes
    /// them back; a malformed file logs and yields the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("config file not found, writing defaults to {}", path.display());
            let config = Self::default();
            if let Err(e) = config.save(path) {
                error!("failed to write default config: {e}");
            }
            return config;
        }
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    error!("malformed config {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                error!("could not read config {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Host-exposed commands, 1:1 with the editor operations they trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ZoomIn,
    ZoomOut,
    ZoomReset,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    CreateBox,
    Undo,
    ToggleCalibration,
}

/// Declarative key-to-action mapping, so the binding table is testable
/// without real input-device wiring.
pub fn action_for_key(shortcuts: &Shortcuts, key: &str) -> Option<Action> {
    let bindings = [
        (&shortcuts.zoom_in, Action::ZoomIn),
        (&shortcuts.zoom_out, Action::ZoomOut),
        (&shortcuts.zoom_reset, Action::ZoomReset),
        (&shortcuts.pan_up, Action::PanUp),
        (&shortcuts.pan_down, Action::PanDown),
        (&shortcuts.pan_left, Action::PanLeft),
        (&shortcuts.pan_right, Action::PanRight),
        (&shortcuts.create_bbox, Action::CreateBox),
        (&shortcuts.undo, Action::Undo),
        (&shortcuts.toggle_calibration, Action::ToggleCalibration),
    ];
    bindings
        .into_iter()
        .find(|(binding, _)| binding.eq_ignore_ascii_case(key))
        .map(|(_, action)| action)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("=", Some(Action::ZoomIn))]
    #[test_case("-", Some(Action::ZoomOut))]
    #[test_case("R", Some(Action::ZoomReset) ; "case insensitive")]
    #[test_case("Ctrl+Z", Some(Action::Undo))]
    #[test_case("n", Some(Action::CreateBox))]
    #[test_case("x", None ; "unbound key")]
    fn default_bindings(key: &str, expected: Option<Action>) {
        let shortcuts = Shortcuts::default();
        assert_eq!(action_for_key(&shortcuts, key), expected);
    }

    #[test]
    fn partial_config_merges_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"ui": {"pan_step": 80.0}}"#).unwrap();
        assert_eq!(config.ui.pan_step, 80.0);
        assert_eq!(config.ui.zoom_factor, 1.2);
        assert_eq!(config.shortcuts, Shortcuts::default());
    }

    #[test]
    fn config_json_roundtrip() {
        let mut config = Config::default();
        config.shortcuts.undo = "ctrl+u".into();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
