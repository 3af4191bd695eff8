//! Editor configuration.
//!
//! All fields have defaults, so an empty JSON object is a valid config.

use anyhow::{Context, Result, ensure};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::model::NodeId;

/// Pointer buttons the editor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub initial_zoom: f64,
    /// Button that engages panning while held.
    pub pan_button: PointerButton,
    /// Horizontal spread of wire control points is `|dx| / curve_divisor`.
    pub curve_divisor: f64,
    /// Node the execution engine starts evaluating from.
    pub entry_node: Option<NodeId>,
    /// Forwarded to the engine on every run.
    pub debug_execution: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.3,
            max_zoom: 1.2,
            zoom_step: 0.05,
            initial_zoom: 1.0,
            pan_button: PointerButton::Middle,
            curve_divisor: 1.5,
            entry_node: None,
            debug_execution: false,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json).context("Parse editor config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).with_context(|| format!("Read config {}", path))?;
        Self::from_json_str(&text).with_context(|| format!("Invalid config in {}", path))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.min_zoom > 0.0, "min_zoom must be positive, got {}", self.min_zoom);
        ensure!(
            self.min_zoom <= self.initial_zoom && self.initial_zoom <= self.max_zoom,
            "initial_zoom {} outside [{}, {}]",
            self.initial_zoom,
            self.min_zoom,
            self.max_zoom
        );
        ensure!(self.zoom_step > 0.0, "zoom_step must be positive, got {}", self.zoom_step);
        ensure!(
            self.curve_divisor > 0.0,
            "curve_divisor must be positive, got {}",
            self.curve_divisor
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = EditorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config =
            EditorConfig::from_json_str(r#"{ "max_zoom": 2.0, "pan_button": "primary" }"#).unwrap();
        assert_eq!(config.max_zoom, 2.0);
        assert_eq!(config.pan_button, PointerButton::Primary);
        assert_eq!(config.min_zoom, 0.3);
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let err = EditorConfig::from_json_str(r#"{ "min_zoom": 1.5 }"#).unwrap_err();
        assert!(err.to_string().contains("initial_zoom"));
    }

    #[test]
    fn test_rejects_zero_step() {
        assert!(EditorConfig::from_json_str(r#"{ "zoom_step": 0.0 }"#).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(EditorConfig::from_json_str("{ nope").is_err());
    }
}
