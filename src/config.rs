use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::timeline::MIN_BLOCK_WIDTH;

/// Tunables of the snap resolver. Every field has a default, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapConfig {
    /// How far (px) outside a parent the dragged block may be and still nest,
    /// and how far a timed block may stray from its time position.
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,
    /// Grid pitch (px) for blocks without time data.
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default = "default_min_block_width")]
    pub min_block_width: f64,
    /// Space (px) between a parent's bars and a nested child.
    #[serde(default = "default_child_gap")]
    pub child_gap: f64,
}

fn default_snap_threshold() -> f64 {
    50.0
}

fn default_grid_size() -> f64 {
    20.0
}

fn default_min_block_width() -> f64 {
    MIN_BLOCK_WIDTH
}

fn default_child_gap() -> f64 {
    10.0
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_threshold: default_snap_threshold(),
            grid_size: default_grid_size(),
            min_block_width: default_min_block_width(),
            child_gap: default_child_gap(),
        }
    }
}

impl SnapConfig {
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snap config {}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snap config {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let cfg: SnapConfig = serde_json::from_str(r#"{"gridSize": 10}"#).unwrap();
        assert_eq!(cfg.grid_size, 10.0);
        assert_eq!(cfg.snap_threshold, 50.0);
        assert_eq!(cfg.min_block_width, MIN_BLOCK_WIDTH);
        assert_eq!(cfg.child_gap, 10.0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        fs::write(&path, r#"{"snapThreshold": 30}"#).unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(path).unwrap();
        let cfg = SnapConfig::load(&path).unwrap();
        assert_eq!(cfg.snap_threshold, 30.0);
        assert_eq!(cfg.grid_size, 20.0);
    }

    #[test]
    fn test_load_reports_path() {
        let err = SnapConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }
}
