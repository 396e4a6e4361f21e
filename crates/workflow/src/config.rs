//! Run configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config and
//! a file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use splitflow_kernel::CrossSectionParams;

use crate::meshing::MeshingParams;
use crate::solver::SolverParams;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value for `{key}`: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

fn invalid(key: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Everything a run needs besides the settings file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base name of every artifact.
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// Directory receiving geometry, mesh, case and data files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    /// Directory receiving the drag report.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Write SVG previews of the geometry.
    #[serde(default)]
    pub plot: bool,

    /// Write session scripts without running them.
    #[serde(default)]
    pub dry_run: bool,

    /// Interpreter used to run session scripts.
    #[serde(default = "default_python")]
    pub python: PathBuf,

    /// Product release passed to the launcher.
    #[serde(default)]
    pub product_version: Option<String>,

    /// UI mode passed to the launcher.
    #[serde(default)]
    pub ui_mode: Option<String>,

    #[serde(default)]
    pub cross_section: CrossSectionParams,

    #[serde(default)]
    pub meshing: MeshingParams,

    #[serde(default)]
    pub solver: SolverParams,
}

fn default_output_name() -> String {
    "mono".to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("outputs")
}
fn default_settings_path() -> PathBuf {
    PathBuf::from("settings.txt")
}
fn default_report_dir() -> PathBuf {
    PathBuf::from("results")
}
fn default_python() -> PathBuf {
    PathBuf::from("python")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_name: default_output_name(),
            data_dir: default_data_dir(),
            settings_path: default_settings_path(),
            report_dir: default_report_dir(),
            plot: false,
            dry_run: false,
            python: default_python(),
            product_version: None,
            ui_mode: None,
            cross_section: CrossSectionParams::default(),
            meshing: MeshingParams::default(),
            solver: SolverParams::default(),
        }
    }
}

impl RunConfig {
    /// Load a JSON config and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.output_name;
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(invalid("output_name", name, "must be a non-empty file stem"));
        }

        let cs = &self.cross_section;
        if !(cs.radius > 0.0) {
            return Err(invalid("cross_section.radius", cs.radius, "must be positive"));
        }
        if !(cs.gap >= 0.0) {
            return Err(invalid("cross_section.gap", cs.gap, "must not be negative"));
        }
        if !(cs.plate_width() > 0.0) {
            return Err(invalid(
                "cross_section.plate_clearance",
                cs.plate_clearance,
                "must be smaller than the gap",
            ));
        }
        if cs.arc_points < 2 {
            return Err(invalid("cross_section.arc_points", cs.arc_points, "must be at least 2"));
        }
        if !(cs.depth > 0.0) {
            return Err(invalid("cross_section.depth", cs.depth, "must be positive"));
        }

        let m = &self.meshing;
        if !(m.min_size > 0.0 && m.min_size < m.max_size) {
            return Err(invalid(
                "meshing.min_size",
                m.min_size,
                "must be positive and below meshing.max_size",
            ));
        }
        if m.processor_count == 0 {
            return Err(invalid("meshing.processor_count", 0, "must be at least 1"));
        }

        let s = &self.solver;
        if s.processor_count == 0 {
            return Err(invalid("solver.processor_count", 0, "must be at least 1"));
        }
        if s.iterations == 0 {
            return Err(invalid("solver.iterations", 0, "must be at least 1"));
        }
        if !(s.inlet_velocity > 0.0) {
            return Err(invalid("solver.inlet_velocity", s.inlet_velocity, "must be positive"));
        }
        if s.monitored_surfaces.is_empty() {
            return Err(invalid("solver.monitored_surfaces", "[]", "must name a surface"));
        }
        Ok(())
    }

    /// Save the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitflow_kernel::ClosingTarget;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_name, "mono");
        assert_eq!(config.data_dir, PathBuf::from("outputs"));
        assert_eq!(config.cross_section.plate_closing, ClosingTarget::Index(1));
        assert_eq!(config.meshing.boundary_layers, 12);
        assert_eq!(config.solver.start_timeout, 500);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: RunConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_partial_nested_config() {
        let config: RunConfig = serde_json::from_str(
            r#"{"report_dir": "/tmp/results",
                "cross_section": {"plate_closing": "first"},
                "solver": {"iterations": 300}}"#,
        )
        .unwrap();
        assert_eq!(config.report_dir, PathBuf::from("/tmp/results"));
        assert_eq!(config.cross_section.plate_closing, ClosingTarget::First);
        assert_eq!(config.cross_section.radius, 0.5);
        assert_eq!(config.solver.iterations, 300);
        assert_eq!(config.solver.report_name, "drag-force1");
    }

    #[test]
    fn test_invalid_values() {
        let mut config = RunConfig::default();
        config.cross_section.plate_clearance = 0.1;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.meshing.min_size = 300.0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.output_name = "a/b".into();
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.solver.iterations = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "solver.iterations"
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut config = RunConfig::default();
        config.plot = true;
        config.product_version = Some("24.1.0".into());
        config.save(&path).unwrap();
        assert_eq!(RunConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(RunConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
