use std::path::Path;

use serde::{Deserialize, Serialize};
use splitflow_kernel::FluidDomain;
use tracing::{debug, instrument};

use crate::errors::SettingsError;

pub const ANGLE: &str = "angle";
pub const BOX_SIZE_LENGTH: &str = "BOX_SIZE_LENGTH";
pub const BOX_SIZE_WIDTH: &str = "BOX_SIZE_WIDTH";
pub const BOX_SIZE_HEIGHT: &str = "BOX_SIZE_HEIGHT";

/// Look up one integer setting in `key = value` text.
///
/// Returns `None` when no line carries the key. A line matches only when the
/// text before its first `=` is exactly `name` after trimming; the first
/// matching line wins. Blank lines and `#` comments are skipped.
pub fn parse_setting(content: &str, name: &str) -> Option<Result<i64, SettingsError>> {
    content.lines().enumerate().find_map(|(index, line)| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        if key.trim() != name {
            return None;
        }
        let value = value.trim();
        Some(value.parse::<i64>().map_err(|_| SettingsError::Malformed {
            key: name.to_string(),
            line: index + 1,
            value: value.to_string(),
        }))
    })
}

fn required(content: &str, name: &str) -> Result<i64, SettingsError> {
    parse_setting(content, name).unwrap_or_else(|| {
        Err(SettingsError::Missing {
            key: name.to_string(),
        })
    })
}

fn positive(content: &str, name: &str) -> Result<i64, SettingsError> {
    let value = required(content, name)?;
    if value <= 0 {
        return Err(SettingsError::NonPositive {
            key: name.to_string(),
            value,
        });
    }
    Ok(value)
}

/// The run's numeric inputs, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Plate angle in degrees.
    pub angle: i64,
    pub box_length: i64,
    pub box_width: i64,
    pub box_height: i64,
}

impl Settings {
    /// Parse all four required keys; any missing or malformed key fails.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(Self {
            angle: required(content, ANGLE)?,
            box_length: positive(content, BOX_SIZE_LENGTH)?,
            box_width: positive(content, BOX_SIZE_WIDTH)?,
            box_height: positive(content, BOX_SIZE_HEIGHT)?,
        })
    }

    #[instrument]
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&content)?;
        debug!(?settings, "loaded settings");
        Ok(settings)
    }

    /// Rotation applied to the cross-section outlines.
    pub fn geometry_angle(&self) -> f64 {
        180.0 - self.angle as f64
    }

    /// Angle the solver stage labels its results with.
    pub fn solver_angle(&self) -> f64 {
        90.0 + self.angle as f64
    }

    /// Fluid box around bodies extruded `body_depth` from `z = 0`.
    pub fn fluid_domain(&self, body_depth: f64) -> FluidDomain {
        FluidDomain::from_box_size(
            self.box_length as f64,
            self.box_width as f64,
            self.box_height as f64,
            body_depth,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "angle = 45\nBOX_SIZE_LENGTH = 10\nBOX_SIZE_WIDTH = 5\nBOX_SIZE_HEIGHT = 5\n";

    #[test]
    fn test_parse_sample() {
        let settings = Settings::parse(SAMPLE).unwrap();
        assert_eq!(
            settings,
            Settings {
                angle: 45,
                box_length: 10,
                box_width: 5,
                box_height: 5
            }
        );
        assert_eq!(settings.geometry_angle(), 135.0);
        assert_eq!(settings.solver_angle(), 135.0);
    }

    #[test]
    fn test_negative_angle() {
        let text = SAMPLE.replace("angle = 45", "angle=-30");
        let settings = Settings::parse(&text).unwrap();
        assert_eq!(settings.geometry_angle(), 210.0);
        assert_eq!(settings.solver_angle(), 60.0);
    }

    #[test]
    fn test_absent_key_is_none() {
        assert!(parse_setting("other = 1", ANGLE).is_none());
    }

    #[test]
    fn test_prefix_does_not_match() {
        let text = "angle_offset = 3\nangle = 7\n";
        assert_eq!(parse_setting(text, ANGLE).unwrap().unwrap(), 7);
    }

    #[test]
    fn test_first_match_wins() {
        let text = "angle = 1\nangle = 2\n";
        assert_eq!(parse_setting(text, ANGLE).unwrap().unwrap(), 1);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let text = "# angle = 99\n\n   \nangle = 12\n";
        assert_eq!(parse_setting(text, ANGLE).unwrap().unwrap(), 12);
    }

    #[test]
    fn test_missing_key_fails() {
        let text = SAMPLE.replace("BOX_SIZE_WIDTH = 5\n", "");
        match Settings::parse(&text) {
            Err(SettingsError::Missing { key }) => assert_eq!(key, BOX_SIZE_WIDTH),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_malformed_value_reports_line() {
        let text = SAMPLE.replace("BOX_SIZE_HEIGHT = 5", "BOX_SIZE_HEIGHT = 5.5");
        match Settings::parse(&text) {
            Err(SettingsError::Malformed { key, line, value }) => {
                assert_eq!(key, BOX_SIZE_HEIGHT);
                assert_eq!(line, 4);
                assert_eq!(value, "5.5");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_box_fails() {
        let text = SAMPLE.replace("BOX_SIZE_LENGTH = 10", "BOX_SIZE_LENGTH = 0");
        assert!(matches!(
            Settings::parse(&text),
            Err(SettingsError::NonPositive { value: 0, .. })
        ));
    }

    #[test]
    fn test_fluid_domain_uses_box_sizes() {
        let domain = Settings::parse(SAMPLE).unwrap().fluid_domain(1.0);
        assert_eq!(domain.length, 10.0);
        assert_eq!(domain.width, 5.0);
        assert_eq!(domain.height, 5.0);
        assert_eq!(domain.plane_z, -2.0);
    }
}
