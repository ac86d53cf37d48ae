//! Container configuration
//!
//! Layout knobs, physics constants and the theme name, loaded from TOML.
//! Every section and field has a default, so a partial file only overrides
//! what it names.

use crate::error::{CoreError, CoreResult};
use crate::physics::Spring;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level configuration for a tab page container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabPagerConfig {
    /// Tab strip geometry
    pub strip: StripConfig,
    /// Motion constants
    pub physics: PhysicsConfig,
    /// Name of a built-in theme
    pub theme: String,
}

impl Default for TabPagerConfig {
    fn default() -> Self {
        TabPagerConfig {
            strip: StripConfig::default(),
            physics: PhysicsConfig::default(),
            theme: "dark".to_string(),
        }
    }
}

/// Strip geometry knobs, in layout units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Leading and trailing inset of the tab titles and separator
    pub tab_inset: f64,
    /// Padding on each side of a title in natural mode
    pub tab_internal_spacing: f64,
    pub tab_strip_height: f64,
    /// Gap between the strip and the separator
    pub tab_strip_bottom_offset: f64,
    pub separator_height: f64,
    /// Gap between the separator and the pages
    pub separator_bottom_offset: f64,
    pub indicator_height: f64,
}

impl Default for StripConfig {
    fn default() -> Self {
        StripConfig {
            tab_inset: 16.0,
            tab_internal_spacing: 8.0,
            tab_strip_height: 40.0,
            tab_strip_bottom_offset: 0.0,
            separator_height: 1.0,
            separator_bottom_offset: 8.0,
            indicator_height: 4.0,
        }
    }
}

impl StripConfig {
    /// Knobs sized for a terminal, where one unit is one cell
    pub fn terminal() -> Self {
        StripConfig {
            tab_inset: 1.0,
            tab_internal_spacing: 1.0,
            tab_strip_height: 1.0,
            tab_strip_bottom_offset: 0.0,
            separator_height: 1.0,
            separator_bottom_offset: 0.0,
            indicator_height: 1.0,
        }
    }

    /// Vertical space taken by the strip, separator and their gaps
    pub fn chrome_height(&self) -> f64 {
        self.tab_strip_height
            + self.tab_strip_bottom_offset
            + self.separator_height
            + self.separator_bottom_offset
    }
}

/// Motion constants for paging and the collapsible header
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-millisecond velocity factor after a fling
    pub deceleration_rate: f64,
    /// Remaining distance at which a deceleration counts as arrived
    pub decay_threshold: f64,
    pub rubber_band_coefficient: f64,
    pub spring: Spring,
    /// Displacement at which a bounce counts as settled
    pub spring_threshold: f64,
    /// Duration of the selection transition
    pub transition_duration_ms: u64,
    /// A release later than this after the last drag update has no velocity
    pub velocity_window_ms: u64,
    /// Natural width of a tab index past the last item
    pub fallback_tab_width: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            deceleration_rate: crate::physics::decay::NORMAL_DECELERATION_RATE,
            decay_threshold: 0.5,
            rubber_band_coefficient: crate::physics::rubber_band::DEFAULT_COEFFICIENT,
            spring: Spring::default(),
            spring_threshold: 0.25,
            transition_duration_ms: 250,
            velocity_window_ms: 100,
            fallback_tab_width: 150.0,
        }
    }
}

impl PhysicsConfig {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    pub fn velocity_window(&self) -> Duration {
        Duration::from_millis(self.velocity_window_ms)
    }
}

impl TabPagerConfig {
    /// Defaults with the terminal strip preset
    pub fn terminal() -> Self {
        TabPagerConfig {
            strip: StripConfig::terminal(),
            ..Default::default()
        }
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> CoreResult<()> {
        let strip = &self.strip;
        let lengths = [
            ("strip.tab_inset", strip.tab_inset),
            ("strip.tab_internal_spacing", strip.tab_internal_spacing),
            ("strip.tab_strip_height", strip.tab_strip_height),
            ("strip.tab_strip_bottom_offset", strip.tab_strip_bottom_offset),
            ("strip.separator_height", strip.separator_height),
            ("strip.separator_bottom_offset", strip.separator_bottom_offset),
            ("strip.indicator_height", strip.indicator_height),
            ("physics.fallback_tab_width", self.physics.fallback_tab_width),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    field, value
                )));
            }
        }

        let physics = &self.physics;
        if !(physics.deceleration_rate > 0.0 && physics.deceleration_rate < 1.0) {
            return Err(CoreError::InvalidConfig(format!(
                "physics.deceleration_rate must be in (0, 1), got {}",
                physics.deceleration_rate
            )));
        }
        let positive = [
            ("physics.decay_threshold", physics.decay_threshold),
            ("physics.rubber_band_coefficient", physics.rubber_band_coefficient),
            ("physics.spring.mass", physics.spring.mass),
            ("physics.spring.stiffness", physics.spring.stiffness),
            ("physics.spring.damping_ratio", physics.spring.damping_ratio),
            ("physics.spring_threshold", physics.spring_threshold),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    field, value
                )));
            }
        }

        if crate::theme::Theme::by_name(&self.theme).is_none() {
            return Err(CoreError::InvalidConfig(format!(
                "unknown theme '{}'",
                self.theme
            )));
        }
        Ok(())
    }

    /// Reads and validates a configuration file.
    pub fn load_from(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: TabPagerConfig =
            toml::from_str(&contents).map_err(|source| CoreError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads from the user config directory, falling back to defaults
    /// when no file exists there.
    pub fn load() -> CoreResult<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Writes the configuration as pretty TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// The named built-in theme, or the default one for an unknown name
    pub fn resolve_theme(&self) -> crate::theme::Theme {
        crate::theme::Theme::by_name(&self.theme).unwrap_or_default()
    }

    /// `<config dir>/tabpager/config.toml`, if the platform has a config dir
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tabpager").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_knobs() {
        let strip = StripConfig::default();
        assert_eq!(strip.tab_inset, 16.0);
        assert_eq!(strip.tab_internal_spacing, 8.0);
        assert_eq!(strip.tab_strip_height, 40.0);
        assert_eq!(strip.tab_strip_bottom_offset, 0.0);
        assert_eq!(strip.separator_height, 1.0);
        assert_eq!(strip.separator_bottom_offset, 8.0);
        assert_eq!(strip.indicator_height, 4.0);
        assert_eq!(strip.chrome_height(), 49.0);
    }

    #[test]
    fn test_default_physics() {
        let physics = PhysicsConfig::default();
        assert_eq!(physics.deceleration_rate, 0.998);
        assert_eq!(physics.transition_duration(), Duration::from_millis(250));
        assert_eq!(physics.velocity_window(), Duration::from_millis(100));
        assert_eq!(physics.fallback_tab_width, 150.0);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(TabPagerConfig::default().validate().is_ok());
        assert!(TabPagerConfig::terminal().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_rate() {
        let mut config = TabPagerConfig::default();
        config.physics.deceleration_rate = 1.0;
        let err = config.validate().expect_err("rate of 1 never decelerates");
        assert!(err.to_string().contains("deceleration_rate"));
    }

    #[test]
    fn test_validate_rejects_negative_knob() {
        let mut config = TabPagerConfig::default();
        config.strip.tab_inset = -1.0;
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfig(msg)) if msg.contains("tab_inset")
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_theme() {
        let config = TabPagerConfig {
            theme: "neon".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: TabPagerConfig = toml::from_str(
            r#"
            theme = "light"

            [strip]
            tab_inset = 2.0
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.theme, "light");
        assert_eq!(config.strip.tab_inset, 2.0);
        assert_eq!(config.strip.tab_strip_height, 40.0);
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = TabPagerConfig::terminal();
        config.physics.transition_duration_ms = 400;
        config.save_to(&path).expect("save");

        let loaded = TabPagerConfig::load_from(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[strip\ntab_inset = ").expect("write");

        match TabPagerConfig::load_from(&path) {
            Err(CoreError::ConfigParse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let dir = TempDir::new().expect("temp dir");
        let result = TabPagerConfig::load_from(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CoreError::Io(_))));
    }
}
