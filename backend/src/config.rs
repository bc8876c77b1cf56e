//! # Calendar Configuration
//!
//! Settings for the calendar screen, read from a single YAML file.
//!
//! ## YAML Format
//!
//! ```yaml
//! first_day_of_week: Sun
//! month_window: 100
//! prefetch_radius: 1
//! grid_cache_size: 5
//! utc_offset_minutes: 540
//! layout:
//!   header_height: 56.0
//!   day_of_week_header_height: 40.0
//!   extra_chrome_height: 70.0
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use chrono::{FixedOffset, Weekday};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const MAX_OFFSET_MINUTES: i32 = 24 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("month_window must be at least 1")]
    EmptyMonthWindow,
    #[error("grid_cache_size {size} cannot hold the visible month and {radius} neighbours on each side")]
    CacheTooSmall { size: usize, radius: u32 },
    #[error("utc_offset_minutes {0} is outside +/-24h")]
    OffsetOutOfRange(i32),
    #[error("layout height '{0}' must be non-negative")]
    NegativeHeight(&'static str),
}

/// Fixed-height chrome around the month grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Month title row with previous/next buttons
    pub header_height: f32,
    /// Row of weekday labels
    pub day_of_week_header_height: f32,
    /// Everything else on screen that is not the grid
    pub extra_chrome_height: f32,
}

impl LayoutConfig {
    pub fn fixed_elements_height(&self) -> f32 {
        self.header_height + self.day_of_week_header_height + self.extra_chrome_height
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_height: 56.0,
            day_of_week_header_height: 40.0,
            extra_chrome_height: 70.0,
        }
    }
}

/// Calendar screen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Week anchor used by all grid math
    pub first_day_of_week: Weekday,
    /// Months reachable before and after the current month
    pub month_window: u32,
    /// Neighbouring months whose grids are derived on every navigation
    pub prefetch_radius: u32,
    /// Capacity of the month grid cache
    pub grid_cache_size: usize,
    /// Fixed offset used to turn event timestamps into dates.
    /// `None` uses the system local time zone.
    pub utc_offset_minutes: Option<i32>,
    pub layout: LayoutConfig,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            first_day_of_week: Weekday::Sun,
            month_window: 100,
            prefetch_radius: 1,
            grid_cache_size: 5,
            utc_offset_minutes: None,
            layout: LayoutConfig::default(),
        }
    }
}

impl CalendarConfig {
    /// Default location: `<user config dir>/chestnut-map/calendar.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chestnut-map").join("calendar.yaml"))
    }

    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: CalendarConfig =
            serde_yaml::from_str(&yaml_content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        debug!("Loaded calendar config from {:?}", path);
        Ok(config)
    }

    /// Like [`load`](Self::load) but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!("No calendar config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.month_window == 0 {
            return Err(ConfigError::EmptyMonthWindow);
        }
        let needed = 2 * self.prefetch_radius as usize + 1;
        if self.grid_cache_size < needed {
            return Err(ConfigError::CacheTooSmall {
                size: self.grid_cache_size,
                radius: self.prefetch_radius,
            });
        }
        if let Some(minutes) = self.utc_offset_minutes {
            if minutes.abs() >= MAX_OFFSET_MINUTES {
                return Err(ConfigError::OffsetOutOfRange(minutes));
            }
        }
        let heights = [
            ("header_height", self.layout.header_height),
            ("day_of_week_header_height", self.layout.day_of_week_header_height),
            ("extra_chrome_height", self.layout.extra_chrome_height),
        ];
        for (name, value) in heights {
            if value < 0.0 {
                return Err(ConfigError::NegativeHeight(name));
            }
        }
        Ok(())
    }

    /// The configured fixed offset, if any
    pub fn fixed_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CalendarConfig::default();
        assert_eq!(config.first_day_of_week, Weekday::Sun);
        assert_eq!(config.month_window, 100);
        assert!(config.validate().is_ok());
        assert_eq!(config.layout.fixed_elements_height(), 166.0);
        assert!(config.fixed_offset().is_none());
    }

    #[test]
    fn test_load_partial_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("calendar.yaml");
        fs::write(
            &path,
            "first_day_of_week: Mon\nutc_offset_minutes: 540\nlayout:\n  header_height: 64.0\n",
        )
        .unwrap();

        let config = CalendarConfig::load(&path).unwrap();
        assert_eq!(config.first_day_of_week, Weekday::Mon);
        assert_eq!(config.month_window, 100);
        assert_eq!(config.layout.header_height, 64.0);
        assert_eq!(config.layout.day_of_week_header_height, 40.0);
        assert_eq!(config.fixed_offset(), FixedOffset::east_opt(9 * 3600));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = CalendarConfig::load_or_default(temp_dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, CalendarConfig::default());
    }

    #[test]
    fn test_load_malformed_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("calendar.yaml");
        fs::write(&path, "month_window: [not, a, number]\n").unwrap();

        let result = CalendarConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = CalendarConfig { month_window: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyMonthWindow)));

        let config = CalendarConfig { grid_cache_size: 2, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::CacheTooSmall { size: 2, radius: 1 })));

        let config = CalendarConfig { utc_offset_minutes: Some(24 * 60), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::OffsetOutOfRange(_))));

        let mut config = CalendarConfig::default();
        config.layout.extra_chrome_height = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::NegativeHeight("extra_chrome_height"))));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("calendar.yaml");
        fs::write(&path, "month_window: 0\n").unwrap();

        assert!(matches!(CalendarConfig::load(&path), Err(ConfigError::EmptyMonthWindow)));
    }
}
