//! Screen, grid and input tuning.
//!
//! Loaded from JSON by the browser front end; every field is optional and
//! falls back to the defaults in [`consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default values, matching the classic 800×600 window with 5 px cells.
pub mod consts {
    pub const SCREEN_WIDTH: u32 = 800;
    pub const SCREEN_HEIGHT: u32 = 600;
    /// Edge length of one cell in pixels.
    pub const CELL_SIZE: u32 = 5;
    /// Half-width of the square obstacle brush: 1 gives a 3×3 stamp.
    pub const OBSTACLE_RADIUS: i32 = 1;
    /// Extra spawns per frame while the burst modifier is held.
    pub const BURST_COUNT: u32 = 10;
    /// Burst offsets are drawn from `[-BURST_JITTER, BURST_JITTER)` cells.
    pub const BURST_JITTER: i32 = 5;
    pub const TARGET_FPS: u32 = 60;
    /// Largest accepted screen edge in pixels; bounds the grid allocation.
    pub const MAX_SCREEN_DIM: u32 = 16_384;
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroCellSize,
    /// The screen is narrower or shorter than a single cell.
    ScreenSmallerThanCell { screen: (u32, u32), cell_size: u32 },
    ScreenTooLarge { screen: (u32, u32) },
    NegativeObstacleRadius(i32),
    NegativeBurstJitter(i32),
    ZeroFrameRate,
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCellSize => write!(f, "cell size must be at least 1 pixel"),
            Self::ScreenSmallerThanCell { screen, cell_size } => write!(
                f,
                "screen {}x{} is smaller than one {cell_size}px cell",
                screen.0, screen.1
            ),
            Self::ScreenTooLarge { screen } => write!(
                f,
                "screen {}x{} exceeds {} pixels per side",
                screen.0,
                screen.1,
                consts::MAX_SCREEN_DIM
            ),
            Self::NegativeObstacleRadius(r) => write!(f, "obstacle radius {r} is negative"),
            Self::NegativeBurstJitter(j) => write!(f, "burst jitter {j} is negative"),
            Self::ZeroFrameRate => write!(f, "target frame rate must be non-zero"),
            Self::Parse(msg) => write!(f, "invalid config JSON: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen_width: u32,
    pub screen_height: u32,
    pub cell_size: u32,
    pub obstacle_radius: i32,
    pub burst_count: u32,
    pub burst_jitter: i32,
    pub target_fps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: consts::SCREEN_WIDTH,
            screen_height: consts::SCREEN_HEIGHT,
            cell_size: consts::CELL_SIZE,
            obstacle_radius: consts::OBSTACLE_RADIUS,
            burst_count: consts::BURST_COUNT,
            burst_jitter: consts::BURST_JITTER,
            target_fps: consts::TARGET_FPS,
        }
    }
}

impl Config {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, otherwise whatever
    /// [`Config::validate`] rejects.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        log::debug!("loaded config: {config:?}");
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.screen_width < self.cell_size || self.screen_height < self.cell_size {
            return Err(ConfigError::ScreenSmallerThanCell {
                screen: (self.screen_width, self.screen_height),
                cell_size: self.cell_size,
            });
        }
        if self.screen_width > consts::MAX_SCREEN_DIM || self.screen_height > consts::MAX_SCREEN_DIM {
            return Err(ConfigError::ScreenTooLarge {
                screen: (self.screen_width, self.screen_height),
            });
        }
        if self.obstacle_radius < 0 {
            return Err(ConfigError::NegativeObstacleRadius(self.obstacle_radius));
        }
        if self.burst_jitter < 0 {
            return Err(ConfigError::NegativeBurstJitter(self.burst_jitter));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        Ok(())
    }

    /// Grid columns: screen width divided by cell size, truncated.
    #[must_use]
    pub fn grid_width(&self) -> usize {
        (self.screen_width / self.cell_size.max(1)) as usize
    }

    #[must_use]
    pub fn grid_height(&self) -> usize {
        (self.screen_height / self.cell_size.max(1)) as usize
    }

    /// Frame period in microseconds.
    #[must_use]
    pub fn frame_micros(&self) -> u64 {
        1_000_000 / u64::from(self.target_fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_160_by_120() {
        let config = Config::default();
        assert_eq!(config.grid_width(), 160);
        assert_eq!(config.grid_height(), 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn grid_dimensions_truncate() {
        let config = Config {
            screen_width: 803,
            screen_height: 599,
            ..Config::default()
        };
        assert_eq!(config.grid_width(), 160);
        assert_eq!(config.grid_height(), 119);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = Config::from_json(r#"{ "cell_size": 2, "obstacle_radius": 3 }"#).unwrap();
        assert_eq!(config.cell_size, 2);
        assert_eq!(config.obstacle_radius, 3);
        assert_eq!(config.screen_width, consts::SCREEN_WIDTH);
        assert_eq!(config.burst_count, consts::BURST_COUNT);
    }

    #[test]
    fn empty_json_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn rejects_zero_cell_size() {
        assert_eq!(
            Config::from_json(r#"{ "cell_size": 0 }"#),
            Err(ConfigError::ZeroCellSize)
        );
    }

    #[test]
    fn rejects_screen_smaller_than_cell() {
        let config = Config {
            screen_width: 4,
            cell_size: 5,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScreenSmallerThanCell { cell_size: 5, .. })
        ));
    }

    #[test]
    fn rejects_oversized_screen() {
        let err = Config::from_json(r#"{ "screen_width": 4000000000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ScreenTooLarge { .. }));
        let config = Config {
            screen_height: consts::MAX_SCREEN_DIM,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn huge_obstacle_radius_is_accepted() {
        // Stamps are clipped to the grid, so any non-negative radius is cheap.
        let config = Config::from_json(r#"{ "obstacle_radius": 2000000000 }"#).unwrap();
        assert_eq!(config.obstacle_radius, 2_000_000_000);
    }

    #[test]
    fn rejects_negative_radius_and_jitter() {
        let mut config = Config {
            obstacle_radius: -1,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NegativeObstacleRadius(-1)));
        config.obstacle_radius = 0;
        config.burst_jitter = -2;
        assert_eq!(config.validate(), Err(ConfigError::NegativeBurstJitter(-2)));
    }

    #[test]
    fn rejects_zero_frame_rate() {
        let config = Config {
            target_fps: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameRate));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Config::from_json("{ cell_size: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid config JSON"));
    }

    #[test]
    fn frame_period_at_60_fps() {
        assert_eq!(Config::default().frame_micros(), 16_666);
    }
}
