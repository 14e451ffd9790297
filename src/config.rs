use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_state::Rules;
use crate::grid::Grid;

const MIN_GRID_SIZE: u16 = 5;
const MAX_GRID_SIZE: u16 = 500;
const MAX_CELL_SIZE: u16 = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("snake needs at least 2 segments, got {0}")]
    SnakeTooShort(usize),
    #[error("a snake of {length} segments does not fit vertically in a grid {height} cells high")]
    SnakeDoesNotFit { length: usize, height: i32 },
    #[error("grid {axis} must be between 5 and 500 cells, got {value}")]
    GridSize { axis: &'static str, value: u16 },
    #[error("cell size must be between 1 and 4 columns, got {0}")]
    CellSize(u16),
    #[error("tick intervals must be positive with min <= base, got base {base} ms and min {min} ms")]
    TickInterval { base: u64, min: u64 },
    #[error("speed-up milestone must be a positive score")]
    SpeedupMilestone,
    #[error("failed to read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_yaml_ng::Error },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_width: u16,
    pub grid_height: u16,
    /// Terminal columns per grid cell.
    pub cell_size: u16,
    pub initial_length: usize,
    pub tick_interval_ms: u64,
    pub min_tick_interval_ms: u64,
    /// The game speeds up every time the score passes a multiple of this.
    pub speedup_every: u64,
    pub speedup_step_ms: u64,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_width: 30,
            grid_height: 20,
            cell_size: 2,
            initial_length: 5,
            tick_interval_ms: 150,
            min_tick_interval_ms: 60,
            speedup_every: 500,
            speedup_step_ms: 10,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        serde_yaml_ng::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [("width", self.grid_width), ("height", self.grid_height)] {
            if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&value) {
                return Err(ConfigError::GridSize { axis, value });
            }
        }

        if !(1..=MAX_CELL_SIZE).contains(&self.cell_size) {
            return Err(ConfigError::CellSize(self.cell_size));
        }

        if self.initial_length < 2 {
            return Err(ConfigError::SnakeTooShort(self.initial_length));
        }
        if self.initial_length > self.grid_height as usize / 2 + 1 {
            return Err(ConfigError::SnakeDoesNotFit {
                length: self.initial_length,
                height: self.grid_height as i32,
            });
        }

        if self.min_tick_interval_ms == 0 || self.min_tick_interval_ms > self.tick_interval_ms {
            return Err(ConfigError::TickInterval { base: self.tick_interval_ms, min: self.min_tick_interval_ms });
        }

        if self.speedup_every == 0 {
            return Err(ConfigError::SpeedupMilestone);
        }

        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    pub fn rules(&self) -> Rules {
        Rules {
            base_tick_interval: Duration::from_millis(self.tick_interval_ms),
            min_tick_interval: Duration::from_millis(self.min_tick_interval_ms),
            speedup_every: self.speedup_every,
            speedup_step: Duration::from_millis(self.speedup_step_ms),
            ..Rules::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: GameConfig = serde_yaml_ng::from_str("grid_width: 40\ninitial_length: 3\n").unwrap();

        assert_eq!(config.grid_width, 40);
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.grid_height, GameConfig::default().grid_height);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_snake_is_rejected() {
        let config = GameConfig { initial_length: 1, ..GameConfig::default() };

        assert!(matches!(config.validate(), Err(ConfigError::SnakeTooShort(1))));
    }

    #[test]
    fn test_snake_taller_than_half_grid_is_rejected() {
        let config = GameConfig { grid_height: 8, initial_length: 6, ..GameConfig::default() };

        assert!(matches!(config.validate(), Err(ConfigError::SnakeDoesNotFit { length: 6, height: 8 })));
    }

    #[test]
    fn test_grid_bounds() {
        let narrow = GameConfig { grid_width: 4, ..GameConfig::default() };
        let tall = GameConfig { grid_height: 501, ..GameConfig::default() };

        assert!(matches!(narrow.validate(), Err(ConfigError::GridSize { axis: "width", value: 4 })));
        assert!(matches!(tall.validate(), Err(ConfigError::GridSize { axis: "height", value: 501 })));
    }

    #[test]
    fn test_tick_intervals() {
        let inverted = GameConfig { tick_interval_ms: 50, min_tick_interval_ms: 80, ..GameConfig::default() };
        let zero = GameConfig { min_tick_interval_ms: 0, ..GameConfig::default() };
        let no_milestone = GameConfig { speedup_every: 0, ..GameConfig::default() };

        assert!(matches!(inverted.validate(), Err(ConfigError::TickInterval { .. })));
        assert!(matches!(zero.validate(), Err(ConfigError::TickInterval { .. })));
        assert!(matches!(no_milestone.validate(), Err(ConfigError::SpeedupMilestone)));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = GameConfig::from_yaml_file(Path::new("/nonexistent/snake.yaml"));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
