mod arena;
mod config;
mod game;
mod game_state;
mod grid;
mod orientation;
mod snake;
mod term;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use config::GameConfig;

pub type TermInt = u16;
pub type TermCoords = (u16, u16);

#[derive(Parser, Debug)]
#[command(name = "snake", about = "Snake in the terminal")]
struct Cli {
    /// YAML file with game settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<u16>,

    /// Terminal columns per cell
    #[arg(long)]
    cell_size: Option<u16>,

    /// Initial snake length
    #[arg(long)]
    length: Option<usize>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_yaml_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(length) = self.length {
            config.initial_length = length;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// The terminal belongs to the game, so logs only go to a file.
fn init_logging(config: &GameConfig) -> Result<()> {
    let path = match &config.log_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path).with_context(|| format!("Error creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_logging(&config)?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(?config, seed = ?cli.seed, "starting");

    // The game loop takes care of restoring the terminal on exit
    game::SnakeGame::new(&config, rng)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from(["snake", "--width", "40", "--length", "3"]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.grid_width, 40);
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.grid_height, GameConfig::default().grid_height);
    }

    #[test]
    fn test_invalid_flag_value_fails_validation() {
        let cli = Cli::parse_from(["snake", "--length", "1"]);

        assert!(cli.load_config().is_err());
    }
}
