//! Application configuration
//!
//! Read from an optional `hylands.json` in the working directory, then from
//! `HYLANDS_*` environment variables (which win).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

use crate::application::services::combat::CombatConfig;
use crate::domain::value_objects::RoomRef;

const CONFIG_FILE: &str = "hylands.json";
const ENV_PREFIX: &str = "HYLANDS";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Respawn room for players without a home waypoint
    #[serde(default)]
    pub starting_room: Option<RoomRef>,

    /// Root of persisted player data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Optional JSON world seed (rooms, parties, characters)
    #[serde(default)]
    pub world_file: Option<PathBuf>,

    /// Combat tick period in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Port for player websockets and the engine event feed
    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_server_port() -> u16 {
    3000
}

impl AppConfig {
    /// Load configuration from `hylands.json` and the environment
    pub fn load() -> Result<Self> {
        let builder = Config::builder()
            .add_source(File::new(CONFIG_FILE, FileFormat::Json).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let config: Self = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        anyhow::ensure!(
            config.tick_interval_ms > 0,
            "tick_interval_ms must be greater than zero"
        );
        Ok(config)
    }

    /// Settings injected into the combat services
    pub fn combat(&self) -> CombatConfig {
        CombatConfig {
            starting_room: self.starting_room.clone(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
