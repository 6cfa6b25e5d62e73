use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Reference tick period of the device.
pub const TICK_RATE_MS: u64 = 10;

/// Game timing, all expressed in ticks of the driver's period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Timing {
    pub games_per_coin: u32,
    pub go_timeout_ticks: u32,
    pub max_measure_ticks: u32,
    pub result_hold_ticks: u32,
    pub average_hold_ticks: u32,
    /// Inclusive lower bound of the random wait.
    pub min_delay_ticks: u32,
    /// Exclusive upper bound of the random wait.
    pub max_delay_ticks: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            games_per_coin: 3,
            go_timeout_ticks: 1000,
            max_measure_ticks: 200,
            result_hold_ticks: 300,
            average_hold_ticks: 500,
            min_delay_ticks: 100,
            max_delay_ticks: 251,
        }
    }
}

impl Timing {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.games_per_coin == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.max_measure_ticks == 0 {
            return Err(ConfigError::NoMeasuringCap);
        }
        if self.min_delay_ticks >= self.max_delay_ticks {
            return Err(ConfigError::EmptyDelayRange {
                min: self.min_delay_ticks,
                max: self.max_delay_ticks,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub tick_ms: u64,
    pub seed: Option<u64>,
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: TICK_RATE_MS,
            seed: None,
            timing: Timing::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        self.timing.validate()
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "reaction-machine") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("reaction_machine_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config")
                }
            },
            Err(err) => tracing::debug!(path = %self.path.display(), %err, "no config file"),
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
