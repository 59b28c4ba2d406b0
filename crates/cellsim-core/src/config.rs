//! Configuration loading and typed config structures for CellSim.
//!
//! The canonical configuration lives in `cellsim-config.yaml` at the project
//! root. Every field has a default, so a partial file (or no file at all)
//! still yields a complete [`SimulationConfig`].

use std::path::Path;

use cellsim_types::Species;
use serde::Deserialize;
use tracing::info;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "cellsim-config.yaml";

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV_VAR: &str = "CELLSIM_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `cellsim-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Grid size, sugar, seed and pacing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Initial head count per species.
    #[serde(default)]
    pub population: PopulationConfig,

    /// When the run ends.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load the configuration at `path`, falling back to defaults when the
    /// file does not exist, then apply the `CELLSIM_SEED` override and
    /// validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };
        if let Ok(raw) = std::env::var(SEED_ENV_VAR) {
            config.world.override_seed(&raw)?;
            info!(seed = config.world.seed, "Seed overridden from environment");
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as `null`, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.width == 0 {
            return Err(ConfigError::Invalid {
                field: "world.width",
                reason: String::from("must be at least 1"),
            });
        }
        if self.world.height == 0 {
            return Err(ConfigError::Invalid {
                field: "world.height",
                reason: String::from("must be at least 1"),
            });
        }
        if !(0.0..=100.0).contains(&self.world.sugar_factor) {
            return Err(ConfigError::Invalid {
                field: "world.sugar_factor",
                reason: format!("{} is not a percentage in 0-100", self.world.sugar_factor),
            });
        }
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Grid columns.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Grid rows.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Percentage of tiles seeded with sugar at generation.
    #[serde(default = "default_sugar_factor")]
    pub sugar_factor: f64,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds between ticks (0 runs flat out).
    #[serde(default)]
    pub tick_interval_ms: u64,
}

impl WorldConfig {
    /// Replace the seed with one parsed from `raw`.
    pub fn override_seed(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.seed = raw.trim().parse().map_err(|error| ConfigError::Invalid {
            field: "world.seed",
            reason: format!("{SEED_ENV_VAR}={raw:?} is not a u64: {error}"),
        })?;
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            sugar_factor: default_sugar_factor(),
            seed: default_seed(),
            tick_interval_ms: 0,
        }
    }
}

/// Initial population, one count per species.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Opportunistic foragers.
    #[serde(default = "default_forager_count")]
    pub hunt_first: u32,
    /// Greedy foragers.
    #[serde(default = "default_forager_count")]
    pub hunt_largest: u32,
    /// Nearest-first foragers.
    #[serde(default = "default_forager_count")]
    pub hunt_closest: u32,
    /// Herding foragers.
    #[serde(default = "default_forager_count")]
    pub herd: u32,
    /// Trees.
    #[serde(default = "default_producer_count")]
    pub tree: u32,
    /// Weeds.
    #[serde(default = "default_producer_count")]
    pub weed: u32,
    /// Parasites.
    #[serde(default = "default_predator_count")]
    pub leech: u32,
    /// Scavengers.
    #[serde(default = "default_predator_count")]
    pub vulture: u32,
}

impl PopulationConfig {
    /// Configured head count for `species`.
    pub const fn count_for(&self, species: Species) -> u32 {
        match species {
            Species::HuntFirst => self.hunt_first,
            Species::HuntLargest => self.hunt_largest,
            Species::HuntClosest => self.hunt_closest,
            Species::Herd => self.herd,
            Species::Tree => self.tree,
            Species::Weed => self.weed,
            Species::Leech => self.leech,
            Species::Vulture => self.vulture,
        }
    }

    /// Sum over every species.
    pub fn total(&self) -> u64 {
        Species::ALL
            .iter()
            .map(|species| u64::from(self.count_for(*species)))
            .sum()
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            hunt_first: default_forager_count(),
            hunt_largest: default_forager_count(),
            hunt_closest: default_forager_count(),
            herd: default_forager_count(),
            tree: default_producer_count(),
            weed: default_producer_count(),
            leech: default_predator_count(),
            vulture: default_predator_count(),
        }
    }
}

/// Simulation boundary configuration.
///
/// A `max_ticks` of 0 means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks before the run ends (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// End the run as soon as the live registry is empty.
    #[serde(default = "default_true")]
    pub stop_on_extinction: bool,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            stop_on_extinction: true,
        }
    }
}

const fn default_width() -> u32 {
    100
}

const fn default_height() -> u32 {
    80
}

const fn default_sugar_factor() -> f64 {
    30.0
}

const fn default_seed() -> u64 {
    42
}

const fn default_forager_count() -> u32 {
    10
}

const fn default_producer_count() -> u32 {
    15
}

const fn default_predator_count() -> u32 {
    5
}

const fn default_max_ticks() -> u64 {
    1000
}

const fn default_true() -> bool {
    true
}
