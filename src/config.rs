use std::fs;
use std::path::Path;

use crate::error::{ensure_non_negative, ensure_positive, Error, Result};
use crate::merge::MergeConfig;
use crate::tracker::TrackerConfig;
use crate::zone::{Zone, DEFAULT_COOLDOWN_SECONDS};
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ZoneConfig {
    pub cooldown_seconds: f64,
    pub zones: Vec<Zone>,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            zones: Vec::new(),
        }
    }
}

fn default_crowd_threshold() -> usize {
    3
}

/// Every section is optional; a tracker section, when present, must be
/// complete.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "TrackerConfig::person")]
    pub person: TrackerConfig,
    #[serde(default = "TrackerConfig::vehicle")]
    pub vehicle: TrackerConfig,
    #[serde(default)]
    pub zones: ZoneConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default = "default_crowd_threshold")]
    pub crowd_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            person: TrackerConfig::person(),
            vehicle: TrackerConfig::vehicle(),
            zones: ZoneConfig::default(),
            merge: MergeConfig::default(),
            crowd_threshold: default_crowd_threshold(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.person.validate()?;
        self.vehicle.validate()?;
        self.merge.validate()?;
        ensure_non_negative("cooldown_seconds", self.zones.cooldown_seconds)?;
        ensure_positive("crowd_threshold", self.crowd_threshold as f64)?;

        let (first, second) = (self.person.id_range(), self.vehicle.id_range());
        if first.start < second.end && second.start < first.end {
            return Err(Error::IdRangeOverlap { first, second });
        }

        Ok(())
    }
}
