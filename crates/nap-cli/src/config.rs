//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use nap_core::{PolicyError, SchedulePolicy, TimeOfDay};
use serde::{Deserialize, Serialize};

const DEFAULT_TYPICAL_WAKE_TIME: TimeOfDay = match TimeOfDay::new(6 * 60 + 30) {
    Ok(time) => time,
    Err(_) => panic!("06:30 is a valid time of day"),
};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub baby: BabyConfig,
}

/// Schedule preferences, in the units users think in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hours awake before a nap.
    pub default_wake_window: f64,
    /// Hours per nap.
    pub default_nap_duration: f64,
    /// Wake time assumed for days without a logged one.
    pub typical_wake_time: TimeOfDay,
    pub bedtime: TimeOfDay,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let policy = SchedulePolicy::default();
        Self {
            default_wake_window: policy.default_wake_window,
            default_nap_duration: policy.default_nap_duration,
            typical_wake_time: DEFAULT_TYPICAL_WAKE_TIME,
            bedtime: policy.bedtime,
        }
    }
}

impl ScheduleConfig {
    /// Builds a validated policy.
    pub fn policy(&self) -> Result<SchedulePolicy, PolicyError> {
        let policy = SchedulePolicy {
            default_wake_window: self.default_wake_window,
            default_nap_duration: self.default_nap_duration,
            bedtime: self.bedtime,
        };
        policy.validate()?;
        Ok(policy)
    }
}

/// Optional details about the baby.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BabyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("naps.db"),
            schedule: ScheduleConfig::default(),
            baby: BabyConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`, then
    /// `NAPS_*` environment variables (`NAPS_SCHEDULE__BEDTIME=19:30`).
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("NAPS_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for naps.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("naps"))
}

/// Returns the platform-specific data directory for naps.
///
/// On Linux: `~/.local/share/naps`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("naps"))
}
