use crate::conf::rules::{RuleSet, SpeedRule};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROCESS_NAME: &str = "GrilsFrontLine.exe";
pub const DEFAULT_PROCESS_ARCH: &str = "x64";
pub const DEFAULT_CLIENT_COMMAND: &str = "speedhack-client";
pub const DEFAULT_MONITOR_INTERVAL: f64 = 1.0;

/// `[game]` section: which process to speed up and how to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub process_name: String,
    pub process_arch: String,
    pub client_command: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            process_arch: DEFAULT_PROCESS_ARCH.to_string(),
            client_command: PathBuf::from(DEFAULT_CLIENT_COMMAND),
        }
    }
}

/// `[monitoring]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringConfig {
    pub log_file_path: Option<PathBuf>,
    /// Poll interval in seconds, always positive and finite
    pub monitor_interval: f64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_file_path: None,
            monitor_interval: DEFAULT_MONITOR_INTERVAL,
        }
    }
}

impl MonitoringConfig {
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.monitor_interval)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_MONITOR_INTERVAL))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpeedogConfig {
    pub game: GameConfig,
    pub monitoring: MonitoringConfig,
    pub rules: RuleSet,
}

impl SpeedogConfig {
    pub fn speed_rule(&self, node: &str) -> Option<&SpeedRule> {
        self.rules.get(node)
    }
}
