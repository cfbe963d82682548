mod error;
mod loader;
mod parse;
mod rules;
mod settings;
mod warning;


pub use error::ConfigError;
pub use loader::load_config;
pub use parse::{ParsedConfig, parse_config, parse_node_rule};
pub use rules::{RuleSet, SpeedRule};
pub use settings::{
    DEFAULT_CLIENT_COMMAND, DEFAULT_MONITOR_INTERVAL, DEFAULT_PROCESS_ARCH, DEFAULT_PROCESS_NAME,
    GameConfig, MonitoringConfig, SpeedogConfig,
};
pub use warning::ConfigWarning;
