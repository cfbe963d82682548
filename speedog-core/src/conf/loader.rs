use crate::conf::error::ConfigError;
use crate::conf::parse::parse_config;
use crate::conf::settings::SpeedogConfig;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Load the config file at `path`.
///
/// Only a missing or unreadable file fails the load. Lines that cannot be parsed are
/// logged and skipped.
pub fn load_config(path: &Path) -> Result<SpeedogConfig, ConfigError> {
    let source = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::not_found(path),
        _ => ConfigError::read_file(path, e),
    })?;

    let parsed = parse_config(&source);

    for warning in &parsed.warnings {
        tracing::warn!(config = %path.display(), "{warning}");
    }

    let config = parsed.config;
    tracing::info!(
        config = %path.display(),
        process = %config.game.process_name,
        arch = %config.game.process_arch,
        rules = config.rules.len(),
        "configuration loaded"
    );
    for rule in config.rules.iter() {
        tracing::debug!(%rule, "speed rule");
    }

    Ok(config)
}
