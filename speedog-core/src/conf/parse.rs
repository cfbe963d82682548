use crate::conf::rules::SpeedRule;
use crate::conf::settings::{DEFAULT_MONITOR_INTERVAL, GameConfig, MonitoringConfig, SpeedogConfig};
use crate::conf::warning::ConfigWarning;
use std::path::PathBuf;
use std::time::Duration;

/// Result of parsing a config source: the config plus every line that was skipped.
#[derive(Debug)]
pub struct ParsedConfig {
    pub config: SpeedogConfig,
    pub warnings: Vec<ConfigWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Before the first header
    None,
    Game,
    Monitoring,
    Nodes,
    Unknown,
}

impl Section {
    fn from_header(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "game" => Section::Game,
            "monitoring" => Section::Monitoring,
            "nodes" => Section::Nodes,
            _ => Section::Unknown,
        }
    }

    fn is_known(self) -> bool {
        matches!(self, Section::Game | Section::Monitoring | Section::Nodes)
    }
}

/// Parse a sectioned `key=value` config source.
///
/// Never fails: anything that cannot be understood is reported as a warning and skipped.
pub fn parse_config(source: &str) -> ParsedConfig {
    let mut config = SpeedogConfig::default();
    let mut warnings = Vec::new();
    let mut section = Section::None;

    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            section = Section::from_header(&line[1..line.len() - 1]);
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            if section.is_known() {
                warnings.push(ConfigWarning::MalformedLine { line: line_no });
            }
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match section {
            Section::Game => parse_game_entry(&mut config.game, key, value),
            Section::Monitoring => {
                if let Some(w) = parse_monitoring_entry(&mut config.monitoring, key, value, line_no)
                {
                    warnings.push(w);
                }
            }
            Section::Nodes => match parse_node_rule(key, value, line_no) {
                Ok(rule) => {
                    let name = rule.name.clone();
                    if let Some(replaced) = config.rules.insert(rule) {
                        warnings.push(ConfigWarning::DuplicateNode {
                            line: line_no,
                            node: replaced.node,
                            rule: name,
                            replaced: replaced.name,
                        });
                    }
                }
                Err(w) => warnings.push(w),
            },
            Section::None | Section::Unknown => {}
        }
    }

    ParsedConfig { config, warnings }
}

fn parse_game_entry(game: &mut GameConfig, key: &str, value: &str) {
    match key {
        "Process_Name" => game.process_name = value.to_string(),
        "Process_Arch" => game.process_arch = value.to_string(),
        "Client_Command" => game.client_command = PathBuf::from(value),
        _ => {}
    }
}

fn parse_monitoring_entry(
    monitoring: &mut MonitoringConfig,
    key: &str,
    value: &str,
    line: usize,
) -> Option<ConfigWarning> {
    match key {
        "Log_File_Path" => {
            monitoring.log_file_path = (!value.is_empty()).then(|| PathBuf::from(value));
            None
        }
        "Monitor_Interval" => match parse_interval(value) {
            Some(secs) => {
                monitoring.monitor_interval = secs;
                None
            }
            None => {
                monitoring.monitor_interval = DEFAULT_MONITOR_INTERVAL;
                Some(ConfigWarning::InvalidMonitorInterval {
                    line,
                    value: value.to_string(),
                    fallback: DEFAULT_MONITOR_INTERVAL,
                })
            }
        },
        _ => None,
    }
}

fn parse_interval(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0 && Duration::try_from_secs_f64(*secs).is_ok())
}

/// Parse one `[nodes]` entry of the form `RuleName={NodeName, Speed}`.
pub fn parse_node_rule(name: &str, value: &str, line: usize) -> Result<SpeedRule, ConfigWarning> {
    let inner = value.strip_prefix('{').unwrap_or(value);
    let inner = inner.strip_suffix('}').unwrap_or(inner);

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() < 2 {
        return Err(ConfigWarning::InvalidNodeRule {
            line,
            value: value.to_string(),
        });
    }

    let speed: f64 = parts[1].parse().map_err(|_| ConfigWarning::InvalidSpeed {
        line,
        value: parts[1].to_string(),
    })?;

    if !speed.is_finite() || speed <= 0.0 {
        return Err(ConfigWarning::NonPositiveSpeed { line, speed });
    }

    Ok(SpeedRule::new(name, parts[0], speed))
}
