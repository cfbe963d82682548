use thiserror::Error;

/// Problems found while parsing a config file that do not abort the load.
///
/// The offending line is skipped and parsing continues with the next one.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigWarning {
    #[error("line {line}: expected `key=value`")]
    MalformedLine { line: usize },

    #[error("line {line}: invalid node rule '{value}', expected {{NodeName, Speed}}")]
    InvalidNodeRule { line: usize, value: String },

    #[error("line {line}: invalid speed value '{value}'")]
    InvalidSpeed { line: usize, value: String },

    #[error("line {line}: speed must be a positive number, got {speed}")]
    NonPositiveSpeed { line: usize, speed: f64 },

    #[error("line {line}: invalid Monitor_Interval '{value}', using {fallback}")]
    InvalidMonitorInterval {
        line: usize,
        value: String,
        fallback: f64,
    },

    #[error("line {line}: rule '{rule}' replaces rule '{replaced}' for node '{node}'")]
    DuplicateNode {
        line: usize,
        node: String,
        rule: String,
        replaced: String,
    },
}

impl ConfigWarning {
    pub fn line(&self) -> usize {
        match self {
            ConfigWarning::MalformedLine { line }
            | ConfigWarning::InvalidNodeRule { line, .. }
            | ConfigWarning::InvalidSpeed { line, .. }
            | ConfigWarning::NonPositiveSpeed { line, .. }
            | ConfigWarning::InvalidMonitorInterval { line, .. }
            | ConfigWarning::DuplicateNode { line, .. } => *line,
        }
    }
}
