//! Log monitoring
//!
//! A background task wakes every poll interval, reads the lines appended to the game's
//! log since the previous wake, and looks each one up against the configured speed rules:
//!
//! LogTail (complete lines only)
//! NodeMatcher (ordered patterns, first match wins)
//! RuleDispatcher (rule lookup)
//! SpeedController::apply_speed
//!

mod dispatch;
mod error;
mod log_monitor;
mod matcher;
mod tail;

#[cfg(test)]
mod tests;

pub use dispatch::RuleDispatcher;
pub use error::MonitorError;
pub use log_monitor::{LogMonitor, STOP_TIMEOUT, poll_once};
pub use matcher::{
    NODE_MARKER, NodeEvent, NodeMatch, NodeMatcher, NodePattern, PIPELINE_MARKER,
    has_node_marker, is_aggregate_line,
};
pub use tail::{DEFAULT_READ_LIMIT, LogSource, LogTail};
