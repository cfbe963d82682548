use crate::conf::{SpeedRule, SpeedogConfig};
use crate::controller::SpeedController;
use crate::monitor::matcher::NodeMatcher;
use std::sync::Arc;

/// Turns log lines into speed changes.
pub struct RuleDispatcher {
    matcher: NodeMatcher,
    config: Arc<SpeedogConfig>,
    controller: Arc<SpeedController>,
}

impl RuleDispatcher {
    pub fn new(config: Arc<SpeedogConfig>, controller: Arc<SpeedController>) -> Self {
        Self {
            matcher: NodeMatcher::new(),
            config,
            controller,
        }
    }

    /// Handle one log line. Returns the rule that fired, if any.
    ///
    /// A rule fires even when the controller fails to apply it; the failure is logged and
    /// the next match tries again.
    pub fn dispatch(&self, line: &str) -> Option<&SpeedRule> {
        let line = line.trim();
        let found = self.matcher.extract(line)?;
        let rule = self.config.speed_rule(found.node)?;

        tracing::info!(
            node = found.node,
            event = ?found.event,
            rule = %rule.name,
            speed = rule.speed,
            "node matched speed rule"
        );

        if let Err(e) = self.controller.apply_speed(rule.speed) {
            tracing::warn!(error = %e, speed = rule.speed, "failed to apply speed");
        }

        Some(rule)
    }
}
