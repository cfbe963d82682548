use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// A configured mapping from a log node name to a speed multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRule {
    /// Name of the rule as written on the left of `=` in the `[nodes]` section
    pub name: String,
    /// Node name exactly as it appears in the watched log
    pub node: String,
    /// Multiplier applied to the target process, 1.0 is normal speed
    pub speed: f64,
}

impl SpeedRule {
    pub fn new(name: impl Into<String>, node: impl Into<String>, speed: f64) -> Self {
        Self {
            name: name.into(),
            node: node.into(),
            speed,
        }
    }
}

impl Display for SpeedRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}x", self.name, self.node, self.speed)
    }
}

/// Speed rules keyed by node name.
///
/// Only one rule may target a node. Inserting a second rule for the same node replaces
/// the first one and hands it back to the caller.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    by_node: HashMap<String, SpeedRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: SpeedRule) -> Option<SpeedRule> {
        self.by_node.insert(rule.node.clone(), rule)
    }

    pub fn get(&self, node: &str) -> Option<&SpeedRule> {
        self.by_node.get(node)
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeedRule> {
        self.by_node.values()
    }
}

impl FromIterator<SpeedRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = SpeedRule>>(iter: I) -> Self {
        let mut rules = RuleSet::new();
        for rule in iter {
            rules.insert(rule);
        }
        rules
    }
}
