use once_cell::sync::Lazy;
use regex::Regex;

pub const PIPELINE_MARKER: &str = "pipeline_data.name";
pub const NODE_MARKER: &str = "node_name";

/// Which log pattern produced a node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    Enter,
    Complete,
    Mention,
}

/// A log pattern together with the lines it must never match.
pub struct NodePattern {
    pub event: NodeEvent,
    regex: Regex,
    exclude: Option<fn(&str) -> bool>,
}

impl NodePattern {
    fn new(event: NodeEvent, pattern: &str, exclude: Option<fn(&str) -> bool>) -> Self {
        Self {
            event,
            regex: Regex::new(pattern).expect("node pattern must compile"),
            exclude,
        }
    }

    /// Raw capture of the node name, untrimmed. `None` if the pattern does not apply.
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        if self.exclude.is_some_and(|excluded| excluded(line)) {
            return None;
        }

        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

static NODE_PATTERNS: Lazy<Vec<NodePattern>> = Lazy::new(|| {
    vec![
        NodePattern::new(
            NodeEvent::Enter,
            r"(?i)\[pipeline_data\.name=(.*?)\]\s*\|\s*enter",
            None,
        ),
        NodePattern::new(
            NodeEvent::Complete,
            r"(?i)\[pipeline_data\.name=(.*?)\]\s*\|\s*complete",
            None,
        ),
        NodePattern::new(
            NodeEvent::Mention,
            r"(?i)\[(?:node_name|pipeline_data\.name)=(.*?)\]",
            Some(is_aggregate_line),
        ),
    ]
});

/// Cheap check run before any regex.
pub fn has_node_marker(line: &str) -> bool {
    line.contains(PIPELINE_MARKER) || line.contains(NODE_MARKER)
}

/// Summary lines list several nodes or report results and must not trigger rules.
pub fn is_aggregate_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.contains("list=") || lower.contains("result.name=")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeMatch<'a> {
    pub event: NodeEvent,
    pub node: &'a str,
}

/// Extracts node names from log lines. Patterns are tried in order, first match wins.
#[derive(Clone, Copy)]
pub struct NodeMatcher {
    patterns: &'static [NodePattern],
}

impl Default for NodeMatcher {
    fn default() -> Self {
        Self {
            patterns: NODE_PATTERNS.as_slice(),
        }
    }
}

impl NodeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> &'static [NodePattern] {
        self.patterns
    }

    pub fn extract<'a>(&self, line: &'a str) -> Option<NodeMatch<'a>> {
        if !has_node_marker(line) {
            return None;
        }

        let (event, raw) = self
            .patterns
            .iter()
            .find_map(|p| p.capture(line).map(|raw| (p.event, raw)))?;

        let node = raw.trim();
        if node.is_empty() {
            return None;
        }

        Some(NodeMatch { event, node })
    }
}
