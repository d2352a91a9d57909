//! Suspicion Rules - parent/child name pairs
//!
//! A pair matches when the parent name contains `parent_contains` and the
//! child name contains `child_contains`. Matching is case-sensitive.

use crate::constants::DEFAULT_SUSPICIOUS_PAIRS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspicionRule {
    pub parent_contains: String,
    pub child_contains: String,
}

impl SuspicionRule {
    pub fn new(parent_contains: &str, child_contains: &str) -> Self {
        Self {
            parent_contains: parent_contains.to_string(),
            child_contains: child_contains.to_string(),
        }
    }

    pub fn matches(&self, parent_name: &str, child_name: &str) -> bool {
        parent_name.contains(&self.parent_contains) && child_name.contains(&self.child_contains)
    }
}

/// Pluggable rule table
pub trait RuleSource: Send + Sync {
    fn rules(&self) -> &[SuspicionRule];

    fn is_suspicious(&self, parent_name: &str, child_name: &str) -> bool {
        self.rules().iter().any(|rule| rule.matches(parent_name, child_name))
    }
}

#[derive(Debug, Clone)]
pub struct StaticRules {
    rules: Vec<SuspicionRule>,
}

impl Default for StaticRules {
    fn default() -> Self {
        Self::new(parse_rules(DEFAULT_SUSPICIOUS_PAIRS))
    }
}

impl StaticRules {
    pub fn new(rules: Vec<SuspicionRule>) -> Self {
        Self { rules }
    }
}

impl RuleSource for StaticRules {
    fn rules(&self) -> &[SuspicionRule] {
        &self.rules
    }
}

/// Parse `parent:child[,parent:child...]`; malformed pairs are skipped
pub fn parse_rules(raw: &str) -> Vec<SuspicionRule> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let parsed = pair
                .split_once(':')
                .map(|(parent, child)| (parent.trim(), child.trim()))
                .filter(|(parent, child)| !parent.is_empty() && !child.is_empty());

            if parsed.is_none() {
                tracing::warn!("Ignoring malformed suspicious pair '{}'", pair);
            }
            parsed.map(|(parent, child)| SuspicionRule::new(parent, child))
        })
        .collect()
}

/// Check a pair against the built-in table
pub fn is_suspicious(parent_name: &str, child_name: &str) -> bool {
    StaticRules::default().is_suspicious(parent_name, child_name)
}
