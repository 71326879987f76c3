//! Tree node and pattern types.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single key/value pair attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Characters that turn a `match` text into a regular expression.
const REGEX_META: &str = r"\.+*?()|[]{}^$";

/// The rule a node is matched against, resolved once at load time.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Plain text, only ever compared for equality.
    Literal(String),
    /// A regular expression that must match the whole term.
    Regex { source: String, compiled: Regex },
}

impl Pattern {
    /// Classify and compile a `match` text.
    ///
    /// Texts without regex meta characters are literals; everything else is
    /// compiled anchored on both ends.
    pub fn parse(text: &str) -> Result<Self, regex::Error> {
        if !text.chars().any(|c| REGEX_META.contains(c)) {
            return Ok(Pattern::Literal(text.to_string()));
        }
        let compiled = Regex::new(&format!("^(?:{text})$"))?;
        Ok(Pattern::Regex {
            source: text.to_string(),
            compiled,
        })
    }

    /// The pattern text as written in the tree definition.
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Literal(text) => text,
            Pattern::Regex { source, .. } => source,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Pattern::Regex { .. })
    }

    /// Regex full match. Literals never match here.
    pub fn matches_regex(&self, term: &str) -> bool {
        match self {
            Pattern::Literal(_) => false,
            Pattern::Regex { compiled, .. } => compiled.is_match(term),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.is_regex() == other.is_regex() && self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

/// One element of the configuration tree.
///
/// Nodes own their children exclusively and are never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pattern: Option<Pattern>,
    parameters: Vec<Parameter>,
    children: Vec<Node>,
    modified: Option<DateTime<Utc>>,
    modified_up_to_root: Option<DateTime<Utc>>,
}

impl Node {
    /// Build a node. `inherited` is the ancestry modification time of the
    /// parent; children must have been built with this node's.
    pub(crate) fn new(
        pattern: Option<Pattern>,
        parameters: Vec<Parameter>,
        children: Vec<Node>,
        modified: Option<DateTime<Utc>>,
        inherited: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            pattern,
            parameters,
            children,
            modified,
            modified_up_to_root: latest(inherited, modified),
        }
    }

    /// `None` for the root.
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// Pattern text, or the empty string for the root.
    pub fn pattern_text(&self) -> &str {
        self.pattern.as_ref().map(Pattern::as_str).unwrap_or_default()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// This node's own modification time.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    /// Latest modification time of this node and all of its ancestors.
    pub fn modified_up_to_root(&self) -> Option<DateTime<Utc>> {
        self.modified_up_to_root
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// The later of two optional timestamps.
pub(crate) fn latest(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plain_text_is_literal() {
        let pattern = Pattern::parse("child-1").unwrap();
        assert!(!pattern.is_regex());
        assert_eq!(pattern.as_str(), "child-1");
        assert!(!pattern.matches_regex("child-1"));
    }

    #[test]
    fn test_regex_is_anchored() {
        let pattern = Pattern::parse("Acme.*").unwrap();
        assert!(pattern.is_regex());
        assert!(pattern.matches_regex("AcmeGo"));
        assert!(!pattern.matches_regex("MyAcme"));

        let alternation = Pattern::parse("a|b").unwrap();
        assert!(alternation.matches_regex("a"));
        assert!(!alternation.matches_regex("ab"));
    }

    #[test]
    fn test_catch_all_matches_empty() {
        let pattern = Pattern::parse(".*").unwrap();
        assert!(pattern.matches_regex(""));
        assert!(pattern.matches_regex("anything"));
    }

    #[test]
    fn test_invalid_regex() {
        assert!(Pattern::parse("[unclosed").is_err());
    }

    #[test]
    fn test_ancestry_time_takes_latest() {
        let early = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2016, 6, 1, 0, 0, 0).unwrap();

        let node = Node::new(None, Vec::new(), Vec::new(), Some(early), Some(late));
        assert_eq!(node.modified(), Some(early));
        assert_eq!(node.modified_up_to_root(), Some(late));

        let bare = Node::new(None, Vec::new(), Vec::new(), None, None);
        assert_eq!(bare.modified_up_to_root(), None);
    }
}
