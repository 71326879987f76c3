//! Level matching logic.
//!
//! # Responsibilities
//! - Pick at most one child node for a single search term
//! - Literal equality first, then the first regex that fully matches
//! - Report which pattern fired so the matched path can show it
//!
//! # Design Decisions
//! - Literal matching is exact and case-sensitive
//! - Declaration order breaks ties between regexes
//! - No special wildcard handling: a catch-all is just a regex like `.*`

use crate::tree::Node;

/// How a child was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The term equals the child's pattern text.
    Literal,
    /// The child's regular expression matches the whole term.
    Regex,
}

/// The child selected at one level.
#[derive(Debug, Clone, Copy)]
pub struct LevelMatch<'a> {
    pub node: &'a Node,
    pub kind: MatchKind,
}

impl<'a> LevelMatch<'a> {
    /// The value recorded in the matched path: the term itself for a literal
    /// match, the pattern text for a regex match.
    pub fn fired_value<'t>(&self, term: &'t str) -> &'t str
    where
        'a: 't,
    {
        match self.kind {
            MatchKind::Literal => term,
            MatchKind::Regex => self.node.pattern_text(),
        }
    }
}

/// Select the child of `children` that `term` resolves to.
pub fn match_level<'a>(children: &'a [Node], term: &str) -> Option<LevelMatch<'a>> {
    if let Some(node) = match_literal(children, term) {
        return Some(LevelMatch {
            node,
            kind: MatchKind::Literal,
        });
    }

    children
        .iter()
        .find(|child| child.pattern().is_some_and(|p| p.matches_regex(term)))
        .map(|node| LevelMatch {
            node,
            kind: MatchKind::Regex,
        })
}

/// Exact equality against the pattern text only.
pub fn match_literal<'a>(children: &'a [Node], term: &str) -> Option<&'a Node> {
    children
        .iter()
        .find(|child| child.pattern().is_some_and(|p| p.as_str() == term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Configuration;

    fn level(children: &str) -> Configuration {
        Configuration::from_json(&format!(r#"{{"levels": ["l"], "nodes": {children}}}"#)).unwrap()
    }

    #[test]
    fn test_literal_match() {
        let config = level(r#"[{"match": "a"}, {"match": "b"}]"#);
        let m = match_level(config.root().children(), "b").unwrap();
        assert_eq!(m.kind, MatchKind::Literal);
        assert_eq!(m.node.pattern_text(), "b");
        assert_eq!(m.fired_value("b"), "b");
    }

    #[test]
    fn test_literal_is_case_sensitive() {
        let config = level(r#"[{"match": "NL"}]"#);
        assert!(match_level(config.root().children(), "nl").is_none());
    }

    #[test]
    fn test_literal_beats_earlier_regex() {
        let config = level(r#"[{"match": ".*"}, {"match": "x"}]"#);
        let m = match_level(config.root().children(), "x").unwrap();
        assert_eq!(m.kind, MatchKind::Literal);
        assert_eq!(m.node.pattern_text(), "x");
    }

    #[test]
    fn test_first_declared_regex_wins() {
        let config = level(r#"[{"match": "Ac.*"}, {"match": ".*"}]"#);
        let children = config.root().children();

        let m = match_level(children, "Acme").unwrap();
        assert_eq!(m.kind, MatchKind::Regex);
        assert_eq!(m.fired_value("Acme"), "Ac.*");

        let m = match_level(children, "Garmin").unwrap();
        assert_eq!(m.fired_value("Garmin"), ".*");
    }

    #[test]
    fn test_regex_must_match_whole_term() {
        let config = level(r#"[{"match": "[0-9]+"}]"#);
        let children = config.root().children();
        assert!(match_level(children, "123").is_some());
        assert!(match_level(children, "123a").is_none());
    }

    #[test]
    fn test_no_match() {
        let config = level(r#"[{"match": "a"}]"#);
        assert!(match_level(config.root().children(), "z").is_none());
        assert!(match_level(&[], "z").is_none());
    }

    #[test]
    fn test_literal_only_ignores_regex() {
        let config = level(r#"[{"match": ".*"}]"#);
        let children = config.root().children();
        assert!(match_literal(children, "anything").is_none());
        assert!(match_literal(children, ".*").is_some());
    }
}
