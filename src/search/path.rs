//! Direct path lookup.
//!
//! Resolves an explicit `/`-separated path of literal values. Unlike a
//! search, regular expressions are never evaluated, so a path always
//! addresses exactly one node.

use crate::error::{ResolveError, ResolveResult};
use crate::search::matcher::match_literal;
use crate::tree::{Configuration, Node};

/// Find the node at `path`. The empty path is the root.
pub fn find_node<'a>(config: &'a Configuration, path: &str) -> ResolveResult<&'a Node> {
    let mut node = config.root();
    for segment in segments(path) {
        node = match_literal(node.children(), segment)
            .ok_or_else(|| ResolveError::NotFound(format!("path not found: {path}")))?;
    }
    Ok(node)
}

/// Non-empty path segments, in order.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r#"{
        "levels": ["device", "country"],
        "parameters": [{"key": "k", "value": "root"}],
        "nodes": [
            {
                "match": "Acme",
                "parameters": [{"key": "k", "value": "acme"}],
                "nodes": [{"match": "NL", "parameters": [{"key": "k", "value": "acme-nl"}]}]
            },
            {"match": ".*", "parameters": [{"key": "k", "value": "any"}]}
        ]
    }"#;

    #[test]
    fn test_empty_path_is_root() {
        let config = Configuration::from_json(TREE).unwrap();
        let node = find_node(&config, "").unwrap();
        assert!(node.pattern().is_none());
        assert_eq!(find_node(&config, "/").unwrap(), node);
    }

    #[test]
    fn test_every_literal_path_returns_own_parameters() {
        let config = Configuration::from_json(TREE).unwrap();
        assert_eq!(find_node(&config, "Acme").unwrap().parameters()[0].value, "acme");
        assert_eq!(
            find_node(&config, "Acme/NL").unwrap().parameters()[0].value,
            "acme-nl"
        );
        assert_eq!(find_node(&config, "/Acme//NL/").unwrap().parameters()[0].value, "acme-nl");
    }

    #[test]
    fn test_regex_is_not_evaluated() {
        let config = Configuration::from_json(TREE).unwrap();
        let err = find_node(&config, "Garmin").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));

        // The pattern text itself is a valid literal path.
        assert_eq!(find_node(&config, ".*").unwrap().parameters()[0].value, "any");
    }

    #[test]
    fn test_missing_segment() {
        let config = Configuration::from_json(TREE).unwrap();
        assert!(find_node(&config, "Acme/DE").is_err());
        assert!(find_node(&config, "Acme/NL/extra").is_err());
    }
}
