//! Best-match resolution.
//!
//! Walks the tree one level at a time, descending into the child selected
//! by the level matcher and stopping at the first level without a match.
//! The result is always the own parameters of the deepest node reached.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ResolveError, ResolveResult};
use crate::search::expander::SearchTerms;
use crate::search::matcher::match_level;
use crate::tree::{Configuration, Parameter};

/// Outcome of one single-valued search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// The query as searched, `level=term` joined with `&`.
    pub searched: String,

    /// The patterns that fired, `level=value` joined with `&`.
    pub matched: String,

    /// Ancestry modification time of the node the parameters came from.
    #[serde(skip)]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Resolve a single search-term set.
pub fn resolve(config: &Configuration, terms: &SearchTerms) -> SearchResult {
    let mut node = config.root();
    let mut matched = Vec::new();

    for level in config.levels() {
        let term = terms.term(level);
        let Some(found) = match_level(node.children(), term) else {
            break;
        };
        matched.push(format!("{level}={}", found.fired_value(term)));
        node = found.node;
    }

    let result = SearchResult {
        parameters: node.parameters().to_vec(),
        searched: terms.searched(),
        matched: matched.join("&"),
        last_modified: node.modified_up_to_root(),
    };
    tracing::trace!(
        searched = %result.searched,
        matched = %result.matched,
        "Search resolved"
    );
    result
}

/// Resolve every set, preserving order.
///
/// An empty input is a not-found condition: no combination could be built.
pub fn resolve_all(
    config: &Configuration,
    searches: &[SearchTerms],
) -> ResolveResult<Vec<SearchResult>> {
    if searches.is_empty() {
        return Err(ResolveError::NotFound("no search combination could be built".into()));
    }
    Ok(searches.iter().map(|terms| resolve(config, terms)).collect())
}

/// Latest modification time over a set of results.
pub fn last_modified(results: &[SearchResult]) -> Option<DateTime<Utc>> {
    results.iter().filter_map(|r| r.last_modified).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::expander::{expand, LevelQuery};
    use chrono::TimeZone;

    const SIMPLE: &str = r#"{
        "levels": ["criterium"],
        "parameters": [{"key": "key-0", "value": "value-0"}],
        "modified": "2016-01-02T00:00:00Z",
        "nodes": [
            {
                "match": "child-1",
                "parameters": [
                    {"key": "key-1a", "value": "value-1a"},
                    {"key": "key-1b", "value": "value-1b"}
                ],
                "modified": "2016-01-02T11:11:11Z"
            },
            {"match": "child-2", "parameters": [{"key": "key-2", "value": "value-2"}]}
        ]
    }"#;

    const LAYERED: &str = r#"{
        "levels": ["device", "country"],
        "parameters": [{"key": "k", "value": "root"}],
        "nodes": [
            {
                "match": "Acme",
                "parameters": [{"key": "k", "value": "acme"}],
                "nodes": [
                    {"match": "NL", "parameters": [{"key": "k", "value": "acme-nl"}]}
                ]
            },
            {
                "match": ".*",
                "parameters": [{"key": "k", "value": "any"}],
                "nodes": [{"match": ".*", "parameters": [{"key": "k", "value": "any-any"}]}]
            }
        ]
    }"#;

    fn search(config: &Configuration, query: &str) -> Vec<SearchResult> {
        let query = LevelQuery::parse(query).unwrap();
        let sets = expand(config.levels(), &query).unwrap();
        resolve_all(config, &sets).unwrap()
    }

    fn keys(result: &SearchResult) -> Vec<&str> {
        result.parameters.iter().map(|p| p.key.as_str()).collect()
    }

    #[test]
    fn test_literal_child() {
        let config = Configuration::from_json(SIMPLE).unwrap();
        let results = search(&config, "criterium=child-1");
        assert_eq!(results.len(), 1);
        assert_eq!(keys(&results[0]), ["key-1a", "key-1b"]);
        assert_eq!(results[0].matched, "criterium=child-1");
        assert_eq!(results[0].searched, "criterium=child-1");
    }

    #[test]
    fn test_unknown_value_falls_back_to_root() {
        let config = Configuration::from_json(SIMPLE).unwrap();
        let results = search(&config, "criterium=unknown");
        assert_eq!(keys(&results[0]), ["key-0"]);
        assert_eq!(results[0].matched, "");
    }

    #[test]
    fn test_multi_search_order() {
        let config = Configuration::from_json(SIMPLE).unwrap();
        let results = search(&config, "criterium=child-1,unknown");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].matched, "criterium=child-1");
        assert_eq!(results[1].searched, "criterium=unknown");
        assert_eq!(keys(&results[1]), ["key-0"]);
    }

    #[test]
    fn test_partial_path_stops_at_first_miss() {
        let config = Configuration::from_json(LAYERED).unwrap();
        let results = search(&config, "device=Acme&country=DE");
        assert_eq!(results[0].parameters[0].value, "acme");
        assert_eq!(results[0].matched, "device=Acme");
    }

    #[test]
    fn test_wildcard_shows_pattern() {
        let config = Configuration::from_json(LAYERED).unwrap();
        let results = search(&config, "device=Garmin&country=NL");
        assert_eq!(results[0].parameters[0].value, "any-any");
        assert_eq!(results[0].matched, "device=.*&country=.*");
    }

    #[test]
    fn test_parameters_never_merged() {
        let config = Configuration::from_json(LAYERED).unwrap();
        let results = search(&config, "device=Acme&country=NL");
        assert_eq!(results[0].parameters, vec![Parameter::new("k", "acme-nl")]);
    }

    #[test]
    fn test_last_modified_follows_ancestry() {
        let config = Configuration::from_json(SIMPLE).unwrap();
        let results = search(&config, "criterium=child-1,child-2");
        let child_1 = Utc.with_ymd_and_hms(2016, 1, 2, 11, 11, 11).unwrap();
        let root = Utc.with_ymd_and_hms(2016, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(results[0].last_modified, Some(child_1));
        assert_eq!(results[1].last_modified, Some(root));
        assert_eq!(last_modified(&results), Some(child_1));
    }

    #[test]
    fn test_no_combinations_is_not_found() {
        let config = Configuration::from_json(SIMPLE).unwrap();
        let err = resolve_all(&config, &[]).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }

    #[test]
    fn test_serialized_shape() {
        let config = Configuration::from_json(SIMPLE).unwrap();
        let results = search(&config, "criterium=child-1");
        assert_eq!(
            serde_json::to_string(&results[0]).unwrap(),
            r#"{"parameters":[{"key":"key-1a","value":"value-1a"},{"key":"key-1b","value":"value-1b"}],"searched":"criterium=child-1","matched":"criterium=child-1"}"#
        );
    }
}
