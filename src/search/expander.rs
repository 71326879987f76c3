//! Multi-valued query expansion.
//!
//! # Responsibilities
//! - Parse `level=value[,value...]` query strings
//! - Reject separators other than `,`
//! - Expand per-level value lists into single-valued search-term sets
//!
//! # Design Decisions
//! - Expansion is positional: index `i` of every level forms one combination
//! - A level with fewer values repeats its last value
//! - Levels missing from the query search for the empty string

use crate::error::{ResolveError, ResolveResult};

/// Separator between alternative values of one level.
pub const VALUE_SEPARATOR: char = ',';

/// Separator that looks plausible but is not accepted.
const REJECTED_SEPARATOR: char = ';';

/// Raw search input: per level, the ordered list of requested values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelQuery {
    entries: Vec<(String, Vec<String>)>,
}

impl LevelQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a URL query string (without the leading `?`).
    pub fn parse(raw: &str) -> ResolveResult<Self> {
        let mut query = Self::new();
        for (level, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            query.push(&level, &value)?;
        }
        Ok(query)
    }

    /// Add the values in `raw` to `level`. Repeated levels append.
    pub fn push(&mut self, level: &str, raw: &str) -> ResolveResult<()> {
        if raw.contains(REJECTED_SEPARATOR) {
            return Err(ResolveError::Malformed(format!(
                "values of '{level}' must be separated by '{VALUE_SEPARATOR}', not '{REJECTED_SEPARATOR}'"
            )));
        }

        let values = raw.split(VALUE_SEPARATOR).map(str::to_string);
        match self.entries.iter_mut().find(|(name, _)| name == level) {
            Some((_, existing)) => existing.extend(values),
            None => self.entries.push((level.to_string(), values.collect())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self, level: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == level)
            .map(|(_, values)| values.as_slice())
    }

    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// One single-valued search: a term for every level, in level order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    terms: Vec<(String, String)>,
}

impl SearchTerms {
    pub fn new(terms: Vec<(String, String)>) -> Self {
        Self { terms }
    }

    /// Term for `level`; the empty string for levels not present.
    pub fn term(&self, level: &str) -> &str {
        self.terms
            .iter()
            .find(|(name, _)| name == level)
            .map(|(_, term)| term.as_str())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    /// `level=term` pairs joined with `&`, as echoed in search results.
    pub fn searched(&self) -> String {
        self.iter()
            .map(|(level, term)| format!("{level}={term}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Expand `query` into search-term sets over the given level list.
///
/// Returns an empty list for an empty query; the caller decides what that
/// means. Query levels that are not in `levels` are malformed.
pub fn expand(levels: &[String], query: &LevelQuery) -> ResolveResult<Vec<SearchTerms>> {
    if let Some(unknown) = query.levels().find(|l| !levels.iter().any(|known| known == l)) {
        return Err(ResolveError::Malformed(format!("unknown level '{unknown}'")));
    }

    let searches = query
        .levels()
        .filter_map(|level| query.values(level))
        .map(<[String]>::len)
        .max()
        .unwrap_or(0);

    let combinations = (0..searches)
        .map(|i| {
            let terms = levels
                .iter()
                .map(|level| {
                    let term = query
                        .values(level)
                        .and_then(|values| values.get(i).or_else(|| values.last()))
                        .cloned()
                        .unwrap_or_default();
                    (level.clone(), term)
                })
                .collect();
            SearchTerms::new(terms)
        })
        .collect();
    Ok(combinations)
}
