//! Conditional-GET support.
//!
//! # Data Flow
//! ```text
//! result (SearchResult, Vec<SearchResult> or NodeView)
//!     → etag.rs (salted SHA-256 over the JSON form)
//!     → freshness.rs (If-Modified-Since vs. ancestry modification time)
//!     → Freshness::NotModified (304, no body) or Freshness::Modified (200)
//! ```
//!
//! # Design Decisions
//! - Recomputed per request; the immutable tree makes that safe
//! - `If-None-Match` takes precedence over `If-Modified-Since`
//! - Unparseable or missing inputs fail open (resend)

pub mod etag;
pub mod freshness;

use chrono::{DateTime, Utc};

pub use etag::{compute_etag, etag_for_json, etag_matches, HASH_SALT};
pub use freshness::{format_http_date, is_modified_since, parse_http_date};

/// Conditional headers sent by the client.
///
/// `if_none_match` keeps the raw bytes: a header that is present but not
/// valid UTF-8 still disables the date check.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalRequest<'a> {
    pub if_none_match: Option<&'a [u8]>,
    pub if_modified_since: Option<&'a str>,
}

/// Whether the client's copy is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    NotModified,
    Modified,
}

/// Validators describing one response entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    pub etag: String,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Validators {
    /// Validators for an entity already serialized to `json`.
    pub fn for_json(json: &[u8], last_modified: Option<DateTime<Utc>>) -> Self {
        Self {
            etag: etag_for_json(json),
            last_modified,
        }
    }

    /// Apply the short-circuit rule.
    ///
    /// Not modified when the ETag matches, or when there is no
    /// `If-None-Match` and `If-Modified-Since` says nothing changed.
    pub fn evaluate(&self, request: &ConditionalRequest<'_>) -> Freshness {
        let not_modified = match (request.if_none_match, request.if_modified_since) {
            (Some(tag), _) => etag_matches(tag, &self.etag),
            (None, Some(since)) => !is_modified_since(self.last_modified, Some(since)),
            (None, None) => false,
        };
        if not_modified {
            Freshness::NotModified
        } else {
            Freshness::Modified
        }
    }

    /// `Last-Modified` header value, if known.
    pub fn last_modified_header(&self) -> Option<String> {
        self.last_modified.map(format_http_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn validators() -> Validators {
        Validators {
            etag: "\"tag\"".to_string(),
            last_modified: Some(Utc.with_ymd_and_hms(2016, 1, 2, 12, 0, 0).unwrap()),
        }
    }

    const LATER: &str = "Sat, 02 Jan 2016 13:00:00 GMT";
    const EARLIER: &str = "Sat, 02 Jan 2016 11:00:00 GMT";

    #[test]
    fn test_no_conditional_headers() {
        assert_eq!(validators().evaluate(&ConditionalRequest::default()), Freshness::Modified);
    }

    #[test]
    fn test_matching_etag() {
        let req = ConditionalRequest {
            if_none_match: Some(b"\"tag\"".as_slice()),
            if_modified_since: None,
        };
        assert_eq!(validators().evaluate(&req), Freshness::NotModified);
    }

    #[test]
    fn test_etag_takes_precedence_over_date() {
        // Mismatching ETag: resend even though the date says unchanged.
        let req = ConditionalRequest {
            if_none_match: Some(b"\"other\"".as_slice()),
            if_modified_since: Some(LATER),
        };
        assert_eq!(validators().evaluate(&req), Freshness::Modified);

        // Matching ETag: not modified even though the date says changed.
        let req = ConditionalRequest {
            if_none_match: Some(b"\"tag\"".as_slice()),
            if_modified_since: Some(EARLIER),
        };
        assert_eq!(validators().evaluate(&req), Freshness::NotModified);
    }

    #[test]
    fn test_undecodable_etag_still_blocks_date_check() {
        let req = ConditionalRequest {
            if_none_match: Some(b"\"\xff\"".as_slice()),
            if_modified_since: Some(LATER),
        };
        assert_eq!(validators().evaluate(&req), Freshness::Modified);
    }

    #[test]
    fn test_if_modified_since_only() {
        let later = ConditionalRequest {
            if_none_match: None,
            if_modified_since: Some(LATER),
        };
        assert_eq!(validators().evaluate(&later), Freshness::NotModified);

        let earlier = ConditionalRequest {
            if_none_match: None,
            if_modified_since: Some(EARLIER),
        };
        assert_eq!(validators().evaluate(&earlier), Freshness::Modified);
    }

    #[test]
    fn test_unknown_last_modified_is_modified() {
        let v = Validators {
            etag: "\"tag\"".to_string(),
            last_modified: None,
        };
        let req = ConditionalRequest {
            if_none_match: None,
            if_modified_since: Some(LATER),
        };
        assert_eq!(v.evaluate(&req), Freshness::Modified);
        assert_eq!(v.last_modified_header(), None);
    }

    #[test]
    fn test_for_json() {
        let v = Validators::for_json(br#"["a","b"]"#, None);
        assert_eq!(v.etag, compute_etag(&["a", "b"]).unwrap());
    }
}
