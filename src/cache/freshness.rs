//! `If-Modified-Since` evaluation.
//!
//! Parsing is stateless, so no synchronization is needed between requests.
//! Every doubtful case counts as modified: it is always safe to resend.

use chrono::{DateTime, Utc};

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parse an HTTP date header value.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Format a timestamp for `Last-Modified`.
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

/// Whether the resource changed on or after the `If-Modified-Since` time.
///
/// Equality counts as modified: header times are truncated to seconds.
pub fn is_modified_since(
    last_modified: Option<DateTime<Utc>>,
    if_modified_since: Option<&str>,
) -> bool {
    let (Some(modified), Some(header)) = (last_modified, if_modified_since) else {
        return true;
    };
    match parse_http_date(header) {
        Some(since) => {
            let modified_since = modified >= since;
            tracing::debug!(
                modified_since,
                if_modified_since = %since,
                last_modified = %modified,
                "Evaluated If-Modified-Since"
            );
            modified_since
        }
        None => {
            tracing::info!(if_modified_since = header, "Incorrectly formatted If-Modified-Since");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 1, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_and_format() {
        let header = "Sat, 02 Jan 2016 12:00:00 GMT";
        assert_eq!(parse_http_date(header), Some(noon()));
        assert_eq!(format_http_date(noon()), header);
    }

    #[test]
    fn test_parse_numeric_zone() {
        assert_eq!(parse_http_date("Sat, 02 Jan 2016 13:00:00 +0100"), Some(noon()));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_http_date("yesterday"), None);
        assert!(is_modified_since(Some(noon()), Some("yesterday")));
    }

    #[test]
    fn test_missing_inputs_count_as_modified() {
        assert!(is_modified_since(None, Some("Sat, 02 Jan 2016 12:00:00 GMT")));
        assert!(is_modified_since(Some(noon()), None));
        assert!(is_modified_since(None, None));
    }

    #[test]
    fn test_comparison() {
        assert!(!is_modified_since(Some(noon()), Some("Sat, 02 Jan 2016 12:00:01 GMT")));
        assert!(is_modified_since(Some(noon()), Some("Sat, 02 Jan 2016 12:00:00 GMT")));
        assert!(is_modified_since(Some(noon()), Some("Sat, 02 Jan 2016 11:59:59 GMT")));
    }
}
