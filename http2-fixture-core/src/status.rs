//! HTTP status reason phrases.
//!
//! This module provides the fixed status-code → reason-phrase table used by
//! responses, plus the `ok` range check shared by client and server code.

/// Reason phrase returned for codes missing from [`STATUS_TEXTS`].
pub const UNKNOWN_STATUS_TEXT: &str = "Unknown Status";

/// Registered status codes and their canonical reason phrases.
///
/// Sorted by code. Deprecated entries (306) and the RFC 2324 teapot are kept
/// so that servers still emitting them get a readable phrase.
pub const STATUS_TEXTS: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (102, "Processing"),
    (103, "Early Hints"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "Non-Authoritative Information"),
    (204, "No Content"),
    (205, "Reset Content"),
    (206, "Partial Content"),
    (207, "Multi-Status"),
    (208, "Already Reported"),
    (226, "IM Used"),
    (300, "Multiple Choices"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (305, "Use Proxy"),
    (306, "Switch Proxy"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Payload Too Large"),
    (414, "URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Range Not Satisfiable"),
    (417, "Expectation Failed"),
    (418, "I'm a Teapot"),
    (421, "Misdirected Request"),
    (422, "Unprocessable Entity"),
    (423, "Locked"),
    (424, "Failed Dependency"),
    (425, "Too Early"),
    (426, "Upgrade Required"),
    (428, "Precondition Required"),
    (429, "Too Many Requests"),
    (431, "Request Header Fields Too Large"),
    (451, "Unavailable For Legal Reasons"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
    (506, "Variant Also Negotiates"),
    (507, "Insufficient Storage"),
    (508, "Loop Detected"),
    (510, "Not Extended"),
    (511, "Network Authentication Required"),
];

/// Get the reason phrase for a status code.
///
/// Returns [`UNKNOWN_STATUS_TEXT`] for codes that are not registered.
///
/// # Example
///
/// ```
/// use http2_fixture_core::status_text;
///
/// assert_eq!(status_text(404), "Not Found");
/// assert_eq!(status_text(569), "Unknown Status");
/// ```
pub fn status_text(code: u16) -> &'static str {
    STATUS_TEXTS
        .binary_search_by_key(&code, |(c, _)| *c)
        .map(|idx| STATUS_TEXTS[idx].1)
        .unwrap_or(UNKNOWN_STATUS_TEXT)
}

/// Returns true for success and redirection codes (`199 < status < 400`).
pub fn is_ok_status(code: u16) -> bool {
    code > 199 && code < 400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_unique() {
        for pair in STATUS_TEXTS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} before {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_every_registered_code_resolves() {
        for (code, text) in STATUS_TEXTS {
            assert_eq!(status_text(*code), *text);
        }
        assert_eq!(STATUS_TEXTS.len(), 63);
    }

    #[test]
    fn test_legacy_entries() {
        assert_eq!(status_text(306), "Switch Proxy");
        assert_eq!(status_text(418), "I'm a Teapot");
        assert_eq!(status_text(226), "IM Used");
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(status_text(569), UNKNOWN_STATUS_TEXT);
        assert_eq!(status_text(0), UNKNOWN_STATUS_TEXT);
        assert_eq!(status_text(509), UNKNOWN_STATUS_TEXT);
        assert_eq!(status_text(999), UNKNOWN_STATUS_TEXT);
    }

    #[test]
    fn test_ok_range() {
        assert!(!is_ok_status(199));
        assert!(is_ok_status(200));
        assert!(is_ok_status(204));
        assert!(is_ok_status(304));
        assert!(is_ok_status(399));
        assert!(!is_ok_status(400));
        assert!(!is_ok_status(500));
        assert!(!is_ok_status(569));
    }
}
