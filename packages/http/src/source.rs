//! Source classification.

/// Whether a source identifier names an HTTP(S) resource rather than a path.
///
/// Only the scheme prefix is inspected; the scheme is matched
/// case-insensitively. Validation of the rest of the URL is left to the
/// fetcher.
///
/// ```rust
/// use manifold_http::is_http;
///
/// assert!(is_http("https://example.com/policy.yaml"));
/// assert!(is_http("HTTP://example.com"));
/// assert!(!is_http("policies/http-policy.yaml"));
/// assert!(!is_http("ftp://example.com/policy.yaml"));
/// ```
pub fn is_http(source: &str) -> bool {
    has_prefix_ignore_case(source, "http://") || has_prefix_ignore_case(source, "https://")
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
