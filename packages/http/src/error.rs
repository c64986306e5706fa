/// Errors raised while fetching a manifest over HTTP.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("unsupported URL scheme {scheme:?}, expected http or https")]
    UnsupportedScheme { scheme: String },

    /// The server answered with a non-2xx status. `detail` holds the start of
    /// the response body, if any.
    #[error("HTTP {status} from {url}{}", detail_suffix(.detail))]
    Status {
        url: String,
        status: http::StatusCode,
        detail: String,
    },

    #[error("response from {url} exceeds the {limit} byte limit")]
    TooLarge { url: String, limit: u64 },

    #[error("request to {url} was cancelled")]
    Cancelled { url: String },

    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),

    #[error("{message}")]
    Other { message: String },
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {}", detail)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_includes_detail() {
        let e = Error::Status {
            url: "https://example.com/pod.yaml".to_string(),
            status: http::StatusCode::NOT_FOUND,
            detail: "no such object".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "HTTP 404 Not Found from https://example.com/pod.yaml: no such object"
        );
    }

    #[test]
    fn status_display_without_detail() {
        let e = Error::Status {
            url: "https://example.com".to_string(),
            status: http::StatusCode::BAD_GATEWAY,
            detail: String::new(),
        };
        assert_eq!(e.to_string(), "HTTP 502 Bad Gateway from https://example.com");
    }
}
