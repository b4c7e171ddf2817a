//! Error types for API calls.
//!
//! The dispatcher classifies every failed request exactly once: a 4xx status
//! becomes [`Error::Api`] (a caller mistake the server described), every other
//! non-2xx status stays a generic [`Error::Http`], and connectivity failures
//! pass through as [`Error::Network`]. Nothing is swallowed or retried here.

use http::StatusCode;
use serde_json::Value;

/// The main error type for API calls.
///
/// # Examples
///
/// ```no_run
/// use cardbox::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().token("t0k3n").build()?;
///
/// match client.endpoint("sets").call(42).get().await {
///     Ok(resource) => println!("Set: {}", resource.data),
///     Err(Error::Api { status, description, .. }) => {
///         // The server rejected the request; `description` holds its JSON
///         // body when one was sent.
///         eprintln!("Rejected ({status}): {description:?}");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The server rejected the request with a 4xx status code.
    ///
    /// This is the reclassified, caller-correctable case: a bad id, a
    /// malformed body, missing or invalid auth. When the response body parses
    /// as JSON it is kept in `description` and appended to the rendered error
    /// message; otherwise the message is just the status line.
    #[error("{status} client error for url {url}{}", render_description(.description))]
    Api {
        /// The HTTP status code, in `400..500`.
        status: StatusCode,
        /// The URL the request was issued against.
        url: String,
        /// The raw response body.
        raw_response: String,
        /// The response body parsed as JSON, when parseable.
        description: Option<Value>,
    },

    /// The server returned a non-2xx status outside the 4xx range.
    ///
    /// 5xx and other unexpected statuses are deliberately not reclassified:
    /// they indicate server or infrastructure trouble, not a caller mistake,
    /// and the caller owns any retry policy.
    #[error("{status} server error for url {url}: {raw_response}")]
    Http {
        /// The HTTP status code.
        status: StatusCode,
        /// The URL the request was issued against.
        url: String,
        /// The raw response body.
        raw_response: String,
    },

    /// A network-level failure (DNS, connect, reset, transport timeout).
    ///
    /// Wraps the underlying `reqwest::Error` unmodified.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A paginated response violated the wire contract.
    ///
    /// A collection response must either be a raw JSON array or an object
    /// carrying the collection key and an integer `total_pages`; anything
    /// else fails fast with this error instead of yielding an empty sequence.
    #[error("unexpected response shape: {0}")]
    Shape(String),

    /// The request body could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(String),

    /// Invalid configuration (bad header value, missing login, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An invalid URL was provided.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

fn render_description(description: &Option<Value>) -> String {
    match description {
        Some(body) => format!("\n{body}"),
        None => String::new(),
    }
}

impl Error {
    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Api { raw_response, .. } => Some(raw_response),
            Error::Http { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns `true` for the reclassified 4xx case.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardbox::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::BAD_REQUEST,
    ///     url: "https://api.example.com/sets".to_string(),
    ///     raw_response: String::new(),
    ///     description: None,
    /// };
    /// assert!(err.is_client_error());
    /// ```
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Api { .. })
    }
}

/// A specialized `Result` type for API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_display_appends_parsed_body() {
        let err = Error::Api {
            status: StatusCode::BAD_REQUEST,
            url: "https://api.example.com/elfs".to_string(),
            raw_response: r#"{"error":"Aragorn is not an elf"}"#.to_string(),
            description: Some(json!({"error": "Aragorn is not an elf"})),
        };
        let rendered = err.to_string();
        assert!(rendered.starts_with("400 Bad Request client error for url"));
        assert!(rendered.contains("Aragorn is not an elf"));
    }

    #[test]
    fn api_error_display_without_parseable_body() {
        let err = Error::Api {
            status: StatusCode::FORBIDDEN,
            url: "https://api.example.com/sets/1".to_string(),
            raw_response: "<html>no</html>".to_string(),
            description: None,
        };
        let rendered = err.to_string();
        assert_eq!(
            rendered,
            "403 Forbidden client error for url https://api.example.com/sets/1"
        );
    }

    #[test]
    fn server_error_keeps_raw_body() {
        let err = Error::Http {
            status: StatusCode::BAD_GATEWAY,
            url: "https://api.example.com/sets".to_string(),
            raw_response: "upstream gone".to_string(),
        };
        assert!(!err.is_client_error());
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(err.to_string().contains("upstream gone"));
    }
}
