//! Per-request configuration.

use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Options for an individual request: headers, query parameters and an
/// optional JSON body.
///
/// Options are merged with the client's defaults at dispatch time; anything
/// set here wins over a default with the same name.
///
/// # Examples
///
/// ```no_run
/// use cardbox::{Client, RequestOptions};
///
/// # async fn example() -> Result<(), cardbox::Error> {
/// let client = Client::builder().client_id("gandalf").build()?;
///
/// let opts = RequestOptions::new()
///     .param("modified_since", "1372272000")
///     .header("X-Request-Id", "abc-123")?;
/// let sets = client.endpoint("sets").get_with(opts).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Additional headers for this request.
    pub headers: HeaderMap,

    /// Query parameters for this request.
    pub params: BTreeMap<String, String>,

    /// JSON body for this request.
    pub body: Option<Value>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("invalid header value: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Adds multiple query parameters.
    pub fn params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Sets the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized to JSON.
    pub fn json_body(mut self, body: &impl Serialize) -> Result<Self, crate::Error> {
        self.body = Some(
            serde_json::to_value(body).map_err(|e| crate::Error::Serialization(e.to_string()))?,
        );
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_accumulate_and_overwrite() {
        let opts = RequestOptions::new()
            .param("page", "1")
            .param("q", "hobbits")
            .param("page", "2");
        assert_eq!(opts.params.get("page").map(String::as_str), Some("2"));
        assert_eq!(opts.params.len(), 2);
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let result = RequestOptions::new().header("bad header", "value");
        assert!(matches!(result, Err(crate::Error::Configuration(_))));
    }

    #[test]
    fn body_serializes_to_json_value() {
        let opts = RequestOptions::new()
            .json_body(&json!({"title": "Sindarin 101"}))
            .unwrap();
        assert_eq!(opts.body, Some(json!({"title": "Sindarin 101"})));
    }
}
