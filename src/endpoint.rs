//! Endpoint resolution and request dispatch.
//!
//! An [`Endpoint`] is one node in the API's path tree plus the request
//! configuration it inherited from its [`Client`](crate::Client). Resolvers
//! are immutable: [`child`](Endpoint::child) and [`call`](Endpoint::call)
//! return new resolvers one segment deeper, and [`url`](Endpoint::url) is a
//! pure join that never touches the network. Dispatch happens through
//! [`request`](Endpoint::request) and its verb aliases, which merge per-call
//! options over the client defaults and classify the outcome.

use crate::{
    client::ClientInner, pagination::Items, Error, RequestOptions, Resource, Result,
};
use http::Method;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// An immutable handle for one node in the API's path tree.
///
/// Chaining works two ways, matching how path segments arise in practice:
/// named segments via [`child`](Endpoint::child), identifier values
/// (numeric ids, usernames) via [`call`](Endpoint::call).
///
/// ```no_run
/// # fn example() -> Result<(), cardbox::Error> {
/// # let client = cardbox::Client::builder().build()?;
/// let endpoint = client.endpoint("users").call("boromir").child("sets");
/// assert!(endpoint.url().ends_with("users/boromir/sets"));
/// # Ok(())
/// # }
/// ```
///
/// `child` accepts any segment name, including ones that are not valid Rust
/// identifiers (`client.endpoint("foo-bar")`).
#[derive(Clone)]
pub struct Endpoint {
    inner: Arc<ClientInner>,
    segments: Vec<String>,
}

impl Endpoint {
    pub(crate) fn root(inner: Arc<ClientInner>) -> Self {
        Self {
            inner,
            segments: Vec::new(),
        }
    }

    /// Returns a new resolver one named segment deeper.
    ///
    /// The child copies this resolver's configuration (auth defaults, debug
    /// flag) at creation; neither resolver can observe later changes in the
    /// other because neither is mutable.
    pub fn child(&self, name: impl Into<String>) -> Endpoint {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Endpoint {
            inner: Arc::clone(&self.inner),
            segments,
        }
    }

    /// Appends a stringified value as a path segment.
    ///
    /// This is the call-as-segment form: `users.call("boromir")` resolves to
    /// `.../users/boromir`, `sets.call(415)` to `.../sets/415`.
    pub fn call(&self, value: impl fmt::Display) -> Endpoint {
        self.child(value.to_string())
    }

    /// The fully joined URL for this resolver.
    ///
    /// Pure and side-effect-free: the base URL and every segment joined with
    /// `/`, duplicate separators collapsed. Calling it twice returns
    /// identical strings.
    pub fn url(&self) -> String {
        let mut url = self.inner.base_url.as_str().trim_end_matches('/').to_string();
        for segment in &self.segments {
            let segment = segment.trim_matches('/');
            if segment.is_empty() {
                continue;
            }
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    /// The last path segment, used as the key items live under in a
    /// paginated response. `None` at the root.
    pub fn collection_key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Lazily iterates the items of the collection this resolver addresses.
    ///
    /// See [`Items`] for the paging protocol.
    pub fn items(&self) -> Items {
        Items::new(self.clone())
    }

    /// Issues one HTTP request and classifies the outcome.
    ///
    /// The final URL is this resolver extended by `segments`; `opts` are
    /// merged over the client defaults, per-call values winning. A 4xx
    /// response becomes [`Error::Api`] with the server's JSON description
    /// attached when parseable; any other non-2xx stays [`Error::Http`];
    /// transport failures pass through as [`Error::Network`]. Classification
    /// happens here and nowhere else.
    pub async fn request(
        &self,
        method: Method,
        segments: &[&str],
        opts: RequestOptions,
    ) -> Result<Resource> {
        let target = segments
            .iter()
            .fold(self.clone(), |endpoint, segment| endpoint.child(*segment));

        let mut params = self.inner.default_params.clone();
        params.extend(opts.params);

        let mut url = Url::parse(&target.url())?;
        for (key, value) in &params {
            url.query_pairs_mut().append_pair(key, value);
        }

        let mut headers = self.inner.default_headers.clone();
        headers.extend(opts.headers);

        tracing::debug!(method = %method, url = %url, "dispatching request");
        if self.inner.debug {
            tracing::debug!(params = ?params, body = ?opts.body, "request detail");
        }

        let mut request = self.inner.http.request(method, url.clone()).headers(headers);
        if let Some(body) = &opts.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let raw_response = response.text().await?;

        tracing::info!(status = status.as_u16(), url = %url, "received response");

        if status.is_client_error() {
            tracing::error!(
                status = status.as_u16(),
                response = %raw_response,
                "client error (4xx)"
            );
            let description = serde_json::from_str::<Value>(&raw_response).ok();
            return Err(Error::Api {
                status,
                url: url.to_string(),
                raw_response,
                description,
            });
        }
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                response = %raw_response,
                "server error"
            );
            return Err(Error::Http {
                status,
                url: url.to_string(),
                raw_response,
            });
        }

        // A 204 (or any empty 2xx) parses as null rather than failing.
        let data = if raw_response.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw_response)
                .map_err(|e| Error::Shape(format!("response body was not valid JSON: {e}")))?
        };

        if self.inner.debug {
            tracing::debug!(body = %data, "response body");
        }

        Ok(Resource::new(data, target))
    }

    /// Issues a GET request against this resolver.
    pub async fn get(&self) -> Result<Resource> {
        self.request(Method::GET, &[], RequestOptions::new()).await
    }

    /// Issues a GET request with explicit options.
    pub async fn get_with(&self, opts: RequestOptions) -> Result<Resource> {
        self.request(Method::GET, &[], opts).await
    }

    /// Issues a POST request with a JSON body.
    pub async fn post(&self, body: &impl Serialize) -> Result<Resource> {
        self.request(Method::POST, &[], RequestOptions::new().json_body(body)?)
            .await
    }

    /// Issues a POST request with explicit options.
    pub async fn post_with(&self, opts: RequestOptions) -> Result<Resource> {
        self.request(Method::POST, &[], opts).await
    }

    /// Issues a bodyless PUT request against this resolver.
    pub async fn put(&self) -> Result<Resource> {
        self.request(Method::PUT, &[], RequestOptions::new()).await
    }

    /// Issues a PUT request with explicit options.
    pub async fn put_with(&self, opts: RequestOptions) -> Result<Resource> {
        self.request(Method::PUT, &[], opts).await
    }

    /// Issues a DELETE request against this resolver.
    pub async fn delete(&self) -> Result<Resource> {
        self.request(Method::DELETE, &[], RequestOptions::new())
            .await
    }

    /// Issues a DELETE request with explicit options.
    pub async fn delete_with(&self, opts: RequestOptions) -> Result<Resource> {
        self.request(Method::DELETE, &[], opts).await
    }

    pub(crate) fn api_root(&self) -> Endpoint {
        Endpoint::root(Arc::clone(&self.inner))
    }

    pub(crate) fn login(&self) -> Option<&str> {
        self.inner.login.as_deref()
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint").field("url", &self.url()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::Client;

    fn client(base: &str) -> Client {
        Client::builder().base_url(base).unwrap().build().unwrap()
    }

    #[test]
    fn url_joins_segments_in_order() {
        let api = client("https://api.example.com/2.0/");
        let endpoint = api.endpoint("users").call("boromir").child("sets");
        assert_eq!(
            endpoint.url(),
            "https://api.example.com/2.0/users/boromir/sets"
        );
    }

    #[test]
    fn child_and_call_chains_are_equivalent() {
        let api = client("https://api.example.com/2.0/");
        let by_child = api.endpoint("sets").child("415");
        let by_call = api.endpoint("sets").call(415);
        assert_eq!(by_child.url(), by_call.url());
    }

    #[test]
    fn non_identifier_segments_work() {
        let api = client("https://api.example.com/2.0/");
        let endpoint = api.endpoint("foo-bar").child("sub.path");
        assert_eq!(endpoint.url(), "https://api.example.com/2.0/foo-bar/sub.path");
    }

    #[test]
    fn duplicate_separators_are_normalized() {
        let api = client("https://api.example.com/2.0///");
        let endpoint = api.endpoint("/sets/").child("/415/");
        assert_eq!(endpoint.url(), "https://api.example.com/2.0/sets/415");
    }

    #[test]
    fn url_is_idempotent_and_structural() {
        let api = client("https://api.example.com/2.0/");
        let endpoint = api.endpoint("classes").call(7);
        assert_eq!(endpoint.url(), endpoint.url());

        // Two independently built resolvers with the same segment sequence
        // resolve to equal URLs.
        let other = api.endpoint("classes").call(7);
        assert_eq!(endpoint.url(), other.url());
    }

    #[test]
    fn collection_key_is_last_segment() {
        let api = client("https://api.example.com/2.0/");
        assert_eq!(api.root().collection_key(), None);
        assert_eq!(
            api.endpoint("users").call("gimli").child("sets").collection_key(),
            Some("sets")
        );
    }

    #[test]
    fn children_do_not_affect_parents() {
        let api = client("https://api.example.com/2.0/");
        let parent = api.endpoint("sets");
        let _child = parent.child("415");
        assert_eq!(parent.url(), "https://api.example.com/2.0/sets");
    }
}
