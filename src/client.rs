//! Client construction and shared configuration.
//!
//! The [`Client`] type is the entry point: it owns the transport and the
//! configuration every request inherits (base URL, auth, debug flag), and it
//! hands out [`Endpoint`] resolvers rooted at the API base.
//! Use [`ClientBuilder`] to configure and create clients.

use crate::{
    manager::{ClassManager, SetManager},
    entity::User,
    Endpoint, Error, Result,
};
use http::{HeaderMap, HeaderValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// The API root used when [`ClientBuilder::base_url`] is not called.
pub const DEFAULT_BASE_URL: &str = "https://api.quizlet.com/2.0/";

/// A client for the flashcard API.
///
/// The client is immutable after construction and cheap to clone; all clones
/// share one connection pool and one configuration. Every [`Endpoint`] handed
/// out by the client carries the same shared configuration, so concurrent use
/// from multiple tasks needs no extra locking.
///
/// # Examples
///
/// ```no_run
/// use cardbox::Client;
///
/// # async fn example() -> Result<(), cardbox::Error> {
/// let client = Client::builder()
///     .client_id("gandalf")
///     .login("boromir")
///     .build()?;
///
/// // Structured access through managers:
/// let set = client.sets().get(415).await?;
///
/// // Or free-form chaining for anything the managers don't cover:
/// let stats = client.endpoint("users").call("boromir").child("studied").get().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) default_headers: HeaderMap,
    pub(crate) default_params: BTreeMap<String, String>,
    pub(crate) login: Option<String>,
    pub(crate) debug: bool,
}

impl Client {
    /// Creates a new `ClientBuilder`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The resolver for the API root itself.
    pub fn root(&self) -> Endpoint {
        Endpoint::root(Arc::clone(&self.inner))
    }

    /// A resolver one segment below the root.
    ///
    /// Segment names are not restricted to identifiers; `"foo-bar"` works the
    /// same as `"sets"`.
    pub fn endpoint(&self, name: impl Into<String>) -> Endpoint {
        self.root().child(name)
    }

    /// The current user's profile endpoint (`users/<login>`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the client was built without
    /// [`ClientBuilder::login`].
    pub fn me_endpoint(&self) -> Result<Endpoint> {
        let login = self.login().ok_or_else(|| {
            Error::Configuration("no login configured for this client".to_string())
        })?;
        Ok(self.endpoint("users").call(login))
    }

    /// A [`User`] handle for an arbitrary username.
    pub fn user(&self, name: impl Into<String>) -> User {
        User::new(name, self)
    }

    /// A [`User`] handle for the configured login.
    pub fn me(&self) -> Result<User> {
        let login = self.login().ok_or_else(|| {
            Error::Configuration("no login configured for this client".to_string())
        })?;
        Ok(User::new(login.to_string(), self))
    }

    /// The manager for study sets.
    pub fn sets(&self) -> SetManager {
        SetManager::new(self.clone())
    }

    /// The manager for classes.
    pub fn classes(&self) -> ClassManager {
        ClassManager::new(self.clone())
    }

    /// The username configured at construction, if any.
    pub fn login(&self) -> Option<&str> {
        self.inner.login.as_deref()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use cardbox::ClientBuilder;
///
/// # fn example() -> Result<(), cardbox::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://staging.example.com/2.0/")?
///     .token("s3cret")
///     .debug(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    client_id: Option<String>,
    token: Option<String>,
    login: Option<String>,
    debug: bool,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            client_id: None,
            token: None,
            login: None,
            debug: false,
        }
    }

    /// Overrides the API root ([`DEFAULT_BASE_URL`] otherwise).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Authenticates with a client id: every request gains a
    /// `client_id=<id>` query parameter.
    ///
    /// The id is not validated locally; a wrong one surfaces as a 4xx from
    /// the server.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Authenticates with an OAuth token: every request gains an
    /// `Authorization: Bearer <token>` header.
    ///
    /// May be combined with [`client_id`](Self::client_id); both are applied.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The username backing the "current user" endpoint.
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Toggles verbose request/response logging on every endpoint derived
    /// from this client. Has no functional effect on requests.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be constructed or the token
    /// is not a valid header value.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        let mut default_headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::try_from(format!("Bearer {token}"))
                .map_err(|e| Error::Configuration(format!("invalid token: {e}")))?;
            default_headers.insert(http::header::AUTHORIZATION, value);
        }

        let mut default_params = BTreeMap::new();
        if let Some(client_id) = self.client_id {
            default_params.insert("client_id".to_string(), client_id);
        }

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                default_headers,
                default_params,
                login: self.login,
                debug: self.debug,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_is_applied() {
        let client = Client::builder().build().unwrap();
        assert!(client.root().url().starts_with("https://api.quizlet.com/2.0"));
    }

    #[test]
    fn me_endpoint_requires_login() {
        let client = Client::builder().build().unwrap();
        assert!(matches!(
            client.me_endpoint(),
            Err(Error::Configuration(_))
        ));

        let client = Client::builder().login("boromir").build().unwrap();
        assert!(client.me_endpoint().unwrap().url().ends_with("users/boromir"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(Client::builder().base_url("not a url").is_err());
    }
}
