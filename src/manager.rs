//! Managers: domain verbs routed onto named sub-resolvers.
//!
//! A manager owns no state beyond its client; it translates verbs into calls
//! against `sets`/`classes`/`search` resolvers and wraps results into the
//! matching entity. Lookups by a single id always fetch fresh and wrap; bulk
//! id lookups return the raw list unwrapped.

use crate::{entity::{Class, Set}, pagination::Items, Client, Error, RequestOptions, Result};
use serde::Serialize;
use serde_json::Value;

/// Verbs for study sets, routed through the `sets` resolver.
///
/// # Examples
///
/// ```no_run
/// use serde_json::json;
///
/// # async fn example() -> Result<(), cardbox::Error> {
/// # let client = cardbox::Client::builder().login("boromir").build()?;
/// let sets = client.sets();
///
/// let created = sets.create(&json!({
///     "title": "Sindarin 101",
///     "terms": ["mellon"],
///     "definitions": ["friend"],
/// })).await?;
///
/// let fresh = sets.get(created.id().unwrap()).await?;
///
/// let mut mine = sets.mine()?;
/// while let Some(set) = mine.try_next().await? {
///     println!("{}", set["title"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SetManager {
    client: Client,
}

impl SetManager {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    fn endpoint(&self) -> crate::Endpoint {
        self.client.endpoint("sets")
    }

    /// Creates a set and wraps the response.
    ///
    /// When the server echoes an id, the returned [`Set`] is bound to its
    /// own `sets/<id>` endpoint.
    pub async fn create(&self, body: &impl Serialize) -> Result<Set> {
        let data = self.endpoint().post(body).await?.into_data();
        let endpoint = match data.get("id").and_then(Value::as_u64) {
            Some(id) => self.endpoint().call(id),
            None => self.endpoint(),
        };
        Ok(Set::new(data, endpoint))
    }

    /// Fetches one set by id.
    ///
    /// Always issues a fresh GET; the wrapper is never built from cached
    /// state.
    pub async fn get(&self, id: u64) -> Result<Set> {
        let endpoint = self.endpoint().call(id);
        let data = endpoint.get().await?.into_data();
        Ok(Set::new(data, endpoint))
    }

    /// Fetches several sets in one request (`sets?set_ids=a,b,c`).
    ///
    /// The bulk form returns the raw records unwrapped; only the single-id
    /// lookup produces bound [`Set`]s.
    pub async fn get_many(&self, ids: &[u64]) -> Result<Vec<Value>> {
        let joined = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let data = self
            .endpoint()
            .get_with(RequestOptions::new().param("set_ids", joined))
            .await?
            .into_data();
        match data {
            Value::Array(items) => Ok(items),
            other => Err(Error::Shape(format!(
                "expected an array from a bulk set lookup, got {other}"
            ))),
        }
    }

    /// Lazily iterates search results for a query (`search/sets?q=...`).
    pub fn search(&self, query: impl Into<String>) -> Items {
        self.client
            .endpoint("search")
            .child("sets")
            .items()
            .param("q", query)
    }

    /// Lazily iterates the configured login's own sets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the client has no login.
    pub fn mine(&self) -> Result<Items> {
        Ok(self.client.me_endpoint()?.child("sets").items())
    }
}

/// Verbs for classes, routed through the `classes` resolver.
#[derive(Clone)]
pub struct ClassManager {
    client: Client,
}

impl ClassManager {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches one class by id, always fresh.
    pub async fn get(&self, id: impl std::fmt::Display) -> Result<Class> {
        let endpoint = self.client.endpoint("classes").call(id);
        let data = endpoint.get().await?.into_data();
        Ok(Class::new(data, endpoint))
    }

    /// Lazily iterates the configured login's own classes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the client has no login.
    pub fn mine(&self) -> Result<Items> {
        Ok(self.client.me_endpoint()?.child("classes").items())
    }
}
