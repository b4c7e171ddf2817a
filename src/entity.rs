//! Domain entity wrappers.
//!
//! Entities are plain records bound to the [`Endpoint`] that addresses them,
//! so follow-up operations (`retrieve`, `delete`, `join`) need no extra
//! routing knowledge. They carry no algorithmic weight; all dispatch and
//! classification lives in the endpoint layer.

use crate::{Client, Endpoint, Error, Result};
use serde_json::Value;

/// A study set, bound to its `sets/<id>` endpoint.
#[derive(Debug, Clone)]
pub struct Set {
    /// The set's fields as returned by the server.
    pub data: Value,

    endpoint: Endpoint,
}

impl Set {
    /// Wraps raw set data with the endpoint that addresses it.
    pub fn new(data: Value, endpoint: Endpoint) -> Self {
        Self { data, endpoint }
    }

    /// The endpoint this set is bound to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The set's id, when present in the data.
    pub fn id(&self) -> Option<u64> {
        self.data.get("id").and_then(Value::as_u64)
    }

    /// The set's title, when present in the data.
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(Value::as_str)
    }

    /// A field of the underlying record.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// The bare record, without the endpoint binding.
    pub fn into_value(self) -> Value {
        self.data
    }

    /// Refetches the set and replaces the local state.
    pub async fn retrieve(&mut self) -> Result<&mut Self> {
        self.data = self.endpoint.get().await?.into_data();
        Ok(self)
    }

    /// Deletes the set on the server.
    pub async fn delete(self) -> Result<Value> {
        Ok(self.endpoint.delete().await?.into_data())
    }
}

/// A class, bound to its `classes/<id>` endpoint.
#[derive(Debug, Clone)]
pub struct Class {
    /// The class's fields as returned by the server.
    pub data: Value,

    endpoint: Endpoint,
}

impl Class {
    /// Wraps raw class data with the endpoint that addresses it.
    pub fn new(data: Value, endpoint: Endpoint) -> Self {
        Self { data, endpoint }
    }

    /// The endpoint this class is bound to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The class's id, when present in the data.
    pub fn id(&self) -> Option<u64> {
        self.data.get("id").and_then(Value::as_u64)
    }

    /// Fetches the class's sets, each wrapped as a [`Set`].
    ///
    /// Sets carrying an id are bound to their own `sets/<id>` endpoint;
    /// anything without one stays bound to the listing.
    pub async fn sets(&self) -> Result<Vec<Set>> {
        let listing = self.endpoint.child("sets");
        let data = listing.get().await?.into_data();
        let items = match data {
            Value::Array(items) => items,
            other => {
                return Err(Error::Shape(format!(
                    "expected an array of sets, got {other}"
                )))
            }
        };
        Ok(items
            .into_iter()
            .map(|item| {
                let endpoint = match item.get("id").and_then(Value::as_u64) {
                    Some(id) => self.endpoint.api_root().child("sets").call(id),
                    None => listing.clone(),
                };
                Set::new(item, endpoint)
            })
            .collect())
    }

    /// Joins the class as the configured login
    /// (`PUT classes/<id>/users/<login>`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the client was built without a
    /// login.
    pub async fn join(&self) -> Result<Value> {
        let login = self.endpoint.login().ok_or_else(|| {
            Error::Configuration("joining a class requires a configured login".to_string())
        })?;
        let member = self.endpoint.child("users").call(login);
        Ok(member.put().await?.into_data())
    }
}

/// A user profile handle rooted at `users/<name>`.
///
/// The accessors return the raw parsed bodies; wrap them yourself when a
/// typed view is wanted.
#[derive(Debug, Clone)]
pub struct User {
    name: String,
    endpoint: Endpoint,
}

impl User {
    pub(crate) fn new(name: impl Into<String>, client: &Client) -> Self {
        let name = name.into();
        let endpoint = client.endpoint("users").call(&name);
        Self { name, endpoint }
    }

    /// The username this handle addresses.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `users/<name>` endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The user's profile record.
    pub async fn profile(&self) -> Result<Value> {
        Ok(self.endpoint.get().await?.into_data())
    }

    /// The user's sets.
    pub async fn sets(&self) -> Result<Value> {
        Ok(self.endpoint.child("sets").get().await?.into_data())
    }

    /// The user's study sessions.
    pub async fn studied(&self) -> Result<Value> {
        Ok(self.endpoint.child("studied").get().await?.into_data())
    }

    /// The user's classes.
    pub async fn classes(&self) -> Result<Value> {
        Ok(self.endpoint.child("classes").get().await?.into_data())
    }

    /// The user's favorite sets.
    pub async fn favorites(&self) -> Result<Value> {
        Ok(self.endpoint.child("favorites").get().await?.into_data())
    }
}
