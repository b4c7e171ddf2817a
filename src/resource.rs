//! Response wrapper that keeps the endpoint chain alive.
//!
//! Every dispatch returns a [`Resource`]: the parsed JSON body re-bound to
//! the [`Endpoint`](crate::Endpoint) that produced it. A consumer can keep
//! chaining (`resource.endpoint().child("terms")`) without caring whether it
//! holds raw data or a domain entity; entity wrappers are built on top of
//! exactly this.

use crate::Endpoint;
use serde_json::Value;

/// A parsed response body bound to the endpoint that produced it.
///
/// Dereferences to the inner [`Value`], so JSON access reads naturally:
///
/// ```no_run
/// # async fn example() -> Result<(), cardbox::Error> {
/// # let client = cardbox::Client::builder().build()?;
/// let set = client.endpoint("sets").call(415).get().await?;
/// println!("title: {}", set["title"]);
///
/// // The bound endpoint still addresses sets/415.
/// let terms = set.endpoint().child("terms").get().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Resource {
    /// The deserialized response body (object, array or scalar).
    pub data: Value,

    endpoint: Endpoint,
}

impl Resource {
    /// Binds a parsed body to the endpoint it came from.
    ///
    /// Called by the dispatcher for every successful request; the same
    /// constructor is used uniformly regardless of the body's shape.
    pub(crate) fn new(data: Value, endpoint: Endpoint) -> Self {
        Self { data, endpoint }
    }

    /// The endpoint this resource was fetched from.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Consumes the resource, returning the bare JSON value.
    pub fn into_data(self) -> Value {
        self.data
    }
}

impl AsRef<Value> for Resource {
    fn as_ref(&self) -> &Value {
        &self.data
    }
}

impl std::ops::Deref for Resource {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
