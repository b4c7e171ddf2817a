//! Lazy iteration over multi-page collections.
//!
//! The wire contract: a collection response is either a raw JSON array (the
//! complete result, nothing more to fetch) or an object carrying the items
//! under a key equal to the endpoint's last path segment plus an integer
//! `total_pages`. [`Items`] walks that protocol one page at a time, on
//! demand; page numbering starts at 1 and page 1 arrives with the metadata,
//! so it costs no extra request.

use crate::{Endpoint, Error, RequestOptions, Result};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

/// A lazy, finite, single-pass cursor over a paginated collection.
///
/// Created by [`Endpoint::items`]. Nothing is fetched until the first
/// [`try_next`](Items::try_next) call, and page *n + 1* is only requested
/// once page *n* is drained. The cursor cannot be restarted; iterate again
/// by calling [`Endpoint::items`] again.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), cardbox::Error> {
/// # let client = cardbox::Client::builder().build()?;
/// let mut dwarves = client.endpoint("dwarves").items();
/// while let Some(dwarf) = dwarves.try_next().await? {
///     println!("{}", dwarf["name"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Items {
    endpoint: Endpoint,
    params: BTreeMap<String, String>,
    max_items: Option<usize>,
    buffer: VecDeque<Value>,
    state: State,
    counting: bool,
    yielded_in_page: usize,
}

#[derive(Debug)]
enum State {
    Unpolled,
    Paging { next_page: u64, total_pages: u64 },
    Done,
}

impl Items {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: BTreeMap::new(),
            max_items: None,
            buffer: VecDeque::new(),
            state: State::Unpolled,
            counting: false,
            yielded_in_page: 0,
        }
    }

    /// Adds a query parameter to every page request.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Adds multiple query parameters to every page request.
    pub fn params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Bounds the number of yielded items, per page.
    ///
    /// The counter resets at the start of every page after the first and is
    /// checked after each item, so the item that pushes the count strictly
    /// above `max` is still yielded before iteration stops. Page 1 is never
    /// counted. The total across pages can therefore exceed `max`; this
    /// mirrors the server protocol's historical cutoff semantics rather than
    /// enforcing an exact global cap.
    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Yields the next item, fetching the next page when the current one is
    /// drained.
    ///
    /// Returns `Ok(None)` once the collection is exhausted; subsequent calls
    /// keep returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Any dispatch error propagates unchanged; a response violating the
    /// collection contract is [`Error::Shape`].
    pub async fn try_next(&mut self) -> Result<Option<Value>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                if self.counting {
                    self.yielded_in_page += 1;
                    if self.max_items.is_some_and(|max| self.yielded_in_page > max) {
                        self.buffer.clear();
                        self.state = State::Done;
                    }
                }
                return Ok(Some(item));
            }

            match self.state {
                State::Done => return Ok(None),
                State::Unpolled => self.fetch_first().await?,
                State::Paging {
                    next_page,
                    total_pages,
                } => {
                    if next_page > total_pages {
                        self.state = State::Done;
                        return Ok(None);
                    }
                    self.fetch_page(next_page).await?;
                    self.state = State::Paging {
                        next_page: next_page + 1,
                        total_pages,
                    };
                    // Pages after the first count toward the cutoff, each
                    // from zero.
                    self.counting = true;
                    self.yielded_in_page = 0;
                }
            }
        }
    }

    /// Drains the cursor into a `Vec`.
    pub async fn try_collect(mut self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        while let Some(item) = self.try_next().await? {
            items.push(item);
        }
        Ok(items)
    }

    fn collection_key(&self) -> Result<&str> {
        self.endpoint.collection_key().ok_or_else(|| {
            Error::Shape("cannot iterate the API root; it names no collection".to_string())
        })
    }

    async fn fetch_first(&mut self) -> Result<()> {
        let key = self.collection_key()?.to_string();
        let opts = RequestOptions::new().params(self.params.clone());
        let data = self.endpoint.get_with(opts).await?.into_data();

        match data {
            // An endpoint that never paginates answers with a plain array:
            // that is the whole result.
            Value::Array(items) => {
                tracing::debug!(
                    collection = %key,
                    count = items.len(),
                    "collection returned as a plain array"
                );
                self.buffer = items.into();
                self.state = State::Done;
            }
            Value::Object(mut body) => {
                let total_pages = body
                    .get("total_pages")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| {
                        Error::Shape(format!(
                            "paginated response for {key:?} has no integer `total_pages`"
                        ))
                    })?;
                let items = extract_items(body.remove(&key), &key)?;
                tracing::debug!(
                    collection = %key,
                    total_pages,
                    count = items.len(),
                    "fetched first collection page"
                );
                self.buffer = items.into();
                self.state = State::Paging {
                    next_page: 2,
                    total_pages,
                };
            }
            other => {
                return Err(Error::Shape(format!(
                    "expected an array or a paginated object for {key:?}, got {}",
                    json_kind(&other)
                )));
            }
        }
        Ok(())
    }

    async fn fetch_page(&mut self, page: u64) -> Result<()> {
        let key = self.collection_key()?.to_string();

        // Caller-supplied params win, `page` included.
        let mut params = self.params.clone();
        params
            .entry("page".to_string())
            .or_insert_with(|| page.to_string());

        let data = self
            .endpoint
            .get_with(RequestOptions::new().params(params))
            .await?
            .into_data();

        let items = match data {
            Value::Object(mut body) => extract_items(body.remove(&key), &key)?,
            other => {
                return Err(Error::Shape(format!(
                    "expected a paginated object for {key:?} page {page}, got {}",
                    json_kind(&other)
                )));
            }
        };
        tracing::debug!(collection = %key, page, count = items.len(), "fetched collection page");
        self.buffer = items.into();
        Ok(())
    }
}

fn extract_items(value: Option<Value>, key: &str) -> Result<Vec<Value>> {
    match value {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(Error::Shape(format!(
            "collection key {key:?} holds {}, expected an array",
            json_kind(&other)
        ))),
        None => Err(Error::Shape(format!(
            "paginated response is missing collection key {key:?}"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
