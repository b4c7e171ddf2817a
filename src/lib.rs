//! # Cardbox - a chainable flashcard-API client
//!
//! Cardbox is a client layer for the Quizlet flashcard REST API, built on top
//! of `reqwest`. It turns a base URL and a chain of path segments into
//! requests, classifies error responses, and exposes multi-page collections
//! as lazy sequences - without owning any transport policy of its own.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cardbox::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cardbox::Error> {
//!     let client = Client::builder()
//!         .client_id("gandalf")
//!         .login("boromir")
//!         .build()?;
//!
//!     // Chain segments freely; nothing hits the network until a verb runs.
//!     let set = client.endpoint("sets").call(415).get().await?;
//!     println!("title: {}", set["title"]);
//!
//!     // Paginated collections read as one lazy sequence.
//!     let mut sets = client.me_endpoint()?.child("sets").items();
//!     while let Some(item) = sets.try_next().await? {
//!         println!("{}", item["title"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Chaining
//!
//! An [`Endpoint`] is an immutable node in the API's path tree. `child`
//! appends a named segment (any string, identifiers not required) and `call`
//! appends a stringified value, so arbitrary paths compose without the crate
//! knowing the API's shape up front:
//!
//! ```no_run
//! # fn example() -> Result<(), cardbox::Error> {
//! # let client = cardbox::Client::builder().build()?;
//! let endpoint = client.endpoint("classes").call(7).child("sets");
//! assert!(endpoint.url().ends_with("classes/7/sets"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! The dispatcher classifies each failure exactly once: 4xx responses become
//! [`Error::Api`] with the server's JSON description attached, everything
//! else (5xx, connectivity) passes through unreclassified:
//!
//! ```no_run
//! use cardbox::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().build()?;
//! match client.endpoint("elfs").get().await {
//!     Ok(resource) => println!("{}", resource.data),
//!     Err(Error::Api { status, .. }) => eprintln!("fix the request: {status}"),
//!     Err(e) => eprintln!("server or network trouble: {e}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Dynamic endpoint resolution** - build any path by chaining, including
//!   segments that are not valid identifiers
//! - **Uniform results** - every response comes back as a [`Resource`] bound
//!   to the endpoint that produced it, so chaining continues after a call
//! - **Error reclassification** - 4xx becomes a caller-correctable
//!   [`Error::Api`]; 5xx and transport failures stay what they are
//! - **Lazy pagination** - [`Items`] fetches pages on demand, bounded by the
//!   server's `total_pages` or a caller-supplied cutoff
//! - **Entity and manager layers** - [`Set`], [`Class`], [`User`] records
//!   bound to their endpoints, with verb routing on [`SetManager`] and
//!   [`ClassManager`]
//! - **Structured logging** - request and response events via `tracing`;
//!   the `debug` flag raises verbosity without changing behavior

mod client;
mod endpoint;
pub mod entity;
mod error;
pub mod manager;
mod options;
pub mod pagination;
mod resource;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use endpoint::Endpoint;
pub use entity::{Class, Set, User};
pub use error::{Error, Result};
pub use manager::{ClassManager, SetManager};
pub use options::RequestOptions;
pub use pagination::Items;
pub use resource::Resource;
