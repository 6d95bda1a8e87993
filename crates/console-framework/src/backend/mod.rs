//! # In-Memory Resource Backend
//!
//! The console talks to a REST API it does not own. This module is the stand-in used
//! by the demo binary and the integration tests: one actor per resource type holds
//! the records and answers list/get/create/update/delete requests, one at a time.
//!
//! ```text
//! ResourceClient<T> --ResourceRequest<T>--> ResourceActor<T> (BTreeMap store)
//!        ^                                          |
//!        +------------- oneshot response -----------+
//! ```
//!
//! Each entity type describes itself through [`StoredEntity`]: how it is built from a
//! create payload, how an update is applied, what must hold before it is deleted, and
//! which records a list filter keeps. Entity hooks receive a `Context`, injected when
//! the actor starts, so one resource can consult another (a resident checking that
//! its household exists).
//!
//! Domain clients wrap a [`ResourceClient`] and implement [`ServiceClient`] to get
//! `get`, `list` and `delete` for free.

mod actor;
mod client;
mod client_trait;
mod entity;
mod error;
mod message;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ServiceClient;
pub use entity::StoredEntity;
pub use error::BackendError;
pub use message::{ResourceRequest, Response};
