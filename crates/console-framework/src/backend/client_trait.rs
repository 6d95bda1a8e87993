//! # ServiceClient Trait
//!
//! Domain clients wrap a [`ResourceClient`] to add their own create/update logic.
//! Implementing this trait gives them `list`, `get` and `delete` with error mapping
//! and tracing already wired.
//!
//! ```rust
//! use async_trait::async_trait;
//! use console_framework::backend::{BackendError, ResourceClient, ServiceClient, StoredEntity};
//! use console_framework::{ConsoleError, Record};
//!
//! #[derive(Clone, Debug)]
//! struct Note { id: u32 }
//! impl Record for Note {
//!     type Id = u32;
//!     fn id(&self) -> u32 { self.id }
//! }
//! #[derive(Debug, thiserror::Error)] #[error("note error")] struct NoteError;
//!
//! #[async_trait]
//! impl StoredEntity for Note {
//!     type Create = (); type Update = (); type Filter = (); type Context = (); type Error = NoteError;
//!     fn from_create_params(id: u32, _: ()) -> Result<Self, NoteError> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), NoteError> { Ok(()) }
//! }
//!
//! struct NoteClient { inner: ResourceClient<Note> }
//!
//! impl ServiceClient<Note> for NoteClient {
//!     type Error = ConsoleError;
//!     fn inner(&self) -> &ResourceClient<Note> { &self.inner }
//!     fn map_error(e: BackendError) -> ConsoleError { e.into() }
//! }
//!
//! async fn usage(client: NoteClient) -> Result<(), ConsoleError> {
//!     let _notes = client.list(()).await?;
//!     client.delete(1).await
//! }
//! ```

use super::client::ResourceClient;
use super::entity::StoredEntity;
use super::error::BackendError;
use async_trait::async_trait;

#[async_trait]
pub trait ServiceClient<T: StoredEntity>: Send + Sync {
    type Error: Send + Sync;

    fn inner(&self) -> &ResourceClient<T>;

    fn map_error(e: BackendError) -> Self::Error;

    #[tracing::instrument(skip(self))]
    async fn list(&self, filter: T::Filter) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(filter).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
