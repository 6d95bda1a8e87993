//! # StoredEntity Trait
//!
//! The contract a record type satisfies to be kept by a [`ResourceActor`](super::ResourceActor).
//! Associated types pin down which payloads belong to which resource, so a
//! household create payload can never reach the resident store.
//!
//! Only [`StoredEntity::from_create_params`] and [`StoredEntity::on_update`] are
//! required. The other hooks default to accepting everything.

use crate::record::Record;
use async_trait::async_trait;
use std::fmt::Debug;

#[async_trait]
pub trait StoredEntity: Record<Id: From<u32>> {
    /// Body of a create request.
    type Create: Send + Sync + Debug;

    /// Body of an update request.
    type Update: Send + Sync + Debug;

    /// Query parameters of a list request. `Default` lists everything.
    type Filter: Clone + Default + Send + Sync + Debug;

    /// Dependencies injected when the actor starts. Use `()` if none.
    type Context: Send + Sync;

    /// One error enum per resource. Its message is what the user ends up seeing.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the record from the id the store assigned and the payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Runs after construction, before the record is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update in place.
    async fn on_update(&mut self, update: Self::Update, ctx: &Self::Context)
        -> Result<(), Self::Error>;

    /// Runs before the record is removed. An error keeps it.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Checks this record against one already stored, before a create or update
    /// commits. The record being updated is never compared with itself.
    fn conflicts(&self, _other: &Self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Whether a list request with `filter` includes this record.
    fn matches(&self, _filter: &Self::Filter) -> bool {
        true
    }
}
