//! # Resource Actor
//!
//! The server half of the backend. A `ResourceActor<T>` owns the store for one
//! resource type and the receiving end of its channel, and processes requests
//! strictly in arrival order. Exclusive ownership of the store inside one task is
//! what makes it safe; there is no lock around it.
//!
//! Records are kept in a `BTreeMap` keyed by id. Ids come from a counter starting at
//! 1, so id order is insertion order and every list response is stable.

use super::client::ResourceClient;
use super::entity::StoredEntity;
use super::error::BackendError;
use super::message::ResourceRequest;
use crate::record::{short_type_name, Record};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct ResourceActor<T: StoredEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: StoredEntity> ResourceActor<T> {
    /// Creates the actor and a client connected to it.
    ///
    /// `buffer_size` bounds the channel; senders wait while it is full. The actor does
    /// nothing until [`run`](Self::run) is spawned.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Processes requests until every client is dropped.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = short_type_name::<T>();
        info!(entity_type, "Backend started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&filter))
                        .cloned()
                        .collect();
                    debug!(entity_type, ?filter, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create rejected");
                            let _ = respond_to.send(Err(BackendError::Rejected(e.to_string())));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create rejected");
                        let _ = respond_to.send(Err(BackendError::Rejected(e.to_string())));
                        continue;
                    }
                    if let Err(e) = self.check_conflicts(&item) {
                        warn!(entity_type, error = %e, "Create conflicts");
                        let _ = respond_to.send(Err(BackendError::Rejected(e.to_string())));
                        continue;
                    }
                    self.next_id += 1;
                    self.store.insert(id.clone(), item.clone());
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(BackendError::NotFound(id.to_string())));
                        continue;
                    };
                    // Hooks work on a copy so a rejected update leaves the record untouched.
                    let mut updated = item.clone();
                    let checked = match updated.on_update(update, &context).await {
                        Ok(()) => self.check_conflicts(&updated),
                        Err(e) => Err(e),
                    };
                    match checked {
                        Ok(()) => {
                            self.store.insert(id.clone(), updated.clone());
                            info!(entity_type, %id, "Updated");
                            let _ = respond_to.send(Ok(updated));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Update rejected");
                            let _ = respond_to.send(Err(BackendError::Rejected(e.to_string())));
                        }
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(BackendError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "Delete rejected");
                        let _ = respond_to.send(Err(BackendError::Rejected(e.to_string())));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    /// Runs [`StoredEntity::conflicts`] against every stored record except the
    /// candidate's own id.
    fn check_conflicts(&self, candidate: &T) -> Result<(), T::Error> {
        let own_id = candidate.id();
        self.store
            .values()
            .filter(|other| other.id() != own_id)
            .try_for_each(|other| candidate.conflicts(other))
    }
}
