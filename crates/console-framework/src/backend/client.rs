//! # Resource Client
//!
//! Typed async handle to a [`ResourceActor`](super::ResourceActor). Holds only the
//! channel sender, so it is cheap to clone into every page and domain client.

use super::entity::StoredEntity;
use super::error::BackendError;
use super::message::ResourceRequest;
use tokio::sync::{mpsc, oneshot};

pub struct ResourceClient<T: StoredEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: StoredEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: StoredEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn list(&self, filter: T::Filter) -> Result<Vec<T>, BackendError> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::List { filter, respond_to })
            .await?;
        response.await.map_err(|_| BackendError::Dropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, BackendError> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Get { id, respond_to }).await?;
        response.await.map_err(|_| BackendError::Dropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T, BackendError> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Create { params, respond_to })
            .await?;
        response.await.map_err(|_| BackendError::Dropped)?
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, BackendError> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await?;
        response.await.map_err(|_| BackendError::Dropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), BackendError> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Delete { id, respond_to })
            .await?;
        response.await.map_err(|_| BackendError::Dropped)?
    }

    async fn send(&self, request: ResourceRequest<T>) -> Result<(), BackendError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| BackendError::Closed)
    }
}
