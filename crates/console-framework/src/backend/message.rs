//! # Backend Messages
//!
//! One variant per REST-style operation. Each carries a oneshot sender the actor
//! answers on.

use super::entity::StoredEntity;
use super::error::BackendError;
use tokio::sync::oneshot;

pub type Response<T> = oneshot::Sender<Result<T, BackendError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: StoredEntity> {
    List {
        filter: T::Filter,
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}

impl<T: StoredEntity> ResourceRequest<T> {
    /// Operation name, for logs and mock mismatch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceRequest::List { .. } => "list",
            ResourceRequest::Get { .. } => "get",
            ResourceRequest::Create { .. } => "create",
            ResourceRequest::Update { .. } => "update",
            ResourceRequest::Delete { .. } => "delete",
        }
    }
}
