//! Temporary absences are declared for an existing resident; the actor checks it
//! through the [`ResidentClient`] it runs with.

use super::CHANNEL_CAPACITY;
use crate::clients::{AbsenceClient, ResidentClient};
use crate::model::{AbsenceFilter, AbsenceId, AbsencePayload, ResidentId, TemporaryAbsence};
use async_trait::async_trait;
use chrono::NaiveDate;
use console_framework::backend::{ResourceActor, ServiceClient, StoredEntity};
use console_framework::ConsoleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbsenceError {
    #[error("Destination is required")]
    MissingDestination,

    #[error("End date {to} is before start date {from}")]
    InvertedPeriod { from: NaiveDate, to: NaiveDate },

    #[error("Resident {0} does not exist")]
    UnknownResident(ResidentId),

    #[error("Resident lookup failed: {0}")]
    Resident(#[from] ConsoleError),
}

fn check(payload: &AbsencePayload) -> Result<(), AbsenceError> {
    if payload.destination.trim().is_empty() {
        return Err(AbsenceError::MissingDestination);
    }
    if payload.to < payload.from {
        return Err(AbsenceError::InvertedPeriod {
            from: payload.from,
            to: payload.to,
        });
    }
    Ok(())
}

async fn ensure_resident(id: ResidentId, residents: &ResidentClient) -> Result<(), AbsenceError> {
    match residents.get(id).await? {
        Some(_) => Ok(()),
        None => Err(AbsenceError::UnknownResident(id)),
    }
}

#[async_trait]
impl StoredEntity for TemporaryAbsence {
    type Create = AbsencePayload;
    type Update = AbsencePayload;
    type Filter = AbsenceFilter;
    type Context = ResidentClient;
    type Error = AbsenceError;

    fn from_create_params(id: AbsenceId, params: AbsencePayload) -> Result<Self, AbsenceError> {
        check(&params)?;
        Ok(Self {
            id,
            resident: params.resident,
            destination: params.destination,
            reason: params.reason,
            from: params.from,
            to: params.to,
        })
    }

    async fn on_create(&mut self, residents: &ResidentClient) -> Result<(), AbsenceError> {
        ensure_resident(self.resident.id, residents).await
    }

    async fn on_update(
        &mut self,
        update: AbsencePayload,
        residents: &ResidentClient,
    ) -> Result<(), AbsenceError> {
        check(&update)?;
        if update.resident != self.resident {
            ensure_resident(update.resident.id, residents).await?;
        }
        self.resident = update.resident;
        self.destination = update.destination;
        self.reason = update.reason;
        self.from = update.from;
        self.to = update.to;
        Ok(())
    }

    fn matches(&self, filter: &AbsenceFilter) -> bool {
        filter.matches(self)
    }
}

/// Creates the absence actor and its client. Run it with a [`ResidentClient`].
pub fn new() -> (ResourceActor<TemporaryAbsence>, AbsenceClient) {
    let (actor, inner) = ResourceActor::new(CHANNEL_CAPACITY);
    (actor, AbsenceClient::new(inner))
}
