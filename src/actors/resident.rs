//! Residents must point at an existing household, so the actor runs with a
//! [`HouseholdClient`] as its context and asks it on every create and update.

use super::CHANNEL_CAPACITY;
use crate::clients::{HouseholdClient, ResidentClient};
use crate::model::validators::is_citizen_id;
use crate::model::{HouseholdId, Resident, ResidentId, ResidentPayload};
use async_trait::async_trait;
use console_framework::backend::{ResourceActor, ServiceClient, StoredEntity};
use console_framework::ConsoleError;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResidentError {
    #[error("Full name is required")]
    MissingName,

    #[error("Citizen id must have exactly 12 digits")]
    InvalidCitizenId,

    #[error("Household {0} does not exist")]
    UnknownHousehold(HouseholdId),

    #[error("Household lookup failed: {0}")]
    Household(#[from] ConsoleError),
}

fn check(payload: &ResidentPayload) -> Result<(), ResidentError> {
    if payload.full_name.trim().is_empty() {
        return Err(ResidentError::MissingName);
    }
    if !is_citizen_id(&payload.citizen_id) {
        return Err(ResidentError::InvalidCitizenId);
    }
    Ok(())
}

async fn ensure_household(resident: &Resident, households: &HouseholdClient) -> Result<(), ResidentError> {
    let Some(household) = resident.household else {
        return Ok(());
    };
    debug!(household_id = %household.id, "Checking household");
    match households.get(household.id).await? {
        Some(_) => Ok(()),
        None => Err(ResidentError::UnknownHousehold(household.id)),
    }
}

#[async_trait]
impl StoredEntity for Resident {
    type Create = ResidentPayload;
    type Update = ResidentPayload;
    type Filter = ();
    type Context = HouseholdClient;
    type Error = ResidentError;

    fn from_create_params(id: ResidentId, params: ResidentPayload) -> Result<Self, ResidentError> {
        check(&params)?;
        Ok(Self {
            id,
            full_name: params.full_name,
            citizen_id: params.citizen_id,
            birth_date: params.birth_date,
            gender: params.gender,
            relationship: params.relationship,
            status: params.status,
            phone: params.phone,
            email: params.email,
            household: params.household,
        })
    }

    async fn on_create(&mut self, households: &HouseholdClient) -> Result<(), ResidentError> {
        ensure_household(self, households).await
    }

    async fn on_update(
        &mut self,
        update: ResidentPayload,
        households: &HouseholdClient,
    ) -> Result<(), ResidentError> {
        check(&update)?;
        self.full_name = update.full_name;
        self.citizen_id = update.citizen_id;
        self.birth_date = update.birth_date;
        self.gender = update.gender;
        self.relationship = update.relationship;
        self.status = update.status;
        self.phone = update.phone;
        self.email = update.email;
        self.household = update.household;
        ensure_household(self, households).await
    }
}

/// Creates the resident actor and its client. Run it with a [`HouseholdClient`].
pub fn new() -> (ResourceActor<Resident>, ResidentClient) {
    let (actor, inner) = ResourceActor::new(CHANNEL_CAPACITY);
    (actor, ResidentClient::new(inner))
}
