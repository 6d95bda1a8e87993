//! Temporary residence registrations name the household the person stays with, so
//! the actor runs with a [`HouseholdClient`] and checks it exists. The registration
//! date is stamped by the store on create and never changes afterwards.

use super::CHANNEL_CAPACITY;
use crate::clients::{HouseholdClient, ResidenceClient};
use crate::model::validators::is_citizen_id;
use crate::model::{
    HouseholdId, ResidenceFilter, ResidenceId, ResidencePayload, TemporaryResidence,
};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use console_framework::backend::{ResourceActor, ServiceClient, StoredEntity};
use console_framework::ConsoleError;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResidenceError {
    #[error("Full name is required")]
    MissingName,

    #[error("Citizen id must have exactly 12 digits")]
    InvalidCitizenId,

    #[error("Birth date must be in the past")]
    BirthDateNotPast,

    #[error("Permanent address is required")]
    MissingPermanentAddress,

    #[error("End date {to} must be after start date {from}")]
    InvertedPeriod { from: NaiveDate, to: NaiveDate },

    #[error("Household {0} does not exist")]
    UnknownHousehold(HouseholdId),

    #[error("Household lookup failed: {0}")]
    Household(#[from] ConsoleError),
}

fn check(payload: &ResidencePayload, today: NaiveDate) -> Result<(), ResidenceError> {
    if payload.full_name.trim().is_empty() {
        return Err(ResidenceError::MissingName);
    }
    if !is_citizen_id(&payload.citizen_id) {
        return Err(ResidenceError::InvalidCitizenId);
    }
    if payload.birth_date >= today {
        return Err(ResidenceError::BirthDateNotPast);
    }
    if payload.permanent_address.trim().is_empty() {
        return Err(ResidenceError::MissingPermanentAddress);
    }
    match payload.to {
        Some(to) if to <= payload.from => Err(ResidenceError::InvertedPeriod {
            from: payload.from,
            to,
        }),
        _ => Ok(()),
    }
}

async fn ensure_household(id: HouseholdId, households: &HouseholdClient) -> Result<(), ResidenceError> {
    debug!(household_id = %id, "Checking household");
    match households.get(id).await? {
        Some(_) => Ok(()),
        None => Err(ResidenceError::UnknownHousehold(id)),
    }
}

#[async_trait]
impl StoredEntity for TemporaryResidence {
    type Create = ResidencePayload;
    type Update = ResidencePayload;
    type Filter = ResidenceFilter;
    type Context = HouseholdClient;
    type Error = ResidenceError;

    fn from_create_params(id: ResidenceId, params: ResidencePayload) -> Result<Self, ResidenceError> {
        let today = Local::now().date_naive();
        check(&params, today)?;
        Ok(Self {
            id,
            household: params.household,
            full_name: params.full_name,
            citizen_id: params.citizen_id,
            birth_date: params.birth_date,
            gender: params.gender,
            phone: params.phone,
            permanent_address: params.permanent_address,
            from: params.from,
            to: params.to,
            reason: params.reason,
            note: params.note,
            registered_on: today,
        })
    }

    async fn on_create(&mut self, households: &HouseholdClient) -> Result<(), ResidenceError> {
        ensure_household(self.household.id, households).await
    }

    async fn on_update(
        &mut self,
        update: ResidencePayload,
        households: &HouseholdClient,
    ) -> Result<(), ResidenceError> {
        check(&update, Local::now().date_naive())?;
        if update.household != self.household {
            ensure_household(update.household.id, households).await?;
        }
        self.household = update.household;
        self.full_name = update.full_name;
        self.citizen_id = update.citizen_id;
        self.birth_date = update.birth_date;
        self.gender = update.gender;
        self.phone = update.phone;
        self.permanent_address = update.permanent_address;
        self.from = update.from;
        self.to = update.to;
        self.reason = update.reason;
        self.note = update.note;
        Ok(())
    }

    fn matches(&self, filter: &ResidenceFilter) -> bool {
        filter.matches(self)
    }
}

/// Creates the temporary residence actor and its client. Run it with a
/// [`HouseholdClient`].
pub fn new() -> (ResourceActor<TemporaryResidence>, ResidenceClient) {
    let (actor, inner) = ResourceActor::new(CHANNEL_CAPACITY);
    (actor, ResidenceClient::new(inner))
}
