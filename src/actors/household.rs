use super::CHANNEL_CAPACITY;
use crate::clients::HouseholdClient;
use crate::model::{Household, HouseholdId, HouseholdPayload};
use async_trait::async_trait;
use console_framework::backend::{ResourceActor, StoredEntity};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HouseholdError {
    #[error("Household code is required")]
    MissingCode,

    #[error("Area must be greater than 0")]
    InvalidArea,

    #[error("Household code {0} already exists")]
    DuplicateCode(String),
}

fn check(payload: &HouseholdPayload) -> Result<(), HouseholdError> {
    if payload.code.trim().is_empty() {
        return Err(HouseholdError::MissingCode);
    }
    if payload.area <= 0.0 {
        return Err(HouseholdError::InvalidArea);
    }
    Ok(())
}

#[async_trait]
impl StoredEntity for Household {
    type Create = HouseholdPayload;
    type Update = HouseholdPayload;
    type Filter = ();
    type Context = ();
    type Error = HouseholdError;

    fn from_create_params(id: HouseholdId, params: HouseholdPayload) -> Result<Self, HouseholdError> {
        check(&params)?;
        Ok(Self {
            id,
            code: params.code,
            owner_name: params.owner_name,
            apartment_number: params.apartment_number,
            floor: params.floor,
            area: params.area,
            contact_phone: params.contact_phone,
            contact_email: params.contact_email,
            status: params.status,
        })
    }

    async fn on_update(&mut self, update: HouseholdPayload, _ctx: &()) -> Result<(), HouseholdError> {
        check(&update)?;
        self.code = update.code;
        self.owner_name = update.owner_name;
        self.apartment_number = update.apartment_number;
        self.floor = update.floor;
        self.area = update.area;
        self.contact_phone = update.contact_phone;
        self.contact_email = update.contact_email;
        self.status = update.status;
        Ok(())
    }

    fn conflicts(&self, other: &Self) -> Result<(), HouseholdError> {
        if self.code.trim().eq_ignore_ascii_case(other.code.trim()) {
            return Err(HouseholdError::DuplicateCode(self.code.trim().to_string()));
        }
        Ok(())
    }
}

/// Creates the household actor and its client.
pub fn new() -> (ResourceActor<Household>, HouseholdClient) {
    let (actor, inner) = ResourceActor::new(CHANNEL_CAPACITY);
    (actor, HouseholdClient::new(inner))
}
