use super::CHANNEL_CAPACITY;
use crate::clients::FeeTypeClient;
use crate::model::{FeeType, FeeTypeFilter, FeeTypeId, FeeTypePayload};
use async_trait::async_trait;
use console_framework::backend::{ResourceActor, StoredEntity};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeeTypeError {
    #[error("Fee name is required")]
    MissingName,

    #[error("Unit price must not be negative")]
    NegativePrice,
}

fn check(payload: &FeeTypePayload) -> Result<(), FeeTypeError> {
    if payload.name.trim().is_empty() {
        return Err(FeeTypeError::MissingName);
    }
    if payload.unit_price < 0.0 {
        return Err(FeeTypeError::NegativePrice);
    }
    Ok(())
}

#[async_trait]
impl StoredEntity for FeeType {
    type Create = FeeTypePayload;
    type Update = FeeTypePayload;
    type Filter = FeeTypeFilter;
    type Context = ();
    type Error = FeeTypeError;

    fn from_create_params(id: FeeTypeId, params: FeeTypePayload) -> Result<Self, FeeTypeError> {
        check(&params)?;
        Ok(Self {
            id,
            name: params.name,
            unit_price: params.unit_price,
            unit: params.unit,
            kind: params.kind,
            description: params.description,
            active: params.active,
        })
    }

    async fn on_update(&mut self, update: FeeTypePayload, _ctx: &()) -> Result<(), FeeTypeError> {
        check(&update)?;
        self.name = update.name;
        self.unit_price = update.unit_price;
        self.unit = update.unit;
        self.kind = update.kind;
        self.description = update.description;
        self.active = update.active;
        Ok(())
    }

    fn matches(&self, filter: &FeeTypeFilter) -> bool {
        filter.matches(self)
    }
}

pub fn new() -> (ResourceActor<FeeType>, FeeTypeClient) {
    let (actor, inner) = ResourceActor::new(CHANNEL_CAPACITY);
    (actor, FeeTypeClient::new(inner))
}
