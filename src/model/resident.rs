use super::household::HouseholdId;
use super::record_id;
use super::validators;
use chrono::NaiveDate;
use console_framework::{FieldRules, FormModel, Record, ValidationErrors};
use serde::{Deserialize, Serialize};

record_id!(
    /// Backend id of a resident.
    ResidentId
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "Nam")]
    Male,
    #[serde(rename = "Nu")]
    Female,
    #[serde(rename = "Khac")]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    #[default]
    #[serde(rename = "Chu ho")]
    Owner,
    #[serde(rename = "Vo/Chong")]
    Spouse,
    #[serde(rename = "Con")]
    Child,
    #[serde(rename = "Nguoi than")]
    Relative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidentStatus {
    #[default]
    #[serde(rename = "Hoat dong")]
    Resident,
    #[serde(rename = "Tam tru")]
    TemporaryResident,
    #[serde(rename = "Tam vang")]
    TemporarilyAbsent,
}

/// Nested household reference as the backend sends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdRef {
    pub id: HouseholdId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: ResidentId,
    pub full_name: String,
    pub citizen_id: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub relationship: Relationship,
    pub status: ResidentStatus,
    pub phone: String,
    pub email: String,
    pub household: Option<HouseholdRef>,
}

impl Record for Resident {
    type Id = ResidentId;

    fn id(&self) -> ResidentId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentPayload {
    pub full_name: String,
    pub citizen_id: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub relationship: Relationship,
    pub status: ResidentStatus,
    pub phone: String,
    pub email: String,
    pub household: Option<HouseholdRef>,
}

/// Values of the resident modal. The household reference is flattened to its id so
/// a select input can bind to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidentForm {
    pub id: Option<ResidentId>,
    pub full_name: String,
    pub citizen_id: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub relationship: Relationship,
    pub status: ResidentStatus,
    pub phone: String,
    pub email: String,
    pub household_id: Option<HouseholdId>,
}

impl FormModel for ResidentForm {
    type Id = ResidentId;

    fn record_id(&self) -> Option<ResidentId> {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let rules = FieldRules::new().required("full_name", &self.full_name, "Enter the full name");
        validators::citizen_id(rules, "citizen_id", &self.citizen_id)
            .required_some("birth_date", &self.birth_date, "Pick the birth date")
            .phone("phone", &self.phone, "Invalid phone number")
            .email("email", &self.email, "Invalid email")
            .required_some("household_id", &self.household_id, "Pick a household")
            .finish()
    }
}

impl From<&Resident> for ResidentForm {
    fn from(resident: &Resident) -> Self {
        Self {
            id: Some(resident.id),
            full_name: resident.full_name.clone(),
            citizen_id: resident.citizen_id.clone(),
            birth_date: Some(resident.birth_date),
            gender: resident.gender,
            relationship: resident.relationship,
            status: resident.status,
            phone: resident.phone.clone(),
            email: resident.email.clone(),
            household_id: resident.household.map(|h| h.id),
        }
    }
}

impl TryFrom<ResidentForm> for ResidentPayload {
    type Error = ValidationErrors;

    fn try_from(form: ResidentForm) -> Result<Self, ValidationErrors> {
        form.validate()?;
        let Some(birth_date) = form.birth_date else {
            return Err(ValidationErrors::default());
        };
        Ok(Self {
            full_name: form.full_name.trim().to_string(),
            citizen_id: form.citizen_id,
            birth_date,
            gender: form.gender,
            relationship: form.relationship,
            status: form.status,
            phone: form.phone,
            email: form.email,
            household: form.household_id.map(|id| HouseholdRef { id }),
        })
    }
}
