use super::record_id;
use console_framework::{FieldRules, FormModel, Record, ValidationErrors};
use serde::{Deserialize, Serialize};

record_id!(
    /// Backend id of a household.
    HouseholdId
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HouseholdStatus {
    #[default]
    #[serde(rename = "Hoat dong")]
    Active,
    #[serde(rename = "Tam dung")]
    Suspended,
}

/// One apartment and the family registered in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: HouseholdId,
    pub code: String,
    pub owner_name: String,
    pub apartment_number: String,
    pub floor: u32,
    /// Square metres.
    pub area: f64,
    pub contact_phone: String,
    pub contact_email: String,
    pub status: HouseholdStatus,
}

impl Record for Household {
    type Id = HouseholdId;

    fn id(&self) -> HouseholdId {
        self.id
    }
}

/// Body of household create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdPayload {
    pub code: String,
    pub owner_name: String,
    pub apartment_number: String,
    pub floor: u32,
    pub area: f64,
    pub contact_phone: String,
    pub contact_email: String,
    pub status: HouseholdStatus,
}

/// Values of the household modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HouseholdForm {
    pub id: Option<HouseholdId>,
    pub code: String,
    pub owner_name: String,
    pub apartment_number: String,
    pub floor: Option<u32>,
    pub area: Option<f64>,
    pub contact_phone: String,
    pub contact_email: String,
    pub status: HouseholdStatus,
}

impl FormModel for HouseholdForm {
    type Id = HouseholdId;

    fn record_id(&self) -> Option<HouseholdId> {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        FieldRules::new()
            .required("code", &self.code, "Enter the household code")
            .required("owner_name", &self.owner_name, "Enter the owner's name")
            .required("apartment_number", &self.apartment_number, "Enter the apartment number")
            .required_some("floor", &self.floor, "Enter the floor")
            .required_some("area", &self.area, "Enter the area")
            .check(
                "area",
                self.area.map_or(true, |area| area > 0.0),
                "Area must be positive",
            )
            .required("contact_phone", &self.contact_phone, "Enter a contact phone")
            .phone("contact_phone", &self.contact_phone, "Invalid phone number")
            .email("contact_email", &self.contact_email, "Invalid email")
            .finish()
    }
}

impl From<&Household> for HouseholdForm {
    fn from(household: &Household) -> Self {
        Self {
            id: Some(household.id),
            code: household.code.clone(),
            owner_name: household.owner_name.clone(),
            apartment_number: household.apartment_number.clone(),
            floor: Some(household.floor),
            area: Some(household.area),
            contact_phone: household.contact_phone.clone(),
            contact_email: household.contact_email.clone(),
            status: household.status,
        }
    }
}

impl TryFrom<HouseholdForm> for HouseholdPayload {
    type Error = ValidationErrors;

    fn try_from(form: HouseholdForm) -> Result<Self, ValidationErrors> {
        form.validate()?;
        let (Some(floor), Some(area)) = (form.floor, form.area) else {
            // validate() already rejects a missing floor or area.
            return Err(ValidationErrors::default());
        };
        Ok(Self {
            code: form.code.trim().to_string(),
            owner_name: form.owner_name.trim().to_string(),
            apartment_number: form.apartment_number.trim().to_string(),
            floor,
            area,
            contact_phone: form.contact_phone,
            contact_email: form.contact_email,
            status: form.status,
        })
    }
}
