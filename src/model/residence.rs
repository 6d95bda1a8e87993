use super::household::HouseholdId;
use super::record_id;
use super::resident::{Gender, HouseholdRef};
use super::validators;
use chrono::NaiveDate;
use console_framework::{FieldRules, FormModel, Record, ValidationErrors};
use serde::{Deserialize, Serialize};

record_id!(
    /// Backend id of a temporary residence registration.
    ResidenceId
);

/// A person from elsewhere registered as staying in one of the building's households.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryResidence {
    pub id: ResidenceId,
    pub household: HouseholdRef,
    pub full_name: String,
    pub citizen_id: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    /// Where the person is permanently registered.
    pub permanent_address: String,
    pub from: NaiveDate,
    /// Open-ended when `None`.
    pub to: Option<NaiveDate>,
    pub reason: String,
    pub note: String,
    pub registered_on: NaiveDate,
}

impl Record for TemporaryResidence {
    type Id = ResidenceId;

    fn id(&self) -> ResidenceId {
        self.id
    }
}

impl TemporaryResidence {
    /// Whether the registration covers `day`.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.from <= day && self.to.map_or(true, |to| day <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidencePayload {
    pub household: HouseholdRef,
    pub full_name: String,
    pub citizen_id: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub permanent_address: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub reason: String,
    pub note: String,
}

/// Query of the temporary residence search box: part of the registered name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidenceFilter {
    pub full_name: Option<String>,
}

impl ResidenceFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            full_name: Some(name.into()),
        }
    }

    pub fn matches(&self, residence: &TemporaryResidence) -> bool {
        match self.full_name.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => residence
                .full_name
                .to_lowercase()
                .contains(&query.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidenceForm {
    pub id: Option<ResidenceId>,
    pub household_id: Option<HouseholdId>,
    pub full_name: String,
    pub citizen_id: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub phone: String,
    pub permanent_address: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub reason: String,
    pub note: String,
}

impl FormModel for ResidenceForm {
    type Id = ResidenceId;

    fn record_id(&self) -> Option<ResidenceId> {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let ordered = match (self.from, self.to) {
            (Some(from), Some(to)) => to > from,
            _ => true,
        };
        let rules = FieldRules::new()
            .required_some("household_id", &self.household_id, "Pick a household")
            .required("full_name", &self.full_name, "Enter the full name");
        validators::citizen_id(rules, "citizen_id", &self.citizen_id)
            .required_some("birth_date", &self.birth_date, "Pick the birth date")
            .check(
                "gender",
                self.gender != Gender::Other,
                "Gender must be male or female",
            )
            .phone("phone", &self.phone, "Invalid phone number")
            .required(
                "permanent_address",
                &self.permanent_address,
                "Enter the permanent address",
            )
            .required_some("from", &self.from, "Pick the start date")
            .check("to", ordered, "End date must be after the start date")
            .required("reason", &self.reason, "Enter the reason")
            .finish()
    }
}

impl From<&TemporaryResidence> for ResidenceForm {
    fn from(residence: &TemporaryResidence) -> Self {
        Self {
            id: Some(residence.id),
            household_id: Some(residence.household.id),
            full_name: residence.full_name.clone(),
            citizen_id: residence.citizen_id.clone(),
            birth_date: Some(residence.birth_date),
            gender: residence.gender,
            phone: residence.phone.clone(),
            permanent_address: residence.permanent_address.clone(),
            from: Some(residence.from),
            to: residence.to,
            reason: residence.reason.clone(),
            note: residence.note.clone(),
        }
    }
}

impl TryFrom<ResidenceForm> for ResidencePayload {
    type Error = ValidationErrors;

    fn try_from(form: ResidenceForm) -> Result<Self, ValidationErrors> {
        form.validate()?;
        let (Some(household_id), Some(birth_date), Some(from)) =
            (form.household_id, form.birth_date, form.from)
        else {
            return Err(ValidationErrors::default());
        };
        Ok(Self {
            household: HouseholdRef { id: household_id },
            full_name: form.full_name.trim().to_string(),
            citizen_id: form.citizen_id,
            birth_date,
            gender: form.gender,
            phone: form.phone,
            permanent_address: form.permanent_address.trim().to_string(),
            from,
            to: form.to,
            reason: form.reason.trim().to_string(),
            note: form.note.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_date;

    fn form() -> ResidenceForm {
        ResidenceForm {
            household_id: Some(HouseholdId(1)),
            full_name: "Le Van C".into(),
            citizen_id: "038099001122".into(),
            birth_date: parse_date("1999-02-03"),
            gender: Gender::Male,
            permanent_address: "12 Tran Phu, Nam Dinh".into(),
            from: parse_date("2024-09-01"),
            reason: "Studying".into(),
            ..ResidenceForm::default()
        }
    }

    #[test]
    fn test_required_fields() {
        let errors = ResidenceForm::default().validate().unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                "household_id",
                "full_name",
                "citizen_id",
                "birth_date",
                "permanent_address",
                "from",
                "reason"
            ]
        );
    }

    #[test]
    fn test_end_must_follow_start() {
        let same_day = ResidenceForm {
            to: parse_date("2024-09-01"),
            ..form()
        };
        assert_eq!(
            same_day.validate().unwrap_err().messages_for("to"),
            vec!["End date must be after the start date"]
        );
        let open_ended = form();
        assert!(open_ended.validate().is_ok());
    }

    #[test]
    fn test_payload_nests_household() {
        let payload = ResidencePayload::try_from(ResidenceForm {
            note: "  ".into(),
            ..form()
        })
        .unwrap();
        assert_eq!(payload.household, HouseholdRef { id: HouseholdId(1) });
        assert_eq!(payload.to, None);
        assert_eq!(payload.note, "");
    }

    #[test]
    fn test_active_period() {
        let payload = ResidencePayload::try_from(ResidenceForm {
            to: parse_date("2024-12-31"),
            ..form()
        })
        .unwrap();
        let residence = TemporaryResidence {
            id: ResidenceId(1),
            household: payload.household,
            full_name: payload.full_name,
            citizen_id: payload.citizen_id,
            birth_date: payload.birth_date,
            gender: payload.gender,
            phone: payload.phone,
            permanent_address: payload.permanent_address,
            from: payload.from,
            to: payload.to,
            reason: payload.reason,
            note: payload.note,
            registered_on: payload.from,
        };
        assert!(residence.is_active_on(parse_date("2024-10-15").unwrap()));
        assert!(!residence.is_active_on(parse_date("2025-01-01").unwrap()));
        assert!(ResidenceFilter::by_name("van c").matches(&residence));
        assert!(!ResidenceFilter::by_name("Tran").matches(&residence));
    }
}
