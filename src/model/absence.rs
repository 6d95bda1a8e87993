use super::record_id;
use super::resident::ResidentId;
use chrono::NaiveDate;
use console_framework::{FieldRules, FormModel, Record, ValidationErrors};
use serde::{Deserialize, Serialize};

record_id!(
    /// Backend id of a temporary absence declaration.
    AbsenceId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentRef {
    pub id: ResidentId,
}

/// A resident declared as temporarily living elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryAbsence {
    pub id: AbsenceId,
    pub resident: ResidentRef,
    pub destination: String,
    pub reason: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Record for TemporaryAbsence {
    type Id = AbsenceId;

    fn id(&self) -> AbsenceId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsencePayload {
    pub resident: ResidentRef,
    pub destination: String,
    pub reason: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Query of the absence search box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceFilter {
    pub destination: Option<String>,
}

impl AbsenceFilter {
    pub fn by_destination(destination: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
        }
    }

    pub fn matches(&self, absence: &TemporaryAbsence) -> bool {
        match self.destination.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => absence
                .destination
                .to_lowercase()
                .contains(&query.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbsenceForm {
    pub id: Option<AbsenceId>,
    pub resident_id: Option<ResidentId>,
    pub destination: String,
    pub reason: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FormModel for AbsenceForm {
    type Id = AbsenceId;

    fn record_id(&self) -> Option<AbsenceId> {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let ordered = match (self.from, self.to) {
            (Some(from), Some(to)) => to >= from,
            _ => true,
        };
        FieldRules::new()
            .required_some("resident_id", &self.resident_id, "Pick a resident")
            .required("destination", &self.destination, "Enter the destination")
            .required("reason", &self.reason, "Enter the reason")
            .required_some("from", &self.from, "Pick the start date")
            .required_some("to", &self.to, "Pick the end date")
            .check("to", ordered, "End date must not be before the start date")
            .finish()
    }
}

impl From<&TemporaryAbsence> for AbsenceForm {
    fn from(absence: &TemporaryAbsence) -> Self {
        Self {
            id: Some(absence.id),
            resident_id: Some(absence.resident.id),
            destination: absence.destination.clone(),
            reason: absence.reason.clone(),
            from: Some(absence.from),
            to: Some(absence.to),
        }
    }
}

impl TryFrom<AbsenceForm> for AbsencePayload {
    type Error = ValidationErrors;

    fn try_from(form: AbsenceForm) -> Result<Self, ValidationErrors> {
        form.validate()?;
        let (Some(resident_id), Some(from), Some(to)) = (form.resident_id, form.from, form.to)
        else {
            return Err(ValidationErrors::default());
        };
        Ok(Self {
            resident: ResidentRef { id: resident_id },
            destination: form.destination.trim().to_string(),
            reason: form.reason.trim().to_string(),
            from,
            to,
        })
    }
}
