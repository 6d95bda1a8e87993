use super::record_id;
use console_framework::{FieldRules, FormModel, Record, ValidationErrors};
use serde::{Deserialize, Serialize};

record_id!(
    /// Backend id of a fee type.
    FeeTypeId
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeKind {
    #[default]
    #[serde(rename = "BatBuoc")]
    Mandatory,
    #[serde(rename = "TuNguyen")]
    Voluntary,
}

/// A chargeable item: service fee, parking, water...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeType {
    pub id: FeeTypeId,
    pub name: String,
    /// VND per unit.
    pub unit_price: f64,
    pub unit: String,
    pub kind: FeeKind,
    pub description: String,
    pub active: bool,
}

impl Record for FeeType {
    type Id = FeeTypeId;

    fn id(&self) -> FeeTypeId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTypePayload {
    pub name: String,
    pub unit_price: f64,
    pub unit: String,
    pub kind: FeeKind,
    pub description: String,
    pub active: bool,
}

/// Query of the fee type search box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTypeFilter {
    pub name: Option<String>,
}

impl FeeTypeFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Case-insensitive substring match. A blank query matches everything.
    pub fn matches(&self, fee: &FeeType) -> bool {
        match self.name.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => fee.name.to_lowercase().contains(&query.to_lowercase()),
        }
    }
}

/// Values of the fee type modal. The price is edited as text.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeTypeForm {
    pub id: Option<FeeTypeId>,
    pub name: String,
    pub unit_price: String,
    pub unit: String,
    pub kind: FeeKind,
    pub description: String,
    pub active: bool,
}

impl Default for FeeTypeForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            unit_price: "0".to_string(),
            unit: String::new(),
            kind: FeeKind::Mandatory,
            description: String::new(),
            active: true,
        }
    }
}

impl FeeTypeForm {
    fn parsed_price(&self) -> Option<f64> {
        self.unit_price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price >= 0.0)
    }
}

impl FormModel for FeeTypeForm {
    type Id = FeeTypeId;

    fn record_id(&self) -> Option<FeeTypeId> {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let rules = FieldRules::new()
            .required("name", &self.name, "Enter the fee type name")
            .required("unit_price", &self.unit_price, "Enter the unit price");
        let rules = if self.unit_price.trim().is_empty() {
            rules
        } else {
            rules.check(
                "unit_price",
                self.parsed_price().is_some(),
                "Unit price must be a non-negative number",
            )
        };
        rules.finish()
    }
}

impl From<&FeeType> for FeeTypeForm {
    fn from(fee: &FeeType) -> Self {
        Self {
            id: Some(fee.id),
            name: fee.name.clone(),
            unit_price: fee.unit_price.to_string(),
            unit: fee.unit.clone(),
            kind: fee.kind,
            description: fee.description.clone(),
            active: fee.active,
        }
    }
}

impl TryFrom<FeeTypeForm> for FeeTypePayload {
    type Error = ValidationErrors;

    fn try_from(form: FeeTypeForm) -> Result<Self, ValidationErrors> {
        form.validate()?;
        Ok(Self {
            unit_price: form.parsed_price().unwrap_or(0.0),
            name: form.name.trim().to_string(),
            unit: form.unit,
            kind: form.kind,
            description: form.description,
            active: form.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee(name: &str) -> FeeType {
        FeeType {
            id: FeeTypeId(1),
            name: name.into(),
            unit_price: 7000.0,
            unit: "m2".into(),
            kind: FeeKind::Mandatory,
            description: String::new(),
            active: true,
        }
    }

    #[test]
    fn test_filter_by_name() {
        assert!(FeeTypeFilter::default().matches(&fee("Service")));
        assert!(FeeTypeFilter::by_name("park").matches(&fee("Parking")));
        assert!(FeeTypeFilter::by_name("  ").matches(&fee("Parking")));
        assert!(!FeeTypeFilter::by_name("water").matches(&fee("Parking")));
    }

    #[test]
    fn test_price_is_edited_as_text() {
        let form = FeeTypeForm::from(&fee("Service"));
        assert_eq!(form.unit_price, "7000");

        let payload = FeeTypePayload::try_from(FeeTypeForm {
            unit_price: " 12500.5 ".into(),
            ..form
        })
        .unwrap();
        assert_eq!(payload.unit_price, 12500.5);
    }

    #[test]
    fn test_rejects_bad_price() {
        let form = FeeTypeForm {
            name: "Parking".into(),
            unit_price: "-5".into(),
            ..FeeTypeForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.messages_for("unit_price"),
            vec!["Unit price must be a non-negative number"]
        );
    }
}
