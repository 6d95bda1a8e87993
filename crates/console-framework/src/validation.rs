//! # Field Validation
//!
//! Forms validate themselves before the modal controller hands their values to a
//! submit delegate. Failures are collected per field in [`ValidationErrors`] so the
//! form layer can show them next to the inputs, and so the controller can tell them
//! apart from submission failures.
//!
//! [`FieldRules`] is a small builder for the rules the console's forms use:
//!
//! ```rust
//! use console_framework::validation::FieldRules;
//!
//! let result = FieldRules::new()
//!     .required("name", "", "Enter a name")
//!     .email("email", "not-an-email", "Invalid email")
//!     .finish();
//!
//! let errors = result.unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors.messages_for("name"), vec!["Enter a name"]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-level failures in the order the rules reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Names of the rejected fields, without duplicates, in report order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }

    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Merges another set of failures into this one.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// `Ok(())` when nothing was reported.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Builder that runs field rules and collects their failures.
#[derive(Debug, Default)]
pub struct FieldRules {
    errors: ValidationErrors,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects empty or whitespace-only text.
    pub fn required(mut self, field: &str, value: &str, message: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.add(field, message);
        }
        self
    }

    /// Rejects an unset optional value.
    pub fn required_some<T>(mut self, field: &str, value: &Option<T>, message: &str) -> Self {
        if value.is_none() {
            self.errors.add(field, message);
        }
        self
    }

    /// Accepts empty input; otherwise requires a `local@domain.tld` shape.
    pub fn email(mut self, field: &str, value: &str, message: &str) -> Self {
        if !value.is_empty() && !is_email(value) {
            self.errors.add(field, message);
        }
        self
    }

    /// Accepts empty input; otherwise requires a leading 0 followed by 9 or 10 digits.
    pub fn phone(mut self, field: &str, value: &str, message: &str) -> Self {
        if !value.is_empty() && !is_phone(value) {
            self.errors.add(field, message);
        }
        self
    }

    /// Requires exactly `count` ASCII digits.
    pub fn exact_digits(mut self, field: &str, value: &str, count: usize, message: &str) -> Self {
        if value.len() != count || !value.chars().all(|c| c.is_ascii_digit()) {
            self.errors.add(field, message);
        }
        self
    }

    /// Records `message` when `ok` is false.
    pub fn check(mut self, field: &str, ok: bool, message: &str) -> Self {
        if !ok {
            self.errors.add(field, message);
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn is_phone(value: &str) -> bool {
    let digits_only = value.chars().all(|c| c.is_ascii_digit());
    digits_only && value.starts_with('0') && (10..=11).contains(&value.len())
}
