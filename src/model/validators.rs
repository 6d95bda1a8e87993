//! Field rules specific to Vietnamese residence records.

use console_framework::FieldRules;

/// Digits in a citizen identity card number (CCCD).
pub const CITIZEN_ID_DIGITS: usize = 12;

pub fn is_citizen_id(value: &str) -> bool {
    value.len() == CITIZEN_ID_DIGITS && value.chars().all(|c| c.is_ascii_digit())
}

/// Requires a citizen id: present, and exactly twelve digits.
pub fn citizen_id(rules: FieldRules, field: &str, value: &str) -> FieldRules {
    if value.is_empty() {
        rules.required(field, value, "Enter the citizen id")
    } else {
        rules.exact_digits(field, value, CITIZEN_ID_DIGITS, "Citizen id must have exactly 12 digits")
    }
}
