//! Domain records of the building console, their form values and the payloads sent
//! to the backend.
//!
//! Every resource comes in three shapes:
//!
//! - the **record** as the backend returns it (`Household`, `Resident`, ...),
//! - the **form** the modal edits (`HouseholdForm`, ...), where optional inputs are
//!   still `Option`s and nested references are flattened to ids,
//! - the **payload** sent on create/update, built from a validated form.

/// Declares a `u32` newtype id the backend can allocate.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use record_id;

pub mod absence;
pub mod fee_type;
pub mod household;
pub mod residence;
pub mod resident;
pub mod validators;

pub use absence::*;
pub use fee_type::*;
pub use household::*;
pub use residence::*;
pub use resident::*;

use chrono::NaiveDate;

/// Wire and display format of calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date. Blank or malformed input yields `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
