//! # Tracing Setup
//!
//! Every component logs through `tracing` with structured fields instead of
//! formatted strings:
//!
//! ```text
//! INFO Backend started entity_type="Household"
//! INFO Created entity_type="Household" id=1 size=1
//! INFO Fetched resource="Household" tag=2 rows=1
//! INFO Submitted form="HouseholdForm" editing=false
//! ```
//!
//! The `resource`, `form` and `entity_type` fields carry the short type name, so the
//! module path is left out of each line (`with_target(false)`).
//!
//! ```bash
//! RUST_LOG=info cargo run          # lifecycle and mutations
//! RUST_LOG=debug cargo run         # plus payloads, fetch tags and modal transitions
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. The filter comes from `RUST_LOG`, falling back to
/// `default_filter` when it is unset or invalid.
pub fn setup_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // Later calls keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
