//! Store rules of each resource, enforced inside its backend actor.
//!
//! Every submodule implements [`StoredEntity`](console_framework::backend::StoredEntity)
//! for one record type and exposes a `new()` factory returning the actor and its
//! domain client. Actors with dependencies receive them as the `run` context, so they
//! can be wired in any order and swapped for a
//! [`MockBackend`](console_framework::mock::MockBackend) in tests.

pub mod absence;
pub mod fee_type;
pub mod household;
pub mod residence;
pub mod resident;

pub use absence::AbsenceError;
pub use fee_type::FeeTypeError;
pub use household::HouseholdError;
pub use residence::ResidenceError;
pub use resident::ResidentError;

/// Requests an actor queues before senders wait.
pub const CHANNEL_CAPACITY: usize = 32;
