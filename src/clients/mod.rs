//! Domain clients: typed wrappers around each resource's
//! [`ResourceClient`](console_framework::backend::ResourceClient).
//!
//! Each client implements two traits. [`ServiceClient`](console_framework::backend::ServiceClient)
//! gives it the plain `get`/`list`/`delete` calls other actors use, and
//! [`ResourceService`](console_framework::ResourceService) is what a
//! [`CrudPage`](console_framework::CrudPage) drives: forms in, rows out. Both
//! traits define `list` and `delete`, so call them with a qualified path when both
//! are in scope.

pub mod absence;
pub mod fee_type;
pub mod household;
pub mod residence;
pub mod resident;

pub use absence::AbsenceClient;
pub use fee_type::FeeTypeClient;
pub use household::HouseholdClient;
pub use residence::ResidenceClient;
pub use resident::ResidentClient;

use console_framework::Page;

/// Page size the console requests unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// The first page of `items`, shaped like the paginated list endpoints answer.
pub(crate) fn first_page<T>(items: Vec<T>, size: usize) -> Page<T> {
    let total_elements = items.len();
    Page {
        content: items.into_iter().take(size).collect(),
        number: 0,
        size,
        total_elements,
    }
}
