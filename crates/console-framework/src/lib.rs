//! # Console Framework
//!
//! Building blocks for data-management consoles: pages that show a table of records
//! from a backend and let an operator create, edit, delete and search them.
//!
//! ## Architecture Overview
//!
//! Every management page is the same three pieces wired together:
//!
//! 1. **Table** ([`ResourceLoader`]): runs the list operation and publishes
//!    `data`/`loading`/`error` in a shape a renderer can always draw.
//! 2. **Form** ([`ModalController`]): the create/edit modal. It validates, hands the
//!    values to a submit delegate, and closes or stays open depending on the answer.
//! 3. **Page** ([`CrudPage`]): routes row deletes, form submits and searches to a
//!    [`ResourceService`](page::ResourceService) and reloads the table afterwards.
//!
//! Around them:
//!
//! - [`backend`]: an in-memory, actor-based stand-in for the REST API.
//! - [`mock`]: scripted backends for tests.
//! - [`notify`]: the "show the user a toast" channel.
//! - [`session`] and [`navigation`]: who is signed in and what they may open.
//!   [`Guarded`] applies that check to every call a page makes.
//! - [`validation`]: field rules and per-field error collection.
//!
//! ## Example
//!
//! ```rust
//! use console_framework::{from_fn, ConsoleError, Fetched, LoaderConfig, ResourceLoader};
//!
//! #[tokio::main]
//! async fn main() {
//!     let loader = ResourceLoader::<String>::with_source(
//!         from_fn(|_: ()| async {
//!             Ok::<_, ConsoleError>(Fetched::Many(vec!["A-101".to_string()]))
//!         }),
//!         LoaderConfig::manual(),
//!     );
//!
//!     let rows = loader.refetch(()).await.unwrap();
//!     assert_eq!(rows, vec!["A-101"]);
//!     assert!(!loader.is_loading());
//! }
//! ```
//!
//! ## Concurrency
//!
//! Loader and modal state live in `tokio::sync::watch` channels. Handles are cheap
//! clones of the same state, and a renderer can subscribe to redraw on change. Both
//! release their busy flag (`loading`, `is_submitting`) through a guard, so a failing
//! or panicking operation cannot leave a spinner behind.

pub mod backend;
pub mod error;
pub mod guard;
pub mod loader;
pub mod mock;
pub mod modal;
pub mod navigation;
pub mod notify;
pub mod page;
pub mod record;
pub mod session;
pub mod telemetry;
pub mod validation;

pub use error::{ConsoleError, GENERIC_FAILURE_MESSAGE};
pub use guard::Guarded;
pub use loader::{
    from_fn, FnSource, ListSource, LoaderConfig, ResourceLoader, ResourceState, ResponseOrdering,
};
pub use modal::{
    FormModel, ModalConfig, ModalController, ModalState, SubmitErrorPolicy, SubmitOutcome,
    Validator, Verdict,
};
pub use notify::{Notification, NotificationLog, Notifier, TracingNotifier};
pub use page::{CrudPage, PageConfig, RecordId, ResourceLabels, ResourceService};
pub use record::{short_type_name, Fetched, Page, Record, SingleRecordPolicy};
pub use session::{Role, Session, SessionContext};
pub use telemetry::setup_tracing;
pub use validation::{FieldRules, ValidationErrors};
