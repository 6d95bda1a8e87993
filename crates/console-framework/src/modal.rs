//! # Form/Modal Edit Controller
//!
//! A [`ModalController`] owns the lifecycle of one create-or-edit form:
//!
//! ```text
//! Closed --open_modal--> Open(create | edit) --submit ok / close_modal--> Closed
//! Open --validation failure--> Open
//! Open --submission failure--> Open
//! ```
//!
//! It never talks to a backend itself. [`handle_submit`](ModalController::handle_submit)
//! validates the current field values and hands them, together with the id being
//! edited, to a caller-supplied delegate. The delegate's answer decides whether the
//! modal closes:
//!
//! - `Ok(())` or `Ok(true)`: success. The success message is shown and the modal closes.
//! - `Ok(false)`: the delegate already told the user what went wrong. The modal stays
//!   open and nothing else is reported.
//! - `Err(_)`: the modal stays open; a generic error is shown depending on
//!   [`SubmitErrorPolicy`].
//!
//! The submitting flag is released on every one of those paths, including a panic
//! inside the delegate.

use crate::error::ConsoleError;
use crate::notify::Notifier;
use crate::record::short_type_name;
use crate::validation::ValidationErrors;
use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Field values of one form.
///
/// In edit mode the values carry the id of the record they were copied from.
pub trait FormModel: Clone + Send + Sync + Debug + 'static {
    type Id: Clone + PartialEq + Debug + Display + Send + Sync + 'static;

    /// The id of the record these values were copied from, if any.
    fn record_id(&self) -> Option<Self::Id>;

    /// Synchronous field rules. The default accepts everything.
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Extra validation that needs to await something (a uniqueness lookup, say).
#[async_trait]
pub trait Validator<F>: Send + Sync {
    async fn validate(&self, values: &F) -> Result<(), ValidationErrors>;
}

#[derive(Debug, Clone)]
pub struct ModalState<F: FormModel> {
    pub is_open: bool,
    /// Set if and only if the modal was opened on an existing record.
    pub editing_id: Option<F::Id>,
    pub is_submitting: bool,
    pub field_values: F,
    /// Failures from the last validation run, for the form to display.
    pub field_errors: ValidationErrors,
}

/// What a submit delegate reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    /// The delegate already reported the problem; keep the modal open quietly.
    HandledFailure,
}

impl From<()> for Verdict {
    fn from(_: ()) -> Self {
        Verdict::Success
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok {
            Verdict::Success
        } else {
            Verdict::HandledFailure
        }
    }
}

/// Result of [`ModalController::handle_submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Delegate succeeded and the modal closed.
    Submitted,
    /// Field rules failed; the delegate was not called.
    Invalid(ValidationErrors),
    /// Delegate returned a handled failure.
    Declined,
    /// Delegate returned an error.
    Failed(ConsoleError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// Whether an unhandled submission error produces a generic notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitErrorPolicy {
    #[default]
    Notify,
    Silent,
}

#[derive(Debug, Clone)]
pub struct ModalConfig {
    pub error_policy: SubmitErrorPolicy,
    /// Shown after a successful create when the caller gives no message.
    pub created_message: String,
    /// Shown after a successful update when the caller gives no message.
    pub updated_message: String,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            error_policy: SubmitErrorPolicy::Notify,
            created_message: "Created successfully".to_string(),
            updated_message: "Updated successfully".to_string(),
        }
    }
}

struct Shared<F: FormModel> {
    initial: F,
    state: watch::Sender<ModalState<F>>,
    notifier: Arc<dyn Notifier>,
    validator: Option<Arc<dyn Validator<F>>>,
    config: ModalConfig,
    form: &'static str,
}

/// Handle to one form's modal. Clones share the same state.
pub struct ModalController<F: FormModel> {
    shared: Arc<Shared<F>>,
}

impl<F: FormModel> Clone for ModalController<F> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

/// Holds the submitting flag up until dropped.
struct SubmitLock<'a, F: FormModel> {
    state: &'a watch::Sender<ModalState<F>>,
}

impl<F: FormModel> Drop for SubmitLock<'_, F> {
    fn drop(&mut self) {
        self.state.send_modify(|state| state.is_submitting = false);
    }
}

impl<F: FormModel> ModalController<F> {
    /// A closed modal whose create mode starts from `initial`.
    pub fn new(initial: F, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_config(initial, notifier, ModalConfig::default())
    }

    pub fn with_config(initial: F, notifier: Arc<dyn Notifier>, config: ModalConfig) -> Self {
        let (state, _) = watch::channel(ModalState {
            is_open: false,
            editing_id: None,
            is_submitting: false,
            field_values: initial.clone(),
            field_errors: ValidationErrors::default(),
        });
        let form = short_type_name::<F>();
        Self {
            shared: Arc::new(Shared {
                initial,
                state,
                notifier,
                validator: None,
                config,
                form,
            }),
        }
    }

    /// Adds an async validator that runs after [`FormModel::validate`].
    ///
    /// Must be called before the controller is cloned.
    pub fn with_validator(mut self, validator: Arc<dyn Validator<F>>) -> Self {
        match Arc::get_mut(&mut self.shared) {
            Some(shared) => shared.validator = Some(validator),
            None => warn!(form = self.shared.form, "Controller already shared; validator ignored"),
        }
        self
    }

    /// Opens the modal.
    ///
    /// With a record the modal enters edit mode and the fields become a copy of the
    /// record. Without one it enters create mode with the initial values.
    pub fn open_modal(&self, record: Option<F>) {
        let form = self.shared.form;
        let initial = &self.shared.initial;
        self.shared.state.send_modify(|state| {
            match record {
                Some(values) => {
                    state.editing_id = values.record_id();
                    state.field_values = values;
                }
                None => {
                    state.editing_id = None;
                    state.field_values = initial.clone();
                }
            }
            state.field_errors = ValidationErrors::default();
            state.is_open = true;
            debug!(form, editing_id = ?state.editing_id, "Modal opened");
        });
    }

    /// Closes the modal and resets the fields. Safe to call when already closed.
    pub fn close_modal(&self) {
        let initial = &self.shared.initial;
        self.shared.state.send_modify(|state| {
            state.is_open = false;
            state.editing_id = None;
            state.field_values = initial.clone();
            state.field_errors = ValidationErrors::default();
        });
    }

    /// Applies user input to the current field values.
    pub fn update_fields(&self, edit: impl FnOnce(&mut F)) {
        self.shared.state.send_modify(|state| edit(&mut state.field_values));
    }

    pub fn set_field_values(&self, values: F) {
        self.shared.state.send_modify(|state| state.field_values = values);
    }

    pub fn state(&self) -> ModalState<F> {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ModalState<F>> {
        self.shared.state.subscribe()
    }

    pub fn is_open(&self) -> bool {
        self.shared.state.borrow().is_open
    }

    pub fn is_editing(&self) -> bool {
        self.shared.state.borrow().editing_id.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.shared.state.borrow().is_submitting
    }

    pub fn editing_id(&self) -> Option<F::Id> {
        self.shared.state.borrow().editing_id.clone()
    }

    pub fn field_values(&self) -> F {
        self.shared.state.borrow().field_values.clone()
    }

    /// Validates the fields and, if they pass, runs `on_submit(values, editing_id)`.
    ///
    /// `success_message` overrides the configured create/update message.
    pub async fn handle_submit<S, Fut, R>(
        &self,
        on_submit: S,
        success_message: Option<&str>,
    ) -> SubmitOutcome
    where
        S: FnOnce(F, Option<F::Id>) -> Fut,
        Fut: Future<Output = Result<R, ConsoleError>>,
        R: Into<Verdict>,
    {
        let shared = &self.shared;
        let form = shared.form;
        let (values, editing_id) = {
            let state = shared.state.borrow();
            (state.field_values.clone(), state.editing_id.clone())
        };

        // Covers the async validator too.
        shared.state.send_modify(|state| state.is_submitting = true);
        let _lock = SubmitLock {
            state: &shared.state,
        };

        if let Err(errors) = self.validate(&values).await {
            debug!(form, fields = ?errors.fields(), "Validation failed");
            shared
                .state
                .send_modify(|state| state.field_errors = errors.clone());
            return SubmitOutcome::Invalid(errors);
        }
        shared
            .state
            .send_modify(|state| state.field_errors = ValidationErrors::default());

        let editing = editing_id.is_some();
        match on_submit(values, editing_id).await.map(Into::into) {
            Ok(Verdict::Success) => {
                let message = success_message.unwrap_or(if editing {
                    &shared.config.updated_message
                } else {
                    &shared.config.created_message
                });
                info!(form, editing, "Submitted");
                shared.notifier.success(message);
                self.close_modal();
                SubmitOutcome::Submitted
            }
            Ok(Verdict::HandledFailure) => {
                debug!(form, "Submission declined by handler");
                SubmitOutcome::Declined
            }
            Err(ConsoleError::Validation(errors)) => {
                debug!(form, fields = ?errors.fields(), "Rejected by field rules");
                shared
                    .state
                    .send_modify(|state| state.field_errors = errors.clone());
                SubmitOutcome::Invalid(errors)
            }
            Err(e) => {
                warn!(form, error = %e, "Submission failed");
                if shared.config.error_policy == SubmitErrorPolicy::Notify {
                    shared.notifier.error(&e.user_message());
                }
                SubmitOutcome::Failed(e)
            }
        }
    }

    async fn validate(&self, values: &F) -> Result<(), ValidationErrors> {
        let mut errors = match values.validate() {
            Ok(()) => ValidationErrors::default(),
            Err(errors) => errors,
        };
        if let Some(validator) = &self.shared.validator {
            if let Err(more) = validator.validate(values).await {
                errors.extend(more);
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLog;
    use crate::validation::FieldRules;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct NameForm {
        id: Option<u32>,
        name: String,
    }

    impl FormModel for NameForm {
        type Id = u32;

        fn record_id(&self) -> Option<u32> {
            self.id
        }

        fn validate(&self) -> Result<(), ValidationErrors> {
            FieldRules::new()
                .required("name", &self.name, "Enter a name")
                .finish()
        }
    }

    fn record(id: u32, name: &str) -> NameForm {
        NameForm {
            id: Some(id),
            name: name.to_string(),
        }
    }

    fn controller() -> (ModalController<NameForm>, NotificationLog) {
        let log = NotificationLog::new();
        let modal = ModalController::new(NameForm::default(), Arc::new(log.clone()));
        (modal, log)
    }

    #[test]
    fn test_open_edit_then_close() {
        let (modal, _) = controller();

        modal.open_modal(Some(record(5, "X")));
        let state = modal.state();
        assert!(state.is_open);
        assert_eq!(state.editing_id, Some(5));
        assert_eq!(state.field_values, record(5, "X"));
        assert!(modal.is_editing());

        modal.close_modal();
        let state = modal.state();
        assert!(!state.is_open);
        assert_eq!(state.editing_id, None);
        assert_eq!(state.field_values, NameForm::default());
        assert!(!modal.is_editing());
    }

    #[test]
    fn test_open_create_uses_initial_values() {
        let log = NotificationLog::new();
        let initial = NameForm {
            id: None,
            name: "Default".into(),
        };
        let modal = ModalController::new(initial.clone(), Arc::new(log));

        modal.open_modal(Some(record(1, "Old")));
        modal.open_modal(None);

        let state = modal.state();
        assert!(state.is_open);
        assert_eq!(state.editing_id, None);
        assert_eq!(state.field_values, initial);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (modal, _) = controller();
        modal.open_modal(Some(record(2, "Y")));

        modal.close_modal();
        let once = modal.state();
        modal.close_modal();
        let twice = modal.state();

        assert_eq!(once.is_open, twice.is_open);
        assert_eq!(once.editing_id, twice.editing_id);
        assert_eq!(once.field_values, twice.field_values);
        assert!(!twice.is_open);
    }

    #[tokio::test]
    async fn test_success_closes_and_notifies_once() {
        let (modal, log) = controller();
        modal.open_modal(None);
        modal.update_fields(|f| f.name = "New".into());

        let outcome = modal
            .handle_submit(|_, _| async { Ok::<_, ConsoleError>(()) }, Some("Saved"))
            .await;

        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert!(!modal.is_open());
        assert!(!modal.is_submitting());
        assert_eq!(log.successes(), vec!["Saved"]);
    }

    #[tokio::test]
    async fn test_default_success_message_depends_on_mode() {
        let (modal, log) = controller();

        modal.open_modal(None);
        modal.update_fields(|f| f.name = "A".into());
        modal
            .handle_submit(|_, _| async { Ok::<_, ConsoleError>(()) }, None)
            .await;

        modal.open_modal(Some(record(3, "B")));
        modal
            .handle_submit(|_, _| async { Ok::<_, ConsoleError>(true) }, None)
            .await;

        assert_eq!(
            log.successes(),
            vec!["Created successfully", "Updated successfully"]
        );
    }

    #[tokio::test]
    async fn test_delegate_receives_values_and_editing_id() {
        let (modal, _) = controller();
        modal.open_modal(Some(record(7, "Before")));
        modal.update_fields(|f| f.name = "After".into());

        let (tx, rx) = oneshot::channel();
        modal
            .handle_submit(
                |values, editing_id| async move {
                    let _ = tx.send((values, editing_id));
                    Ok::<_, ConsoleError>(())
                },
                None,
            )
            .await;

        let (values, editing_id) = rx.await.unwrap();
        assert_eq!(values, record(7, "After"));
        assert_eq!(editing_id, Some(7));
    }

    #[tokio::test]
    async fn test_handled_failure_keeps_modal_open_silently() {
        let (modal, log) = controller();
        modal.open_modal(None);
        modal.update_fields(|f| f.name = "Typed".into());

        let outcome = modal
            .handle_submit(|_, _| async { Ok::<_, ConsoleError>(false) }, Some("Saved"))
            .await;

        assert_eq!(outcome, SubmitOutcome::Declined);
        assert!(modal.is_open());
        assert!(!modal.is_submitting());
        assert_eq!(modal.field_values().name, "Typed");
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_skips_delegate() {
        let (modal, log) = controller();
        modal.open_modal(None);

        let calls = AtomicUsize::new(0);
        let outcome = modal
            .handle_submit(
                |_, _| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, ConsoleError>(()) }
                },
                Some("Saved"),
            )
            .await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(ref e) if e.fields() == vec!["name"]));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(modal.is_open());
        assert_eq!(modal.state().field_errors.len(), 1);
        assert!(log.entries().is_empty(), "no generic message on top of field errors");
    }

    #[tokio::test]
    async fn test_error_keeps_input_and_reports_generic_message() {
        let (modal, log) = controller();
        modal.open_modal(Some(record(4, "Kept")));

        let outcome = modal
            .handle_submit(
                |_, _| async { Err::<(), _>(ConsoleError::Request("timeout".into())) },
                Some("Saved"),
            )
            .await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        let state = modal.state();
        assert!(state.is_open);
        assert!(!state.is_submitting);
        assert_eq!(state.field_values, record(4, "Kept"));
        assert_eq!(state.editing_id, Some(4));
        assert_eq!(log.errors(), vec!["Something went wrong"]);
        assert!(log.successes().is_empty());
    }

    #[tokio::test]
    async fn test_silent_policy_suppresses_generic_message() {
        let log = NotificationLog::new();
        let modal = ModalController::with_config(
            NameForm::default(),
            Arc::new(log.clone()),
            ModalConfig {
                error_policy: SubmitErrorPolicy::Silent,
                ..ModalConfig::default()
            },
        );
        modal.open_modal(Some(record(1, "A")));

        let outcome = modal
            .handle_submit(|_, _| async { Err::<(), _>(ConsoleError::rejected("nope")) }, None)
            .await;

        assert!(!outcome.is_success());
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_delegate_validation_error_is_not_generic() {
        let (modal, log) = controller();
        modal.open_modal(Some(record(1, "A")));

        let mut errors = ValidationErrors::new();
        errors.add("name", "Already taken");
        let outcome = modal
            .handle_submit(
                |_, _| async move { Err::<(), _>(ConsoleError::Validation(errors)) },
                None,
            )
            .await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert!(modal.is_open());
        assert_eq!(modal.state().field_errors.messages_for("name"), vec!["Already taken"]);
        assert!(log.entries().is_empty());
    }

    struct ReservedNames;

    #[async_trait]
    impl Validator<NameForm> for ReservedNames {
        async fn validate(&self, values: &NameForm) -> Result<(), ValidationErrors> {
            FieldRules::new()
                .check("name", values.name != "admin", "Name is reserved")
                .finish()
        }
    }

    #[tokio::test]
    async fn test_async_validator_runs_after_field_rules() {
        let (modal, _) = controller();
        let modal = modal.with_validator(Arc::new(ReservedNames));
        modal.open_modal(None);
        modal.update_fields(|f| f.name = "admin".into());

        let outcome = modal
            .handle_submit(|_, _| async { Ok::<_, ConsoleError>(()) }, None)
            .await;

        match outcome {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(errors.messages_for("name"), vec!["Name is reserved"])
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submitting_flag_visible_during_delegate() {
        let (modal, _) = controller();
        modal.open_modal(Some(record(1, "A")));

        let observer = modal.clone();
        let outcome = modal
            .handle_submit(
                |_, _| async move {
                    assert!(observer.is_submitting());
                    Ok::<_, ConsoleError>(())
                },
                None,
            )
            .await;

        assert!(outcome.is_success());
        assert!(!modal.is_submitting());
    }

    /// Holds validation open until the test releases it.
    struct Gate {
        entered: tokio::sync::Mutex<Option<oneshot::Sender<()>>>,
        release: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl Validator<NameForm> for Gate {
        async fn validate(&self, _values: &NameForm) -> Result<(), ValidationErrors> {
            if let Some(entered) = self.entered.lock().await.take() {
                let _ = entered.send(());
            }
            if let Some(release) = self.release.lock().await.take() {
                let _ = release.await;
            }
            FieldRules::new()
                .check("name", false, "Checked too late")
                .finish()
        }
    }

    #[tokio::test]
    async fn test_submitting_flag_raised_while_async_validator_runs() {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let (modal, _) = controller();
        let modal = modal.with_validator(Arc::new(Gate {
            entered: tokio::sync::Mutex::new(Some(entered_tx)),
            release: tokio::sync::Mutex::new(Some(release_rx)),
        }));
        modal.open_modal(Some(record(1, "A")));

        let task = tokio::spawn({
            let modal = modal.clone();
            async move {
                modal
                    .handle_submit(|_, _| async { Ok::<_, ConsoleError>(()) }, None)
                    .await
            }
        });

        entered_rx.await.unwrap();
        assert!(modal.is_submitting());

        release_tx.send(()).unwrap();
        let outcome = task.await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert!(!modal.is_submitting());
        assert!(modal.is_open());
    }

    #[tokio::test]
    async fn test_panicking_delegate_releases_submitting() {
        let (modal, _) = controller();
        modal.open_modal(Some(record(1, "A")));

        let task = tokio::spawn({
            let modal = modal.clone();
            async move {
                modal
                    .handle_submit(
                        |_, _| async {
                            if true {
                                panic!("delegate blew up");
                            }
                            Ok::<_, ConsoleError>(())
                        },
                        None,
                    )
                    .await
            }
        });

        assert!(task.await.unwrap_err().is_panic());
        assert!(!modal.is_submitting());
        assert!(modal.is_open());
    }
}
