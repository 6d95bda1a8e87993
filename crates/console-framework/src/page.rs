//! # List-Detail Page Composition
//!
//! A [`CrudPage`] wires one [`ResourceLoader`] (the table) and one
//! [`ModalController`] (the create/edit form) to a [`ResourceService`]:
//!
//! - **Row delete**: call the service, then on success notify and refetch; on failure
//!   notify that the delete failed and leave the rows alone.
//! - **Submit**: update when the modal holds an editing id, create otherwise, then
//!   refetch. The modal controller closes the form and reports the outcome.
//! - **Search**: remember the filter and refetch with it. Later refetches (after a
//!   delete or a submit) keep using the remembered filter.
//!
//! A refetch after a mutation starts only once the mutation's response has arrived.

use crate::error::ConsoleError;
use crate::loader::{ListSource, LoaderConfig, ResourceLoader, ResourceState};
use crate::modal::{
    FormModel, ModalConfig, ModalController, ModalState, SubmitOutcome, Validator,
};
use crate::notify::Notifier;
use crate::record::{Fetched, Record};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Id type shared by a service's records and forms.
pub type RecordId<S> = <<S as ResourceService>::Record as Record>::Id;

/// The backend operations behind one management page.
#[async_trait]
pub trait ResourceService: Send + Sync + 'static {
    type Record: Record;
    type Form: FormModel<Id = RecordId<Self>> + Default;
    type Filter: Clone + Default + Debug + Send + Sync + 'static;

    async fn list(&self, filter: Self::Filter) -> Result<Fetched<Self::Record>, ConsoleError>;

    async fn create(&self, form: Self::Form) -> Result<(), ConsoleError>;

    async fn update(&self, id: RecordId<Self>, form: Self::Form) -> Result<(), ConsoleError>;

    async fn delete(&self, id: RecordId<Self>) -> Result<(), ConsoleError>;

    /// Turns a table row into the values the edit form starts from.
    fn edit_form(&self, record: &Self::Record) -> Self::Form;

    fn labels(&self) -> ResourceLabels;

    /// Extra form checks that need the backend, such as uniqueness.
    fn form_validator(&self) -> Option<Arc<dyn Validator<Self::Form>>> {
        None
    }
}

/// Human-facing texts for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLabels {
    pub deleted: String,
    pub delete_failed: String,
    /// Overrides the modal's default create message.
    pub created: Option<String>,
    /// Overrides the modal's default update message.
    pub updated: Option<String>,
}

impl ResourceLabels {
    /// Labels for a resource named `noun` ("household", "fee type").
    pub fn new(noun: &str) -> Self {
        Self {
            deleted: format!("Deleted {noun}"),
            delete_failed: "Delete failed".to_string(),
            created: None,
            updated: None,
        }
    }

    pub fn with_created(mut self, message: impl Into<String>) -> Self {
        self.created = Some(message.into());
        self
    }

    pub fn with_updated(mut self, message: impl Into<String>) -> Self {
        self.updated = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageConfig {
    pub loader: LoaderConfig,
    pub modal: ModalConfig,
}

struct ServiceSource<S> {
    service: Arc<S>,
}

#[async_trait]
impl<S: ResourceService> ListSource<S::Record, S::Filter> for ServiceSource<S> {
    async fn fetch(&self, filter: S::Filter) -> Result<Fetched<S::Record>, ConsoleError> {
        self.service.list(filter).await
    }
}

/// One management page: a table, its search filter and its create/edit modal.
pub struct CrudPage<S: ResourceService> {
    service: Arc<S>,
    loader: ResourceLoader<S::Record, S::Filter>,
    modal: ModalController<S::Form>,
    notifier: Arc<dyn Notifier>,
    labels: ResourceLabels,
    filter: watch::Sender<S::Filter>,
}

impl<S: ResourceService> CrudPage<S> {
    /// Builds the page and starts loading the unfiltered list.
    pub fn mount(service: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self::mount_with(service, notifier, PageConfig::default())
    }

    pub fn mount_with(service: Arc<S>, notifier: Arc<dyn Notifier>, config: PageConfig) -> Self {
        let source: Arc<dyn ListSource<S::Record, S::Filter>> = Arc::new(ServiceSource {
            service: service.clone(),
        });
        let loader = ResourceLoader::new(Some(source), config.loader);
        let mut modal =
            ModalController::with_config(S::Form::default(), notifier.clone(), config.modal);
        if let Some(validator) = service.form_validator() {
            modal = modal.with_validator(validator);
        }
        let labels = service.labels();
        let (filter, _) = watch::channel(S::Filter::default());
        Self {
            service,
            loader,
            modal,
            notifier,
            labels,
            filter,
        }
    }

    /// Current table rows.
    pub fn rows(&self) -> Vec<S::Record> {
        self.loader.data()
    }

    pub fn table(&self) -> ResourceState<S::Record> {
        self.loader.state()
    }

    pub fn form(&self) -> ModalState<S::Form> {
        self.modal.state()
    }

    pub fn loader(&self) -> &ResourceLoader<S::Record, S::Filter> {
        &self.loader
    }

    pub fn modal(&self) -> &ModalController<S::Form> {
        &self.modal
    }

    pub fn filter(&self) -> S::Filter {
        self.filter.borrow().clone()
    }

    pub fn open_create(&self) {
        self.modal.open_modal(None);
    }

    pub fn edit_row(&self, record: &S::Record) {
        self.modal.open_modal(Some(self.service.edit_form(record)));
    }

    /// Deletes one row and reloads the table.
    pub async fn delete_row(&self, id: RecordId<S>) -> Result<(), ConsoleError> {
        match self.service.delete(id.clone()).await {
            Ok(()) => {
                info!(%id, "Row deleted");
                self.notifier.success(&self.labels.deleted);
                // A failed reload is kept in the loader state; the delete itself succeeded.
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "Row delete failed");
                self.notifier.error(&self.labels.delete_failed);
                Err(e)
            }
        }
    }

    /// Submits the modal: update in edit mode, create otherwise, then reload.
    pub async fn submit(&self) -> SubmitOutcome {
        let message = if self.modal.is_editing() {
            self.labels.updated.as_deref()
        } else {
            self.labels.created.as_deref()
        };
        let service = &self.service;
        self.modal
            .handle_submit(
                |values, editing_id| async move {
                    match editing_id {
                        Some(id) => service.update(id, values).await?,
                        None => service.create(values).await?,
                    }
                    if let Err(e) = self.refresh().await {
                        warn!(error = %e, "Reload after submit failed");
                    }
                    Ok::<_, ConsoleError>(())
                },
                message,
            )
            .await
    }

    /// Remembers `filter` and reloads with it.
    pub async fn search(&self, filter: S::Filter) -> Result<Vec<S::Record>, ConsoleError> {
        info!(?filter, "Search");
        self.filter.send_replace(filter.clone());
        self.loader.refetch(filter).await
    }

    /// Reloads with the remembered filter.
    pub async fn refresh(&self) -> Result<Vec<S::Record>, ConsoleError> {
        self.loader.refetch(self.filter()).await
    }

    /// Leaves the page. Fetches still in flight no longer touch the table.
    pub fn unmount(&self) {
        self.modal.close_modal();
        self.loader.close();
    }
}
