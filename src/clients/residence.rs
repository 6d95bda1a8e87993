use super::{first_page, DEFAULT_PAGE_SIZE};
use crate::model::{
    ResidenceFilter, ResidenceForm, ResidenceId, ResidencePayload, TemporaryResidence,
};
use async_trait::async_trait;
use console_framework::backend::{BackendError, ResourceClient, ServiceClient};
use console_framework::{ConsoleError, Fetched, Page, ResourceLabels, ResourceService};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct ResidenceClient {
    inner: ResourceClient<TemporaryResidence>,
    page_size: usize,
}

impl ResidenceClient {
    pub fn new(inner: ResourceClient<TemporaryResidence>) -> Self {
        Self {
            inner,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// First page of registrations whose name matches `filter`.
    #[instrument(skip(self))]
    pub async fn search(&self, filter: ResidenceFilter) -> Result<Page<TemporaryResidence>, ConsoleError> {
        let residences = self.inner.list(filter).await?;
        debug!(count = residences.len(), "Temporary residences listed");
        Ok(first_page(residences, self.page_size))
    }

    #[instrument(skip(self))]
    pub async fn register(&self, payload: ResidencePayload) -> Result<TemporaryResidence, ConsoleError> {
        Ok(self.inner.create(payload).await?)
    }

    #[instrument(skip(self))]
    pub async fn amend(
        &self,
        id: ResidenceId,
        payload: ResidencePayload,
    ) -> Result<TemporaryResidence, ConsoleError> {
        Ok(self.inner.update(id, payload).await?)
    }
}

impl ServiceClient<TemporaryResidence> for ResidenceClient {
    type Error = ConsoleError;

    fn inner(&self) -> &ResourceClient<TemporaryResidence> {
        &self.inner
    }

    fn map_error(e: BackendError) -> ConsoleError {
        e.into()
    }
}

#[async_trait]
impl ResourceService for ResidenceClient {
    type Record = TemporaryResidence;
    type Form = ResidenceForm;
    type Filter = ResidenceFilter;

    async fn list(&self, filter: ResidenceFilter) -> Result<Fetched<TemporaryResidence>, ConsoleError> {
        Ok(self.search(filter).await?.into())
    }

    async fn create(&self, form: ResidenceForm) -> Result<(), ConsoleError> {
        let payload = ResidencePayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.register(payload).await.map(|_| ())
    }

    async fn update(&self, id: ResidenceId, form: ResidenceForm) -> Result<(), ConsoleError> {
        let payload = ResidencePayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.amend(id, payload).await.map(|_| ())
    }

    async fn delete(&self, id: ResidenceId) -> Result<(), ConsoleError> {
        <Self as ServiceClient<TemporaryResidence>>::delete(self, id).await
    }

    fn edit_form(&self, residence: &TemporaryResidence) -> ResidenceForm {
        ResidenceForm::from(residence)
    }

    fn labels(&self) -> ResourceLabels {
        ResourceLabels::new("temporary residence")
            .with_created("Registered temporary residence")
    }
}
