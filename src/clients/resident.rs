use super::{first_page, DEFAULT_PAGE_SIZE};
use crate::model::{Resident, ResidentForm, ResidentId, ResidentPayload};
use async_trait::async_trait;
use console_framework::backend::{BackendError, ResourceClient, ServiceClient};
use console_framework::{ConsoleError, Fetched, Page, ResourceLabels, ResourceService};
use tracing::instrument;

#[derive(Clone)]
pub struct ResidentClient {
    inner: ResourceClient<Resident>,
    page_size: usize,
}

impl ResidentClient {
    pub fn new(inner: ResourceClient<Resident>) -> Self {
        Self {
            inner,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[instrument(skip(self))]
    pub async fn list_page(&self) -> Result<Page<Resident>, ConsoleError> {
        let residents = self.inner.list(()).await?;
        Ok(first_page(residents, self.page_size))
    }

    #[instrument(skip(self))]
    pub async fn create_resident(&self, payload: ResidentPayload) -> Result<Resident, ConsoleError> {
        Ok(self.inner.create(payload).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_resident(
        &self,
        id: ResidentId,
        payload: ResidentPayload,
    ) -> Result<Resident, ConsoleError> {
        Ok(self.inner.update(id, payload).await?)
    }
}

impl ServiceClient<Resident> for ResidentClient {
    type Error = ConsoleError;

    fn inner(&self) -> &ResourceClient<Resident> {
        &self.inner
    }

    fn map_error(e: BackendError) -> ConsoleError {
        e.into()
    }
}

#[async_trait]
impl ResourceService for ResidentClient {
    type Record = Resident;
    type Form = ResidentForm;
    type Filter = ();

    async fn list(&self, _filter: ()) -> Result<Fetched<Resident>, ConsoleError> {
        Ok(self.list_page().await?.into())
    }

    async fn create(&self, form: ResidentForm) -> Result<(), ConsoleError> {
        let payload = ResidentPayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.create_resident(payload).await.map(|_| ())
    }

    async fn update(&self, id: ResidentId, form: ResidentForm) -> Result<(), ConsoleError> {
        let payload = ResidentPayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.update_resident(id, payload).await.map(|_| ())
    }

    async fn delete(&self, id: ResidentId) -> Result<(), ConsoleError> {
        <Self as ServiceClient<Resident>>::delete(self, id).await
    }

    /// Flattens the nested household onto the form's `household_id`.
    fn edit_form(&self, resident: &Resident) -> ResidentForm {
        ResidentForm::from(resident)
    }

    fn labels(&self) -> ResourceLabels {
        ResourceLabels::new("resident")
    }
}
