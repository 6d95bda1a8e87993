use crate::model::{FeeType, FeeTypeFilter, FeeTypeForm, FeeTypeId, FeeTypePayload};
use async_trait::async_trait;
use console_framework::backend::{BackendError, ResourceClient, ServiceClient};
use console_framework::{ConsoleError, Fetched, ResourceLabels, ResourceService};
use tracing::instrument;

#[derive(Clone)]
pub struct FeeTypeClient {
    inner: ResourceClient<FeeType>,
}

impl FeeTypeClient {
    pub fn new(inner: ResourceClient<FeeType>) -> Self {
        Self { inner }
    }

    /// Fee types whose name contains the filter's text.
    #[instrument(skip(self))]
    pub async fn search(&self, filter: FeeTypeFilter) -> Result<Vec<FeeType>, ConsoleError> {
        Ok(self.inner.list(filter).await?)
    }

    #[instrument(skip(self))]
    pub async fn create_fee_type(&self, payload: FeeTypePayload) -> Result<FeeType, ConsoleError> {
        Ok(self.inner.create(payload).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_fee_type(
        &self,
        id: FeeTypeId,
        payload: FeeTypePayload,
    ) -> Result<FeeType, ConsoleError> {
        Ok(self.inner.update(id, payload).await?)
    }
}

impl ServiceClient<FeeType> for FeeTypeClient {
    type Error = ConsoleError;

    fn inner(&self) -> &ResourceClient<FeeType> {
        &self.inner
    }

    fn map_error(e: BackendError) -> ConsoleError {
        e.into()
    }
}

#[async_trait]
impl ResourceService for FeeTypeClient {
    type Record = FeeType;
    type Form = FeeTypeForm;
    type Filter = FeeTypeFilter;

    async fn list(&self, filter: FeeTypeFilter) -> Result<Fetched<FeeType>, ConsoleError> {
        Ok(self.search(filter).await?.into())
    }

    async fn create(&self, form: FeeTypeForm) -> Result<(), ConsoleError> {
        let payload = FeeTypePayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.create_fee_type(payload).await.map(|_| ())
    }

    async fn update(&self, id: FeeTypeId, form: FeeTypeForm) -> Result<(), ConsoleError> {
        let payload = FeeTypePayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.update_fee_type(id, payload).await.map(|_| ())
    }

    async fn delete(&self, id: FeeTypeId) -> Result<(), ConsoleError> {
        <Self as ServiceClient<FeeType>>::delete(self, id).await
    }

    fn edit_form(&self, fee_type: &FeeType) -> FeeTypeForm {
        FeeTypeForm::from(fee_type)
    }

    fn labels(&self) -> ResourceLabels {
        ResourceLabels::new("fee type")
            .with_created("Added fee type")
            .with_updated("Updated fee type")
    }
}
