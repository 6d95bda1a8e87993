use crate::model::{AbsenceFilter, AbsenceForm, AbsenceId, AbsencePayload, TemporaryAbsence};
use async_trait::async_trait;
use console_framework::backend::{BackendError, ResourceClient, ServiceClient};
use console_framework::{ConsoleError, Fetched, ResourceLabels, ResourceService};
use tracing::instrument;

#[derive(Clone)]
pub struct AbsenceClient {
    inner: ResourceClient<TemporaryAbsence>,
}

impl AbsenceClient {
    pub fn new(inner: ResourceClient<TemporaryAbsence>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn declare(&self, payload: AbsencePayload) -> Result<TemporaryAbsence, ConsoleError> {
        Ok(self.inner.create(payload).await?)
    }

    #[instrument(skip(self))]
    pub async fn amend(
        &self,
        id: AbsenceId,
        payload: AbsencePayload,
    ) -> Result<TemporaryAbsence, ConsoleError> {
        Ok(self.inner.update(id, payload).await?)
    }
}

impl ServiceClient<TemporaryAbsence> for AbsenceClient {
    type Error = ConsoleError;

    fn inner(&self) -> &ResourceClient<TemporaryAbsence> {
        &self.inner
    }

    fn map_error(e: BackendError) -> ConsoleError {
        e.into()
    }
}

#[async_trait]
impl ResourceService for AbsenceClient {
    type Record = TemporaryAbsence;
    type Form = AbsenceForm;
    type Filter = AbsenceFilter;

    async fn list(&self, filter: AbsenceFilter) -> Result<Fetched<TemporaryAbsence>, ConsoleError> {
        Ok(self.inner.list(filter).await?.into())
    }

    async fn create(&self, form: AbsenceForm) -> Result<(), ConsoleError> {
        let payload = AbsencePayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.declare(payload).await.map(|_| ())
    }

    async fn update(&self, id: AbsenceId, form: AbsenceForm) -> Result<(), ConsoleError> {
        let payload = AbsencePayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.amend(id, payload).await.map(|_| ())
    }

    async fn delete(&self, id: AbsenceId) -> Result<(), ConsoleError> {
        <Self as ServiceClient<TemporaryAbsence>>::delete(self, id).await
    }

    fn edit_form(&self, absence: &TemporaryAbsence) -> AbsenceForm {
        AbsenceForm::from(absence)
    }

    fn labels(&self) -> ResourceLabels {
        ResourceLabels::new("absence record")
    }
}
