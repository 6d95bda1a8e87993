use super::{first_page, DEFAULT_PAGE_SIZE};
use crate::model::{Household, HouseholdForm, HouseholdId, HouseholdPayload};
use async_trait::async_trait;
use console_framework::backend::{BackendError, ResourceClient, ServiceClient};
use console_framework::{
    ConsoleError, Fetched, FieldRules, Page, ResourceLabels, ResourceService,
    ValidationErrors, Validator,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct HouseholdClient {
    inner: ResourceClient<Household>,
    page_size: usize,
}

impl HouseholdClient {
    pub fn new(inner: ResourceClient<Household>) -> Self {
        Self {
            inner,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// First page of households, in creation order.
    #[instrument(skip(self))]
    pub async fn list_page(&self) -> Result<Page<Household>, ConsoleError> {
        let households = self.inner.list(()).await?;
        debug!(count = households.len(), "Households listed");
        Ok(first_page(households, self.page_size))
    }

    #[instrument(skip(self))]
    pub async fn create_household(&self, payload: HouseholdPayload) -> Result<Household, ConsoleError> {
        Ok(self.inner.create(payload).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_household(
        &self,
        id: HouseholdId,
        payload: HouseholdPayload,
    ) -> Result<Household, ConsoleError> {
        Ok(self.inner.update(id, payload).await?)
    }

    /// Whether another household already uses `code`. `except` is the household
    /// being edited.
    pub async fn code_taken(&self, code: &str, except: Option<HouseholdId>) -> Result<bool, ConsoleError> {
        let code = code.trim();
        let households = self.inner.list(()).await?;
        Ok(households
            .iter()
            .any(|h| Some(h.id) != except && h.code.eq_ignore_ascii_case(code)))
    }
}

impl ServiceClient<Household> for HouseholdClient {
    type Error = ConsoleError;

    fn inner(&self) -> &ResourceClient<Household> {
        &self.inner
    }

    fn map_error(e: BackendError) -> ConsoleError {
        e.into()
    }
}

/// Refuses a household code another household already has.
struct UniqueHouseholdCode {
    households: HouseholdClient,
}

#[async_trait]
impl Validator<HouseholdForm> for UniqueHouseholdCode {
    async fn validate(&self, values: &HouseholdForm) -> Result<(), ValidationErrors> {
        match self.households.code_taken(&values.code, values.id).await {
            Ok(taken) => FieldRules::new()
                .check("code", !taken, "Household code already exists")
                .finish(),
            Err(e) => {
                // The store refuses a duplicate code on submit.
                warn!(error = %e, "Household code check failed");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ResourceService for HouseholdClient {
    type Record = Household;
    type Form = HouseholdForm;
    type Filter = ();

    async fn list(&self, _filter: ()) -> Result<Fetched<Household>, ConsoleError> {
        Ok(self.list_page().await?.into())
    }

    async fn create(&self, form: HouseholdForm) -> Result<(), ConsoleError> {
        let payload = HouseholdPayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.create_household(payload).await.map(|_| ())
    }

    async fn update(&self, id: HouseholdId, form: HouseholdForm) -> Result<(), ConsoleError> {
        let payload = HouseholdPayload::try_from(form).map_err(ConsoleError::Validation)?;
        self.update_household(id, payload).await.map(|_| ())
    }

    async fn delete(&self, id: HouseholdId) -> Result<(), ConsoleError> {
        <Self as ServiceClient<Household>>::delete(self, id).await
    }

    fn edit_form(&self, household: &Household) -> HouseholdForm {
        HouseholdForm::from(household)
    }

    fn labels(&self) -> ResourceLabels {
        ResourceLabels::new("household")
    }

    fn form_validator(&self) -> Option<Arc<dyn Validator<HouseholdForm>>> {
        Some(Arc::new(UniqueHouseholdCode {
            households: self.clone(),
        }))
    }
}
