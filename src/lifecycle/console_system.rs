use crate::actors;
use crate::clients::{
    AbsenceClient, FeeTypeClient, HouseholdClient, ResidenceClient, ResidentClient,
};
use crate::config::ConsoleConfig;
use crate::lifecycle::AccountDirectory;
use crate::model::{AbsenceFilter, ResidenceFilter, TemporaryAbsence};
use crate::pages::{
    AbsencesPage, DashboardSummary, FeeTypesPage, HouseholdsPage, ResidencesPage, ResidentsPage,
};
use console_framework::backend::ServiceClient;
use console_framework::navigation::{visible_menu, MenuItem};
use console_framework::session::{FileSessionStore, MemorySessionStore, SessionStore};
use console_framework::{
    ConsoleError, CrudPage, Guarded, NotificationLog, Notifier, SessionContext, TracingNotifier,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("Actor task failed: {0}")]
    ActorFailed(#[from] tokio::task::JoinError),
}

/// The running console: backend actors, their clients and the session.
///
/// # Example
///
/// ```ignore
/// let system = ConsoleSystem::new(ConsoleConfig::from_env()?);
/// system.session.login("admin", "admin123").await?;
///
/// let households = system.households_page()?;
/// households.loader().settled().await;
///
/// drop(households);
/// system.shutdown().await?;
/// ```
///
/// Pages hold clones of the clients. Drop them before calling
/// [`shutdown`](Self::shutdown), which waits for every actor to stop.
pub struct ConsoleSystem {
    pub household_client: HouseholdClient,
    pub resident_client: ResidentClient,
    pub residence_client: ResidenceClient,
    pub fee_type_client: FeeTypeClient,
    pub absence_client: AbsenceClient,

    pub session: Arc<SessionContext>,

    /// Every notification pages have shown, for the renderer to drain.
    pub notifications: NotificationLog,

    config: ConsoleConfig,
    handles: Vec<JoinHandle<()>>,
}

impl ConsoleSystem {
    /// Spawns the backend actors and restores the saved session, if any.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_authenticator(config, AccountDirectory::seeded())
    }

    pub fn with_authenticator(config: ConsoleConfig, accounts: AccountDirectory) -> Self {
        let (household_actor, household_client) = actors::household::new();
        let (resident_actor, resident_client) = actors::resident::new();
        let (residence_actor, residence_client) = actors::residence::new();
        let (fee_type_actor, fee_type_client) = actors::fee_type::new();
        let (absence_actor, absence_client) = actors::absence::new();

        let household_client = household_client.with_page_size(config.page_size);
        let resident_client = resident_client.with_page_size(config.page_size);
        let residence_client = residence_client.with_page_size(config.page_size);

        // Residents and temporary residences check households; absences check residents.
        let handles = vec![
            tokio::spawn(household_actor.run(())),
            tokio::spawn(resident_actor.run(household_client.clone())),
            tokio::spawn(residence_actor.run(household_client.clone())),
            tokio::spawn(fee_type_actor.run(())),
            tokio::spawn(absence_actor.run(resident_client.clone())),
        ];

        let store: Arc<dyn SessionStore> = match &config.session_file {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(MemorySessionStore::new()),
        };
        let session = Arc::new(SessionContext::new(store, Arc::new(accounts)));
        session.restore();

        info!(api_base = %config.api_base, page_size = config.page_size, "Console started");

        Self {
            household_client,
            resident_client,
            residence_client,
            fee_type_client,
            absence_client,
            session,
            notifications: NotificationLog::new(),
            config,
            handles,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Sidebar entries for the signed-in user. Empty when signed out.
    pub fn menu(&self) -> Vec<MenuItem> {
        self.session.role().map(visible_menu).unwrap_or_default()
    }

    /// Record counts for the dashboard.
    pub async fn dashboard(&self) -> Result<DashboardSummary, ConsoleError> {
        self.session.authorize("/")?;
        let (households, residents, residences, absences) =
            self.session.intercept(tokio::try_join!(
                self.household_client.list_page(),
                self.resident_client.list_page(),
                self.residence_client.search(ResidenceFilter::default()),
                <AbsenceClient as ServiceClient<TemporaryAbsence>>::list(
                    &self.absence_client,
                    AbsenceFilter::default()
                ),
            ))?;
        let summary = DashboardSummary {
            households: households.total_elements,
            residents: residents.total_elements,
            temporary_residences: residences.total_elements,
            temporary_absences: absences.len(),
        };
        debug!(?summary, "Dashboard loaded");
        Ok(summary)
    }

    pub fn households_page(&self) -> Result<HouseholdsPage, ConsoleError> {
        let service = self.guard(self.household_client.clone(), "/households")?;
        Ok(CrudPage::mount(service, self.notifier()))
    }

    pub fn residents_page(&self) -> Result<ResidentsPage, ConsoleError> {
        let service = self.guard(self.resident_client.clone(), "/residents")?;
        Ok(ResidentsPage::mount(
            service,
            self.household_client.clone(),
            self.notifier(),
        ))
    }

    pub fn temporary_residence_page(&self) -> Result<ResidencesPage, ConsoleError> {
        let service = self.guard(self.residence_client.clone(), "/temporary-residence")?;
        Ok(ResidencesPage::mount(
            service,
            self.household_client.clone(),
            self.notifier(),
        ))
    }

    pub fn fee_types_page(&self) -> Result<FeeTypesPage, ConsoleError> {
        let service = self.guard(self.fee_type_client.clone(), "/fees")?;
        Ok(CrudPage::mount(service, self.notifier()))
    }

    pub fn absences_page(&self) -> Result<AbsencesPage, ConsoleError> {
        let service = self.guard(self.absence_client.clone(), "/temporary-absence")?;
        Ok(AbsencesPage::mount(
            service,
            self.resident_client.clone(),
            self.notifier(),
        ))
    }

    fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::new((self.notifications.clone(), TracingNotifier))
    }

    /// Checks the session may open `path` now, and wraps `client` so every later
    /// call checks again.
    fn guard<S>(&self, client: S, path: &'static str) -> Result<Arc<Guarded<S>>, ConsoleError> {
        self.session.authorize(path)?;
        Ok(Arc::new(Guarded::new(
            Arc::new(client),
            self.session.clone(),
            path,
        )))
    }

    /// Stops every actor and waits for them to finish.
    ///
    /// Dropping the clients closes the channels. An actor that other actors use
    /// as context stops once those have stopped too.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        info!("Shutting down console...");

        drop(self.household_client);
        drop(self.resident_client);
        drop(self.residence_client);
        drop(self.fee_type_client);
        drop(self.absence_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}
