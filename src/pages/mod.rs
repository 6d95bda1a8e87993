//! The management pages of the console.
//!
//! Every table runs through a [`Guarded`] service, so a page stops reaching the
//! backend as soon as the session that opened it ends. Households and fee types are
//! plain [`CrudPage`]s. Residents, temporary residences and temporary absences add a
//! second loader feeding the select box of their form (households, households and
//! residents respectively), fetched once on mount alongside the table.

use crate::clients::{
    AbsenceClient, FeeTypeClient, HouseholdClient, ResidenceClient, ResidentClient,
};
use crate::model::{
    HouseholdId, Resident, ResidentId, TemporaryAbsence, TemporaryResidence,
};
use console_framework::{
    from_fn, ConsoleError, CrudPage, Fetched, Guarded, LoaderConfig, Notifier, Record,
    ResourceLoader,
};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

pub type HouseholdsPage = CrudPage<Guarded<HouseholdClient>>;
pub type FeeTypesPage = CrudPage<Guarded<FeeTypeClient>>;

/// One entry of a form's select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<Id> {
    pub id: Id,
    pub label: String,
}

impl<Id> Record for SelectOption<Id>
where
    Id: Clone + Eq + Ord + Hash + Display + Debug + Send + Sync + 'static,
{
    type Id = Id;

    fn id(&self) -> Id {
        self.id.clone()
    }
}

fn label_of<Id: PartialEq>(options: &[SelectOption<Id>], id: &Id) -> Option<String> {
    options.iter().find(|o| &o.id == id).map(|o| o.label.clone())
}

/// Household select box of the page guarded by `page`.
fn household_select<S>(
    page: Arc<Guarded<S>>,
    households: HouseholdClient,
) -> ResourceLoader<SelectOption<HouseholdId>>
where
    S: Send + Sync + 'static,
{
    let options = from_fn(move |_: ()| {
        let page = page.clone();
        let households = households.clone();
        async move {
            let listed = page.run(|| households.list_page()).await?;
            let options: Vec<_> = listed
                .content
                .into_iter()
                .map(|h| SelectOption {
                    id: h.id,
                    label: format!("{} - {}", h.code, h.owner_name),
                })
                .collect();
            Ok::<_, ConsoleError>(Fetched::Many(options))
        }
    });
    ResourceLoader::with_source(options, LoaderConfig::default())
}

pub struct ResidentsPage {
    pub table: CrudPage<Guarded<ResidentClient>>,
    households: ResourceLoader<SelectOption<HouseholdId>>,
}

impl ResidentsPage {
    pub fn mount(
        residents: Arc<Guarded<ResidentClient>>,
        households: HouseholdClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            households: household_select(residents.clone(), households),
            table: CrudPage::mount(residents, notifier),
        }
    }

    pub fn household_options(&self) -> Vec<SelectOption<HouseholdId>> {
        self.households.data()
    }

    /// Household column of a resident row.
    pub fn household_label(&self, resident: &Resident) -> Option<String> {
        let household = resident.household?;
        label_of(&self.households.data(), &household.id)
    }

    pub async fn reload_households(&self) -> Result<Vec<SelectOption<HouseholdId>>, ConsoleError> {
        self.households.refetch(()).await
    }

    /// Waits until the table and the household options have loaded.
    pub async fn settled(&self) {
        self.table.loader().settled().await;
        self.households.settled().await;
    }

    pub fn unmount(&self) {
        self.table.unmount();
        self.households.close();
    }
}

pub struct ResidencesPage {
    pub table: CrudPage<Guarded<ResidenceClient>>,
    households: ResourceLoader<SelectOption<HouseholdId>>,
}

impl ResidencesPage {
    pub fn mount(
        residences: Arc<Guarded<ResidenceClient>>,
        households: HouseholdClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            households: household_select(residences.clone(), households),
            table: CrudPage::mount(residences, notifier),
        }
    }

    pub fn household_options(&self) -> Vec<SelectOption<HouseholdId>> {
        self.households.data()
    }

    pub fn household_label(&self, residence: &TemporaryResidence) -> Option<String> {
        label_of(&self.households.data(), &residence.household.id)
    }

    pub async fn settled(&self) {
        self.table.loader().settled().await;
        self.households.settled().await;
    }

    pub fn unmount(&self) {
        self.table.unmount();
        self.households.close();
    }
}

pub struct AbsencesPage {
    pub table: CrudPage<Guarded<AbsenceClient>>,
    residents: ResourceLoader<SelectOption<ResidentId>>,
}

impl AbsencesPage {
    pub fn mount(
        absences: Arc<Guarded<AbsenceClient>>,
        residents: ResidentClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let page = absences.clone();
        let options = from_fn(move |_: ()| {
            let page = page.clone();
            let residents = residents.clone();
            async move {
                let listed = page.run(|| residents.list_page()).await?;
                let options: Vec<_> = listed
                    .content
                    .into_iter()
                    .map(|r| SelectOption {
                        id: r.id,
                        label: format!("{} ({})", r.full_name, r.citizen_id),
                    })
                    .collect();
                Ok::<_, ConsoleError>(Fetched::Many(options))
            }
        });
        Self {
            table: CrudPage::mount(absences, notifier),
            residents: ResourceLoader::with_source(options, LoaderConfig::default()),
        }
    }

    pub fn resident_options(&self) -> Vec<SelectOption<ResidentId>> {
        self.residents.data()
    }

    pub fn resident_label(&self, absence: &TemporaryAbsence) -> Option<String> {
        label_of(&self.residents.data(), &absence.resident.id)
    }

    pub async fn settled(&self) {
        self.table.loader().settled().await;
        self.residents.settled().await;
    }

    pub fn unmount(&self) {
        self.table.unmount();
        self.residents.close();
    }
}

/// Record counts on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub households: usize,
    pub residents: usize,
    pub temporary_residences: usize,
    pub temporary_absences: usize,
}
