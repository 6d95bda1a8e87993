use building_console::config::ConsoleConfig;
use building_console::lifecycle::ConsoleSystem;
use building_console::model::{parse_date, FeeTypeFilter, HouseholdStatus};
use console_framework::{setup_tracing, SubmitOutcome};
use std::error::Error;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ConsoleConfig::from_env()?;
    setup_tracing(&config.log_filter);

    info!("Starting building console");
    let system = ConsoleSystem::new(config);

    if !system.session.is_admin() {
        system.session.login("admin", "admin123").await?;
    }
    let menu: Vec<_> = system.menu().iter().map(|item| item.label).collect();
    info!(?menu, "Menu");

    let households = system.households_page()?;
    households.loader().settled().await;

    async {
        for (code, owner, apartment) in [
            ("HK001", "Nguyen Van An", "A-101"),
            ("HK002", "Tran Thi Binh", "A-102"),
        ] {
            households.open_create();
            households.modal().update_fields(|form| {
                form.code = code.to_string();
                form.owner_name = owner.to_string();
                form.apartment_number = apartment.to_string();
                form.floor = Some(1);
                form.area = Some(68.5);
                form.contact_phone = "0912345678".to_string();
                form.status = HouseholdStatus::Active;
            });
            let outcome = households.submit().await;
            info!(code, success = outcome.is_success(), "Household submitted");
        }

        // Same code again: the form check refuses it before it reaches the store.
        households.open_create();
        households.modal().update_fields(|form| {
            form.code = "hk001".to_string();
            form.owner_name = "Le Van Cuong".to_string();
            form.apartment_number = "B-201".to_string();
            form.floor = Some(2);
            form.area = Some(70.0);
            form.contact_phone = "0987654321".to_string();
        });
        if let SubmitOutcome::Invalid(errors) = households.submit().await {
            warn!(%errors, "Household refused");
        }
        households.modal().close_modal();
    }
    .instrument(tracing::info_span!("households"))
    .await;

    let residents = system.residents_page()?;
    residents.settled().await;

    async {
        let Some(household) = residents.household_options().first().cloned() else {
            warn!("No household to register residents in");
            return;
        };
        residents.table.open_create();
        residents.table.modal().update_fields(|form| {
            form.full_name = "Nguyen Van An".to_string();
            form.citizen_id = "001090012345".to_string();
            form.birth_date = parse_date("1990-05-17");
            form.household_id = Some(household.id);
        });
        let outcome = residents.table.submit().await;
        info!(household = %household.label, success = outcome.is_success(), "Resident submitted");
        for resident in residents.table.rows() {
            info!(
                name = %resident.full_name,
                household = residents.household_label(&resident).as_deref().unwrap_or("-"),
                "Resident"
            );
        }
    }
    .instrument(tracing::info_span!("residents"))
    .await;

    let residences = system.temporary_residence_page()?;
    residences.settled().await;

    async {
        let Some(household) = residences.household_options().last().cloned() else {
            warn!("No household to register a guest in");
            return;
        };
        residences.table.open_create();
        residences.table.modal().update_fields(|form| {
            form.household_id = Some(household.id);
            form.full_name = "Pham Minh Duc".to_string();
            form.citizen_id = "036201004455".to_string();
            form.birth_date = parse_date("2001-11-20");
            form.permanent_address = "45 Le Loi, Thai Binh".to_string();
            form.from = parse_date("2024-09-01");
            form.to = parse_date("2025-06-30");
            form.reason = "University".to_string();
        });
        let outcome = residences.table.submit().await;
        info!(household = %household.label, success = outcome.is_success(), "Temporary residence submitted");
    }
    .instrument(tracing::info_span!("temporary_residence"))
    .await;

    match system.dashboard().await {
        Ok(summary) => info!(?summary, "Dashboard"),
        Err(e) => warn!(error = %e, "Dashboard unavailable"),
    }

    let fees = system.fee_types_page()?;
    fees.loader().settled().await;

    async {
        for (name, price, unit) in [("Service fee", "7000", "m2"), ("Parking", "120000", "vehicle")] {
            fees.open_create();
            fees.modal().update_fields(|form| {
                form.name = name.to_string();
                form.unit_price = price.to_string();
                form.unit = unit.to_string();
            });
            let outcome = fees.submit().await;
            info!(name, success = outcome.is_success(), "Fee type submitted");
        }
        match fees.search(FeeTypeFilter::by_name("park")).await {
            Ok(rows) => info!(found = rows.len(), "Fee search"),
            Err(e) => warn!(error = %e, "Fee search failed"),
        }
    }
    .instrument(tracing::info_span!("fees"))
    .await;

    if let Some(last) = households.rows().last() {
        let _ = households.delete_row(last.id).await;
    }

    for notification in system.notifications.drain() {
        info!(%notification, "Shown");
    }

    households.unmount();
    residents.unmount();
    residences.unmount();
    fees.unmount();
    drop((households, residents, residences, fees));

    system.session.logout();
    system.shutdown().await?;

    info!("Console stopped");
    Ok(())
}
