//! End-to-end: real actors, real pages, signed-in sessions.

use building_console::config::ConsoleConfig;
use building_console::lifecycle::ConsoleSystem;
use building_console::model::{
    parse_date, AbsenceFilter, FeeTypeFilter, Gender, HouseholdForm, HouseholdPayload,
    HouseholdStatus, ResidenceFilter,
};
use console_framework::backend::ServiceClient;
use console_framework::{ConsoleError, Role, SubmitOutcome};

fn household_payload(code: &str) -> HouseholdPayload {
    HouseholdPayload {
        code: code.into(),
        owner_name: "Tran Thi Binh".into(),
        apartment_number: "B-204".into(),
        floor: 2,
        area: 54.0,
        contact_phone: "0987654321".into(),
        contact_email: String::new(),
        status: HouseholdStatus::Active,
    }
}

fn household_form(code: &str, apartment: &str) -> HouseholdForm {
    HouseholdForm {
        code: code.into(),
        owner_name: "Nguyen Van An".into(),
        apartment_number: apartment.into(),
        floor: Some(3),
        area: Some(75.0),
        contact_phone: "0912345678".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_admin_manages_households_residents_and_absences() {
    let system = ConsoleSystem::new(ConsoleConfig::default());
    system.session.login("admin", "admin123").await.unwrap();
    assert_eq!(system.menu().len(), 6);

    let households = system.households_page().unwrap();
    households.loader().settled().await;
    assert!(households.rows().is_empty());

    households.open_create();
    households.modal().set_field_values(household_form("HK001", "A-301"));
    assert_eq!(households.submit().await, SubmitOutcome::Submitted);
    let household = households.rows()[0].clone();

    let residents = system.residents_page().unwrap();
    residents.settled().await;
    assert_eq!(residents.household_options().len(), 1);

    residents.table.open_create();
    residents.table.modal().update_fields(|form| {
        form.full_name = "Nguyen Van An".into();
        form.citizen_id = "001090012345".into();
        form.birth_date = parse_date("1990-05-17");
        form.household_id = Some(household.id);
    });
    assert_eq!(residents.table.submit().await, SubmitOutcome::Submitted);
    let resident = residents.table.rows()[0].clone();
    assert_eq!(
        residents.household_label(&resident).as_deref(),
        Some("HK001 - Nguyen Van An")
    );

    // Editing flattens the nested household onto the form.
    residents.table.edit_row(&resident);
    assert_eq!(residents.table.form().field_values.household_id, Some(household.id));
    residents.table.modal().close_modal();

    let absences = system.absences_page().unwrap();
    absences.settled().await;
    absences.table.open_create();
    absences.table.modal().update_fields(|form| {
        form.resident_id = Some(resident.id);
        form.destination = "Da Nang".into();
        form.reason = "Work assignment".into();
        form.from = parse_date("2024-06-10");
        form.to = parse_date("2024-06-01");
    });
    let SubmitOutcome::Invalid(errors) = absences.table.submit().await else {
        panic!("inverted period must be refused");
    };
    assert_eq!(errors.fields(), vec!["to"]);

    absences
        .table
        .modal()
        .update_fields(|form| form.to = parse_date("2024-09-01"));
    assert_eq!(absences.table.submit().await, SubmitOutcome::Submitted);
    assert_eq!(
        absences.resident_label(&absences.table.rows()[0]).as_deref(),
        Some("Nguyen Van An (001090012345)")
    );

    let found = absences
        .table
        .search(AbsenceFilter::by_destination("hue"))
        .await
        .unwrap();
    assert!(found.is_empty());

    households.delete_row(household.id).await.unwrap();
    assert!(households.rows().is_empty());
    assert_eq!(
        system.notifications.successes(),
        vec![
            "Created successfully",
            "Created successfully",
            "Created successfully",
            "Deleted household"
        ]
    );

    households.unmount();
    residents.unmount();
    absences.unmount();
    drop((households, residents, absences));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_fee_search_survives_reload_after_create() {
    let system = ConsoleSystem::new(ConsoleConfig::default());
    system.session.login("accountant", "accountant123").await.unwrap();

    let fees = system.fee_types_page().unwrap();
    fees.loader().settled().await;

    for (name, price) in [("Service fee", "7000"), ("Parking", "120000")] {
        fees.open_create();
        fees.modal().update_fields(|form| {
            form.name = name.into();
            form.unit_price = price.into();
            form.unit = "month".into();
        });
        assert_eq!(fees.submit().await, SubmitOutcome::Submitted);
    }

    fees.search(FeeTypeFilter::by_name("park")).await.unwrap();
    fees.open_create();
    fees.modal().update_fields(|form| {
        form.name = "Parking (motorbike)".into();
        form.unit_price = "70000".into();
    });
    assert_eq!(fees.submit().await, SubmitOutcome::Submitted);

    let names: Vec<_> = fees.rows().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Parking", "Parking (motorbike)"]);
    assert_eq!(system.notifications.successes().last().map(String::as_str), Some("Added fee type"));

    fees.unmount();
    drop(fees);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_pages_follow_role() {
    let system = ConsoleSystem::new(ConsoleConfig::default());

    assert!(matches!(system.households_page(), Err(ConsoleError::Unauthorized)));
    assert!(system.menu().is_empty());

    system.session.login("accountant", "accountant123").await.unwrap();
    assert!(matches!(system.households_page(), Err(ConsoleError::Forbidden(_))));
    assert!(system.fee_types_page().is_ok());

    system.session.login("resident", "resident123").await.unwrap();
    assert_eq!(system.session.role(), Some(Role::Resident));
    assert!(system.fee_types_page().is_err());
    assert!(system.menu().is_empty());
    assert!(matches!(system.dashboard().await, Err(ConsoleError::Forbidden(_))));

    let err = system.session.login("resident", "wrong").await.unwrap_err();
    assert!(err.to_string().contains("Invalid username or password"));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_session_survives_restart_until_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConsoleConfig {
        session_file: Some(dir.path().join("session.json")),
        ..Default::default()
    };

    let first = ConsoleSystem::new(config.clone());
    let session = first.session.login("admin", "admin123").await.unwrap();
    first.shutdown().await.unwrap();

    let second = ConsoleSystem::new(config.clone());
    assert_eq!(second.session.token(), Some(session.token));
    assert!(second.session.is_admin());

    let result: Result<(), ConsoleError> = second.session.intercept(Err(ConsoleError::Unauthorized));
    assert!(result.is_err());
    assert!(!second.session.is_authenticated());
    second.shutdown().await.unwrap();

    let third = ConsoleSystem::new(config);
    assert!(!third.session.is_authenticated());
    third.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_household_code_is_unique_in_the_store() {
    let system = ConsoleSystem::new(ConsoleConfig::default());
    let households = &system.household_client;

    households.create_household(household_payload("HK001")).await.unwrap();
    let err = households
        .create_household(household_payload("HK001"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Household code HK001 already exists");

    let other = households.create_household(household_payload("HK002")).await.unwrap();
    assert!(households
        .update_household(other.id, household_payload("hk001"))
        .await
        .is_err());
    assert_eq!(households.list_page().await.unwrap().total_elements, 2);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_open_page_stops_working_after_logout() {
    let system = ConsoleSystem::new(ConsoleConfig::default());
    system.session.login("admin", "admin123").await.unwrap();
    let created = system
        .household_client
        .create_household(household_payload("HK001"))
        .await
        .unwrap();

    let households = system.households_page().unwrap();
    households.loader().settled().await;
    assert_eq!(households.rows().len(), 1);

    system.session.logout();

    assert_eq!(
        households.delete_row(created.id).await,
        Err(ConsoleError::Unauthorized)
    );
    households.edit_row(&created);
    households.modal().update_fields(|form| form.owner_name = "Someone else".into());
    assert_eq!(
        households.submit().await,
        SubmitOutcome::Failed(ConsoleError::Unauthorized)
    );
    assert_eq!(households.refresh().await, Err(ConsoleError::Unauthorized));

    let stored = system.household_client.get(created.id).await.unwrap().unwrap();
    assert_eq!(stored.owner_name, "Tran Thi Binh");

    // A different role is refused rather than signed out.
    system.session.login("accountant", "accountant123").await.unwrap();
    assert_eq!(
        households.delete_row(created.id).await,
        Err(ConsoleError::Forbidden("/households".into()))
    );
    assert!(system.session.is_authenticated());

    households.unmount();
    drop(households);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_admin_registers_temporary_residence() {
    let system = ConsoleSystem::new(ConsoleConfig::default());
    system.session.login("admin", "admin123").await.unwrap();
    let household = system
        .household_client
        .create_household(household_payload("HK007"))
        .await
        .unwrap();

    let residences = system.temporary_residence_page().unwrap();
    residences.settled().await;
    assert_eq!(residences.household_options().len(), 1);

    residences.table.open_create();
    residences.table.modal().update_fields(|form| {
        form.household_id = Some(household.id);
        form.full_name = "Le Van Cuong".into();
        form.citizen_id = "038099001122".into();
        form.birth_date = parse_date("1999-02-03");
        form.gender = Gender::Male;
        form.permanent_address = "12 Tran Phu, Nam Dinh".into();
        form.from = parse_date("2024-09-01");
        form.to = parse_date("2024-08-01");
        form.reason = "Studying".into();
    });
    let SubmitOutcome::Invalid(errors) = residences.table.submit().await else {
        panic!("end date before start must be refused");
    };
    assert_eq!(errors.fields(), vec!["to"]);

    residences
        .table
        .modal()
        .update_fields(|form| form.to = parse_date("2025-06-30"));
    assert_eq!(residences.table.submit().await, SubmitOutcome::Submitted);

    let row = residences.table.rows()[0].clone();
    assert_eq!(
        residences.household_label(&row).as_deref(),
        Some("HK007 - Tran Thi Binh")
    );
    assert!(residences
        .table
        .search(ResidenceFilter::by_name("nguyen"))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        residences
            .table
            .search(ResidenceFilter::by_name("cuong"))
            .await
            .unwrap()
            .len(),
        1
    );

    let summary = system.dashboard().await.unwrap();
    assert_eq!(summary.households, 1);
    assert_eq!(summary.temporary_residences, 1);
    assert_eq!(summary.residents, 0);

    residences.table.delete_row(row.id).await.unwrap();
    assert!(residences.table.rows().is_empty());
    assert_eq!(
        system.notifications.successes(),
        vec!["Registered temporary residence", "Deleted temporary residence"]
    );

    residences.unmount();
    drop(residences);
    system.shutdown().await.unwrap();
}
