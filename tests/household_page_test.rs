//! Household page against a scripted backend.

use building_console::clients::HouseholdClient;
use building_console::model::{Household, HouseholdId, HouseholdStatus};
use console_framework::backend::BackendError;
use console_framework::mock::MockBackend;
use console_framework::{ConsoleError, CrudPage, NotificationLog, SubmitOutcome};
use std::sync::Arc;

fn household(id: u32, code: &str) -> Household {
    Household {
        id: HouseholdId(id),
        code: code.into(),
        owner_name: "Nguyen Van An".into(),
        apartment_number: format!("A-{id:03}"),
        floor: 1,
        area: 68.5,
        contact_phone: "0912345678".into(),
        contact_email: "an@example.com".into(),
        status: HouseholdStatus::Active,
    }
}

async fn mounted(backend: &MockBackend<Household>) -> (CrudPage<HouseholdClient>, NotificationLog) {
    let log = NotificationLog::new();
    let page = CrudPage::mount(
        Arc::new(HouseholdClient::new(backend.client())),
        Arc::new(log.clone()),
    );
    page.loader().settled().await;
    (page, log)
}

#[tokio::test]
async fn test_failed_load_leaves_empty_table_with_error() {
    let backend = MockBackend::<Household>::new();
    backend.expect_list().return_err(BackendError::Closed);

    let (page, _log) = mounted(&backend).await;

    let table = page.table();
    assert!(table.data.is_empty());
    assert!(!table.loading);
    assert!(matches!(table.error, Some(ConsoleError::Request(_))));
    backend.verify();
}

#[tokio::test]
async fn test_duplicate_code_is_refused_before_create() {
    let backend = MockBackend::<Household>::new();
    backend.expect_list().return_ok(vec![household(1, "HK001")]);
    // The uniqueness check lists households again.
    backend.expect_list().return_ok(vec![household(1, "HK001")]);

    let (page, log) = mounted(&backend).await;
    page.open_create();
    page.modal().update_fields(|form| {
        *form = (&household(0, "hk001")).into();
        form.id = None;
    });

    let outcome = page.submit().await;

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected field errors, got {outcome:?}");
    };
    assert_eq!(errors.messages_for("code"), vec!["Household code already exists"]);
    assert!(page.modal().is_open());
    assert!(log.entries().is_empty());
    backend.verify();
}

#[tokio::test]
async fn test_edit_keeps_own_code_and_reloads() {
    let original = household(1, "HK001");
    let mut renamed = original.clone();
    renamed.owner_name = "Tran Thi Binh".into();

    let backend = MockBackend::<Household>::new();
    backend.expect_list().return_ok(vec![original.clone()]);
    backend.expect_list().return_ok(vec![original.clone()]);
    backend.expect_update(HouseholdId(1)).return_ok(renamed.clone());
    backend.expect_list().return_ok(vec![renamed.clone()]);

    let (page, log) = mounted(&backend).await;
    page.edit_row(&original);
    assert_eq!(page.form().editing_id, Some(HouseholdId(1)));
    page.modal()
        .update_fields(|form| form.owner_name = "Tran Thi Binh".into());

    assert_eq!(page.submit().await, SubmitOutcome::Submitted);

    assert_eq!(page.rows(), vec![renamed]);
    assert_eq!(log.successes(), vec!["Updated successfully"]);
    assert!(!page.modal().is_open());
    backend.verify();
}

#[tokio::test]
async fn test_rejected_delete_keeps_rows() {
    let backend = MockBackend::<Household>::new();
    backend.expect_list().return_ok(vec![household(1, "HK001")]);
    backend
        .expect_delete(HouseholdId(1))
        .return_err(BackendError::Rejected("Household still has residents".into()));

    let (page, log) = mounted(&backend).await;
    let err = page.delete_row(HouseholdId(1)).await.unwrap_err();

    assert_eq!(err.user_message(), "Household still has residents");
    assert_eq!(log.errors(), vec!["Delete failed"]);
    assert_eq!(page.rows().len(), 1);
    backend.verify();
}
