use chrono::NaiveDate;
use oss_portal::portal::bundles::{
    self, BundleError, PurchaseAction, PurchaseState, PurchaseStatus,
};
use oss_portal::portal::FixtureStore;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date")
}

fn seeded() -> FixtureStore {
    FixtureStore::seeded().expect("bundled fixtures load")
}

fn paid_startup_bundle(store: &mut FixtureStore) -> String {
    let purchase = bundles::purchase_bundle(store, "BUNDLE-001", "BBID-2001", today())
        .expect("start-up bundle is in the catalogue");
    assert_eq!(purchase.status(), PurchaseStatus::PendingPayment);
    bundles::process_bundle_payment(store, &purchase.id, today()).expect("payment accepted");
    purchase.id
}

#[test]
fn two_completed_services_leave_the_purchase_in_progress() {
    let mut store = seeded();
    let purchase_id = paid_startup_bundle(&mut store);

    bundles::complete_service(&mut store, &purchase_id, "SRV-001", today())
        .expect("first service completes");
    let purchase = bundles::complete_service(&mut store, &purchase_id, "SRV-002", today())
        .expect("second service completes");

    assert_eq!(purchase.status(), PurchaseStatus::InProgress);
    assert_eq!(purchase.services_completed, vec!["SRV-001", "SRV-002"]);
    assert_eq!(purchase.current_service(), Some("SRV-003"));
    assert_eq!(purchase.actual_completion_date(), None);

    let progress = bundles::bundle_progress(&store, &purchase_id).expect("progress available");
    assert_eq!(progress.status, PurchaseStatus::InProgress);
    assert_eq!(progress.completed_services.len(), 2);
    assert_eq!(progress.remaining_services, vec!["SRV-003", "SRV-004"]);
    assert_eq!(progress.percent_complete, 50);
}

#[test]
fn completing_every_service_sets_a_completion_date() {
    let mut store = seeded();
    let purchase_id = paid_startup_bundle(&mut store);

    for service in ["SRV-001", "SRV-002", "SRV-003", "SRV-004"] {
        bundles::complete_service(&mut store, &purchase_id, service, today())
            .expect("service completes");
    }

    let purchase = bundles::purchase_by_id(&store.purchases, &purchase_id).expect("stored");
    assert_eq!(purchase.status(), PurchaseStatus::Completed);
    assert_eq!(purchase.actual_completion_date(), Some(today()));
    assert_eq!(
        purchase.state,
        PurchaseState::Completed {
            completed_on: today()
        }
    );
    assert_eq!(
        bundles::bundle_progress(&store, &purchase_id)
            .expect("progress available")
            .percent_complete,
        100
    );
}

#[test]
fn out_of_order_completion_keeps_the_first_open_service_current() {
    let mut store = seeded();
    let purchase_id = paid_startup_bundle(&mut store);

    let purchase = bundles::complete_service(&mut store, &purchase_id, "SRV-003", today())
        .expect("later service may finish first");
    assert_eq!(purchase.current_service(), Some("SRV-001"));

    let purchase = bundles::complete_service(&mut store, &purchase_id, "SRV-001", today())
        .expect("first service completes");
    assert_eq!(purchase.current_service(), Some("SRV-002"));
}

#[test]
fn rejected_transitions_leave_the_purchase_untouched() {
    let mut store = seeded();
    let purchase_id = paid_startup_bundle(&mut store);
    bundles::complete_service(&mut store, &purchase_id, "SRV-001", today())
        .expect("service completes");
    let before = bundles::purchase_by_id(&store.purchases, &purchase_id)
        .cloned()
        .expect("stored");

    assert_eq!(
        bundles::process_bundle_payment(&mut store, &purchase_id, today()),
        Err(BundleError::InvalidTransition {
            purchase_id: purchase_id.clone(),
            from: PurchaseStatus::InProgress,
            action: PurchaseAction::Pay,
        })
    );
    assert_eq!(
        bundles::complete_service(&mut store, &purchase_id, "SRV-001", today()),
        Err(BundleError::ServiceAlreadyCompleted {
            purchase_id: purchase_id.clone(),
            service_id: "SRV-001".to_string(),
        })
    );
    assert!(matches!(
        bundles::complete_service(&mut store, &purchase_id, "SRV-005", today()),
        Err(BundleError::UnknownService { .. })
    ));

    let after = bundles::purchase_by_id(&store.purchases, &purchase_id).expect("stored");
    assert_eq!(&before, after);
}

#[test]
fn unknown_bundle_records_nothing() {
    let mut store = seeded();
    let before = store.purchases.len();

    assert_eq!(
        bundles::purchase_bundle(&mut store, "BUNDLE-404", "BBID-2001", today()),
        Err(BundleError::UnknownBundle("BUNDLE-404".to_string()))
    );
    assert_eq!(store.purchases.len(), before);

    let purchase = bundles::purchase_bundle(&mut store, "BUNDLE-002", "BBID-2001", today())
        .expect("known bundle");
    assert_eq!(purchase.id, "PUR-0004");
    assert_eq!(
        bundles::purchases_for_bbid(&store.purchases, "BBID-2001"),
        vec![&purchase]
    );
}

#[test]
fn cancelled_purchases_are_absorbing_and_leave_revenue() {
    let mut store = seeded();
    let revenue_before = bundles::marketplace_stats(&store).revenue_bdt;

    let cancelled = bundles::cancel_purchase(
        &mut store,
        "PUR-0002",
        today(),
        Some("site relocated".to_string()),
    )
    .expect("in-progress purchase can be cancelled");
    assert_eq!(cancelled.status(), PurchaseStatus::Cancelled);

    for result in [
        bundles::process_bundle_payment(&mut store, "PUR-0002", today()),
        bundles::complete_service(&mut store, "PUR-0002", "SRV-006", today()),
        bundles::cancel_purchase(&mut store, "PUR-0002", today(), None),
    ] {
        assert!(matches!(result, Err(BundleError::InvalidTransition { .. })));
    }

    let stats = bundles::marketplace_stats(&store);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.revenue_bdt, revenue_before - 100_000);
}

#[test]
fn sector_catalogue_puts_targeted_bundles_first() {
    use oss_portal::portal::applications::Sector;

    let store = seeded();
    let ids: Vec<&str> = bundles::bundles_for_sector(&store.bundles, Sector::Manufacturing)
        .into_iter()
        .map(|bundle| bundle.id.as_str())
        .collect();
    assert_eq!(ids, vec!["BUNDLE-002", "BUNDLE-001"]);
}
