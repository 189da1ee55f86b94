//! Bundle marketplace: catalogue lookups and the purchase lifecycle.
//!
//! Purchases move `pending_payment -> in_progress -> completed`, with `cancelled` reachable
//! from either non-terminal state. Every transition is guarded; a rejected call returns an
//! error and leaves the purchase untouched.

pub(crate) mod catalogue;
pub mod domain;
mod marketplace;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::applications::Sector;
use super::store::FixtureStore;

pub use domain::{
    Bundle, BundlePurchase, BundleService, PurchaseAction, PurchaseState, PurchaseStatus,
};
pub use marketplace::{
    bundle_progress, bundle_savings, marketplace_stats, BundlePopularity, BundleProgress,
    BundleSavings, MarketplaceStats,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BundleError {
    #[error("bundle {0} not found")]
    UnknownBundle(String),
    #[error("purchase {0} not found")]
    UnknownPurchase(String),
    #[error("service {service_id} is not part of purchase {purchase_id}")]
    UnknownService {
        purchase_id: String,
        service_id: String,
    },
    #[error("service {service_id} on purchase {purchase_id} is already completed")]
    ServiceAlreadyCompleted {
        purchase_id: String,
        service_id: String,
    },
    #[error("cannot {} purchase {purchase_id} while it is {}", .action.label(), .from.label())]
    InvalidTransition {
        purchase_id: String,
        from: PurchaseStatus,
        action: PurchaseAction,
    },
}

pub fn bundle_by_id<'a>(bundles: &'a [Bundle], id: &str) -> Option<&'a Bundle> {
    bundles.iter().find(|bundle| bundle.id == id)
}

/// Bundles aimed at `sector` followed by the sector-neutral ones, in catalogue order.
pub fn bundles_for_sector(bundles: &[Bundle], sector: Sector) -> Vec<&Bundle> {
    let targeted = bundles
        .iter()
        .filter(|bundle| bundle.sector == Some(sector));
    let general = bundles.iter().filter(|bundle| bundle.sector.is_none());
    targeted.chain(general).collect()
}

pub fn purchase_by_id<'a>(
    purchases: &'a [BundlePurchase],
    id: &str,
) -> Option<&'a BundlePurchase> {
    purchases.iter().find(|purchase| purchase.id == id)
}

pub fn purchases_for_bbid<'a>(
    purchases: &'a [BundlePurchase],
    bbid: &str,
) -> Vec<&'a BundlePurchase> {
    purchases
        .iter()
        .filter(|purchase| purchase.bbid == bbid)
        .collect()
}

/// Record a new purchase awaiting payment.
pub fn purchase_bundle(
    store: &mut FixtureStore,
    bundle_id: &str,
    bbid: &str,
    today: NaiveDate,
) -> Result<BundlePurchase, BundleError> {
    let bundle = bundle_by_id(&store.bundles, bundle_id)
        .ok_or_else(|| BundleError::UnknownBundle(bundle_id.to_string()))?;
    let amount_bdt = bundle.price_bdt;

    let purchase = BundlePurchase {
        id: store.next_purchase_id(),
        bundle_id: bundle_id.to_string(),
        bbid: bbid.to_string(),
        purchased_on: today,
        amount_bdt,
        paid_on: None,
        services_completed: Vec::new(),
        state: PurchaseState::PendingPayment,
    };

    info!(purchase = %purchase.id, bundle = bundle_id, bbid, "bundle purchased");
    store.purchases.push(purchase.clone());
    Ok(purchase)
}

fn split_purchase<'a>(
    store: &'a mut FixtureStore,
    purchase_id: &str,
) -> Result<(&'a mut BundlePurchase, &'a Bundle), BundleError> {
    let purchase = store
        .purchases
        .iter_mut()
        .find(|purchase| purchase.id == purchase_id)
        .ok_or_else(|| BundleError::UnknownPurchase(purchase_id.to_string()))?;
    let bundle = store
        .bundles
        .iter()
        .find(|bundle| bundle.id == purchase.bundle_id)
        .ok_or_else(|| BundleError::UnknownBundle(purchase.bundle_id.clone()))?;
    Ok((purchase, bundle))
}

fn reject(purchase: &BundlePurchase, action: PurchaseAction) -> BundleError {
    warn!(
        purchase = %purchase.id,
        status = purchase.status().label(),
        action = action.label(),
        "purchase transition rejected"
    );
    BundleError::InvalidTransition {
        purchase_id: purchase.id.clone(),
        from: purchase.status(),
        action,
    }
}

/// First catalogue service not yet completed.
fn next_open_service(purchase: &BundlePurchase, bundle: &Bundle) -> Option<String> {
    bundle
        .services
        .iter()
        .find(|service| !purchase.services_completed.contains(&service.id))
        .map(|service| service.id.clone())
}

/// `pending_payment -> in_progress`, starting at the first listed service.
pub fn process_bundle_payment(
    store: &mut FixtureStore,
    purchase_id: &str,
    today: NaiveDate,
) -> Result<BundlePurchase, BundleError> {
    let (purchase, bundle) = split_purchase(store, purchase_id)?;
    if purchase.state != PurchaseState::PendingPayment {
        return Err(reject(purchase, PurchaseAction::Pay));
    }

    purchase.paid_on = Some(today);
    purchase.state = match next_open_service(purchase, bundle) {
        Some(current_service) => PurchaseState::InProgress { current_service },
        None => PurchaseState::Completed { completed_on: today },
    };

    info!(purchase = purchase_id, status = purchase.status().label(), "payment processed");
    Ok(purchase.clone())
}

/// Mark one bundle service done. Services may finish in any order; the current pointer always
/// moves to the first listed service still open.
pub fn complete_service(
    store: &mut FixtureStore,
    purchase_id: &str,
    service_id: &str,
    today: NaiveDate,
) -> Result<BundlePurchase, BundleError> {
    let (purchase, bundle) = split_purchase(store, purchase_id)?;
    if purchase.status() != PurchaseStatus::InProgress {
        return Err(reject(purchase, PurchaseAction::CompleteService));
    }
    if bundle.service(service_id).is_none() {
        return Err(BundleError::UnknownService {
            purchase_id: purchase_id.to_string(),
            service_id: service_id.to_string(),
        });
    }
    if purchase.services_completed.iter().any(|done| done == service_id) {
        return Err(BundleError::ServiceAlreadyCompleted {
            purchase_id: purchase_id.to_string(),
            service_id: service_id.to_string(),
        });
    }

    purchase.services_completed.push(service_id.to_string());
    purchase.state = match next_open_service(purchase, bundle) {
        Some(current_service) => PurchaseState::InProgress { current_service },
        None => PurchaseState::Completed { completed_on: today },
    };

    info!(
        purchase = purchase_id,
        service = service_id,
        status = purchase.status().label(),
        "bundle service completed"
    );
    Ok(purchase.clone())
}

/// Cancel a purchase that has not finished. `cancelled` is absorbing.
pub fn cancel_purchase(
    store: &mut FixtureStore,
    purchase_id: &str,
    today: NaiveDate,
    reason: Option<String>,
) -> Result<BundlePurchase, BundleError> {
    let (purchase, _) = split_purchase(store, purchase_id)?;
    if purchase.status().is_terminal() {
        return Err(reject(purchase, PurchaseAction::Cancel));
    }

    purchase.state = PurchaseState::Cancelled {
        cancelled_on: today,
        reason,
    };
    info!(purchase = purchase_id, "purchase cancelled");
    Ok(purchase.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::applications::seed::day;

    fn store() -> FixtureStore {
        let mut store = FixtureStore::empty();
        store.bundles = catalogue::bundles();
        store
    }

    fn today() -> NaiveDate {
        day(2024, 7, 1)
    }

    fn paid_purchase(store: &mut FixtureStore) -> String {
        let purchase = purchase_bundle(store, "BUNDLE-001", "BBID-2001", today())
            .expect("catalogue bundle can be purchased");
        process_bundle_payment(store, &purchase.id, today()).expect("payment accepted");
        purchase.id
    }

    #[test]
    fn purchase_ids_follow_store_sequence() {
        let mut store = store();
        let first = purchase_bundle(&mut store, "BUNDLE-001", "BBID-2001", today()).unwrap();
        let second = purchase_bundle(&mut store, "BUNDLE-002", "BBID-2001", today()).unwrap();
        assert_eq!(first.id, "PUR-0001");
        assert_eq!(second.id, "PUR-0002");
        assert_eq!(first.status(), PurchaseStatus::PendingPayment);
        assert_eq!(second.amount_bdt, 100_000);
    }

    #[test]
    fn unknown_bundle_records_nothing() {
        let mut store = store();
        let err = purchase_bundle(&mut store, "BUNDLE-404", "BBID-2001", today()).unwrap_err();
        assert_eq!(err, BundleError::UnknownBundle("BUNDLE-404".to_string()));
        assert!(store.purchases.is_empty());
    }

    #[test]
    fn payment_points_at_first_listed_service() {
        let mut store = store();
        let id = paid_purchase(&mut store);
        let purchase = purchase_by_id(&store.purchases, &id).unwrap();
        assert_eq!(purchase.current_service(), Some("SRV-001"));
        assert_eq!(purchase.paid_on, Some(today()));
    }

    #[test]
    fn paying_twice_is_rejected() {
        let mut store = store();
        let id = paid_purchase(&mut store);
        let err = process_bundle_payment(&mut store, &id, today()).unwrap_err();
        assert_eq!(
            err,
            BundleError::InvalidTransition {
                purchase_id: id,
                from: PurchaseStatus::InProgress,
                action: PurchaseAction::Pay,
            }
        );
    }

    #[test]
    fn out_of_order_completion_recomputes_current_service() {
        let mut store = store();
        let id = paid_purchase(&mut store);

        let purchase = complete_service(&mut store, &id, "SRV-003", today()).unwrap();
        assert_eq!(purchase.current_service(), Some("SRV-001"));

        let purchase = complete_service(&mut store, &id, "SRV-001", today()).unwrap();
        assert_eq!(purchase.current_service(), Some("SRV-002"));
        assert_eq!(purchase.services_completed, vec!["SRV-003", "SRV-001"]);
    }

    #[test]
    fn duplicate_and_foreign_services_are_rejected() {
        let mut store = store();
        let id = paid_purchase(&mut store);
        complete_service(&mut store, &id, "SRV-001", today()).unwrap();

        assert!(matches!(
            complete_service(&mut store, &id, "SRV-001", today()),
            Err(BundleError::ServiceAlreadyCompleted { .. })
        ));
        assert!(matches!(
            complete_service(&mut store, &id, "SRV-007", today()),
            Err(BundleError::UnknownService { .. })
        ));
        let purchase = purchase_by_id(&store.purchases, &id).unwrap();
        assert_eq!(purchase.services_completed.len(), 1);
    }

    #[test]
    fn services_cannot_complete_before_payment() {
        let mut store = store();
        let purchase = purchase_bundle(&mut store, "BUNDLE-001", "BBID-2001", today()).unwrap();
        assert!(matches!(
            complete_service(&mut store, &purchase.id, "SRV-001", today()),
            Err(BundleError::InvalidTransition {
                from: PurchaseStatus::PendingPayment,
                action: PurchaseAction::CompleteService,
                ..
            })
        ));
    }

    #[test]
    fn cancellation_is_absorbing() {
        let mut store = store();
        let id = paid_purchase(&mut store);
        let cancelled =
            cancel_purchase(&mut store, &id, today(), Some("investor withdrew".into())).unwrap();
        assert_eq!(cancelled.status(), PurchaseStatus::Cancelled);
        assert!(cancelled.current_service().is_none());

        assert!(cancel_purchase(&mut store, &id, today(), None).is_err());
        assert!(process_bundle_payment(&mut store, &id, today()).is_err());
        assert!(complete_service(&mut store, &id, "SRV-002", today()).is_err());
    }

    #[test]
    fn completed_purchases_cannot_be_cancelled() {
        let mut store = store();
        let id = paid_purchase(&mut store);
        for service in ["SRV-001", "SRV-002", "SRV-003", "SRV-004"] {
            complete_service(&mut store, &id, service, today()).unwrap();
        }
        let err = cancel_purchase(&mut store, &id, today(), None).unwrap_err();
        assert!(matches!(
            err,
            BundleError::InvalidTransition {
                from: PurchaseStatus::Completed,
                ..
            }
        ));
    }

    #[test]
    fn unknown_purchase_is_reported() {
        let mut store = store();
        assert_eq!(
            process_bundle_payment(&mut store, "PUR-9999", today()).unwrap_err(),
            BundleError::UnknownPurchase("PUR-9999".to_string())
        );
    }

    #[test]
    fn sector_listing_puts_targeted_bundles_first() {
        let bundles = catalogue::bundles();
        let ids: Vec<&str> = bundles_for_sector(&bundles, Sector::Textiles)
            .into_iter()
            .map(|bundle| bundle.id.as_str())
            .collect();
        assert_eq!(ids, vec!["BUNDLE-003", "BUNDLE-001"]);
    }
}
