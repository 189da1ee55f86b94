use serde::Serialize;

use super::domain::{Bundle, PurchaseStatus};
use super::{bundle_by_id, purchase_by_id};
use crate::portal::metrics::{percentage, rank_by};
use crate::portal::store::FixtureStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleProgress {
    pub purchase_id: String,
    pub bundle_id: String,
    pub status: PurchaseStatus,
    pub completed_services: Vec<String>,
    pub remaining_services: Vec<String>,
    pub current_service: Option<String>,
    pub percent_complete: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BundleSavings {
    pub standalone_total_bdt: u64,
    pub bundle_price_bdt: u64,
    pub savings_bdt: u64,
    pub savings_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundlePopularity {
    pub bundle_id: String,
    pub name: String,
    pub purchases: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketplaceStats {
    pub purchases: usize,
    pub active: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub revenue_bdt: u64,
    pub popular: Vec<BundlePopularity>,
}

pub fn bundle_savings(bundle: &Bundle) -> BundleSavings {
    let standalone_total_bdt = bundle.standalone_total_bdt();
    let savings_bdt = standalone_total_bdt.saturating_sub(bundle.price_bdt);

    BundleSavings {
        standalone_total_bdt,
        bundle_price_bdt: bundle.price_bdt,
        savings_bdt,
        savings_pct: percentage(savings_bdt as usize, standalone_total_bdt as usize),
    }
}

/// Progress view for a purchase; `None` when the purchase or its bundle is unknown.
pub fn bundle_progress(store: &FixtureStore, purchase_id: &str) -> Option<BundleProgress> {
    let purchase = purchase_by_id(&store.purchases, purchase_id)?;
    let bundle = bundle_by_id(&store.bundles, &purchase.bundle_id)?;

    let remaining_services: Vec<String> = bundle
        .services
        .iter()
        .filter(|service| !purchase.services_completed.contains(&service.id))
        .map(|service| service.id.clone())
        .collect();

    Some(BundleProgress {
        purchase_id: purchase.id.clone(),
        bundle_id: bundle.id.clone(),
        status: purchase.status(),
        completed_services: purchase.services_completed.clone(),
        remaining_services,
        current_service: purchase.current_service().map(str::to_string),
        percent_complete: percentage(purchase.services_completed.len(), bundle.services.len()),
    })
}

pub fn marketplace_stats(store: &FixtureStore) -> MarketplaceStats {
    let count = |status: PurchaseStatus| {
        store
            .purchases
            .iter()
            .filter(|purchase| purchase.status() == status)
            .count()
    };

    let revenue_bdt = store
        .purchases
        .iter()
        .filter(|purchase| purchase.paid_on.is_some())
        .filter(|purchase| purchase.status() != PurchaseStatus::Cancelled)
        .map(|purchase| purchase.amount_bdt)
        .sum();

    let mut popular: Vec<BundlePopularity> = store
        .bundles
        .iter()
        .map(|bundle| BundlePopularity {
            bundle_id: bundle.id.clone(),
            name: bundle.name.clone(),
            purchases: store
                .purchases
                .iter()
                .filter(|purchase| purchase.bundle_id == bundle.id)
                .count(),
        })
        .filter(|entry| entry.purchases > 0)
        .collect();
    rank_by(&mut popular, |entry| entry.purchases);

    MarketplaceStats {
        purchases: store.purchases.len(),
        active: count(PurchaseStatus::InProgress) + count(PurchaseStatus::PendingPayment),
        completed: count(PurchaseStatus::Completed),
        cancelled: count(PurchaseStatus::Cancelled),
        revenue_bdt,
        popular,
    }
}
