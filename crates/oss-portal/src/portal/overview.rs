//! Intelligence console: one view combining the headline numbers of every engine.

use chrono::NaiveDate;
use serde::Serialize;

use super::applications::{self, SectorSummary, StatusBreakdown};
use super::bundles::{self, PurchaseStatus};
use super::devices::{self, STALE_AFTER_DAYS};
use super::ledger;
use super::metrics::rank_by;
use super::sla::{self, Bottleneck};
use super::store::FixtureStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalHealth {
    Healthy,
    Watch,
    Critical,
}

impl PortalHealth {
    pub fn assess(sla_compliance: u32, bottlenecks: usize) -> Self {
        if sla_compliance < 60 || bottlenecks > 2 {
            Self::Critical
        } else if sla_compliance >= 80 && bottlenecks == 0 {
            Self::Healthy
        } else {
            Self::Watch
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Watch => "Watch",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalOverview {
    pub as_of: NaiveDate,
    pub applications: StatusBreakdown,
    pub approval_rate: u32,
    pub total_investment_usd: u64,
    pub portal_sla_compliance: u32,
    pub bottlenecks: Vec<Bottleneck>,
    pub top_sector: Option<SectorSummary>,
    pub marketplace_revenue_bdt: u64,
    pub awaiting_payment: usize,
    pub ledger_trust_level: u32,
    pub ledger_valid: bool,
    pub devices_online_rate: u32,
    pub health: PortalHealth,
    pub observations: Vec<String>,
    pub recommended_actions: Vec<String>,
}

pub fn portal_overview(store: &FixtureStore, today: NaiveDate) -> PortalOverview {
    let breakdown = applications::status_breakdown(&store.applications);
    let agency_stats = sla::agency_stats(&store.agencies, &store.applications);
    let compliance = sla::portal_compliance(&agency_stats);
    let bottlenecks = sla::bottlenecks(&store.agencies);

    let mut sectors = applications::sector_breakdown(&store.applications);
    rank_by(&mut sectors, |summary| summary.investment_usd);
    let top_sector = sectors.into_iter().next();

    let marketplace = bundles::marketplace_stats(store);
    let awaiting_payment = store
        .purchases
        .iter()
        .filter(|purchase| purchase.status() == PurchaseStatus::PendingPayment)
        .count();

    let chain = ledger::verify_chain(&store.ledger);
    let trust = ledger::trust_level(&store.ledger);
    let unverified = store.ledger.iter().filter(|record| !record.verified).count();
    let fleet = devices::fleet_summary(&store.devices, today);

    let health = PortalHealth::assess(compliance, bottlenecks.len());

    let mut observations = Vec::new();
    if breakdown.total > 0 {
        observations.push(format!(
            "{} of {} applications approved ({}% approval rate)",
            breakdown.approved,
            breakdown.total,
            breakdown.approval_rate()
        ));
    }
    observations.push(format!("Portal SLA compliance at {compliance}%"));
    for bottleneck in bottlenecks.iter().take(3) {
        observations.push(format!(
            "{} running {:.1} days over its SLA target",
            bottleneck.name, bottleneck.delay_days
        ));
    }
    if let Some(broken_at) = &chain.broken_at {
        observations.push(format!("Ledger chain broken at {broken_at}"));
    }
    if fleet.stale > 0 {
        observations.push(format!(
            "{} biometric device(s) have not synced in over {STALE_AFTER_DAYS} days",
            fleet.stale
        ));
    }

    let mut recommended_actions = Vec::new();
    if let Some(worst) = bottlenecks.first() {
        let load = agency_stats
            .iter()
            .find(|entry| entry.code == worst.code)
            .map_or(0, |entry| entry.current_load);
        recommended_actions.push(format!(
            "Escalate pending approvals with {} ({} awaiting decision)",
            worst.code, load
        ));
    }
    if awaiting_payment > 0 {
        recommended_actions.push(format!(
            "Follow up on {awaiting_payment} bundle purchase(s) awaiting payment"
        ));
    }
    if unverified > 0 {
        recommended_actions.push(format!("Verify {unverified} outstanding ledger record(s)"));
    }
    if fleet.stale > 0 {
        recommended_actions.push("Schedule a sync for stale biometric devices".to_string());
    }
    if recommended_actions.is_empty() {
        recommended_actions
            .push("No intervention needed; keep monitoring daily metrics".to_string());
    }

    PortalOverview {
        as_of: today,
        applications: breakdown,
        approval_rate: breakdown.approval_rate(),
        total_investment_usd: applications::total_investment(&store.applications),
        portal_sla_compliance: compliance,
        bottlenecks,
        top_sector,
        marketplace_revenue_bdt: marketplace.revenue_bdt,
        awaiting_payment,
        ledger_trust_level: trust,
        ledger_valid: chain.valid,
        devices_online_rate: fleet.online_rate,
        health,
        observations,
        recommended_actions,
    }
}
