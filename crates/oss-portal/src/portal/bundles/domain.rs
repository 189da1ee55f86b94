use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::portal::applications::Sector;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleService {
    pub id: String,
    pub name: String,
    /// Issuing agency code.
    pub agency: String,
    pub sla_days: u32,
    pub standalone_fee_bdt: u64,
}

/// A package of agency services sold at a single price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sector: Option<Sector>,
    pub services: Vec<BundleService>,
    pub price_bdt: u64,
}

impl Bundle {
    pub fn service(&self, service_id: &str) -> Option<&BundleService> {
        self.services.iter().find(|service| service.id == service_id)
    }

    pub fn standalone_total_bdt(&self) -> u64 {
        self.services
            .iter()
            .map(|service| service.standalone_fee_bdt)
            .sum()
    }

    pub fn estimated_days(&self) -> u32 {
        self.services.iter().map(|service| service.sla_days).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    PendingPayment,
    InProgress,
    Completed,
    Cancelled,
}

impl PurchaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Purchase lifecycle. Data that only exists in one state lives on that variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PurchaseState {
    PendingPayment,
    InProgress {
        current_service: String,
    },
    Completed {
        completed_on: NaiveDate,
    },
    Cancelled {
        cancelled_on: NaiveDate,
        reason: Option<String>,
    },
}

impl PurchaseState {
    pub const fn status(&self) -> PurchaseStatus {
        match self {
            Self::PendingPayment => PurchaseStatus::PendingPayment,
            Self::InProgress { .. } => PurchaseStatus::InProgress,
            Self::Completed { .. } => PurchaseStatus::Completed,
            Self::Cancelled { .. } => PurchaseStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseAction {
    Pay,
    CompleteService,
    Cancel,
}

impl PurchaseAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pay => "pay",
            Self::CompleteService => "complete a service",
            Self::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlePurchase {
    pub id: String,
    pub bundle_id: String,
    pub bbid: String,
    pub purchased_on: NaiveDate,
    pub amount_bdt: u64,
    pub paid_on: Option<NaiveDate>,
    /// Completion order, not catalogue order.
    pub services_completed: Vec<String>,
    pub state: PurchaseState,
}

impl BundlePurchase {
    pub fn status(&self) -> PurchaseStatus {
        self.state.status()
    }

    pub fn current_service(&self) -> Option<&str> {
        match &self.state {
            PurchaseState::InProgress { current_service } => Some(current_service),
            _ => None,
        }
    }

    pub fn actual_completion_date(&self) -> Option<NaiveDate> {
        match self.state {
            PurchaseState::Completed { completed_on } => Some(completed_on),
            _ => None,
        }
    }
}
