use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for investment applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Investment sectors tracked by the One-Stop-Service desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Textiles,
    Agro,
    Manufacturing,
    Ict,
    Pharmaceuticals,
    Energy,
    Infrastructure,
}

impl Sector {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Textiles,
            Self::Agro,
            Self::Manufacturing,
            Self::Ict,
            Self::Pharmaceuticals,
            Self::Energy,
            Self::Infrastructure,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Textiles => "Textiles & RMG",
            Self::Agro => "Agro Processing",
            Self::Manufacturing => "Light & Heavy Manufacturing",
            Self::Ict => "ICT & Digital Services",
            Self::Pharmaceuticals => "Pharmaceuticals",
            Self::Energy => "Power & Energy",
            Self::Infrastructure => "Infrastructure & Logistics",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Approved,
    Rejected,
    InProgress,
    UnderReview,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Approved,
            Self::Rejected,
            Self::InProgress,
            Self::UnderReview,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::InProgress => "In Progress",
            Self::UnderReview => "Under Review",
        }
    }
}

/// Per-agency clearance state on a single application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Approved,
    Pending,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencyApproval {
    pub status: ApprovalStatus,
    /// Days the agency took to decide; absent while pending.
    pub days_taken: Option<u32>,
}

impl AgencyApproval {
    pub const fn decided(status: ApprovalStatus, days_taken: u32) -> Self {
        Self {
            status,
            days_taken: Some(days_taken),
        }
    }

    pub const fn pending() -> Self {
        Self {
            status: ApprovalStatus::Pending,
            days_taken: None,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.status != ApprovalStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    Submission,
    DocumentReview,
    AgencyClearance,
    FinalApproval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDuration {
    pub stage: ProcessingStage,
    pub days: u32,
}

/// Where an application's elapsed processing time comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DurationSource {
    StageDurations { stages: Vec<StageDuration> },
    DaysInCurrentStage { days: u32 },
    SubmittedDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub bbid: String,
    pub company_name: String,
    pub sector: Sector,
    pub district: String,
    pub investment_usd: u64,
    pub status: ApplicationStatus,
    /// Officer e-mail.
    pub assigned_officer: Option<String>,
    /// Keyed by agency code.
    pub approvals: BTreeMap<String, AgencyApproval>,
    pub submitted_on: NaiveDate,
    pub timeline: DurationSource,
}
