//! Investment application fixtures and the admin dashboard aggregations over them.

pub mod domain;
pub(crate) mod seed;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::metrics::percentage;
use super::store::FixtureStore;

pub use domain::{
    AgencyApproval, Application, ApplicationId, ApplicationStatus, ApprovalStatus,
    DurationSource, ProcessingStage, Sector, StageDuration,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    pub in_progress: usize,
    pub under_review: usize,
}

impl StatusBreakdown {
    pub fn count(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Approved => self.approved,
            ApplicationStatus::Rejected => self.rejected,
            ApplicationStatus::InProgress => self.in_progress,
            ApplicationStatus::UnderReview => self.under_review,
        }
    }

    pub fn approval_rate(&self) -> u32 {
        percentage(self.approved, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorSummary {
    pub sector: Sector,
    pub sector_label: &'static str,
    pub applications: usize,
    pub investment_usd: u64,
    pub approval_rate: u32,
}

/// Optional selectors for the application list; unset fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationFilter {
    pub sector: Option<Sector>,
    pub status: Option<ApplicationStatus>,
    pub district: Option<String>,
    pub submitted_from: Option<NaiveDate>,
    pub submitted_to: Option<NaiveDate>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &Application) -> bool {
        self.sector.map_or(true, |sector| application.sector == sector)
            && self.status.map_or(true, |status| application.status == status)
            && self.district.as_deref().map_or(true, |district| {
                application.district.eq_ignore_ascii_case(district)
            })
            && self
                .submitted_from
                .map_or(true, |from| application.submitted_on >= from)
            && self
                .submitted_to
                .map_or(true, |to| application.submitted_on <= to)
    }
}

pub fn application_by_id<'a>(
    applications: &'a [Application],
    id: &ApplicationId,
) -> Option<&'a Application> {
    applications.iter().find(|application| &application.id == id)
}

pub fn applications_for_bbid<'a>(
    applications: &'a [Application],
    bbid: &str,
) -> Vec<&'a Application> {
    applications
        .iter()
        .filter(|application| application.bbid == bbid)
        .collect()
}

pub fn filter<'a>(
    applications: &'a [Application],
    filter: &ApplicationFilter,
) -> Vec<&'a Application> {
    applications
        .iter()
        .filter(|application| filter.matches(application))
        .collect()
}

pub fn status_breakdown<'a, I>(applications: I) -> StatusBreakdown
where
    I: IntoIterator<Item = &'a Application>,
{
    applications
        .into_iter()
        .fold(StatusBreakdown::default(), |mut breakdown, application| {
            breakdown.total += 1;
            match application.status {
                ApplicationStatus::Approved => breakdown.approved += 1,
                ApplicationStatus::Rejected => breakdown.rejected += 1,
                ApplicationStatus::InProgress => breakdown.in_progress += 1,
                ApplicationStatus::UnderReview => breakdown.under_review += 1,
            }
            breakdown
        })
}

pub fn approval_rate(applications: &[Application]) -> u32 {
    status_breakdown(applications).approval_rate()
}

pub fn total_investment(applications: &[Application]) -> u64 {
    applications
        .iter()
        .map(|application| application.investment_usd)
        .sum()
}

/// Elapsed processing days; submissions dated after `today` count as zero.
pub fn days_in_progress(application: &Application, today: NaiveDate) -> u32 {
    match &application.timeline {
        DurationSource::StageDurations { stages } => stages.iter().map(|stage| stage.days).sum(),
        DurationSource::DaysInCurrentStage { days } => *days,
        DurationSource::SubmittedDate => {
            let elapsed = (today - application.submitted_on).num_days().max(0);
            u32::try_from(elapsed).unwrap_or(u32::MAX)
        }
    }
}

pub fn sector_breakdown(applications: &[Application]) -> Vec<SectorSummary> {
    Sector::ordered()
        .into_iter()
        .filter_map(|sector| {
            let in_sector: Vec<&Application> = applications
                .iter()
                .filter(|application| application.sector == sector)
                .collect();
            if in_sector.is_empty() {
                return None;
            }

            let approved = in_sector
                .iter()
                .filter(|application| application.status == ApplicationStatus::Approved)
                .count();

            Some(SectorSummary {
                sector,
                sector_label: sector.label(),
                applications: in_sector.len(),
                investment_usd: in_sector.iter().map(|app| app.investment_usd).sum(),
                approval_rate: percentage(approved, in_sector.len()),
            })
        })
        .collect()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("application {0} not found")]
    UnknownApplication(String),
    #[error("officer {0} not found")]
    UnknownOfficer(String),
}

/// Point an application at a registered officer.
pub fn assign_officer<'a>(
    store: &'a mut FixtureStore,
    application_id: &ApplicationId,
    officer_email: &str,
) -> Result<&'a Application, AssignError> {
    if !store
        .officers
        .iter()
        .any(|officer| officer.email.eq_ignore_ascii_case(officer_email))
    {
        warn!(officer = officer_email, "assignment to unknown officer ignored");
        return Err(AssignError::UnknownOfficer(officer_email.to_string()));
    }

    let application = store
        .applications
        .iter_mut()
        .find(|application| &application.id == application_id)
        .ok_or_else(|| AssignError::UnknownApplication(application_id.0.clone()))?;

    application.assigned_officer = Some(officer_email.to_ascii_lowercase());
    info!(application = %application_id.0, officer = officer_email, "officer assigned");
    Ok(application)
}
