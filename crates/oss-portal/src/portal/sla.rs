//! Agency service-level tracking: compliance, live load and bottleneck detection.

use serde::{Deserialize, Serialize};

use super::applications::{AgencyApproval, Application, ApprovalStatus};
use super::metrics::{percentage, rank_by, round_to};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub code: String,
    pub name: String,
    pub sla_target_days: f64,
    pub avg_response_days: f64,
}

impl Agency {
    /// Days over target; zero or negative when the agency is within SLA.
    pub fn delay_days(&self) -> f64 {
        self.avg_response_days - self.sla_target_days
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencySlaStats {
    pub code: String,
    pub name: String,
    pub sla_target_days: f64,
    pub avg_response_days: f64,
    pub sla_compliance: u32,
    pub current_load: usize,
    pub decided: usize,
    pub within_target: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bottleneck {
    pub code: String,
    pub name: String,
    pub delay_days: f64,
}

pub fn agency_by_code<'a>(agencies: &'a [Agency], code: &str) -> Option<&'a Agency> {
    agencies
        .iter()
        .find(|agency| agency.code.eq_ignore_ascii_case(code))
}

fn approvals_for<'a>(
    applications: &'a [Application],
    code: &'a str,
) -> impl Iterator<Item = &'a AgencyApproval> + 'a {
    applications
        .iter()
        .filter_map(move |application| application.approvals.get(code))
}

pub fn stats_for(agency: &Agency, applications: &[Application]) -> AgencySlaStats {
    let mut decided = 0;
    let mut within_target = 0;
    let mut current_load = 0;

    for approval in approvals_for(applications, &agency.code) {
        match (approval.status, approval.days_taken) {
            (ApprovalStatus::Pending, _) => current_load += 1,
            (_, Some(days)) => {
                decided += 1;
                if days as f64 <= agency.sla_target_days {
                    within_target += 1;
                }
            }
            (_, None) => decided += 1,
        }
    }

    AgencySlaStats {
        code: agency.code.clone(),
        name: agency.name.clone(),
        sla_target_days: agency.sla_target_days,
        avg_response_days: agency.avg_response_days,
        sla_compliance: percentage(within_target, decided),
        current_load,
        decided,
        within_target,
    }
}

pub fn agency_stats(agencies: &[Agency], applications: &[Application]) -> Vec<AgencySlaStats> {
    agencies
        .iter()
        .map(|agency| stats_for(agency, applications))
        .collect()
}

/// Agencies responding slower than their target, worst delay first.
pub fn bottlenecks(agencies: &[Agency]) -> Vec<Bottleneck> {
    let mut slow: Vec<&Agency> = agencies
        .iter()
        .filter(|agency| agency.avg_response_days > agency.sla_target_days)
        .collect();
    // Rank on the unrounded delay; rounding is for display only.
    rank_by(&mut slow, |agency| agency.delay_days());
    slow.into_iter()
        .map(|agency| Bottleneck {
            code: agency.code.clone(),
            name: agency.name.clone(),
            delay_days: round_to(agency.delay_days(), 1),
        })
        .collect()
}

/// Portal-wide compliance weighted by decided approvals.
pub fn portal_compliance(stats: &[AgencySlaStats]) -> u32 {
    let decided = stats.iter().map(|entry| entry.decided).sum();
    let within = stats.iter().map(|entry| entry.within_target).sum();
    percentage(within, decided)
}

pub(crate) fn seed() -> Vec<Agency> {
    [
        ("RJSC", "Registrar of Joint Stock Companies and Firms", 7.0, 4.2),
        ("NBR", "National Board of Revenue", 7.0, 6.5),
        ("DOE", "Department of Environment", 30.0, 42.0),
        ("FSCD", "Fire Service and Civil Defence", 14.0, 19.5),
        ("DPDC", "Dhaka Power Distribution Company", 21.0, 21.0),
        ("BEZA", "Bangladesh Economic Zones Authority", 10.0, 9.0),
    ]
    .into_iter()
    .map(|(code, name, target, response)| Agency {
        code: code.to_string(),
        name: name.to_string(),
        sla_target_days: target,
        avg_response_days: response,
    })
    .collect()
}
