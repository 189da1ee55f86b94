use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::applications::{days_in_progress, Application, ApplicationStatus};
use super::metrics::{average, percentage, round_to, top_n};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    pub name: String,
    pub email: String,
    pub designation: String,
}

/// Workload statistics recomputed from the officer's assigned applications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfficerStats {
    pub name: String,
    pub email: String,
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    pub approval_rate: u32,
    pub avg_days: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamAverages {
    pub approval_rate: f64,
    pub avg_days: f64,
}

pub fn officer_by_email<'a>(officers: &'a [Officer], email: &str) -> Option<&'a Officer> {
    officers
        .iter()
        .find(|officer| officer.email.eq_ignore_ascii_case(email))
}

pub fn stats_for(
    officer: &Officer,
    applications: &[Application],
    today: NaiveDate,
) -> OfficerStats {
    let assigned: Vec<&Application> = applications
        .iter()
        .filter(|application| {
            application
                .assigned_officer
                .as_deref()
                .is_some_and(|email| email.eq_ignore_ascii_case(&officer.email))
        })
        .collect();

    let approved = assigned
        .iter()
        .filter(|application| application.status == ApplicationStatus::Approved)
        .count();
    let rejected = assigned
        .iter()
        .filter(|application| application.status == ApplicationStatus::Rejected)
        .count();
    let avg_days = average(
        assigned
            .iter()
            .map(|application| days_in_progress(application, today) as f64),
    );

    OfficerStats {
        name: officer.name.clone(),
        email: officer.email.clone(),
        total: assigned.len(),
        approved,
        rejected,
        approval_rate: percentage(approved, assigned.len()),
        avg_days: round_to(avg_days, 1),
    }
}

/// One entry per officer, in roster order.
pub fn officer_stats(
    officers: &[Officer],
    applications: &[Application],
    today: NaiveDate,
) -> Vec<OfficerStats> {
    officers
        .iter()
        .map(|officer| stats_for(officer, applications, today))
        .collect()
}

/// Highest approval rate first; ties keep roster order.
pub fn leaderboard(stats: &[OfficerStats], limit: usize) -> Vec<OfficerStats> {
    top_n(stats.to_vec(), limit, |entry| entry.approval_rate)
}

pub fn team_averages(stats: &[OfficerStats]) -> TeamAverages {
    TeamAverages {
        approval_rate: round_to(average(stats.iter().map(|s| s.approval_rate as f64)), 1),
        avg_days: round_to(average(stats.iter().map(|s| s.avg_days)), 1),
    }
}

pub(crate) fn seed() -> Vec<Officer> {
    [
        ("Farhana Rahman", "farhana.rahman@bida.gov.bd", "Senior Investment Officer"),
        ("Tanvir Hossain", "tanvir.hossain@bida.gov.bd", "Investment Officer"),
        ("Nusrat Jahan", "nusrat.jahan@bida.gov.bd", "Investment Officer"),
        ("Mahmudul Karim", "mahmudul.karim@bida.gov.bd", "Assistant Director"),
    ]
    .into_iter()
    .map(|(name, email, designation)| Officer {
        name: name.to_string(),
        email: email.to_string(),
        designation: designation.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::applications::seed::{applications, day};

    fn today() -> NaiveDate {
        day(2024, 6, 30)
    }

    #[test]
    fn stats_are_recomputed_from_assignments() {
        let stats = officer_stats(&seed(), &applications(), today());

        let farhana = &stats[0];
        assert_eq!(farhana.total, 7);
        assert_eq!(farhana.approved, 5);
        assert_eq!(farhana.rejected, 1);
        assert_eq!(farhana.approval_rate, 71);

        let idle = &stats[3];
        assert_eq!(idle.total, 0);
        assert_eq!(idle.approval_rate, 0);
        assert_eq!(idle.avg_days, 0.0);
    }

    #[test]
    fn leaderboard_orders_by_rate() {
        let stats = officer_stats(&seed(), &applications(), today());
        let board = leaderboard(&stats, 3);
        let emails: Vec<&str> = board.iter().map(|entry| entry.email.as_str()).collect();
        assert_eq!(
            emails,
            vec![
                "farhana.rahman@bida.gov.bd",
                "tanvir.hossain@bida.gov.bd",
                "nusrat.jahan@bida.gov.bd",
            ]
        );
    }

    #[test]
    fn leaderboard_keeps_roster_order_on_ties() {
        let mut roster = seed();
        roster.truncate(2);
        let mut stats = officer_stats(&roster, &[], today());
        stats[0].approval_rate = 50;
        stats[1].approval_rate = 50;
        let board = leaderboard(&stats, 10);
        assert_eq!(board[0].name, "Farhana Rahman");
        assert_eq!(board[1].name, "Tanvir Hossain");
    }

    #[test]
    fn team_averages_of_empty_team_are_zero() {
        let averages = team_averages(&[]);
        assert_eq!(averages.approval_rate, 0.0);
        assert_eq!(averages.avg_days, 0.0);
        assert!(!averages.approval_rate.is_nan());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let officers = seed();
        assert!(officer_by_email(&officers, "NUSRAT.JAHAN@bida.gov.bd").is_some());
        assert!(officer_by_email(&officers, "nobody@bida.gov.bd").is_none());
    }
}
