use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::domain::{
    AgencyApproval, Application, ApplicationId, ApplicationStatus, ApprovalStatus,
    DurationSource, ProcessingStage, Sector, StageDuration,
};

const FARHANA: &str = "farhana.rahman@bida.gov.bd";
const TANVIR: &str = "tanvir.hossain@bida.gov.bd";
const NUSRAT: &str = "nusrat.jahan@bida.gov.bd";

pub(crate) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn stages(days: [u32; 4]) -> DurationSource {
    let order = [
        ProcessingStage::Submission,
        ProcessingStage::DocumentReview,
        ProcessingStage::AgencyClearance,
        ProcessingStage::FinalApproval,
    ];
    DurationSource::StageDurations {
        stages: order
            .into_iter()
            .zip(days)
            .map(|(stage, days)| StageDuration { stage, days })
            .collect(),
    }
}

fn approved(days: u32) -> AgencyApproval {
    AgencyApproval::decided(ApprovalStatus::Approved, days)
}

fn rejected(days: u32) -> AgencyApproval {
    AgencyApproval::decided(ApprovalStatus::Rejected, days)
}

fn pending() -> AgencyApproval {
    AgencyApproval::pending()
}

struct Row {
    seq: u32,
    bbid: &'static str,
    company: &'static str,
    sector: Sector,
    district: &'static str,
    investment_usd: u64,
    status: ApplicationStatus,
    officer: Option<&'static str>,
    submitted_on: NaiveDate,
    timeline: DurationSource,
    approvals: Vec<(&'static str, AgencyApproval)>,
}

impl Row {
    fn build(self) -> Application {
        Application {
            id: ApplicationId(format!("APP-2024-{:03}", self.seq)),
            bbid: self.bbid.to_string(),
            company_name: self.company.to_string(),
            sector: self.sector,
            district: self.district.to_string(),
            investment_usd: self.investment_usd,
            status: self.status,
            assigned_officer: self.officer.map(str::to_string),
            approvals: self
                .approvals
                .into_iter()
                .map(|(agency, approval)| (agency.to_string(), approval))
                .collect::<BTreeMap<_, _>>(),
            submitted_on: self.submitted_on,
            timeline: self.timeline,
        }
    }
}

/// Twenty applications: twelve approved, three rejected, three in progress, two under review.
pub(crate) fn applications() -> Vec<Application> {
    use ApplicationStatus::*;

    vec![
        Row {
            seq: 1,
            bbid: "BBID-1001",
            company: "Padma Textiles Ltd",
            sector: Sector::Textiles,
            district: "Gazipur",
            investment_usd: 12_500_000,
            status: Approved,
            officer: Some(FARHANA),
            submitted_on: day(2024, 1, 8),
            timeline: stages([2, 9, 28, 3]),
            approvals: vec![("RJSC", approved(5)), ("NBR", approved(6)), ("DOE", approved(28))],
        },
        Row {
            seq: 2,
            bbid: "BBID-1002",
            company: "Meghna Agro Processing",
            sector: Sector::Agro,
            district: "Mymensingh",
            investment_usd: 4_200_000,
            status: Approved,
            officer: Some(TANVIR),
            submitted_on: day(2024, 1, 15),
            timeline: stages([1, 6, 35, 2]),
            approvals: vec![("RJSC", approved(4)), ("DOE", approved(35))],
        },
        Row {
            seq: 3,
            bbid: "BBID-1003",
            company: "Karnaphuli Steel Works",
            sector: Sector::Manufacturing,
            district: "Chattogram",
            investment_usd: 48_000_000,
            status: Approved,
            officer: Some(FARHANA),
            submitted_on: day(2024, 1, 22),
            timeline: stages([3, 12, 41, 4]),
            approvals: vec![
                ("RJSC", approved(3)),
                ("NBR", approved(8)),
                ("DOE", approved(41)),
                ("FSCD", approved(12)),
            ],
        },
        Row {
            seq: 4,
            bbid: "BBID-1004",
            company: "Dhaka Digital Services",
            sector: Sector::Ict,
            district: "Dhaka",
            investment_usd: 2_800_000,
            status: Approved,
            officer: Some(NUSRAT),
            submitted_on: day(2024, 2, 2),
            timeline: stages([1, 4, 5, 1]),
            approvals: vec![("RJSC", approved(2)), ("NBR", approved(5))],
        },
        Row {
            seq: 5,
            bbid: "BBID-1005",
            company: "Sundarban Pharma",
            sector: Sector::Pharmaceuticals,
            district: "Khulna",
            investment_usd: 22_000_000,
            status: Approved,
            officer: Some(TANVIR),
            submitted_on: day(2024, 2, 11),
            timeline: stages([2, 10, 27, 3]),
            approvals: vec![
                ("RJSC", approved(6)),
                ("DOE", approved(27)),
                ("FSCD", approved(16)),
            ],
        },
        Row {
            seq: 6,
            bbid: "BBID-1006",
            company: "Jamuna Power Systems",
            sector: Sector::Energy,
            district: "Sirajganj",
            investment_usd: 65_000_000,
            status: Approved,
            officer: Some(FARHANA),
            submitted_on: day(2024, 2, 19),
            timeline: stages([2, 11, 44, 5]),
            approvals: vec![("DPDC", approved(18)), ("DOE", approved(44))],
        },
        Row {
            seq: 7,
            bbid: "BBID-1007",
            company: "Rupsha Garments",
            sector: Sector::Textiles,
            district: "Khulna",
            investment_usd: 7_500_000,
            status: Approved,
            officer: Some(NUSRAT),
            submitted_on: day(2024, 3, 1),
            timeline: stages([1, 5, 13, 2]),
            approvals: vec![("RJSC", approved(4)), ("FSCD", approved(13))],
        },
        Row {
            seq: 8,
            bbid: "BBID-1008",
            company: "Sylhet Tea Exports",
            sector: Sector::Agro,
            district: "Sylhet",
            investment_usd: 3_100_000,
            status: Approved,
            officer: Some(TANVIR),
            submitted_on: day(2024, 3, 6),
            timeline: stages([1, 3, 6, 1]),
            approvals: vec![("NBR", approved(6))],
        },
        Row {
            seq: 9,
            bbid: "BBID-1009",
            company: "Bay Terminal Logistics",
            sector: Sector::Infrastructure,
            district: "Chattogram",
            investment_usd: 90_000_000,
            status: Approved,
            officer: Some(FARHANA),
            submitted_on: day(2024, 3, 14),
            timeline: stages([3, 14, 33, 6]),
            approvals: vec![
                ("RJSC", approved(5)),
                ("DOE", approved(33)),
                ("DPDC", approved(22)),
            ],
        },
        Row {
            seq: 10,
            bbid: "BBID-1010",
            company: "Rajshahi Silk Collective",
            sector: Sector::Textiles,
            district: "Rajshahi",
            investment_usd: 1_900_000,
            status: Approved,
            officer: Some(NUSRAT),
            submitted_on: day(2024, 3, 20),
            timeline: stages([1, 3, 3, 1]),
            approvals: vec![("RJSC", approved(3))],
        },
        Row {
            seq: 11,
            bbid: "BBID-1011",
            company: "Cumilla Electronics",
            sector: Sector::Manufacturing,
            district: "Cumilla",
            investment_usd: 15_000_000,
            status: Approved,
            officer: Some(TANVIR),
            submitted_on: day(2024, 4, 2),
            timeline: stages([2, 7, 15, 2]),
            approvals: vec![("NBR", approved(7)), ("FSCD", approved(15))],
        },
        Row {
            seq: 12,
            bbid: "BBID-1012",
            company: "Narayanganj Knitwear",
            sector: Sector::Textiles,
            district: "Narayanganj",
            investment_usd: 9_800_000,
            status: Approved,
            officer: Some(FARHANA),
            submitted_on: day(2024, 4, 9),
            timeline: stages([1, 6, 11, 2]),
            approvals: vec![("RJSC", approved(4)), ("FSCD", approved(11))],
        },
        Row {
            seq: 13,
            bbid: "BBID-1013",
            company: "Coastal Shrimp Farms",
            sector: Sector::Agro,
            district: "Cox's Bazar",
            investment_usd: 5_500_000,
            status: Rejected,
            officer: Some(NUSRAT),
            submitted_on: day(2024, 4, 17),
            timeline: stages([2, 8, 38, 1]),
            approvals: vec![("DOE", rejected(38))],
        },
        Row {
            seq: 14,
            bbid: "BBID-1014",
            company: "Bogura Cement Co",
            sector: Sector::Manufacturing,
            district: "Bogura",
            investment_usd: 30_000_000,
            status: Rejected,
            officer: Some(TANVIR),
            submitted_on: day(2024, 4, 25),
            timeline: stages([2, 9, 29, 1]),
            approvals: vec![("RJSC", approved(5)), ("DOE", rejected(29))],
        },
        Row {
            seq: 15,
            bbid: "BBID-1015",
            company: "Quantum Fintech BD",
            sector: Sector::Ict,
            district: "Dhaka",
            investment_usd: 1_200_000,
            status: Rejected,
            officer: Some(FARHANA),
            submitted_on: day(2024, 5, 3),
            timeline: stages([1, 5, 9, 1]),
            approvals: vec![("NBR", rejected(9))],
        },
        Row {
            seq: 16,
            bbid: "BBID-1001",
            company: "Padma Textiles Ltd",
            sector: Sector::Textiles,
            district: "Gazipur",
            investment_usd: 6_000_000,
            status: InProgress,
            officer: Some(FARHANA),
            submitted_on: day(2024, 5, 12),
            timeline: DurationSource::DaysInCurrentStage { days: 12 },
            approvals: vec![("RJSC", approved(3)), ("DOE", pending())],
        },
        Row {
            seq: 17,
            bbid: "BBID-1016",
            company: "Green Solar Bangladesh",
            sector: Sector::Energy,
            district: "Rangpur",
            investment_usd: 18_000_000,
            status: InProgress,
            officer: Some(NUSRAT),
            submitted_on: day(2024, 5, 20),
            timeline: DurationSource::SubmittedDate,
            approvals: vec![("NBR", pending()), ("DPDC", pending())],
        },
        Row {
            seq: 18,
            bbid: "BBID-1017",
            company: "Barishal Shipbuilders",
            sector: Sector::Manufacturing,
            district: "Barishal",
            investment_usd: 27_000_000,
            status: InProgress,
            officer: None,
            submitted_on: day(2024, 5, 28),
            timeline: DurationSource::SubmittedDate,
            approvals: vec![("RJSC", pending())],
        },
        Row {
            seq: 19,
            bbid: "BBID-1018",
            company: "Hatirjheel Data Center",
            sector: Sector::Ict,
            district: "Dhaka",
            investment_usd: 40_000_000,
            status: UnderReview,
            officer: Some(TANVIR),
            submitted_on: day(2024, 6, 4),
            timeline: DurationSource::DaysInCurrentStage { days: 5 },
            approvals: vec![("FSCD", pending()), ("DPDC", pending())],
        },
        Row {
            seq: 20,
            bbid: "BBID-1019",
            company: "Mongla Port Warehousing",
            sector: Sector::Infrastructure,
            district: "Bagerhat",
            investment_usd: 11_000_000,
            status: UnderReview,
            officer: None,
            submitted_on: day(2024, 6, 10),
            timeline: DurationSource::SubmittedDate,
            approvals: vec![("DOE", pending())],
        },
    ]
    .into_iter()
    .map(Row::build)
    .collect()
}
