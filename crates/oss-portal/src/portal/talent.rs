//! District talent heatmap backed by a CSV dataset.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::metrics::{percentage, top_n};

const BUNDLED_DATASET: &str = include_str!("../../data/district_talent.csv");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictTalent {
    pub district: String,
    pub division: String,
    pub workforce: u32,
    pub graduates: u32,
    pub technical_skilled: u32,
    pub english_proficiency_pct: u8,
    pub avg_monthly_wage_bdt: u32,
    pub key_skills: Vec<String>,
}

impl DistrictTalent {
    pub fn technical_share(&self) -> u32 {
        percentage(self.technical_skilled as usize, self.workforce as usize)
    }

    pub fn heat_level(&self) -> TalentHeat {
        TalentHeat::from_share(self.technical_share())
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        let needle = skill.trim().to_lowercase();
        !needle.is_empty()
            && self
                .key_skills
                .iter()
                .any(|candidate| candidate.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalentMetric {
    Workforce,
    Graduates,
    TechnicalSkilled,
}

impl TalentMetric {
    fn value(self, district: &DistrictTalent) -> u32 {
        match self {
            Self::Workforce => district.workforce,
            Self::Graduates => district.graduates,
            Self::TechnicalSkilled => district.technical_skilled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TalentHeat {
    High,
    Medium,
    Low,
}

impl TalentHeat {
    /// Bands on the technically skilled share of the workforce.
    pub const fn from_share(share_pct: u32) -> Self {
        if share_pct >= 10 {
            Self::High
        } else if share_pct >= 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivisionTalent {
    pub division: String,
    pub districts: usize,
    pub workforce: u64,
    pub technical_skilled: u64,
    pub technical_share: u32,
}

#[derive(Debug)]
pub enum TalentImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for TalentImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TalentImportError::Io(err) => write!(f, "failed to read talent dataset: {}", err),
            TalentImportError::Csv(err) => write!(f, "invalid talent CSV data: {}", err),
        }
    }
}

impl std::error::Error for TalentImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TalentImportError::Io(err) => Some(err),
            TalentImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TalentImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TalentImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct TalentRow {
    #[serde(rename = "District")]
    district: String,
    #[serde(rename = "Division")]
    division: String,
    #[serde(rename = "Workforce")]
    workforce: u32,
    #[serde(rename = "Graduates")]
    graduates: u32,
    #[serde(rename = "Technical Skilled")]
    technical_skilled: u32,
    #[serde(rename = "English Proficiency %")]
    english_proficiency_pct: u8,
    #[serde(rename = "Avg Monthly Wage BDT")]
    avg_monthly_wage_bdt: u32,
    #[serde(rename = "Key Skills", default, deserialize_with = "split_skills")]
    key_skills: Vec<String>,
}

fn split_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .split(';')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect())
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<DistrictTalent>, TalentImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut districts = Vec::new();

    for record in csv_reader.deserialize::<TalentRow>() {
        let row = record?;
        districts.push(DistrictTalent {
            district: row.district,
            division: row.division,
            workforce: row.workforce,
            graduates: row.graduates,
            technical_skilled: row.technical_skilled,
            english_proficiency_pct: row.english_proficiency_pct.min(100),
            avg_monthly_wage_bdt: row.avg_monthly_wage_bdt,
            key_skills: row.key_skills,
        });
    }

    Ok(districts)
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<DistrictTalent>, TalentImportError> {
    let file = std::fs::File::open(path)?;
    load_from_reader(file)
}

/// The dataset compiled into the crate.
pub fn bundled() -> Result<Vec<DistrictTalent>, TalentImportError> {
    load_from_reader(BUNDLED_DATASET.as_bytes())
}

pub fn district_by_name<'a>(
    districts: &'a [DistrictTalent],
    name: &str,
) -> Option<&'a DistrictTalent> {
    districts
        .iter()
        .find(|district| district.district.eq_ignore_ascii_case(name))
}

pub fn districts_in_division<'a>(
    districts: &'a [DistrictTalent],
    division: &str,
) -> Vec<&'a DistrictTalent> {
    districts
        .iter()
        .filter(|district| district.division.eq_ignore_ascii_case(division))
        .collect()
}

/// Per-division totals, alphabetical by division.
pub fn division_summary(districts: &[DistrictTalent]) -> Vec<DivisionTalent> {
    let mut grouped: BTreeMap<&str, Vec<&DistrictTalent>> = BTreeMap::new();
    for district in districts {
        grouped
            .entry(district.division.as_str())
            .or_default()
            .push(district);
    }

    grouped
        .into_iter()
        .map(|(division, members)| {
            let workforce: u64 = members.iter().map(|d| d.workforce as u64).sum();
            let technical_skilled: u64 = members.iter().map(|d| d.technical_skilled as u64).sum();
            DivisionTalent {
                division: division.to_string(),
                districts: members.len(),
                workforce,
                technical_skilled,
                technical_share: percentage(technical_skilled as usize, workforce as usize),
            }
        })
        .collect()
}

pub fn top_districts(
    districts: &[DistrictTalent],
    metric: TalentMetric,
    limit: usize,
) -> Vec<&DistrictTalent> {
    top_n(districts.iter().collect(), limit, |district| {
        metric.value(district)
    })
}

/// Districts listing `skill`, largest technical pool first.
pub fn districts_with_skill<'a>(
    districts: &'a [DistrictTalent],
    skill: &str,
) -> Vec<&'a DistrictTalent> {
    let matching: Vec<&DistrictTalent> = districts
        .iter()
        .filter(|district| district.has_skill(skill))
        .collect();
    top_n(matching, usize::MAX, |district| district.technical_skilled)
}
