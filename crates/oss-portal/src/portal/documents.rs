use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::applications::seed::day;
use super::metrics::percentage;
use super::store::FixtureStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    TradeLicense,
    IncorporationCertificate,
    TaxCertificate,
    EnvironmentalClearance,
    FireLicense,
    BankSolvency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Verified,
    Pending,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentShare {
    pub agency: String,
    pub shared_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentComment {
    pub author: String,
    pub body: String,
    pub posted_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub bbid: String,
    pub name: String,
    pub category: DocumentCategory,
    pub status: DocumentStatus,
    pub uploaded_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
    pub shares: Vec<DocumentShare>,
    pub comments: Vec<DocumentComment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VaultSummary {
    pub total: usize,
    pub verified: usize,
    pub pending: usize,
    pub rejected: usize,
    pub completeness: u32,
}

pub fn document_by_id<'a>(documents: &'a [Document], id: &str) -> Option<&'a Document> {
    documents.iter().find(|document| document.id == id)
}

pub fn documents_for_bbid<'a>(documents: &'a [Document], bbid: &str) -> Vec<&'a Document> {
    documents
        .iter()
        .filter(|document| document.bbid == bbid)
        .collect()
}

pub fn vault_summary<'a, I>(documents: I) -> VaultSummary
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut summary = documents
        .into_iter()
        .fold(VaultSummary::default(), |mut summary, document| {
            summary.total += 1;
            match document.status {
                DocumentStatus::Verified => summary.verified += 1,
                DocumentStatus::Pending => summary.pending += 1,
                DocumentStatus::Rejected => summary.rejected += 1,
            }
            summary
        });
    summary.completeness = percentage(summary.verified, summary.total);
    summary
}

/// Documents expiring between `today` and `today + days` inclusive, soonest first.
/// Windows reaching past the calendar's end are clamped to [`NaiveDate::MAX`].
pub fn expiring_within<'a>(
    documents: &'a [Document],
    today: NaiveDate,
    days: u32,
) -> Vec<&'a Document> {
    let horizon = today
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    let mut expiring: Vec<&Document> = documents
        .iter()
        .filter(|document| {
            document
                .expires_on
                .is_some_and(|expires| expires >= today && expires <= horizon)
        })
        .collect();
    expiring.sort_by_key(|document| document.expires_on);
    expiring
}

pub fn share_document<'a>(
    store: &'a mut FixtureStore,
    id: &str,
    agency: &str,
    today: NaiveDate,
) -> Option<&'a Document> {
    let Some(document) = store.documents.iter_mut().find(|document| document.id == id) else {
        warn!(document = id, "share requested for unknown document");
        return None;
    };

    document.shares.push(DocumentShare {
        agency: agency.to_string(),
        shared_on: today,
    });
    info!(document = id, agency, "document shared");
    Some(&*document)
}

/// Append a comment; blank bodies and unknown documents are ignored.
pub fn add_comment<'a>(
    store: &'a mut FixtureStore,
    id: &str,
    author: &str,
    body: &str,
    today: NaiveDate,
) -> Option<&'a Document> {
    let body = body.trim();
    if body.is_empty() {
        warn!(document = id, "empty comment ignored");
        return None;
    }

    let Some(document) = store.documents.iter_mut().find(|document| document.id == id) else {
        warn!(document = id, "comment posted to unknown document");
        return None;
    };

    document.comments.push(DocumentComment {
        author: author.to_string(),
        body: body.to_string(),
        posted_on: today,
    });
    Some(&*document)
}

pub(crate) fn seed() -> Vec<Document> {
    use DocumentCategory::*;
    use DocumentStatus::*;

    let rows = [
        ("DOC-001", "BBID-1001", "Trade licence 2024", TradeLicense, Verified, day(2024, 1, 5), Some(day(2024, 12, 31))),
        ("DOC-002", "BBID-1001", "Certificate of incorporation", IncorporationCertificate, Verified, day(2024, 1, 19), None),
        ("DOC-003", "BBID-1001", "Tax clearance certificate", TaxCertificate, Pending, day(2024, 6, 2), Some(day(2024, 7, 15))),
        ("DOC-004", "BBID-1001", "Bank solvency letter", BankSolvency, Rejected, day(2024, 5, 20), Some(day(2024, 8, 20))),
        ("DOC-005", "BBID-1016", "Environmental impact assessment", EnvironmentalClearance, Pending, day(2024, 5, 21), None),
        ("DOC-006", "BBID-1016", "Site fire safety plan", FireLicense, Verified, day(2024, 5, 22), Some(day(2025, 5, 21))),
        ("DOC-007", "BBID-1018", "Trade licence 2024", TradeLicense, Verified, day(2024, 2, 1), Some(day(2024, 7, 10))),
    ];

    rows.into_iter()
        .map(
            |(id, bbid, name, category, status, uploaded_on, expires_on)| Document {
                id: id.to_string(),
                bbid: bbid.to_string(),
                name: name.to_string(),
                category,
                status,
                uploaded_on,
                expires_on,
                shares: Vec::new(),
                comments: Vec::new(),
            },
        )
        .collect()
}
