//! Hash-chained verification ledger shown on the blockchain demo panel.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::applications::seed::day;
use super::metrics::percentage;
use super::store::FixtureStore;

pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    DocumentHash,
    Approval,
    Certificate,
}

impl RecordKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DocumentHash => "document_hash",
            Self::Approval => "approval",
            Self::Certificate => "certificate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub id: String,
    pub kind: RecordKind,
    /// Application, document or certificate id the record anchors.
    pub reference: String,
    pub bbid: String,
    pub recorded_on: NaiveDate,
    pub previous_hash: String,
    pub hash: String,
    pub verified: bool,
}

impl LedgerRecord {
    pub fn expected_hash(&self) -> String {
        chain_hash(
            &self.previous_hash,
            &self.id,
            self.kind,
            &self.reference,
            &self.bbid,
            self.recorded_on,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainVerification {
    pub valid: bool,
    pub checked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broken_at: Option<String>,
}

fn chain_hash(
    previous_hash: &str,
    id: &str,
    kind: RecordKind,
    reference: &str,
    bbid: &str,
    recorded_on: NaiveDate,
) -> String {
    let recorded_on = recorded_on.to_string();
    let mut hasher = Sha256::new();
    // Each field is length-prefixed so bytes cannot shift between neighbours.
    for field in [
        previous_hash,
        id,
        kind.label(),
        reference,
        bbid,
        recorded_on.as_str(),
    ] {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

fn build_record(
    records: &[LedgerRecord],
    kind: RecordKind,
    reference: &str,
    bbid: &str,
    recorded_on: NaiveDate,
) -> LedgerRecord {
    let id = format!("BLK-{:04}", records.len() + 1);
    let previous_hash = records
        .last()
        .map(|record| record.hash.clone())
        .unwrap_or_else(|| GENESIS_HASH.to_string());
    let hash = chain_hash(&previous_hash, &id, kind, reference, bbid, recorded_on);

    LedgerRecord {
        id,
        kind,
        reference: reference.to_string(),
        bbid: bbid.to_string(),
        recorded_on,
        previous_hash,
        hash,
        verified: false,
    }
}

/// Append a record to the end of the chain. New records start unverified.
pub fn append_record(
    store: &mut FixtureStore,
    kind: RecordKind,
    reference: &str,
    bbid: &str,
    today: NaiveDate,
) -> LedgerRecord {
    let record = build_record(&store.ledger, kind, reference, bbid, today);
    info!(record = %record.id, kind = kind.label(), reference, "ledger record appended");
    store.ledger.push(record.clone());
    record
}

pub fn mark_verified<'a>(store: &'a mut FixtureStore, id: &str) -> Option<&'a LedgerRecord> {
    match store.ledger.iter_mut().find(|record| record.id == id) {
        Some(record) => {
            record.verified = true;
            Some(&*record)
        }
        None => {
            warn!(record = id, "verification requested for unknown ledger record");
            None
        }
    }
}

pub fn record_by_id<'a>(records: &'a [LedgerRecord], id: &str) -> Option<&'a LedgerRecord> {
    records.iter().find(|record| record.id == id)
}

pub fn records_for_bbid<'a>(records: &'a [LedgerRecord], bbid: &str) -> Vec<&'a LedgerRecord> {
    records.iter().filter(|record| record.bbid == bbid).collect()
}

/// Walk the chain from genesis and report the first record whose link or hash is wrong.
pub fn verify_chain(records: &[LedgerRecord]) -> ChainVerification {
    let mut expected_previous = GENESIS_HASH;

    for (index, record) in records.iter().enumerate() {
        if record.previous_hash != expected_previous || record.hash != record.expected_hash() {
            return ChainVerification {
                valid: false,
                checked: index + 1,
                broken_at: Some(record.id.clone()),
            };
        }
        expected_previous = record.hash.as_str();
    }

    ChainVerification {
        valid: true,
        checked: records.len(),
        broken_at: None,
    }
}

/// Share of records that have been verified.
pub fn trust_level(records: &[LedgerRecord]) -> u32 {
    let verified = records.iter().filter(|record| record.verified).count();
    percentage(verified, records.len())
}

pub(crate) fn seed() -> Vec<LedgerRecord> {
    let entries = [
        (RecordKind::Certificate, "CERT-RJSC-1001", "BBID-1001", day(2024, 1, 19), true),
        (RecordKind::Approval, "APP-2024-001", "BBID-1001", day(2024, 2, 20), true),
        (RecordKind::DocumentHash, "DOC-001", "BBID-1001", day(2024, 2, 21), true),
        (RecordKind::Approval, "APP-2024-003", "BBID-1003", day(2024, 3, 24), true),
        (RecordKind::DocumentHash, "DOC-006", "BBID-1016", day(2024, 5, 22), false),
        (RecordKind::Approval, "APP-2024-009", "BBID-1009", day(2024, 5, 9), true),
    ];

    let mut records: Vec<LedgerRecord> = Vec::with_capacity(entries.len());
    for (kind, reference, bbid, recorded_on, verified) in entries {
        let mut record = build_record(&records, kind, reference, bbid, recorded_on);
        record.verified = verified;
        records.push(record);
    }
    records
}
