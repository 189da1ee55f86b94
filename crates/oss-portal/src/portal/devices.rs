use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::applications::seed::day;
use super::metrics::percentage;
use super::store::FixtureStore;

/// Devices that have not synced for longer than this are flagged stale.
pub const STALE_AFTER_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Fingerprint,
    Face,
    Iris,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricDevice {
    pub id: String,
    pub location: String,
    pub modality: Modality,
    pub online: bool,
    pub last_sync: NaiveDate,
    pub enrolled_users: u32,
    pub sync_log: Vec<NaiveDate>,
}

impl BiometricDevice {
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        (today - self.last_sync).num_days() > STALE_AFTER_DAYS
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    pub total: usize,
    pub online: usize,
    pub online_rate: u32,
    pub enrolled_users: u64,
    pub stale: usize,
}

pub fn fleet_summary(devices: &[BiometricDevice], today: NaiveDate) -> FleetSummary {
    let online = devices.iter().filter(|device| device.online).count();
    FleetSummary {
        total: devices.len(),
        online,
        online_rate: percentage(online, devices.len()),
        enrolled_users: devices.iter().map(|d| d.enrolled_users as u64).sum(),
        stale: devices.iter().filter(|d| d.is_stale(today)).count(),
    }
}

pub fn devices_by_modality(
    devices: &[BiometricDevice],
    modality: Modality,
) -> Vec<&BiometricDevice> {
    devices
        .iter()
        .filter(|device| device.modality == modality)
        .collect()
}

pub fn sync_device<'a>(
    store: &'a mut FixtureStore,
    id: &str,
    today: NaiveDate,
) -> Option<&'a BiometricDevice> {
    let Some(device) = store.devices.iter_mut().find(|device| device.id == id) else {
        warn!(device = id, "sync requested for unknown device");
        return None;
    };

    device.online = true;
    device.last_sync = today;
    device.sync_log.push(today);
    info!(device = id, syncs = device.sync_log.len(), "device synced");
    Some(&*device)
}

pub(crate) fn seed() -> Vec<BiometricDevice> {
    [
        ("BIO-01", "BIDA HQ, Agargaon", Modality::Fingerprint, true, day(2024, 6, 29), 1_240),
        ("BIO-02", "BIDA HQ, Agargaon", Modality::Face, true, day(2024, 6, 28), 860),
        ("BIO-03", "Chattogram regional office", Modality::Fingerprint, true, day(2024, 6, 27), 540),
        ("BIO-04", "Khulna regional office", Modality::Iris, false, day(2024, 6, 12), 210),
        ("BIO-05", "Sylhet regional office", Modality::Face, false, day(2024, 6, 25), 180),
    ]
    .into_iter()
    .map(
        |(id, location, modality, online, last_sync, enrolled_users)| BiometricDevice {
            id: id.to_string(),
            location: location.to_string(),
            modality,
            online,
            last_sync,
            enrolled_users,
            sync_log: vec![last_sync],
        },
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_summary_counts_online_and_stale_devices() {
        let summary = fleet_summary(&seed(), day(2024, 6, 30));
        assert_eq!(summary.total, 5);
        assert_eq!(summary.online, 3);
        assert_eq!(summary.online_rate, 60);
        assert_eq!(summary.enrolled_users, 3_030);
        assert_eq!(summary.stale, 1);
    }

    #[test]
    fn empty_fleet_reports_zero_rate() {
        let summary = fleet_summary(&[], day(2024, 6, 30));
        assert_eq!(summary.online_rate, 0);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn sync_brings_device_online() {
        let mut store = FixtureStore::empty();
        store.devices = seed();
        let today = day(2024, 6, 30);

        let device = sync_device(&mut store, "BIO-04", today).expect("device exists");
        assert!(device.online);
        assert_eq!(device.sync_log.len(), 2);
        assert_eq!(fleet_summary(&store.devices, today).stale, 0);
        assert!(sync_device(&mut store, "BIO-99", today).is_none());
    }

    #[test]
    fn modality_filter() {
        let devices = seed();
        assert_eq!(devices_by_modality(&devices, Modality::Face).len(), 2);
        assert_eq!(devices_by_modality(&devices, Modality::Iris).len(), 1);
    }
}
