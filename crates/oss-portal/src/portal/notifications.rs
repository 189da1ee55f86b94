//! Investor notification feed.
//!
//! Unread counts are read straight from the fixtures. The simulated "new since your last
//! visit" figure is the only random value in the portal and is drawn from a [`CountSource`]
//! so callers can substitute a fixed source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::applications::seed::day;
use super::store::FixtureStore;

pub trait CountSource: Send {
    /// A value in `0..=ceiling`.
    fn next_count(&mut self, ceiling: u32) -> u32;
}

/// Deterministic xorshift64 stream.
#[derive(Debug, Clone)]
pub struct SeededCounts {
    state: u64,
}

impl SeededCounts {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl CountSource for SeededCounts {
    fn next_count(&mut self, ceiling: u32) -> u32 {
        (self.next_u64() % (ceiling as u64 + 1)) as u32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedCount(pub u32);

impl CountSource for FixedCount {
    fn next_count(&mut self, ceiling: u32) -> u32 {
        self.0.min(ceiling)
    }
}

/// Upper bound for the simulated new-notification figure.
pub const MAX_SIMULATED_NEW: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub bbid: String,
    pub title: String,
    pub posted_on: NaiveDate,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationSnapshot {
    pub bbid: String,
    pub total: usize,
    pub unread: usize,
    pub simulated_new: u32,
}

pub fn notifications_for_bbid<'a>(
    notifications: &'a [Notification],
    bbid: &str,
) -> Vec<&'a Notification> {
    notifications
        .iter()
        .filter(|notification| notification.bbid == bbid)
        .collect()
}

pub fn unread_count(notifications: &[Notification], bbid: &str) -> usize {
    notifications
        .iter()
        .filter(|notification| notification.bbid == bbid && !notification.read)
        .count()
}

pub fn notification_snapshot(
    notifications: &[Notification],
    bbid: &str,
    source: &mut dyn CountSource,
) -> NotificationSnapshot {
    NotificationSnapshot {
        bbid: bbid.to_string(),
        total: notifications_for_bbid(notifications, bbid).len(),
        unread: unread_count(notifications, bbid),
        simulated_new: source.next_count(MAX_SIMULATED_NEW),
    }
}

/// Returns how many notifications flipped to read.
pub fn mark_all_read(store: &mut FixtureStore, bbid: &str) -> usize {
    let mut flipped = 0;
    for notification in store
        .notifications
        .iter_mut()
        .filter(|notification| notification.bbid == bbid && !notification.read)
    {
        notification.read = true;
        flipped += 1;
    }
    debug!(bbid, flipped, "notifications marked read");
    flipped
}

pub(crate) fn seed() -> Vec<Notification> {
    [
        ("NTF-001", "BBID-1001", "Environmental clearance awaiting DOE site visit", day(2024, 6, 20), false),
        ("NTF-002", "BBID-1001", "Tax clearance certificate pending verification", day(2024, 6, 3), false),
        ("NTF-003", "BBID-1001", "Trade licence verified", day(2024, 1, 6), true),
        ("NTF-004", "BBID-1016", "Factory Setup Bundle payment received", day(2024, 5, 22), true),
        ("NTF-005", "BBID-1016", "Fire safety licence inspection scheduled", day(2024, 6, 18), false),
        ("NTF-006", "BBID-1018", "Complete payment for Company Start-Up Bundle", day(2024, 6, 5), false),
    ]
    .into_iter()
    .map(|(id, bbid, title, posted_on, read)| Notification {
        id: id.to_string(),
        bbid: bbid.to_string(),
        title: title.to_string(),
        posted_on,
        read,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_counts_are_deterministic() {
        let notifications = seed();
        assert_eq!(unread_count(&notifications, "BBID-1001"), 2);
        assert_eq!(unread_count(&notifications, "BBID-1001"), 2);
        assert_eq!(unread_count(&notifications, "BBID-0000"), 0);
    }

    #[test]
    fn fixed_source_pins_simulated_count() {
        let notifications = seed();
        let mut source = FixedCount(3);
        let first = notification_snapshot(&notifications, "BBID-1016", &mut source);
        let second = notification_snapshot(&notifications, "BBID-1016", &mut source);
        assert_eq!(first, second);
        assert_eq!(first.simulated_new, 3);
        assert_eq!(first.total, 2);
        assert_eq!(first.unread, 1);

        let mut capped = FixedCount(50);
        assert_eq!(capped.next_count(MAX_SIMULATED_NEW), MAX_SIMULATED_NEW);
    }

    #[test]
    fn seeded_source_replays_and_stays_in_range() {
        let mut a = SeededCounts::new(2024);
        let mut b = SeededCounts::new(2024);
        for _ in 0..32 {
            let value = a.next_count(MAX_SIMULATED_NEW);
            assert_eq!(value, b.next_count(MAX_SIMULATED_NEW));
            assert!(value <= MAX_SIMULATED_NEW);
        }
        assert!(SeededCounts::new(0).next_count(10) <= 10);
    }

    #[test]
    fn mark_all_read_clears_unread() {
        let mut store = FixtureStore::empty();
        store.notifications = seed();
        assert_eq!(mark_all_read(&mut store, "BBID-1001"), 2);
        assert_eq!(unread_count(&store.notifications, "BBID-1001"), 0);
        assert_eq!(mark_all_read(&mut store, "BBID-1001"), 0);
    }
}
