//! Shared numeric helpers for every derived-metrics engine.
//!
//! Rates are whole percentages rounded half-up, and empty denominators collapse to zero so
//! downstream views never render `NaN`.

/// Half-up rounding (`floor(x + 0.5)`), matching how the portal front-end rounds.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Half-up rounding to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    round_half_up(value * scale) / scale
}

/// `matching / total` as a whole percentage; zero when `total` is zero.
pub fn percentage(matching: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }

    let pct = round_half_up(matching as f64 / total as f64 * 100.0);
    pct.clamp(0.0, u32::MAX as f64) as u32
}

/// Arithmetic mean; zero for an empty input.
pub fn average<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Sort descending by `key`. Equal keys keep their input order.
pub fn rank_by<T, K, F>(items: &mut [T], mut key: F)
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    items.sort_by(|a, b| {
        key(b)
            .partial_cmp(&key(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// [`rank_by`] followed by truncation to `limit` entries.
pub fn top_n<T, K, F>(mut items: Vec<T>, limit: usize, key: F) -> Vec<T>
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    rank_by(&mut items, key);
    items.truncate(limit);
    items
}
