use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use oss_portal::config::PortalConfig;
use oss_portal::error::AppError;
use oss_portal::portal::FixtureStore;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_store(config: &PortalConfig) -> Result<FixtureStore, AppError> {
    FixtureStore::from_config(config).map_err(AppError::from)
}

/// First of the explicit override, the configured reference date, then the local calendar date.
pub(crate) fn resolve_today(
    explicit: Option<NaiveDate>,
    configured: Option<NaiveDate>,
) -> NaiveDate {
    explicit
        .or(configured)
        .unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date(" 2024-06-30 "),
            Ok(NaiveDate::from_ymd_opt(2024, 6, 30).expect("valid date"))
        );
        assert!(parse_date("30/06/2024").unwrap_err().contains("30/06/2024"));
    }

    #[test]
    fn explicit_today_wins_over_configuration() {
        let explicit = NaiveDate::from_ymd_opt(2024, 7, 1);
        let configured = NaiveDate::from_ymd_opt(2024, 6, 30);
        assert_eq!(resolve_today(explicit, configured), explicit.expect("valid date"));
        assert_eq!(resolve_today(None, configured), configured.expect("valid date"));
    }
}
