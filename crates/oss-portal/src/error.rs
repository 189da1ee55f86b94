//! Crate-wide error type.
//!
//! Startup failures (config, telemetry, fixtures) and the recoverable engine errors share one
//! enum so both the binary and the HTTP handlers can render them.

use crate::config::ConfigError;
use crate::portal::applications::AssignError;
use crate::portal::bundles::BundleError;
use crate::portal::talent::TalentImportError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Fixtures(TalentImportError),
    Bundle(BundleError),
    Assignment(AssignError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Bundle(BundleError::UnknownBundle(_) | BundleError::UnknownPurchase(_))
            | AppError::Assignment(AssignError::UnknownApplication(_)) => StatusCode::NOT_FOUND,
            AppError::Bundle(
                BundleError::InvalidTransition { .. } | BundleError::ServiceAlreadyCompleted { .. },
            ) => StatusCode::CONFLICT,
            AppError::Bundle(BundleError::UnknownService { .. })
            | AppError::Assignment(AssignError::UnknownOfficer(_)) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Fixtures(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Fixtures(err) => write!(f, "fixture load failed: {err}"),
            AppError::Bundle(err) => write!(f, "{err}"),
            AppError::Assignment(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Fixtures(err) => Some(err),
            AppError::Bundle(err) => Some(err),
            AppError::Assignment(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<TalentImportError> for AppError {
    fn from(value: TalentImportError) -> Self {
        Self::Fixtures(value)
    }
}

impl From<BundleError> for AppError {
    fn from(value: BundleError) -> Self {
        Self::Bundle(value)
    }
}

impl From<AssignError> for AppError {
    fn from(value: AssignError) -> Self {
        Self::Assignment(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::bundles::{PurchaseAction, PurchaseStatus};

    #[test]
    fn engine_errors_map_to_client_statuses() {
        let cases = [
            (AppError::from(BundleError::UnknownPurchase("PUR-9".into())), StatusCode::NOT_FOUND),
            (
                AppError::from(BundleError::InvalidTransition {
                    purchase_id: "PUR-1".into(),
                    from: PurchaseStatus::Completed,
                    action: PurchaseAction::Cancel,
                }),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(BundleError::UnknownService {
                    purchase_id: "PUR-1".into(),
                    service_id: "SRV-999".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(AssignError::UnknownApplication("APP-X".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(AssignError::UnknownOfficer("nobody@bida.gov.bd".into())),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Config(ConfigError::InvalidPort), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "{error}");
        }
    }

    #[test]
    fn response_carries_the_message() {
        let response =
            AppError::from(BundleError::UnknownBundle("BUNDLE-404".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
