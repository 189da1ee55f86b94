use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use crate::portal::notifications::FixedCount;
use crate::portal::{portal_router, FixtureStore, PortalState};

pub(super) const SIMULATED_NEW: u32 = 2;

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).expect("valid date")
}

pub(super) fn state() -> PortalState {
    let store = FixtureStore::seeded().expect("bundled fixtures load");
    PortalState::new(store.shared(), FixedCount(SIMULATED_NEW), Some(reference_date()))
}

pub(super) fn router_with(state: &PortalState) -> Router {
    portal_router(state.clone())
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

pub(super) fn post(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).expect("request builds")
}

pub(super) fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

pub(super) async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json payload")
    };
    (status, payload)
}
