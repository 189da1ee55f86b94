use axum::http::StatusCode;
use serde_json::Value;

use super::common::*;

#[tokio::test]
async fn applications_can_be_filtered_by_query() {
    let state = state();
    let router = router_with(&state);

    let (status, payload) = send(&router, get("/api/v1/applications?sector=textiles")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload.as_array().map(Vec::len), Some(5));

    let (_, payload) = send(
        &router,
        get("/api/v1/applications?sector=textiles&status=approved"),
    )
    .await;
    assert_eq!(payload.as_array().map(Vec::len), Some(4));

    let (_, payload) = send(&router, get("/api/v1/applications")).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(20));
}

#[tokio::test]
async fn summary_reports_status_partition() {
    let router = router_with(&state());
    let (status, payload) = send(&router, get("/api/v1/applications/summary")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["breakdown"]["total"], 20);
    assert_eq!(payload["breakdown"]["approved"], 12);
    assert_eq!(payload["approval_rate"], 60);
    let partition: u64 = ["approved", "rejected", "in_progress", "under_review"]
        .iter()
        .filter_map(|key| payload["breakdown"][key].as_u64())
        .sum();
    assert_eq!(partition, 20);
}

#[tokio::test]
async fn unknown_application_is_not_found() {
    let router = router_with(&state());

    let (status, payload) = send(&router, get("/api/v1/applications/APP-2024-001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["application"]["id"], "APP-2024-001");
    assert_eq!(payload["days_in_progress"], 42);

    let (status, payload) = send(&router, get("/api/v1/applications/APP-1999-404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("APP-1999-404"));
}

#[tokio::test]
async fn leaderboard_respects_limit() {
    let router = router_with(&state());
    let (status, payload) = send(&router, get("/api/v1/officers/leaderboard?limit=2")).await;

    assert_eq!(status, StatusCode::OK);
    let leaderboard = payload["leaderboard"].as_array().cloned().unwrap_or_default();
    assert_eq!(leaderboard.len(), 2);
    assert!(payload["team_averages"]["approval_rate"].is_number());
}

#[tokio::test]
async fn bottlenecks_are_sorted_by_delay() {
    let router = router_with(&state());
    let (status, payload) = send(&router, get("/api/v1/sla/bottlenecks")).await;

    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = payload
        .as_array()
        .map(|entries| entries.iter().filter_map(|e| e["code"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(codes, vec!["DOE", "FSCD"]);

    let (_, payload) = send(&router, get("/api/v1/sla/agencies")).await;
    assert_eq!(payload["agencies"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn bundle_listing_includes_savings() {
    let router = router_with(&state());

    let (status, payload) = send(&router, get("/api/v1/bundles/BUNDLE-001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["price_bdt"], 13_500);
    assert_eq!(payload["savings"]["savings_bdt"], 2_000);

    let (_, payload) = send(&router, get("/api/v1/bundles?sector=textiles")).await;
    let ids: Vec<&str> = payload
        .as_array()
        .map(|entries| entries.iter().filter_map(|e| e["id"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids.first().copied(), Some("BUNDLE-003"));

    let (status, _) = send(&router, get("/api/v1/bundles/BUNDLE-404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn talent_endpoints_rank_districts() {
    let router = router_with(&state());

    let (status, payload) = send(
        &router,
        get("/api/v1/talent/top?metric=technical_skilled&limit=2"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload[0]["district"]["district"], "Dhaka");
    assert_eq!(payload.as_array().map(Vec::len), Some(2));

    let (_, payload) = send(&router, get("/api/v1/talent/divisions")).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(8));
}

#[tokio::test]
async fn notification_counts_use_injected_source() {
    let router = router_with(&state());

    let (status, first) = send(&router, get("/api/v1/notifications/BBID-1001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["unread"], 2);
    assert_eq!(first["simulated_new"], SIMULATED_NEW);

    let (_, second) = send(&router, get("/api/v1/notifications/BBID-1001")).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn ledger_and_overview_render() {
    let router = router_with(&state());

    let (status, payload) = send(&router, get("/api/v1/ledger/verify")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["verification"]["valid"], Value::Bool(true));
    assert_eq!(payload["trust_level"], 83);

    let (status, payload) = send(&router, get("/api/v1/overview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["as_of"], "2024-06-30");
    assert_eq!(payload["approval_rate"], 60);
    assert!(payload["health"].is_string());
}

#[tokio::test]
async fn reads_are_idempotent() {
    let router = router_with(&state());
    for uri in [
        "/api/v1/marketplace/stats",
        "/api/v1/documents?bbid=BBID-1001",
        "/api/v1/devices",
        "/api/v1/overview",
    ] {
        let (_, first) = send(&router, get(uri)).await;
        let (_, second) = send(&router, get(uri)).await;
        assert_eq!(first, second, "{uri} changed between reads");
    }
}

#[tokio::test]
async fn expiring_documents_accept_any_window() {
    let router = router_with(&state());

    let (status, payload) = send(&router, get("/api/v1/documents/expiring")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload.as_array().map(Vec::len), Some(2));

    let (status, payload) = send(
        &router,
        get("/api/v1/documents/expiring?days=4294967295"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload.as_array().map(Vec::len), Some(5));
    assert_eq!(payload[0]["id"], "DOC-007");
}
