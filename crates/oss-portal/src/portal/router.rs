//! JSON endpoints over the portal engines.
//!
//! Handlers take the store lock for the duration of one engine call and never hold it across
//! an `.await`. Missing ids answer `404`, rejected purchase transitions `409`.

use std::sync::{Arc, Mutex, PoisonError, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::applications::{self, ApplicationFilter, ApplicationId, Sector};
use super::bundles::{self, Bundle, BundleSavings};
use super::devices;
use super::documents;
use super::ledger::{self, RecordKind};
use super::notifications::{self, CountSource};
use super::officers;
use super::overview;
use super::sla;
use super::store::{FixtureStore, SharedStore};
use super::talent::{self, TalentMetric};
use crate::error::AppError;

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
const DEFAULT_TALENT_LIMIT: usize = 5;
const DEFAULT_EXPIRY_WINDOW_DAYS: u32 = 30;

#[derive(Clone)]
pub struct PortalState {
    pub store: SharedStore,
    pub counts: Arc<Mutex<Box<dyn CountSource>>>,
    /// Pins "today"; the UTC date is used when unset.
    pub reference_date: Option<NaiveDate>,
}

impl PortalState {
    pub fn new<C>(store: SharedStore, counts: C, reference_date: Option<NaiveDate>) -> Self
    where
        C: CountSource + 'static,
    {
        Self {
            store,
            counts: Arc::new(Mutex::new(Box::new(counts))),
            reference_date,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }

    fn read(&self) -> RwLockReadGuard<'_, FixtureStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FixtureStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn portal_router(state: PortalState) -> Router {
    Router::new()
        .route("/api/v1/applications", get(list_applications))
        .route("/api/v1/applications/summary", get(application_summary))
        .route("/api/v1/applications/:id", get(get_application))
        .route("/api/v1/applications/:id/assign", post(assign_application))
        .route("/api/v1/officers/leaderboard", get(officer_leaderboard))
        .route("/api/v1/sla/agencies", get(sla_agencies))
        .route("/api/v1/sla/bottlenecks", get(sla_bottlenecks))
        .route("/api/v1/bundles", get(list_bundles))
        .route("/api/v1/bundles/:id", get(get_bundle))
        .route("/api/v1/bundles/:id/purchase", post(purchase_bundle))
        .route("/api/v1/purchases/:id/payment", post(pay_purchase))
        .route(
            "/api/v1/purchases/:id/services/:service_id/complete",
            post(complete_purchase_service),
        )
        .route("/api/v1/purchases/:id/cancel", post(cancel_purchase))
        .route("/api/v1/purchases/:id/progress", get(purchase_progress))
        .route("/api/v1/marketplace/stats", get(marketplace_stats))
        .route("/api/v1/talent/divisions", get(talent_divisions))
        .route("/api/v1/talent/top", get(talent_top))
        .route("/api/v1/talent/search", get(talent_search))
        .route("/api/v1/ledger/records", get(ledger_records).post(append_ledger_record))
        .route("/api/v1/ledger/records/:id/verify", post(verify_ledger_record))
        .route("/api/v1/ledger/verify", get(verify_ledger))
        .route("/api/v1/documents", get(list_documents))
        .route("/api/v1/documents/expiring", get(expiring_documents))
        .route("/api/v1/documents/:id/share", post(share_document))
        .route("/api/v1/documents/:id/comments", post(comment_on_document))
        .route("/api/v1/devices", get(list_devices))
        .route("/api/v1/devices/:id/sync", post(sync_device))
        .route("/api/v1/notifications/:bbid", get(notification_counts))
        .route("/api/v1/notifications/:bbid/read", post(read_notifications))
        .route("/api/v1/overview", get(portal_overview))
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

fn not_found(kind: &str, id: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("{kind} {id} not found"))
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BbidQuery {
    pub bbid: Option<String>,
}

async fn list_applications(
    State(state): State<PortalState>,
    Query(filter): Query<ApplicationFilter>,
) -> Response {
    let store = state.read();
    let matching: Vec<_> = applications::filter(&store.applications, &filter)
        .into_iter()
        .cloned()
        .collect();
    Json(matching).into_response()
}

async fn application_summary(State(state): State<PortalState>) -> Response {
    let store = state.read();
    let breakdown = applications::status_breakdown(&store.applications);
    Json(json!({
        "breakdown": breakdown,
        "approval_rate": breakdown.approval_rate(),
        "total_investment_usd": applications::total_investment(&store.applications),
        "sectors": applications::sector_breakdown(&store.applications),
    }))
    .into_response()
}

async fn get_application(State(state): State<PortalState>, Path(id): Path<String>) -> Response {
    let store = state.read();
    match applications::application_by_id(&store.applications, &ApplicationId(id.clone())) {
        Some(application) => {
            let days = applications::days_in_progress(application, state.today());
            Json(json!({ "application": application, "days_in_progress": days })).into_response()
        }
        None => not_found("application", &id),
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub officer_email: String,
}

async fn assign_application(
    State(state): State<PortalState>,
    Path(id): Path<String>,
    Json(request): Json<AssignRequest>,
) -> Response {
    let mut store = state.write();
    let assigned =
        applications::assign_officer(&mut store, &ApplicationId(id), &request.officer_email);
    match assigned {
        Ok(application) => Json(application.clone()).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

async fn officer_leaderboard(
    State(state): State<PortalState>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let store = state.read();
    let stats = officers::officer_stats(&store.officers, &store.applications, state.today());
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    Json(json!({
        "leaderboard": officers::leaderboard(&stats, limit),
        "team_averages": officers::team_averages(&stats),
    }))
    .into_response()
}

async fn sla_agencies(State(state): State<PortalState>) -> Response {
    let store = state.read();
    let stats = sla::agency_stats(&store.agencies, &store.applications);
    Json(json!({
        "portal_compliance": sla::portal_compliance(&stats),
        "agencies": stats,
    }))
    .into_response()
}

async fn sla_bottlenecks(State(state): State<PortalState>) -> Response {
    let store = state.read();
    Json(sla::bottlenecks(&store.agencies)).into_response()
}

#[derive(Debug, Serialize)]
struct BundleListing<'a> {
    #[serde(flatten)]
    bundle: &'a Bundle,
    savings: BundleSavings,
    estimated_days: u32,
}

impl<'a> BundleListing<'a> {
    fn new(bundle: &'a Bundle) -> Self {
        Self {
            bundle,
            savings: bundles::bundle_savings(bundle),
            estimated_days: bundle.estimated_days(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SectorQuery {
    pub sector: Option<Sector>,
}

async fn list_bundles(
    State(state): State<PortalState>,
    Query(query): Query<SectorQuery>,
) -> Response {
    let store = state.read();
    let selected: Vec<&Bundle> = match query.sector {
        Some(sector) => bundles::bundles_for_sector(&store.bundles, sector),
        None => store.bundles.iter().collect(),
    };
    let listings: Vec<BundleListing<'_>> = selected.into_iter().map(BundleListing::new).collect();
    Json(listings).into_response()
}

async fn get_bundle(State(state): State<PortalState>, Path(id): Path<String>) -> Response {
    let store = state.read();
    match bundles::bundle_by_id(&store.bundles, &id) {
        Some(bundle) => Json(BundleListing::new(bundle)).into_response(),
        None => not_found("bundle", &id),
    }
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub bbid: String,
}

async fn purchase_bundle(
    State(state): State<PortalState>,
    Path(id): Path<String>,
    Json(request): Json<PurchaseRequest>,
) -> Response {
    let today = state.today();
    let mut store = state.write();
    match bundles::purchase_bundle(&mut store, &id, &request.bbid, today) {
        Ok(purchase) => (StatusCode::CREATED, Json(purchase)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

async fn pay_purchase(State(state): State<PortalState>, Path(id): Path<String>) -> Response {
    let today = state.today();
    let mut store = state.write();
    match bundles::process_bundle_payment(&mut store, &id, today) {
        Ok(purchase) => Json(purchase).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

async fn complete_purchase_service(
    State(state): State<PortalState>,
    Path((id, service_id)): Path<(String, String)>,
) -> Response {
    let today = state.today();
    let mut store = state.write();
    match bundles::complete_service(&mut store, &id, &service_id, today) {
        Ok(purchase) => Json(purchase).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

async fn cancel_purchase(
    State(state): State<PortalState>,
    Path(id): Path<String>,
    request: Option<Json<CancelRequest>>,
) -> Response {
    let today = state.today();
    let reason = request.and_then(|Json(body)| body.reason);
    let mut store = state.write();
    match bundles::cancel_purchase(&mut store, &id, today, reason) {
        Ok(purchase) => Json(purchase).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

async fn purchase_progress(State(state): State<PortalState>, Path(id): Path<String>) -> Response {
    let store = state.read();
    match bundles::bundle_progress(&store, &id) {
        Some(progress) => Json(progress).into_response(),
        None => not_found("purchase", &id),
    }
}

async fn marketplace_stats(State(state): State<PortalState>) -> Response {
    let store = state.read();
    Json(bundles::marketplace_stats(&store)).into_response()
}

async fn talent_divisions(State(state): State<PortalState>) -> Response {
    let store = state.read();
    Json(talent::division_summary(&store.districts)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct TalentTopQuery {
    pub metric: Option<TalentMetric>,
    pub limit: Option<usize>,
}

async fn talent_top(
    State(state): State<PortalState>,
    Query(query): Query<TalentTopQuery>,
) -> Response {
    let store = state.read();
    let metric = query.metric.unwrap_or(TalentMetric::TechnicalSkilled);
    let limit = query.limit.unwrap_or(DEFAULT_TALENT_LIMIT);
    let districts: Vec<_> = talent::top_districts(&store.districts, metric, limit)
        .into_iter()
        .map(|district| {
            json!({
                "district": district,
                "technical_share": district.technical_share(),
                "heat": district.heat_level(),
            })
        })
        .collect();
    Json(districts).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SkillQuery {
    pub skill: String,
}

async fn talent_search(
    State(state): State<PortalState>,
    Query(query): Query<SkillQuery>,
) -> Response {
    let store = state.read();
    let districts: Vec<_> = talent::districts_with_skill(&store.districts, &query.skill)
        .into_iter()
        .cloned()
        .collect();
    Json(districts).into_response()
}

async fn ledger_records(
    State(state): State<PortalState>,
    Query(query): Query<BbidQuery>,
) -> Response {
    let store = state.read();
    match query.bbid.as_deref() {
        Some(bbid) => {
            let records: Vec<_> = ledger::records_for_bbid(&store.ledger, bbid)
                .into_iter()
                .cloned()
                .collect();
            Json(records).into_response()
        }
        None => Json(store.ledger.clone()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AppendRecordRequest {
    pub kind: RecordKind,
    pub reference: String,
    pub bbid: String,
}

async fn append_ledger_record(
    State(state): State<PortalState>,
    Json(request): Json<AppendRecordRequest>,
) -> Response {
    if request.reference.trim().is_empty() || request.bbid.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "reference and bbid are required");
    }
    let today = state.today();
    let mut store = state.write();
    let record = ledger::append_record(
        &mut store,
        request.kind,
        &request.reference,
        &request.bbid,
        today,
    );
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn verify_ledger_record(
    State(state): State<PortalState>,
    Path(id): Path<String>,
) -> Response {
    let mut store = state.write();
    match ledger::mark_verified(&mut store, &id) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found("ledger record", &id),
    }
}

async fn verify_ledger(State(state): State<PortalState>) -> Response {
    let store = state.read();
    Json(json!({
        "verification": ledger::verify_chain(&store.ledger),
        "trust_level": ledger::trust_level(&store.ledger),
    }))
    .into_response()
}

async fn list_documents(
    State(state): State<PortalState>,
    Query(query): Query<BbidQuery>,
) -> Response {
    let store = state.read();
    let selected: Vec<_> = match query.bbid.as_deref() {
        Some(bbid) => documents::documents_for_bbid(&store.documents, bbid),
        None => store.documents.iter().collect(),
    };
    Json(json!({
        "summary": documents::vault_summary(selected.iter().copied()),
        "documents": selected,
    }))
    .into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpiryQuery {
    pub days: Option<u32>,
}

async fn expiring_documents(
    State(state): State<PortalState>,
    Query(query): Query<ExpiryQuery>,
) -> Response {
    let store = state.read();
    let days = query.days.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS);
    Json(documents::expiring_within(&store.documents, state.today(), days)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub agency: String,
}

async fn share_document(
    State(state): State<PortalState>,
    Path(id): Path<String>,
    Json(request): Json<ShareRequest>,
) -> Response {
    let today = state.today();
    let mut store = state.write();
    match documents::share_document(&mut store, &id, &request.agency, today) {
        Some(document) => Json(document.clone()).into_response(),
        None => not_found("document", &id),
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub author: String,
    pub body: String,
}

async fn comment_on_document(
    State(state): State<PortalState>,
    Path(id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Response {
    if request.body.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "comment body is empty");
    }
    let today = state.today();
    let mut store = state.write();
    match documents::add_comment(&mut store, &id, &request.author, &request.body, today) {
        Some(document) => (StatusCode::CREATED, Json(document.clone())).into_response(),
        None => not_found("document", &id),
    }
}

async fn list_devices(State(state): State<PortalState>) -> Response {
    let store = state.read();
    Json(json!({
        "summary": devices::fleet_summary(&store.devices, state.today()),
        "devices": store.devices,
    }))
    .into_response()
}

async fn sync_device(State(state): State<PortalState>, Path(id): Path<String>) -> Response {
    let today = state.today();
    let mut store = state.write();
    match devices::sync_device(&mut store, &id, today) {
        Some(device) => Json(device.clone()).into_response(),
        None => not_found("device", &id),
    }
}

async fn notification_counts(
    State(state): State<PortalState>,
    Path(bbid): Path<String>,
) -> Response {
    let store = state.read();
    let mut counts = state.counts.lock().unwrap_or_else(PoisonError::into_inner);
    let snapshot = notifications::notification_snapshot(&store.notifications, &bbid, &mut **counts);
    Json(snapshot).into_response()
}

async fn read_notifications(
    State(state): State<PortalState>,
    Path(bbid): Path<String>,
) -> Response {
    let mut store = state.write();
    let marked = notifications::mark_all_read(&mut store, &bbid);
    Json(json!({ "bbid": bbid, "marked_read": marked })).into_response()
}

async fn portal_overview(State(state): State<PortalState>) -> Response {
    let store = state.read();
    Json(overview::portal_overview(&store, state.today())).into_response()
}
