use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use rally_engine::{
    seed_lobbies, JobKind, JobReport, MaintenanceJobs, SeedOutcome, TriggerHandlers,
};
use rally_shared::models::{FriendRequest, Message, Mission};
use rally_store::DocumentStore;

use crate::error::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub jobs: Arc<MaintenanceJobs>,
    pub handlers: Arc<TriggerHandlers>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/lobbies/initialize", get(initialize_lobbies).post(initialize_lobbies))
        .route("/triggers/message-created", post(message_created))
        .route("/triggers/friend-request-created", post(friend_request_created))
        .route("/triggers/mission-created", post(mission_created))
        .route("/admin/jobs/:name/run", post(run_job))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ─── Lobby seeding ───

#[derive(Serialize)]
struct SeedResponse {
    success: bool,
    message: &'static str,
    results: Vec<SeedOutcome>,
}

/// One-shot idempotent lobby setup.  The only surface that reports
/// failures structurally to its caller.
async fn initialize_lobbies(
    State(state): State<AppState>,
) -> Result<Json<SeedResponse>, ServerError> {
    let results = seed_lobbies(state.store.as_ref(), Utc::now()).await?;

    info!(lobbies = results.len(), "Lobby initialization requested");
    Ok(Json(SeedResponse {
        success: true,
        message: "Lobbies initialized successfully",
        results,
    }))
}

// ─── Trigger entrypoints ───
//
// Invoked by the hosting trigger infrastructure when a document is
// created.  Handlers swallow their own failures, so these always accept.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageCreatedRequest {
    conversation_id: String,
    message_id: String,
    message: Message,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FriendRequestCreatedRequest {
    request_id: String,
    request: FriendRequest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MissionCreatedRequest {
    mission_id: String,
    mission: Mission,
}

#[derive(Serialize)]
struct AcceptedResponse {
    accepted: bool,
}

async fn message_created(
    State(state): State<AppState>,
    Json(req): Json<MessageCreatedRequest>,
) -> (StatusCode, Json<AcceptedResponse>) {
    state
        .handlers
        .on_message_created(&req.conversation_id, &req.message_id, req.message)
        .await;
    (StatusCode::ACCEPTED, Json(AcceptedResponse { accepted: true }))
}

async fn friend_request_created(
    State(state): State<AppState>,
    Json(req): Json<FriendRequestCreatedRequest>,
) -> (StatusCode, Json<AcceptedResponse>) {
    state
        .handlers
        .on_friend_request_created(&req.request_id, req.request)
        .await;
    (StatusCode::ACCEPTED, Json(AcceptedResponse { accepted: true }))
}

async fn mission_created(
    State(state): State<AppState>,
    Json(req): Json<MissionCreatedRequest>,
) -> (StatusCode, Json<AcceptedResponse>) {
    state
        .handlers
        .on_mission_created(&req.mission_id, req.mission)
        .await;
    (StatusCode::ACCEPTED, Json(AcceptedResponse { accepted: true }))
}

// ─── Admin job runs ───

#[derive(Serialize)]
struct JobRunResponse {
    job: JobKind,
    report: JobReport,
}

/// Run a single maintenance job on demand, outside its schedule.
async fn run_job(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<JobRunResponse>, ServerError> {
    let Some(job) = JobKind::from_name(&name) else {
        return Err(ServerError::UnknownJob(name));
    };

    let report = state.jobs.run(job, Utc::now()).await?;
    info!(job = job.name(), "Job run via admin API");
    Ok(Json(JobRunResponse { job, report }))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
