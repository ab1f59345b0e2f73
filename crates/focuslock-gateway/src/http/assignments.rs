//! Assignment endpoints.
//!
//! Request:  `POST /api/assignments` with
//!           `{"name", "deadline", "total_hours", "milestones": [{"task", "period"}]}`
//! Response: `201 {"assignment_id": ...}`
//! Error:    `{"error": "..."}` (400 for anything wrong with the save)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use focuslock_core::types::{Assignment, Milestone, RecordId};
use focuslock_core::FocusError;
use focuslock_planner::{SaveAssignmentRequest, SaveError, ScheduleOutcome};
use focuslock_store::StoreError;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::AppState;

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

fn api_error(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            error: error.into(),
        }),
    )
}

/// An assignment together with its milestones in creation order.
#[derive(Serialize)]
pub struct AssignmentDetail {
    pub assignment: Assignment,
    pub milestones: Vec<Milestone>,
}

/// POST /api/assignments: save the assignment, its milestones and goals.
///
/// Succeeds with 201 as soon as the assignment row exists, whatever
/// happened to individual milestones or goal writes.
pub async fn save_assignment_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveAssignmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "POST /api/assignments: unreadable body");
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        )
    })?;

    match focuslock_planner::save_assignment(state.store.as_ref(), req).await {
        Ok(outcome) => {
            let schedule = match &outcome.schedule {
                ScheduleOutcome::Applied { .. } => "applied",
                ScheduleOutcome::Partial { .. } => "partial",
                ScheduleOutcome::Skipped(_) => "skipped",
                ScheduleOutcome::Unavailable(_) => "unavailable",
            };
            info!(
                assignment_id = %outcome.assignment.id,
                saved = outcome.milestones_saved,
                skipped = outcome.milestones_skipped,
                schedule,
                "POST /api/assignments ok"
            );
            Ok((
                StatusCode::CREATED,
                Json(json!({ "assignment_id": outcome.assignment.id })),
            ))
        }
        Err(SaveError::Invalid(e)) => {
            warn!(code = e.code(), error = %e, "POST /api/assignments rejected");
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            warn!(error = %e, "POST /api/assignments failed");
            Err(api_error(
                StatusCode::BAD_REQUEST,
                format!("Failed to save assignment: {e}"),
            ))
        }
    }
}

/// GET /api/assignments/{id}
pub async fn get_assignment_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<AssignmentDetail>> {
    let id = RecordId::from(id.as_str());
    let assignment = state
        .store
        .get_assignment(&id)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| not_found(&id))?;
    with_milestones(&state, assignment).await
}

/// GET /api/assignments/latest: the most recently created assignment.
pub async fn latest_assignment_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<AssignmentDetail>> {
    let assignment = state
        .store
        .latest_assignment()
        .await
        .map_err(store_failure)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "No assignments found"))?;
    with_milestones(&state, assignment).await
}

async fn with_milestones(
    state: &AppState,
    assignment: Assignment,
) -> ApiResult<Json<AssignmentDetail>> {
    let milestones = state
        .store
        .list_milestones(&assignment.id)
        .await
        .map_err(store_failure)?;
    Ok(Json(AssignmentDetail {
        assignment,
        milestones,
    }))
}

fn not_found(id: &RecordId) -> (StatusCode, Json<ApiError>) {
    let e = FocusError::AssignmentNotFound { id: id.to_string() };
    api_error(StatusCode::NOT_FOUND, e.to_string())
}

fn store_failure(e: StoreError) -> (StatusCode, Json<ApiError>) {
    let e = FocusError::from(e);
    warn!(code = e.code(), error = %e, "store read failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
