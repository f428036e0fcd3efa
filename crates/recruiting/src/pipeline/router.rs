use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use super::domain::{CandidateId, InterviewStepId, PositionId};
use super::repository::RecruitingRepository;
use super::service::{CandidatePipelineService, PipelineErrorKind, PipelineServiceError};

pub(crate) const INVALID_POSITION_ID: &str = "Invalid position ID";
pub(crate) const INVALID_STAGE_REQUEST: &str =
    "Invalid request. Both candidateId and stageId are required";
pub(crate) const CANDIDATE_NOT_FOUND: &str = "Candidate not found";
pub(crate) const INVALID_STAGE_ID: &str = "Invalid stage ID";
pub(crate) const INTERNAL_SERVER_ERROR: &str = "Internal server error";
pub(crate) const STAGE_UPDATED: &str = "Stage updated successfully";

/// Body accepted by the stage update endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StageUpdateRequest {
    #[serde(rename = "stageId", default)]
    pub stage_id: Option<i64>,
}

/// Router builder exposing the candidate listing and stage update endpoints.
pub fn pipeline_router<R>(service: Arc<CandidatePipelineService<R>>) -> Router
where
    R: RecruitingRepository + 'static,
{
    Router::new()
        .route(
            "/positions/:position_id/candidates",
            get(list_candidates_handler::<R>),
        )
        .route(
            "/candidates/:candidate_id/stage",
            put(update_stage_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_candidates_handler<R>(
    State(service): State<Arc<CandidatePipelineService<R>>>,
    position_id: Result<Path<String>, PathRejection>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    let Some(position_id) = parse_path_id(position_id) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_POSITION_ID);
    };

    match service.list_candidates(PositionId(position_id)) {
        Ok(candidates) => (StatusCode::OK, Json(candidates)).into_response(),
        Err(err) => {
            error!(position_id, error = %err, "GET /positions/:id/candidates failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
        }
    }
}

pub(crate) async fn update_stage_handler<R>(
    State(service): State<Arc<CandidatePipelineService<R>>>,
    candidate_id: Result<Path<String>, PathRejection>,
    payload: Result<Json<StageUpdateRequest>, JsonRejection>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    let candidate_id = parse_path_id(candidate_id);
    let stage_id = match payload {
        Ok(Json(request)) => request.stage_id.filter(|id| *id != 0),
        Err(rejection) => {
            warn!(error = %rejection, "rejected stage update body");
            None
        }
    };

    let (Some(candidate_id), Some(stage_id)) = (candidate_id, stage_id) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_STAGE_REQUEST);
    };

    match service.update_stage(CandidateId(candidate_id), InterviewStepId(stage_id)) {
        Ok(_) => (StatusCode::OK, Json(json!({ "message": STAGE_UPDATED }))).into_response(),
        Err(err) => stage_error_response(candidate_id, err),
    }
}

/// Strict integer id from a path segment. Segments that fail to percent-decode are
/// treated like any other malformed id.
fn parse_path_id(segment: Result<Path<String>, PathRejection>) -> Option<i64> {
    match segment {
        Ok(Path(raw)) => raw.trim().parse::<i64>().ok(),
        Err(rejection) => {
            warn!(error = %rejection, "rejected path segment");
            None
        }
    }
}

fn stage_error_response(candidate_id: i64, err: PipelineServiceError) -> Response {
    match err.kind() {
        PipelineErrorKind::NotFound => error_response(StatusCode::NOT_FOUND, CANDIDATE_NOT_FOUND),
        PipelineErrorKind::InvalidArgument => {
            error_response(StatusCode::BAD_REQUEST, INVALID_STAGE_ID)
        }
        PipelineErrorKind::InternalFailure => {
            error!(candidate_id, error = %err, "PUT /candidates/:id/stage failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
        }
    }
}

fn error_response(status: StatusCode, message: &'static str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
