use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::pipeline::fixture::HiringFixture;
use crate::pipeline::router::{
    list_candidates_handler, update_stage_handler, StageUpdateRequest, CANDIDATE_NOT_FOUND,
    INTERNAL_SERVER_ERROR, INVALID_POSITION_ID, INVALID_STAGE_ID, INVALID_STAGE_REQUEST,
    STAGE_UPDATED,
};
use crate::pipeline::service::CandidatePipelineService;
use crate::pipeline::ApplicationId;

fn stage_request(candidate: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri(format!("/candidates/{candidate}/stage"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn candidates_route_returns_flattened_rows() {
    let (service, _) = build_service();
    let router = pipeline_router_with_service(service);

    let response = router
        .oneshot(
            Request::get(format!("/positions/{}/candidates", HiringFixture::POSITION))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload,
        json!([
            {
                "candidateId": 1,
                "fullName": "John Doe",
                "currentStage": "Initial Interview",
                "averageScore": 4.0
            },
            {
                "candidateId": 2,
                "fullName": "Jane Smith",
                "currentStage": "Initial Interview",
                "averageScore": 5.0
            }
        ])
    );
}

#[tokio::test]
async fn candidates_route_serializes_missing_average_as_null() {
    let (service, _) = build_service();
    let router = pipeline_router_with_service(service);

    let response = router
        .oneshot(
            Request::get(format!("/positions/{SECOND_POSITION}/candidates"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload[0]["averageScore"], serde_json::Value::Null);
}

#[tokio::test]
async fn candidates_handler_rejects_non_numeric_position() {
    let (service, _) = build_service();

    let response =
        list_candidates_handler(State(Arc::new(service)), Ok(Path("abc".to_string()))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": INVALID_POSITION_ID })
    );
}

#[tokio::test]
async fn candidates_route_rejects_undecodable_position_as_json() {
    let (service, _) = build_service();
    let router = pipeline_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/positions/%FF/candidates")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": INVALID_POSITION_ID })
    );
}

#[tokio::test]
async fn candidates_handler_returns_empty_list_for_unknown_position() {
    let (service, _) = build_service();

    let response =
        list_candidates_handler(State(Arc::new(service)), Ok(Path("999999".to_string()))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!([]));
}

#[tokio::test]
async fn candidates_handler_hides_repository_failures() {
    let service = Arc::new(CandidatePipelineService::new(Arc::new(UnavailableRepository)));

    let response = list_candidates_handler(State(service), Ok(Path("1".to_string()))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": INTERNAL_SERVER_ERROR })
    );
}

#[tokio::test]
async fn stage_route_updates_candidate() {
    let (service, repository) = build_service();
    let router = pipeline_router_with_service(service);

    let response = router
        .oneshot(stage_request(
            "2",
            json!({ "stageId": HiringFixture::TECHNICAL_STEP }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(response).await,
        json!({ "message": STAGE_UPDATED })
    );
    let stages = repository.application_stages().unwrap();
    assert_eq!(stages[&ApplicationId(2)], HiringFixture::TECHNICAL_STEP);
    assert_eq!(stages[&ApplicationId(3)], HiringFixture::TECHNICAL_STEP);
}

#[tokio::test]
async fn stage_route_requires_stage_id() {
    let (service, _) = build_service();
    let router = pipeline_router_with_service(service);

    let response = router
        .oneshot(stage_request("1", json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": INVALID_STAGE_REQUEST })
    );
}

#[tokio::test]
async fn stage_route_rejects_mistyped_stage_ids() {
    for body in [
        json!({ "stageId": null }),
        json!({ "stageId": "2" }),
        json!({ "stageId": 2.5 }),
    ] {
        let (service, repository) = build_service();
        let router = pipeline_router_with_service(service);

        let response = router
            .oneshot(stage_request("1", body.clone()))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(
            read_json_body(response).await,
            json!({ "error": INVALID_STAGE_REQUEST }),
            "body {body}"
        );
        let stages = repository.application_stages().unwrap();
        assert_eq!(stages[&ApplicationId(1)], HiringFixture::INITIAL_STEP);
    }
}

#[tokio::test]
async fn stage_route_rejects_malformed_candidate_ids() {
    for candidate in ["12abc", "%FF"] {
        let (service, _) = build_service();
        let router = pipeline_router_with_service(service);

        let response = router
            .oneshot(stage_request(candidate, json!({ "stageId": 2 })))
            .await
            .expect("route executes");

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "candidate {candidate}"
        );
        assert_eq!(
            read_json_body(response).await,
            json!({ "error": INVALID_STAGE_REQUEST }),
            "candidate {candidate}"
        );
    }
}

#[tokio::test]
async fn stage_route_rejects_unreadable_bodies() {
    let (service, _) = build_service();
    let router = pipeline_router_with_service(service);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/candidates/1/stage")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": INVALID_STAGE_REQUEST })
    );
}

#[tokio::test]
async fn stage_route_returns_not_found_for_unknown_candidate() {
    let (service, _) = build_service();
    let router = pipeline_router_with_service(service);

    let response = router
        .oneshot(stage_request(
            "999999",
            json!({ "stageId": HiringFixture::TECHNICAL_STEP }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": CANDIDATE_NOT_FOUND })
    );
}

#[tokio::test]
async fn stage_handler_rejects_unknown_stage() {
    let (service, _) = build_service();

    let response = update_stage_handler(
        State(Arc::new(service)),
        Ok(Path("1".to_string())),
        Ok(axum::Json(StageUpdateRequest {
            stage_id: Some(MISSING_STAGE.0),
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": INVALID_STAGE_ID })
    );
}

#[tokio::test]
async fn stage_handler_rejects_non_numeric_candidate() {
    let (service, _) = build_service();

    let response = update_stage_handler(
        State(Arc::new(service)),
        Ok(Path("john".to_string())),
        Ok(axum::Json(StageUpdateRequest {
            stage_id: Some(HiringFixture::TECHNICAL_STEP.0),
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": INVALID_STAGE_REQUEST })
    );
}

#[tokio::test]
async fn stage_handler_treats_zero_stage_as_missing() {
    let (service, _) = build_service();

    let response = update_stage_handler(
        State(Arc::new(service)),
        Ok(Path("1".to_string())),
        Ok(axum::Json(StageUpdateRequest { stage_id: Some(0) })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stage_handler_hides_write_failures() {
    let service = Arc::new(CandidatePipelineService::new(Arc::new(
        ReadOnlyRepository(seeded_repository()),
    )));

    let response = update_stage_handler(
        State(service),
        Ok(Path("1".to_string())),
        Ok(axum::Json(StageUpdateRequest {
            stage_id: Some(HiringFixture::TECHNICAL_STEP.0),
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": INTERNAL_SERVER_ERROR })
    );
}
