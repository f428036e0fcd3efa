use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::pipeline::domain::{
    Application, ApplicationId, ApplicationSnapshot, Candidate, CandidateId, Interview,
    InterviewId, InterviewStep, InterviewStepId, Position, PositionId,
};
use crate::pipeline::fixture::{FixtureSink, HiringFixture};
use crate::pipeline::memory::InMemoryRecruitingRepository;
use crate::pipeline::repository::{RecruitingRepository, RepositoryError};
use crate::pipeline::service::CandidatePipelineService;
use crate::pipeline::{pipeline_router, CompanyId, InterviewFlowId};

pub(super) const SECOND_POSITION: PositionId = PositionId(2);
pub(super) const JANE: CandidateId = CandidateId(2);
pub(super) const UNAPPLIED: CandidateId = CandidateId(3);
pub(super) const MISSING_CANDIDATE: CandidateId = CandidateId(999_999);
pub(super) const MISSING_STAGE: InterviewStepId = InterviewStepId(999_999);

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date")
}

/// Standard fixture plus a second candidate applying to two positions, one of them
/// with a mix of scored and unscored interviews, and a candidate with no applications.
pub(super) fn seed_pipeline<S: FixtureSink>(sink: &S) {
    HiringFixture::standard()
        .seed(sink)
        .expect("standard fixture seeds");

    sink.insert_position(Position {
        id: SECOND_POSITION,
        company_id: CompanyId(1),
        interview_flow_id: InterviewFlowId(1),
        title: "Data Engineer".to_string(),
    })
    .expect("position inserts");

    sink.insert_candidate(Candidate {
        id: JANE,
        first_name: "Jane".to_string(),
        last_name: "Smith".to_string(),
        email: "jane.smith@example.com".to_string(),
    })
    .expect("candidate inserts");
    sink.insert_candidate(Candidate {
        id: UNAPPLIED,
        first_name: "Alex".to_string(),
        last_name: "Lone".to_string(),
        email: "alex.lone@example.com".to_string(),
    })
    .expect("candidate inserts");

    for (id, position) in [(2, HiringFixture::POSITION), (3, SECOND_POSITION)] {
        sink.insert_application(Application {
            id: ApplicationId(id),
            candidate_id: JANE,
            position_id: position,
            application_date: date(1),
            current_interview_step: HiringFixture::INITIAL_STEP,
            notes: None,
        })
        .expect("application inserts");
    }

    for (id, score) in [(2, Some(4)), (3, None), (4, Some(6))] {
        sink.insert_interview(Interview {
            id: InterviewId(id),
            application_id: ApplicationId(2),
            interview_step_id: HiringFixture::INITIAL_STEP,
            interview_date: date(id as u32 + 2),
            score,
            notes: None,
        })
        .expect("interview inserts");
    }
}

pub(super) fn seeded_repository() -> Arc<InMemoryRecruitingRepository> {
    let repository = Arc::new(InMemoryRecruitingRepository::default());
    seed_pipeline(repository.as_ref());
    repository
}

pub(super) fn build_service() -> (
    CandidatePipelineService<InMemoryRecruitingRepository>,
    Arc<InMemoryRecruitingRepository>,
) {
    let repository = seeded_repository();
    let service = CandidatePipelineService::new(repository.clone());
    (service, repository)
}

pub(super) fn pipeline_router_with_service(
    service: CandidatePipelineService<InMemoryRecruitingRepository>,
) -> axum::Router {
    pipeline_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

impl RecruitingRepository for UnavailableRepository {
    fn find_candidate_by_id(&self, _id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_step_by_id(
        &self,
        _id: InterviewStepId,
    ) -> Result<Option<InterviewStep>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_applications_stage(
        &self,
        _candidate_id: CandidateId,
        _stage: InterviewStepId,
    ) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_applications_for_position(
        &self,
        _position_id: PositionId,
    ) -> Result<Vec<ApplicationSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Reads succeed against the wrapped store but every write fails.
pub(super) struct ReadOnlyRepository(pub(super) Arc<InMemoryRecruitingRepository>);

impl RecruitingRepository for ReadOnlyRepository {
    fn find_candidate_by_id(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.0.find_candidate_by_id(id)
    }

    fn find_step_by_id(
        &self,
        id: InterviewStepId,
    ) -> Result<Option<InterviewStep>, RepositoryError> {
        self.0.find_step_by_id(id)
    }

    fn update_applications_stage(
        &self,
        _candidate_id: CandidateId,
        _stage: InterviewStepId,
    ) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn list_applications_for_position(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<ApplicationSnapshot>, RepositoryError> {
        self.0.list_applications_for_position(position_id)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
