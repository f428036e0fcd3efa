//! Candidate pipeline: moving candidates between interview stages and summarising the
//! applicants of a position with their average interview score.

pub mod domain;
pub mod fixture;
pub mod memory;
pub mod repository;
pub mod router;
mod scoring;
pub mod service;
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationSnapshot, Candidate, CandidateId, Company, CompanyId,
    Interview, InterviewFlow, InterviewFlowId, InterviewId, InterviewStep, InterviewStepId,
    Position, PositionCandidateView, PositionId,
};
pub use fixture::{FixtureSink, HiringFixture, SeedOutcome};
pub use memory::InMemoryRecruitingRepository;
pub use repository::{RecruitingRepository, RepositoryError};
pub use router::{pipeline_router, StageUpdateRequest};
pub use scoring::average_score;
pub use service::{CandidatePipelineService, PipelineErrorKind, PipelineServiceError};
pub use sqlite::SqliteRecruitingRepository;
