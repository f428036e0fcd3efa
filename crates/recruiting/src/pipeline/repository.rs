use super::domain::{
    ApplicationSnapshot, Candidate, CandidateId, InterviewStep, InterviewStepId, PositionId,
};

/// Storage abstraction so the pipeline service can be exercised in isolation.
pub trait RecruitingRepository: Send + Sync {
    fn find_candidate_by_id(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError>;

    fn find_step_by_id(
        &self,
        id: InterviewStepId,
    ) -> Result<Option<InterviewStep>, RepositoryError>;

    /// Move every application of the candidate to `stage` as one atomic write,
    /// returning how many applications changed.
    fn update_applications_stage(
        &self,
        candidate_id: CandidateId,
        stage: InterviewStepId,
    ) -> Result<usize, RepositoryError>;

    /// Applications for the position ordered by application id.
    fn list_applications_for_position(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<ApplicationSnapshot>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}
