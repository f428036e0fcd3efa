use std::sync::Arc;

use tracing::{error, info, warn};

use super::domain::{CandidateId, InterviewStepId, PositionCandidateView, PositionId};
use super::repository::{RecruitingRepository, RepositoryError};

/// Service moving candidates through interview stages and summarising a position's pipeline.
pub struct CandidatePipelineService<R> {
    repository: Arc<R>,
}

impl<R> CandidatePipelineService<R>
where
    R: RecruitingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Move every application of the candidate to `stage`, returning how many moved.
    ///
    /// The candidate is checked before the stage and nothing is written until both
    /// resolve. Concurrent moves for the same candidate are last-write-wins.
    pub fn update_stage(
        &self,
        candidate_id: CandidateId,
        stage: InterviewStepId,
    ) -> Result<usize, PipelineServiceError> {
        let candidate = self
            .repository
            .find_candidate_by_id(candidate_id)
            .map_err(|err| log_repository_failure("stage update", err))?;
        if candidate.is_none() {
            warn!(%candidate_id, "stage update rejected: candidate not found");
            return Err(PipelineServiceError::CandidateNotFound(candidate_id));
        }

        let step = self
            .repository
            .find_step_by_id(stage)
            .map_err(|err| log_repository_failure("stage update", err))?;
        if step.is_none() {
            warn!(%candidate_id, stage_id = %stage, "stage update rejected: invalid stage");
            return Err(PipelineServiceError::InvalidStage(stage));
        }

        let updated = self
            .repository
            .update_applications_stage(candidate_id, stage)
            .map_err(|err| log_repository_failure("stage update", err))?;

        info!(%candidate_id, stage_id = %stage, updated, "candidate stage updated");
        Ok(updated)
    }

    /// Candidates applying to the position, in application id order. Unknown positions
    /// produce an empty list.
    pub fn list_candidates(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<PositionCandidateView>, PipelineServiceError> {
        let snapshots = self
            .repository
            .list_applications_for_position(position_id)
            .map_err(|err| {
                error!(%position_id, error = %err, "failed to fetch position candidates");
                PipelineServiceError::FetchCandidates(err)
            })?;

        Ok(snapshots
            .iter()
            .map(|snapshot| snapshot.candidate_view())
            .collect())
    }
}

fn log_repository_failure(operation: &'static str, err: RepositoryError) -> PipelineServiceError {
    error!(operation, error = %err, "repository call failed");
    PipelineServiceError::Repository(err)
}

/// Coarse classification used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    NotFound,
    InvalidArgument,
    InternalFailure,
}

/// Error raised by the pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineServiceError {
    #[error("candidate {0} not found")]
    CandidateNotFound(CandidateId),
    #[error("invalid stage {0}")]
    InvalidStage(InterviewStepId),
    #[error("failed to fetch position candidates")]
    FetchCandidates(#[source] RepositoryError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PipelineServiceError {
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            PipelineServiceError::CandidateNotFound(_) => PipelineErrorKind::NotFound,
            PipelineServiceError::InvalidStage(_) => PipelineErrorKind::InvalidArgument,
            PipelineServiceError::FetchCandidates(_) | PipelineServiceError::Repository(_) => {
                PipelineErrorKind::InternalFailure
            }
        }
    }
}
