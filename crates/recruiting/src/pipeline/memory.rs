use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Application, ApplicationId, ApplicationSnapshot, Candidate, CandidateId, Company, CompanyId,
    Interview, InterviewFlow, InterviewFlowId, InterviewId, InterviewStep, InterviewStepId,
    Position, PositionId,
};
use super::fixture::FixtureSink;
use super::repository::{RecruitingRepository, RepositoryError};

#[derive(Debug, Default)]
struct Tables {
    companies: BTreeMap<CompanyId, Company>,
    flows: BTreeMap<InterviewFlowId, InterviewFlow>,
    steps: BTreeMap<InterviewStepId, InterviewStep>,
    positions: BTreeMap<PositionId, Position>,
    candidates: BTreeMap<CandidateId, Candidate>,
    applications: BTreeMap<ApplicationId, Application>,
    interviews: BTreeMap<InterviewId, Interview>,
}

/// Process-local store backed by ordered maps under a single lock, so a multi-row
/// stage update is never observed half applied.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecruitingRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRecruitingRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }

    /// Current stage of every application, keyed by application id.
    pub fn application_stages(
        &self,
    ) -> Result<BTreeMap<ApplicationId, InterviewStepId>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .applications
            .values()
            .map(|application| (application.id, application.current_interview_step))
            .collect())
    }
}

impl RecruitingRepository for InMemoryRecruitingRepository {
    fn find_candidate_by_id(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(self.lock()?.candidates.get(&id).cloned())
    }

    fn find_step_by_id(
        &self,
        id: InterviewStepId,
    ) -> Result<Option<InterviewStep>, RepositoryError> {
        Ok(self.lock()?.steps.get(&id).cloned())
    }

    fn update_applications_stage(
        &self,
        candidate_id: CandidateId,
        stage: InterviewStepId,
    ) -> Result<usize, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.steps.contains_key(&stage) {
            return Err(RepositoryError::NotFound);
        }

        let mut updated = 0;
        for application in tables
            .applications
            .values_mut()
            .filter(|application| application.candidate_id == candidate_id)
        {
            application.current_interview_step = stage;
            updated += 1;
        }
        Ok(updated)
    }

    fn list_applications_for_position(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<ApplicationSnapshot>, RepositoryError> {
        let tables = self.lock()?;
        tables
            .applications
            .values()
            .filter(|application| application.position_id == position_id)
            .map(|application| {
                let candidate = tables
                    .candidates
                    .get(&application.candidate_id)
                    .ok_or(RepositoryError::NotFound)?;
                let step = tables
                    .steps
                    .get(&application.current_interview_step)
                    .ok_or(RepositoryError::NotFound)?;
                let interview_scores = tables
                    .interviews
                    .values()
                    .filter(|interview| interview.application_id == application.id)
                    .map(|interview| interview.score)
                    .collect();

                Ok(ApplicationSnapshot {
                    application_id: application.id,
                    candidate_id: candidate.id,
                    first_name: candidate.first_name.clone(),
                    last_name: candidate.last_name.clone(),
                    current_stage: step.name.clone(),
                    interview_scores,
                })
            })
            .collect()
    }
}

fn insert_unique<K: Ord, V>(
    table: &mut BTreeMap<K, V>,
    key: K,
    value: V,
) -> Result<(), RepositoryError> {
    if table.contains_key(&key) {
        return Err(RepositoryError::Conflict);
    }
    table.insert(key, value);
    Ok(())
}

fn require<K: Ord, V>(table: &BTreeMap<K, V>, key: &K) -> Result<(), RepositoryError> {
    if table.contains_key(key) {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}

impl FixtureSink for InMemoryRecruitingRepository {
    fn insert_company(&self, company: Company) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        insert_unique(&mut tables.companies, company.id, company)
    }

    fn insert_interview_flow(&self, flow: InterviewFlow) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        insert_unique(&mut tables.flows, flow.id, flow)
    }

    fn insert_interview_step(&self, step: InterviewStep) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        require(&tables.flows, &step.interview_flow_id)?;
        insert_unique(&mut tables.steps, step.id, step)
    }

    fn insert_position(&self, position: Position) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        require(&tables.companies, &position.company_id)?;
        require(&tables.flows, &position.interview_flow_id)?;
        insert_unique(&mut tables.positions, position.id, position)
    }

    fn insert_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        insert_unique(&mut tables.candidates, candidate.id, candidate)
    }

    fn insert_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        require(&tables.candidates, &application.candidate_id)?;
        require(&tables.positions, &application.position_id)?;
        require(&tables.steps, &application.current_interview_step)?;
        insert_unique(&mut tables.applications, application.id, application)
    }

    fn insert_interview(&self, interview: Interview) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        require(&tables.applications, &interview.application_id)?;
        require(&tables.steps, &interview.interview_step_id)?;
        insert_unique(&mut tables.interviews, interview.id, interview)
    }
}
