use chrono::NaiveDate;

use super::domain::{
    Application, ApplicationId, Candidate, CandidateId, Company, CompanyId, Interview,
    InterviewFlow, InterviewFlowId, InterviewId, InterviewStep, InterviewStepId, Position,
    PositionId,
};
use super::repository::RepositoryError;

/// Write-side hooks used to load hiring data into a store. The pipeline itself never
/// creates records; seeding, demos, and tests do.
pub trait FixtureSink {
    fn insert_company(&self, company: Company) -> Result<(), RepositoryError>;
    fn insert_interview_flow(&self, flow: InterviewFlow) -> Result<(), RepositoryError>;
    fn insert_interview_step(&self, step: InterviewStep) -> Result<(), RepositoryError>;
    fn insert_position(&self, position: Position) -> Result<(), RepositoryError>;
    fn insert_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError>;
    fn insert_application(&self, application: Application) -> Result<(), RepositoryError>;
    fn insert_interview(&self, interview: Interview) -> Result<(), RepositoryError>;
}

/// Result of loading a fixture into a store that may already hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded,
    AlreadySeeded,
}

/// Small, self-consistent hiring dataset: one company, a two step flow, one position,
/// and a candidate with a single scored application.
#[derive(Debug, Clone)]
pub struct HiringFixture {
    pub company: Company,
    pub flow: InterviewFlow,
    pub steps: Vec<InterviewStep>,
    pub positions: Vec<Position>,
    pub candidates: Vec<Candidate>,
    pub applications: Vec<Application>,
    pub interviews: Vec<Interview>,
}

impl HiringFixture {
    pub const INITIAL_STEP: InterviewStepId = InterviewStepId(1);
    pub const TECHNICAL_STEP: InterviewStepId = InterviewStepId(2);
    pub const POSITION: PositionId = PositionId(1);
    pub const CANDIDATE: CandidateId = CandidateId(1);

    pub fn standard() -> Self {
        let applied_on = fixture_date(2024, 5, 6);
        let flow_id = InterviewFlowId(1);

        Self {
            company: Company {
                id: CompanyId(1),
                name: "Test Company".to_string(),
            },
            flow: InterviewFlow {
                id: flow_id,
                description: "Standard Interview Process".to_string(),
            },
            steps: vec![
                InterviewStep {
                    id: Self::INITIAL_STEP,
                    interview_flow_id: flow_id,
                    name: "Initial Interview".to_string(),
                    order_index: 1,
                },
                InterviewStep {
                    id: Self::TECHNICAL_STEP,
                    interview_flow_id: flow_id,
                    name: "Technical Interview".to_string(),
                    order_index: 2,
                },
            ],
            positions: vec![Position {
                id: Self::POSITION,
                company_id: CompanyId(1),
                interview_flow_id: flow_id,
                title: "Software Developer".to_string(),
            }],
            candidates: vec![Candidate {
                id: Self::CANDIDATE,
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: "john.test@example.com".to_string(),
            }],
            applications: vec![Application {
                id: ApplicationId(1),
                candidate_id: Self::CANDIDATE,
                position_id: Self::POSITION,
                application_date: applied_on,
                current_interview_step: Self::INITIAL_STEP,
                notes: None,
            }],
            interviews: vec![Interview {
                id: InterviewId(1),
                application_id: ApplicationId(1),
                interview_step_id: Self::INITIAL_STEP,
                interview_date: applied_on,
                score: Some(4),
                notes: None,
            }],
        }
    }

    /// Insert every record in dependency order.
    pub fn seed<S: FixtureSink + ?Sized>(&self, sink: &S) -> Result<(), RepositoryError> {
        sink.insert_company(self.company.clone())?;
        sink.insert_interview_flow(self.flow.clone())?;
        for step in &self.steps {
            sink.insert_interview_step(step.clone())?;
        }
        for position in &self.positions {
            sink.insert_position(position.clone())?;
        }
        for candidate in &self.candidates {
            sink.insert_candidate(candidate.clone())?;
        }
        for application in &self.applications {
            sink.insert_application(application.clone())?;
        }
        for interview in &self.interviews {
            sink.insert_interview(interview.clone())?;
        }
        Ok(())
    }
}

fn fixture_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
