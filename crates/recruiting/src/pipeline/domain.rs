use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a hiring company.
    CompanyId
);
record_id!(
    /// Identifier of an interview flow template.
    InterviewFlowId
);
record_id!(
    /// Identifier of a stage inside an interview flow.
    InterviewStepId
);
record_id!(
    /// Identifier of an open position.
    PositionId
);
record_id!(
    /// Identifier of a candidate.
    CandidateId
);
record_id!(
    /// Identifier of a candidate's application to a position.
    ApplicationId
);
record_id!(InterviewId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

/// Ordered template of interview steps shared by one or more positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewFlow {
    pub id: InterviewFlowId,
    pub description: String,
}

/// Named stage an application can occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewStep {
    pub id: InterviewStepId,
    pub interview_flow_id: InterviewFlowId,
    pub name: String,
    pub order_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub company_id: CompanyId,
    pub interview_flow_id: InterviewFlowId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

/// A candidate's attempt at a specific position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub position_id: PositionId,
    pub application_date: NaiveDate,
    pub current_interview_step: InterviewStepId,
    pub notes: Option<String>,
}

/// A single interview event; the score stays empty until the panel records one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub interview_step_id: InterviewStepId,
    pub interview_date: NaiveDate,
    pub score: Option<i32>,
    pub notes: Option<String>,
}

/// Application joined with the candidate name, current stage name, and interview scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSnapshot {
    pub application_id: ApplicationId,
    pub candidate_id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub current_stage: String,
    pub interview_scores: Vec<Option<i32>>,
}

/// Flattened row returned by the candidate listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCandidateView {
    pub candidate_id: CandidateId,
    pub full_name: String,
    pub current_stage: String,
    pub average_score: Option<f64>,
}

pub(crate) fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}
