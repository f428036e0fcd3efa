use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::domain::{
    Application, ApplicationId, ApplicationSnapshot, Candidate, CandidateId, Company, Interview,
    InterviewFlow, InterviewFlowId, InterviewStep, InterviewStepId, Position, PositionId,
};
use super::fixture::{FixtureSink, HiringFixture, SeedOutcome};
use super::repository::{RecruitingRepository, RepositoryError};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS companies (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS interview_flows (
        id INTEGER PRIMARY KEY,
        description TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS interview_steps (
        id INTEGER PRIMARY KEY,
        interview_flow_id INTEGER NOT NULL REFERENCES interview_flows(id),
        name TEXT NOT NULL,
        order_index INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS positions (
        id INTEGER PRIMARY KEY,
        company_id INTEGER NOT NULL REFERENCES companies(id),
        interview_flow_id INTEGER NOT NULL REFERENCES interview_flows(id),
        title TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS candidates (
        id INTEGER PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS applications (
        id INTEGER PRIMARY KEY,
        candidate_id INTEGER NOT NULL REFERENCES candidates(id),
        position_id INTEGER NOT NULL REFERENCES positions(id),
        application_date TEXT NOT NULL,
        current_interview_step INTEGER NOT NULL REFERENCES interview_steps(id),
        notes TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_applications_candidate ON applications(candidate_id);
    CREATE INDEX IF NOT EXISTS idx_applications_position ON applications(position_id);

    CREATE TABLE IF NOT EXISTS interviews (
        id INTEGER PRIMARY KEY,
        application_id INTEGER NOT NULL REFERENCES applications(id),
        interview_step_id INTEGER NOT NULL REFERENCES interview_steps(id),
        interview_date TEXT NOT NULL,
        score INTEGER,
        notes TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_interviews_application ON interviews(application_id);
";

/// Relational store on a single SQLite connection.
pub struct SqliteRecruitingRepository {
    conn: Mutex<Connection>,
}

impl SqliteRecruitingRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening recruiting database");
        Self::bootstrap(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, RepositoryError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection mutex poisoned".to_string()))
    }

    pub fn current_stage(
        &self,
        application_id: ApplicationId,
    ) -> Result<Option<InterviewStepId>, RepositoryError> {
        let conn = self.lock()?;
        let stage = conn
            .query_row(
                "SELECT current_interview_step FROM applications WHERE id = ?1",
                params![application_id.0],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(stage.map(InterviewStepId))
    }
}

impl RecruitingRepository for SqliteRecruitingRepository {
    fn find_candidate_by_id(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let conn = self.lock()?;
        let candidate = conn
            .query_row(
                "SELECT id, first_name, last_name, email FROM candidates WHERE id = ?1",
                params![id.0],
                |row| {
                    Ok(Candidate {
                        id: CandidateId(row.get(0)?),
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        email: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(candidate)
    }

    fn find_step_by_id(
        &self,
        id: InterviewStepId,
    ) -> Result<Option<InterviewStep>, RepositoryError> {
        let conn = self.lock()?;
        let step = conn
            .query_row(
                "SELECT id, interview_flow_id, name, order_index FROM interview_steps WHERE id = ?1",
                params![id.0],
                |row| {
                    Ok(InterviewStep {
                        id: InterviewStepId(row.get(0)?),
                        interview_flow_id: InterviewFlowId(row.get(1)?),
                        name: row.get(2)?,
                        order_index: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(step)
    }

    fn update_applications_stage(
        &self,
        candidate_id: CandidateId,
        stage: InterviewStepId,
    ) -> Result<usize, RepositoryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let updated = tx.execute(
            "UPDATE applications SET current_interview_step = ?1 WHERE candidate_id = ?2",
            params![stage.0, candidate_id.0],
        )?;
        tx.commit()?;
        Ok(updated)
    }

    fn list_applications_for_position(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<ApplicationSnapshot>, RepositoryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut scores: HashMap<i64, Vec<Option<i32>>> = HashMap::new();
        {
            let mut stmt = tx.prepare(
                "SELECT i.application_id, i.score
                 FROM interviews i
                 JOIN applications a ON a.id = i.application_id
                 WHERE a.position_id = ?1
                 ORDER BY i.id ASC",
            )?;
            let rows = stmt.query_map(params![position_id.0], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, Option<i32>>(1)?))
            })?;
            for row in rows {
                let (application_id, score) = row?;
                scores.entry(application_id).or_default().push(score);
            }
        }

        let snapshots = {
            let mut stmt = tx.prepare(
                "SELECT a.id, a.candidate_id, c.first_name, c.last_name, s.name
                 FROM applications a
                 JOIN candidates c ON c.id = a.candidate_id
                 JOIN interview_steps s ON s.id = a.current_interview_step
                 WHERE a.position_id = ?1
                 ORDER BY a.id ASC",
            )?;
            let rows = stmt.query_map(params![position_id.0], |row| {
                Ok(ApplicationSnapshot {
                    application_id: ApplicationId(row.get(0)?),
                    candidate_id: CandidateId(row.get(1)?),
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                    current_stage: row.get(4)?,
                    interview_scores: Vec::new(),
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        tx.commit()?;

        Ok(snapshots
            .into_iter()
            .map(|mut snapshot| {
                snapshot.interview_scores = scores
                    .remove(&snapshot.application_id.0)
                    .unwrap_or_default();
                snapshot
            })
            .collect())
    }
}

impl SqliteRecruitingRepository {
    /// Load the fixture inside one transaction. A store that already holds the fixture's
    /// company is left untouched, and a failed insert rolls back every row written so far.
    pub fn seed_once(&self, fixture: &HiringFixture) -> Result<SeedOutcome, RepositoryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let existing: i64 = tx.query_row(
            "SELECT COUNT(*) FROM companies WHERE id = ?1",
            params![fixture.company.id.0],
            |row| row.get(0),
        )?;
        if existing > 0 {
            debug!(company_id = %fixture.company.id, "fixture already seeded");
            return Ok(SeedOutcome::AlreadySeeded);
        }

        fixture.seed(&ConnectionSink(&tx))?;
        tx.commit()?;
        Ok(SeedOutcome::Seeded)
    }
}

impl FixtureSink for SqliteRecruitingRepository {
    fn insert_company(&self, company: Company) -> Result<(), RepositoryError> {
        ConnectionSink(&*self.lock()?).insert_company(company)
    }

    fn insert_interview_flow(&self, flow: InterviewFlow) -> Result<(), RepositoryError> {
        ConnectionSink(&*self.lock()?).insert_interview_flow(flow)
    }

    fn insert_interview_step(&self, step: InterviewStep) -> Result<(), RepositoryError> {
        ConnectionSink(&*self.lock()?).insert_interview_step(step)
    }

    fn insert_position(&self, position: Position) -> Result<(), RepositoryError> {
        ConnectionSink(&*self.lock()?).insert_position(position)
    }

    fn insert_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        ConnectionSink(&*self.lock()?).insert_candidate(candidate)
    }

    fn insert_application(&self, application: Application) -> Result<(), RepositoryError> {
        ConnectionSink(&*self.lock()?).insert_application(application)
    }

    fn insert_interview(&self, interview: Interview) -> Result<(), RepositoryError> {
        ConnectionSink(&*self.lock()?).insert_interview(interview)
    }
}

/// Row writers over an already locked connection or an open transaction.
struct ConnectionSink<'a>(&'a Connection);

impl FixtureSink for ConnectionSink<'_> {
    fn insert_company(&self, company: Company) -> Result<(), RepositoryError> {
        self.0.execute(
            "INSERT INTO companies (id, name) VALUES (?1, ?2)",
            params![company.id.0, company.name],
        )?;
        Ok(())
    }

    fn insert_interview_flow(&self, flow: InterviewFlow) -> Result<(), RepositoryError> {
        self.0.execute(
            "INSERT INTO interview_flows (id, description) VALUES (?1, ?2)",
            params![flow.id.0, flow.description],
        )?;
        Ok(())
    }

    fn insert_interview_step(&self, step: InterviewStep) -> Result<(), RepositoryError> {
        self.0.execute(
            "INSERT INTO interview_steps (id, interview_flow_id, name, order_index)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                step.id.0,
                step.interview_flow_id.0,
                step.name,
                step.order_index
            ],
        )?;
        Ok(())
    }

    fn insert_position(&self, position: Position) -> Result<(), RepositoryError> {
        self.0.execute(
            "INSERT INTO positions (id, company_id, interview_flow_id, title)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                position.id.0,
                position.company_id.0,
                position.interview_flow_id.0,
                position.title
            ],
        )?;
        Ok(())
    }

    fn insert_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        self.0.execute(
            "INSERT INTO candidates (id, first_name, last_name, email) VALUES (?1, ?2, ?3, ?4)",
            params![
                candidate.id.0,
                candidate.first_name,
                candidate.last_name,
                candidate.email
            ],
        )?;
        Ok(())
    }

    fn insert_application(&self, application: Application) -> Result<(), RepositoryError> {
        self.0.execute(
            "INSERT INTO applications
                (id, candidate_id, position_id, application_date, current_interview_step, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                application.id.0,
                application.candidate_id.0,
                application.position_id.0,
                application.application_date,
                application.current_interview_step.0,
                application.notes
            ],
        )?;
        Ok(())
    }

    fn insert_interview(&self, interview: Interview) -> Result<(), RepositoryError> {
        self.0.execute(
            "INSERT INTO interviews
                (id, application_id, interview_step_id, interview_date, score, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                interview.id.0,
                interview.application_id.0,
                interview.interview_step_id.0,
                interview.interview_date,
                interview.score,
                interview.notes
            ],
        )?;
        Ok(())
    }
}
