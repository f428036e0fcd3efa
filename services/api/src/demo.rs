use crate::infra::{load_config, open_repository};
use clap::Args;
use recruiting::error::AppError;
use recruiting::pipeline::{
    CandidateId, CandidatePipelineService, HiringFixture, InMemoryRecruitingRepository,
    InterviewStepId, PositionCandidateView, PositionId, RecruitingRepository, SeedOutcome,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CandidatesArgs {
    /// Position to summarise
    #[arg(long)]
    pub(crate) position: i64,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct MoveStageArgs {
    /// Candidate whose applications should move
    #[arg(long)]
    pub(crate) candidate: i64,
    /// Target interview step
    #[arg(long)]
    pub(crate) stage: i64,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SeedArgs {
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<String>,
}

pub(crate) fn run_list_candidates(args: CandidatesArgs) -> Result<(), AppError> {
    let config = load_config(args.database)?;
    let service = CandidatePipelineService::new(Arc::new(open_repository(&config.database)?));

    let position = PositionId(args.position);
    let candidates = service.list_candidates(position)?;
    render_candidates(position, &candidates);
    Ok(())
}

pub(crate) fn run_move_stage(args: MoveStageArgs) -> Result<(), AppError> {
    let config = load_config(args.database)?;
    let service = CandidatePipelineService::new(Arc::new(open_repository(&config.database)?));

    let updated = service.update_stage(CandidateId(args.candidate), InterviewStepId(args.stage))?;
    println!(
        "Moved {updated} application(s) of candidate {} to stage {}",
        args.candidate, args.stage
    );
    Ok(())
}

pub(crate) fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let config = load_config(args.database)?;
    let repository = open_repository(&config.database)?;

    let fixture = HiringFixture::standard();
    match repository.seed_once(&fixture)? {
        SeedOutcome::Seeded => println!(
            "Seeded {} ({} positions, {} candidates, {} applications) into {}",
            fixture.company.name,
            fixture.positions.len(),
            fixture.candidates.len(),
            fixture.applications.len(),
            config.database.path
        ),
        SeedOutcome::AlreadySeeded => println!(
            "{} already holds {}; nothing to seed",
            config.database.path, fixture.company.name
        ),
    }
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let repository = Arc::new(InMemoryRecruitingRepository::default());
    let fixture = HiringFixture::standard();
    fixture.seed(repository.as_ref())?;
    let service = CandidatePipelineService::new(repository.clone());

    println!("Recruiting pipeline demo");
    for position in &fixture.positions {
        println!("Position #{}: {}", position.id, position.title);
    }

    let candidates = service.list_candidates(HiringFixture::POSITION)?;
    render_candidates(HiringFixture::POSITION, &candidates);

    let candidate = repository
        .find_candidate_by_id(HiringFixture::CANDIDATE)?
        .map(|candidate| candidate.full_name())
        .unwrap_or_default();
    let updated = service.update_stage(HiringFixture::CANDIDATE, HiringFixture::TECHNICAL_STEP)?;
    println!("\nMoved {candidate} ({updated} application(s)) to the technical interview");

    let candidates = service.list_candidates(HiringFixture::POSITION)?;
    render_candidates(HiringFixture::POSITION, &candidates);

    match service.update_stage(CandidateId(999_999), HiringFixture::TECHNICAL_STEP) {
        Ok(_) => println!("\nUnexpected: unknown candidate accepted"),
        Err(err) => println!("\nUnknown candidate rejected: {err}"),
    }

    Ok(())
}

fn render_candidates(position: PositionId, candidates: &[PositionCandidateView]) {
    if candidates.is_empty() {
        println!("\nPosition {position}: no candidates");
        return;
    }

    println!("\nPosition {position} candidates");
    for candidate in candidates {
        let score = match candidate.average_score {
            Some(score) => format!("{score:.2}"),
            None => "unscored".to_string(),
        };
        println!(
            "- #{} {} | {} | average {}",
            candidate.candidate_id, candidate.full_name, candidate.current_stage, score
        );
    }
}
