use crate::demo::{run_demo, run_list_candidates, run_move_stage, run_seed};
use crate::demo::{CandidatesArgs, MoveStageArgs, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruiting::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruiting Pipeline",
    about = "Serve and operate the candidate interview pipeline from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect or move candidates in the configured database
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommand,
    },
    /// Create the schema and load the demo hiring fixture
    Seed(SeedArgs),
    /// Run an end-to-end walkthrough against an in-memory store
    Demo,
}

#[derive(Subcommand, Debug)]
enum PipelineCommand {
    /// List candidates applying to a position with their average score
    Candidates(CandidatesArgs),
    /// Move every application of a candidate to a new interview stage
    Move(MoveStageArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Pipeline {
            command: PipelineCommand::Candidates(args),
        } => run_list_candidates(args),
        Command::Pipeline {
            command: PipelineCommand::Move(args),
        } => run_move_stage(args),
        Command::Seed(args) => run_seed(args),
        Command::Demo => run_demo(),
    }
}
