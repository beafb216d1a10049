use crate::generate::{run_generate, GenerateArgs};
use crate::prompt::{run_prompt, PromptArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use profile_synth::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Profile Synth",
    about = "Generate fictitious demographic profiles as CSV or text exports",
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
    /// Generate a batch from command-line flags and save it
    Generate(GenerateArgs),
    /// Ask for the batch settings on the terminal, then save a CSV export
    Prompt(PromptArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Generate(args) => run_generate(args).await,
        Command::Prompt(args) => run_prompt(args).await,
    }
}
