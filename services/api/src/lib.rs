mod cli;
mod generate;
mod infra;
mod prompt;
mod routes;
mod server;

use profile_synth::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
