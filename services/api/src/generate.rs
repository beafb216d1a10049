use crate::infra::write_export;
use clap::Args;
use profile_synth::config::AppConfig;
use profile_synth::error::AppError;
use profile_synth::generation::{
    Gender, GenerationRequest, OutputFormat, ProfileLayout, RecordCount,
};
use profile_synth::service::ProfileService;
use profile_synth::{generator_from_config, telemetry};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Who the data is being generated for (used in the file name)
    #[arg(long)]
    pub(crate) generated_for: String,
    /// Male or Female
    #[arg(long)]
    pub(crate) gender: Gender,
    /// Number of profiles (1-10000)
    #[arg(long, default_value_t = RecordCount::DEFAULT)]
    pub(crate) count: RecordCount,
    /// CSV or TXT
    #[arg(long, default_value = "csv")]
    pub(crate) format: OutputFormat,
    /// Column layout: full or address
    #[arg(long, default_value = "full")]
    pub(crate) layout: ProfileLayout,
    /// Directory for the export (defaults to PROFILES_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Seed the random generator for a reproducible batch
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the export to stdout instead of writing a file
    #[arg(long)]
    pub(crate) stdout: bool,
}

pub(crate) async fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let GenerateArgs {
        generated_for,
        gender,
        count,
        format,
        layout,
        output_dir,
        seed,
        stdout,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let mut generator = generator_from_config(&config)?;
    if let Some(seed) = seed {
        generator = generator.with_seed(seed);
    }
    let service = ProfileService::new(generator);

    let request = GenerationRequest {
        generated_for,
        gender,
        count,
        format,
        layout,
    };
    let batch = service.generate(request).await?;

    if stdout {
        print!("{}", batch.body);
        return Ok(());
    }

    let dir = output_dir.unwrap_or(config.generator.output_dir);
    let path = write_export(&dir, &batch)?;
    println!(
        "Generated {} profiles ({}). Saved to {}",
        count,
        batch.format.label(),
        path.display()
    );
    Ok(())
}
