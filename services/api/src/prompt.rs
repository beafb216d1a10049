use crate::infra::write_export;
use clap::Args;
use profile_synth::config::AppConfig;
use profile_synth::error::AppError;
use profile_synth::generation::{
    Gender, GenerationRequest, OutputFormat, ProfileLayout, RecordCount,
};
use profile_synth::service::ProfileService;
use profile_synth::{generator_from_config, telemetry};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug, Default)]
pub(crate) struct PromptArgs {
    /// Also ask for the output format instead of always writing CSV
    #[arg(long)]
    pub(crate) ask_format: bool,
    /// Directory for the export (defaults to PROFILES_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PromptAnswers {
    pub(crate) generated_for: String,
    pub(crate) gender: Gender,
    pub(crate) count: RecordCount,
    pub(crate) format: OutputFormat,
}

pub(crate) async fn run_prompt(args: PromptArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let answers = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        collect_answers(&mut input, &mut output, args.ask_format)?
    };

    let service = ProfileService::new(generator_from_config(&config)?);
    let request = GenerationRequest {
        generated_for: answers.generated_for.clone(),
        gender: answers.gender,
        count: answers.count,
        format: answers.format,
        layout: ProfileLayout::Full,
    };
    let batch = service.generate(request).await?;

    let dir = args.output_dir.unwrap_or(config.generator.output_dir);
    let path = write_export(&dir, &batch)?;
    println!(
        "\nGenerated {} profiles for '{}'. Saved to {}",
        answers.count,
        answers.generated_for,
        path.display()
    );
    Ok(())
}

/// Asks for requester, gender, count and optionally format. Requester and
/// gender are asked again until valid; a bad count falls back to the default.
pub(crate) fn collect_answers<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    ask_format: bool,
) -> io::Result<PromptAnswers> {
    let mut generated_for = ask(input, output, "Who are you generating this data for? ")?;
    while generated_for.is_empty() {
        generated_for = ask(input, output, "Please enter a valid name: ")?;
    }

    let mut raw_gender = ask(input, output, "Select Gender (Male/Female): ")?;
    let gender = loop {
        match raw_gender.parse::<Gender>() {
            Ok(gender) => break gender,
            Err(_) => raw_gender = ask(input, output, "Invalid. Enter Male or Female: ")?,
        }
    };

    let raw_count = ask(
        input,
        output,
        &format!(
            "Number of profiles ({}-{}): ",
            RecordCount::MIN,
            RecordCount::MAX
        ),
    )?;
    let count = match raw_count.parse::<RecordCount>() {
        Ok(count) => count,
        Err(err) => {
            warn!(input = %raw_count, error = %err, "invalid record count, using default");
            writeln!(output, "Invalid number, defaulting to {}", RecordCount::DEFAULT)?;
            RecordCount::DEFAULT
        }
    };

    let format = if ask_format {
        let raw_format = ask(input, output, "Output format (CSV/TXT) [CSV]: ")?;
        if raw_format.is_empty() {
            OutputFormat::Csv
        } else {
            raw_format.parse::<OutputFormat>().unwrap_or_else(|err| {
                warn!(error = %err, "invalid output format, using CSV");
                OutputFormat::Csv
            })
        }
    } else {
        OutputFormat::Csv
    };

    Ok(PromptAnswers {
        generated_for,
        gender,
        count,
        format,
    })
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before all answers were given",
        ));
    }
    Ok(line.trim().to_string())
}
