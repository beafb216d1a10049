use crate::generation::{OutputFormat, Profile, ProfileLayout};
use chrono::NaiveDateTime;
use std::fmt::Write as _;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialized batch ready to be saved or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedBatch {
    pub file_name: String,
    pub format: OutputFormat,
    pub body: String,
}

pub fn render(
    profiles: &[Profile],
    layout: ProfileLayout,
    format: OutputFormat,
) -> Result<String, ExportError> {
    match format {
        OutputFormat::Csv => to_csv(profiles, layout),
        OutputFormat::Txt => Ok(to_text(profiles, layout)),
    }
}

/// Header row followed by one row per profile, in layout column order.
pub fn to_csv(profiles: &[Profile], layout: ProfileLayout) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(layout.headers())?;

    for profile in profiles {
        writer.write_record(layout.columns().iter().map(|column| profile.value(*column)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Numbered, indented blocks separated by blank lines.
pub fn to_text(profiles: &[Profile], layout: ProfileLayout) -> String {
    let mut output = String::new();

    for (index, profile) in profiles.iter().enumerate() {
        let _ = writeln!(output, "{}.", index + 1);
        for column in layout.columns() {
            let _ = writeln!(output, "   {}: {}", column.label(), profile.value(*column));
        }
        output.push('\n');
    }

    output
}

const FALLBACK_FILE_STEM: &str = "profiles";

/// `<requester>_<YYYYmmdd_HHMMSS>.<ext>`. The requester part keeps only
/// `[A-Za-z0-9_.-]`, everything else becomes `_`, and leading dots are
/// stripped, so the name is a single path component and a valid header value.
pub fn export_file_name(
    requester: &str,
    format: OutputFormat,
    generated_at: NaiveDateTime,
) -> String {
    format!(
        "{}_{}.{}",
        file_stem(requester),
        generated_at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn file_stem(requester: &str) -> String {
    let cleaned: String = requester
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let stem = cleaned.trim_start_matches('.');

    if stem.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        stem.to_string()
    }
}
