use super::profile::{Gender, ProfileLayout};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("requester name must not be empty")]
    EmptyRequester,
    #[error("record count {0} is outside {min}..={max}", min = RecordCount::MIN, max = RecordCount::MAX)]
    CountOutOfRange(u64),
    #[error("'{0}' is not a number")]
    InvalidCount(String),
    #[error("'{0}' is not a supported output format (expected CSV or TXT)")]
    InvalidFormat(String),
    #[error("unknown layout '{0}' (expected full or address)")]
    InvalidLayout(String),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

/// Number of profiles in a batch, always within `1..=10_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordCount(u32);

impl RecordCount {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10_000;
    pub const DEFAULT: Self = Self(10);

    pub fn new(value: u64) -> Result<Self, InputError> {
        match u32::try_from(value) {
            Ok(count) if (Self::MIN..=Self::MAX).contains(&count) => Ok(Self(count)),
            _ => Err(InputError::CountOutOfRange(value)),
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for RecordCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for RecordCount {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let parsed = trimmed
            .parse::<u64>()
            .map_err(|_| InputError::InvalidCount(trimmed.to_string()))?;
        Self::new(parsed)
    }
}

impl<'de> Deserialize<'de> for RecordCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for RecordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "TXT")]
    Txt,
}

impl OutputFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Txt => "TXT",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
        }
    }

    pub fn content_type(self) -> mime::Mime {
        match self {
            Self::Csv => mime::TEXT_CSV_UTF_8,
            Self::Txt => mime::TEXT_PLAIN_UTF_8,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "txt" | "text" => Ok(Self::Txt),
            _ => Err(InputError::InvalidFormat(value.trim().to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Inputs collected by a front end before a batch is generated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationRequest {
    pub generated_for: String,
    pub gender: Gender,
    #[serde(default)]
    pub count: RecordCount,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub layout: ProfileLayout,
}

impl GenerationRequest {
    /// Trims the requester name and rejects it when nothing remains.
    pub fn validated(mut self) -> Result<Self, InputError> {
        let requester = self.generated_for.trim();
        if requester.is_empty() {
            return Err(InputError::EmptyRequester);
        }
        self.generated_for = requester.to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(10)]
    #[case(10_000)]
    fn accepts_counts_in_range(#[case] value: u64) {
        assert_eq!(RecordCount::new(value).map(RecordCount::get), Ok(value as u32));
    }

    #[rstest]
    #[case(0)]
    #[case(10_001)]
    #[case(u64::MAX)]
    fn rejects_counts_out_of_range(#[case] value: u64) {
        assert_eq!(
            RecordCount::new(value),
            Err(InputError::CountOutOfRange(value))
        );
    }

    #[test]
    fn count_parsing_reports_non_numbers() {
        assert_eq!(
            "ten".parse::<RecordCount>(),
            Err(InputError::InvalidCount("ten".to_string()))
        );
        assert_eq!(" 25 ".parse::<RecordCount>().map(RecordCount::get), Ok(25));
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"generated_for":"  QA Team ","gender":"Female"}"#)
                .expect("request parses");
        let request = request.validated().expect("valid");

        assert_eq!(request.generated_for, "QA Team");
        assert_eq!(request.count, RecordCount::DEFAULT);
        assert_eq!(request.format, OutputFormat::Csv);
        assert_eq!(request.layout, ProfileLayout::Full);
    }

    #[test]
    fn request_rejects_out_of_range_count() {
        let parsed = serde_json::from_str::<GenerationRequest>(
            r#"{"generated_for":"QA","gender":"Male","count":20000}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn blank_requester_is_rejected() {
        let request = GenerationRequest {
            generated_for: "   ".to_string(),
            gender: Gender::Male,
            count: RecordCount::DEFAULT,
            format: OutputFormat::Txt,
            layout: ProfileLayout::Full,
        };
        assert_eq!(request.validated(), Err(InputError::EmptyRequester));
    }

    #[test]
    fn formats_parse_and_describe_themselves() {
        assert_eq!("TXT".parse::<OutputFormat>(), Ok(OutputFormat::Txt));
        assert_eq!(OutputFormat::Csv.extension(), "csv");
        assert_eq!(OutputFormat::Txt.content_type().essence_str(), "text/plain");
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }
}
