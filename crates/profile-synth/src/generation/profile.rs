use super::request::InputError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender used to condition first-name sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a recognised gender (expected Male or Female)")]
pub struct ParseGenderError(pub String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(ParseGenderError(value.trim().to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One synthesized demographic record. Built once by the generator and only
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    phone_number: String,
    date_of_birth: NaiveDate,
    state: String,
    city: String,
    zip_code: String,
    high_school: String,
    street: String,
}

impl Profile {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        phone_number: String,
        date_of_birth: NaiveDate,
        state: String,
        city: String,
        zip_code: String,
        high_school: String,
        street: String,
    ) -> Self {
        Self {
            name,
            phone_number,
            date_of_birth,
            state,
            city,
            zip_code,
            high_school,
            street,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn high_school(&self) -> &str {
        &self.high_school
    }

    /// Building number and street, without city or zip.
    pub fn street(&self) -> &str {
        &self.street
    }

    /// Full mailing line used by the address layout.
    pub fn address(&self) -> String {
        let abbreviation =
            super::reference::state_abbreviation(&self.state).unwrap_or(self.state.as_str());
        format!(
            "{}, {}, {} {}",
            self.street, self.city, abbreviation, self.zip_code
        )
    }

    /// Renders a single column the way both export formats print it.
    pub fn value(&self, column: ProfileColumn) -> String {
        match column {
            ProfileColumn::Name => self.name.clone(),
            ProfileColumn::PhoneNumber => self.phone_number.clone(),
            ProfileColumn::DateOfBirth => self.date_of_birth.format("%Y-%m-%d").to_string(),
            ProfileColumn::State => self.state.clone(),
            ProfileColumn::City => self.city.clone(),
            ProfileColumn::ZipCode => self.zip_code.clone(),
            ProfileColumn::HighSchool => self.high_school.clone(),
            ProfileColumn::Address => self.address(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileColumn {
    Name,
    PhoneNumber,
    DateOfBirth,
    State,
    City,
    ZipCode,
    HighSchool,
    Address,
}

impl ProfileColumn {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::PhoneNumber => "Phone Number",
            Self::DateOfBirth => "Date of Birth",
            Self::State => "State",
            Self::City => "City",
            Self::ZipCode => "Zip Code",
            Self::HighSchool => "High School",
            Self::Address => "Address",
        }
    }
}

/// Column selection shared by every exporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileLayout {
    /// Name, phone, birth date, state, city, zip and school.
    #[default]
    Full,
    /// Name, birth date, mailing address and school.
    Address,
}

impl ProfileLayout {
    pub const fn columns(self) -> &'static [ProfileColumn] {
        match self {
            Self::Full => &[
                ProfileColumn::Name,
                ProfileColumn::PhoneNumber,
                ProfileColumn::DateOfBirth,
                ProfileColumn::State,
                ProfileColumn::City,
                ProfileColumn::ZipCode,
                ProfileColumn::HighSchool,
            ],
            Self::Address => &[
                ProfileColumn::Name,
                ProfileColumn::DateOfBirth,
                ProfileColumn::Address,
                ProfileColumn::HighSchool,
            ],
        }
    }

    pub fn headers(self) -> Vec<&'static str> {
        self.columns().iter().map(|column| column.label()).collect()
    }
}

impl FromStr for ProfileLayout {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "address" => Ok(Self::Address),
            _ => Err(InputError::InvalidLayout(value.trim().to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ProfileLayout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
