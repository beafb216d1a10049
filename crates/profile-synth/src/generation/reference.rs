use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Cities the generator draws from, paired with their state.
pub const CITY_STATES: &[(&str, &str)] = &[
    ("Atlanta", "Georgia"),
    ("Boston", "Massachusetts"),
    ("Buffalo", "New York"),
    ("Charlotte", "North Carolina"),
    ("Chicago", "Illinois"),
    ("Dallas", "Texas"),
    ("Denver", "Colorado"),
    ("Detroit", "Michigan"),
    ("Houston", "Texas"),
    ("Kansas City", "Missouri"),
    ("Los Angeles", "California"),
    ("Manassas", "Virginia"),
    ("McAllen", "Texas"),
    ("Miami", "Florida"),
    ("Nashville", "Tennessee"),
    ("New York", "New York"),
    ("Omaha", "Nebraska"),
    ("Phoenix", "Arizona"),
    ("Salt Lake City", "Utah"),
    ("San Francisco", "California"),
    ("St. Louis", "Missouri"),
    ("Seattle", "Washington"),
];

const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("California", "CA"),
    ("Texas", "TX"),
    ("Florida", "FL"),
    ("New York", "NY"),
    ("Illinois", "IL"),
    ("Georgia", "GA"),
    ("Massachusetts", "MA"),
    ("North Carolina", "NC"),
    ("Colorado", "CO"),
    ("Michigan", "MI"),
    ("Missouri", "MO"),
    ("Virginia", "VA"),
    ("Tennessee", "TN"),
    ("Nebraska", "NE"),
    ("Arizona", "AZ"),
    ("Utah", "UT"),
    ("Washington", "WA"),
];

pub const FALLBACK_HIGH_SCHOOL: &str = "Generic High School";
pub const FALLBACK_AREA_CODE: &str = "555";

pub fn state_for_city(city: &str) -> Option<&'static str> {
    CITY_STATES
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, state)| *state)
}

pub fn state_abbreviation(state: &str) -> Option<&'static str> {
    STATE_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, abbreviation)| *abbreviation)
}

pub fn known_cities() -> Vec<&'static str> {
    CITY_STATES.iter().map(|(city, _)| *city).collect()
}

/// Lookup tables constraining the random choices of the field generators.
///
/// The maps are filled at startup and treated as read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    area_codes: HashMap<String, Vec<String>>,
    schools: HashMap<String, Vec<String>>,
    state_area_codes: HashMap<String, Vec<String>>,
}

impl ReferenceTables {
    pub fn new(
        area_codes: HashMap<String, Vec<String>>,
        schools: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            area_codes,
            schools,
            state_area_codes: HashMap::new(),
        }
    }

    /// Reads both reference files. Missing files degrade to empty tables.
    pub fn load(area_codes_path: impl AsRef<Path>, schools_path: impl AsRef<Path>) -> Self {
        let area_codes = load_area_codes(area_codes_path);
        let schools = load_high_schools(schools_path);
        debug!(
            area_code_cities = area_codes.len(),
            school_cities = schools.len(),
            "reference tables loaded"
        );
        Self::new(area_codes, schools)
    }

    pub fn with_state_area_codes(mut self, state: impl Into<String>, codes: Vec<String>) -> Self {
        self.state_area_codes.insert(state.into(), codes);
        self
    }

    /// Area codes recorded for the city; `None` when absent or empty.
    pub fn area_codes_for(&self, city: &str) -> Option<&[String]> {
        self.area_codes
            .get(city)
            .map(Vec::as_slice)
            .filter(|codes| !codes.is_empty())
    }

    pub fn state_area_codes_for(&self, state: &str) -> Option<&[String]> {
        self.state_area_codes
            .get(state)
            .map(Vec::as_slice)
            .filter(|codes| !codes.is_empty())
    }

    pub fn schools_for(&self, city: &str) -> Option<&[String]> {
        self.schools
            .get(city)
            .map(Vec::as_slice)
            .filter(|schools| !schools.is_empty())
    }
}

pub fn load_area_codes(path: impl AsRef<Path>) -> HashMap<String, Vec<String>> {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => parse_area_codes(BufReader::new(file)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "area codes file not found");
            HashMap::new()
        }
    }
}

pub fn load_high_schools(path: impl AsRef<Path>) -> HashMap<String, Vec<String>> {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => parse_high_schools(BufReader::new(file)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "high schools file not found");
            HashMap::new()
        }
    }
}

/// Parses `City:code1,code2` lines. Lines without a colon are skipped.
pub fn parse_area_codes<R: BufRead>(reader: R) -> HashMap<String, Vec<String>> {
    let mut area_codes = HashMap::new();

    for line in reader.lines().map_while(Result::ok) {
        let line = line.trim();
        let Some((city, codes)) = line.split_once(':') else {
            continue;
        };

        let codes = codes
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();
        area_codes.insert(city.trim().to_string(), codes);
    }

    area_codes
}

/// Parses `City:First School` headers followed by one school per line.
pub fn parse_high_schools<R: BufRead>(reader: R) -> HashMap<String, Vec<String>> {
    let mut schools: HashMap<String, Vec<String>> = HashMap::new();
    let mut current_city: Option<String> = None;

    for line in reader.lines().map_while(Result::ok) {
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }

        if let Some((city, school)) = stripped.split_once(':') {
            let city = city.trim().to_string();
            let school = school.trim();
            let first = if school.is_empty() {
                Vec::new()
            } else {
                vec![school.to_string()]
            };
            schools.insert(city.clone(), first);
            current_city = Some(city);
        } else if let Some(city) = current_city.as_ref() {
            schools
                .entry(city.clone())
                .or_default()
                .push(stripped.to_string());
        }
    }

    schools
}
