//! Single-attribute generators. Each draws from the shared RNG and the
//! reference tables and never fails: missing data falls back to generic
//! values.

use super::reference::{ReferenceTables, FALLBACK_AREA_CODE, FALLBACK_HIGH_SCHOOL};
use chrono::{Duration, NaiveDate};
use fake::faker::address::raw::{BuildingNumber, StreetName};
use fake::locales::EN;
use fake::Fake;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Uniform date in `[Jan 1, Dec 31]` of `year`, both ends inclusive.
pub fn birth_date(rng: &mut ChaCha8Rng, year: i32) -> NaiveDate {
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return NaiveDate::MIN;
    };
    let last_offset = (end - start).num_days();
    start + Duration::days(rng.random_range(0..=last_offset))
}

/// `"<School>, <City>"`, using the generic school when the city is unknown.
pub fn school(rng: &mut ChaCha8Rng, tables: &ReferenceTables, city: &str) -> String {
    let school = tables
        .schools_for(city)
        .and_then(|schools| schools.choose(rng))
        .map(String::as_str)
        .unwrap_or(FALLBACK_HIGH_SCHOOL);
    format!("{school}, {city}")
}

/// Ten digits: area code, an exchange in 200..=999, then a four digit line.
pub fn phone(rng: &mut ChaCha8Rng, tables: &ReferenceTables, state: &str, city: &str) -> String {
    let area = tables
        .area_codes_for(city)
        .or_else(|| tables.state_area_codes_for(state))
        .and_then(|codes| codes.choose(rng))
        .map(String::as_str)
        .unwrap_or(FALLBACK_AREA_CODE);
    let exchange: u16 = rng.random_range(200..=999);
    let line: u16 = rng.random_range(0..=9999);
    format!("{area}{exchange}{line:04}")
}

pub fn fallback_zip(rng: &mut ChaCha8Rng) -> String {
    rng.random_range(10_000..=99_999u32).to_string()
}

pub fn street(rng: &mut ChaCha8Rng) -> String {
    let number: String = BuildingNumber(EN).fake_with_rng(rng);
    let street: String = StreetName(EN).fake_with_rng(rng);
    format!("{number} {street}")
}
