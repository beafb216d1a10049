//! Fictitious demographic profile generation for bulk CSV and text export.
//!
//! A [`generation::ProfileGenerator`] combines reference tables, a persistent
//! name registry, a round-robin city rotation and a postal-code lookup into
//! [`generation::Profile`] records; [`export`] turns batches into files and
//! [`service`] shares one generator behind an HTTP router.

pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod service;
pub mod telemetry;

use config::AppConfig;
use error::AppError;
use generation::{NameRegistry, ProfileGenerator, ReferenceTables, ZippopotamClient};

/// Builds the production generator from configuration: reference files,
/// persisted name registry and the HTTP postal client.
pub fn generator_from_config(
    config: &AppConfig,
) -> Result<ProfileGenerator<ZippopotamClient>, AppError> {
    let tables = ReferenceTables::load(
        &config.generator.area_codes_file,
        &config.generator.schools_file,
    );
    let names = NameRegistry::load(&config.generator.names_file)?;
    let lookup = ZippopotamClient::new(config.postal.base_url.clone(), config.postal.timeout)?;

    let generator = ProfileGenerator::new(tables, names, lookup)?;
    Ok(generator.with_birth_year(config.generator.birth_year))
}
