pub mod cities;
pub mod fields;
mod generator;
pub mod names;
pub mod postal;
mod profile;
pub mod reference;
mod request;

pub use cities::CityQueue;
pub use generator::{GenerationError, ProfileGenerator, DEFAULT_BIRTH_YEAR};
pub use names::{NameRegistry, NameRegistryError};
pub use postal::{LookupFailure, PostalLookup, ZippopotamClient};
pub use profile::{Gender, ParseGenderError, Profile, ProfileColumn, ProfileLayout};
pub use reference::ReferenceTables;
pub use request::{GenerationRequest, InputError, OutputFormat, RecordCount};
