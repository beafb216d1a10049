use super::cities::{CityQueue, EmptyCitySet};
use super::fields;
use super::names::{NameRegistry, NameRegistryError};
use super::postal::PostalLookup;
use super::profile::{Gender, Profile};
use super::reference::{state_for_city, ReferenceTables};
use super::request::RecordCount;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub const DEFAULT_BIRTH_YEAR: i32 = 2010;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Names(#[from] NameRegistryError),
    #[error("city '{0}' has no state in the reference table")]
    UnknownCity(String),
    #[error(transparent)]
    Cities(#[from] EmptyCitySet),
}

/// Owns every piece of mutable generation state: the RNG, the name registry
/// and the city rotation. Methods take `&mut self`, so a shared generator must
/// sit behind a lock.
pub struct ProfileGenerator<L> {
    tables: ReferenceTables,
    names: NameRegistry,
    cities: CityQueue,
    lookup: L,
    birth_year: i32,
    rng: ChaCha8Rng,
}

impl<L: PostalLookup> ProfileGenerator<L> {
    /// Generator over the standard city rotation, seeded from the OS.
    pub fn new(
        tables: ReferenceTables,
        names: NameRegistry,
        lookup: L,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            tables,
            names,
            cities: CityQueue::standard()?,
            lookup,
            birth_year: DEFAULT_BIRTH_YEAR,
            rng: ChaCha8Rng::from_os_rng(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = year;
        self
    }

    pub fn with_cities(mut self, cities: CityQueue) -> Self {
        self.cities = cities;
        self
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_year
    }

    /// Builds one profile. The city is drawn first because state, school,
    /// phone and zip all derive from it.
    pub async fn assemble(&mut self, gender: Gender) -> Result<Profile, GenerationError> {
        Ok(self.assemble_tracked(gender).await?.0)
    }

    /// Produces `count` profiles in generation order.
    pub async fn produce_batch(
        &mut self,
        gender: Gender,
        count: RecordCount,
    ) -> Result<Vec<Profile>, GenerationError> {
        let total = count.as_usize();
        let mut profiles = Vec::with_capacity(total);
        let mut zip_fallbacks = 0usize;

        for index in 0..total {
            let (profile, zip_fell_back) = self.assemble_tracked(gender).await?;
            if zip_fell_back {
                zip_fallbacks += 1;
            }
            debug!(current = index + 1, total, "generated profile");
            profiles.push(profile);
        }

        info!(
            %gender,
            count = total,
            zip_fallbacks,
            registry_size = self.names.len(),
            "profile batch generated"
        );
        Ok(profiles)
    }

    async fn assemble_tracked(
        &mut self,
        gender: Gender,
    ) -> Result<(Profile, bool), GenerationError> {
        let city = self.cities.next_city(&mut self.rng)?;
        let state =
            state_for_city(city).ok_or_else(|| GenerationError::UnknownCity(city.to_string()))?;

        let school = fields::school(&mut self.rng, &self.tables, city);
        let name = self.names.generate(&mut self.rng, gender)?;
        let phone = fields::phone(&mut self.rng, &self.tables, state, city);

        let (zip, fell_back) = match self.lookup.lookup_zip(city, state).await {
            Ok(zip) => (zip, false),
            Err(failure) => {
                debug!(
                    city,
                    state,
                    %failure,
                    transient = failure.is_transient(),
                    "using random zip"
                );
                (fields::fallback_zip(&mut self.rng), true)
            }
        };

        let street = fields::street(&mut self.rng);
        let date_of_birth = fields::birth_date(&mut self.rng, self.birth_year);

        let profile = Profile::new(
            name,
            phone,
            date_of_birth,
            state.to_string(),
            city.to_string(),
            zip,
            school,
            street,
        );
        Ok((profile, fell_back))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::postal::LookupFailure;
    use std::collections::HashMap;

    struct FixedZip(&'static str);

    impl PostalLookup for FixedZip {
        async fn lookup_zip(&self, _city: &str, _state: &str) -> Result<String, LookupFailure> {
            Ok(self.0.to_string())
        }
    }

    struct NoZip;

    impl PostalLookup for NoZip {
        async fn lookup_zip(&self, _city: &str, _state: &str) -> Result<String, LookupFailure> {
            Err(LookupFailure::Timeout)
        }
    }

    fn tables() -> ReferenceTables {
        let mut area_codes = HashMap::new();
        area_codes.insert("Miami".to_string(), vec!["305".to_string()]);
        ReferenceTables::new(area_codes, HashMap::new())
    }

    #[tokio::test]
    async fn assemble_uses_lookup_result() {
        let mut generator =
            ProfileGenerator::new(tables(), NameRegistry::in_memory(), FixedZip("33101"))
                .expect("generator")
                .with_seed(1)
                .with_cities(CityQueue::new(vec!["Miami"]).expect("non-empty"));

        let profile = generator.assemble(Gender::Female).await.expect("profile");

        assert_eq!(profile.city(), "Miami");
        assert_eq!(profile.state(), "Florida");
        assert_eq!(profile.zip_code(), "33101");
        assert!(profile.phone_number().starts_with("305"));
        assert_eq!(profile.high_school(), "Generic High School, Miami");
    }

    #[tokio::test]
    async fn failed_lookup_falls_back_to_random_zip() {
        let mut generator =
            ProfileGenerator::new(tables(), NameRegistry::in_memory(), NoZip)
                .expect("generator")
                .with_seed(2);

        let profiles = generator
            .produce_batch(Gender::Male, RecordCount::new(30).expect("count"))
            .await
            .expect("batch");

        assert_eq!(profiles.len(), 30);
        for profile in &profiles {
            assert_eq!(profile.zip_code().len(), 5);
            assert!(profile.zip_code().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn unknown_city_is_reported() {
        let mut generator = ProfileGenerator::new(tables(), NameRegistry::in_memory(), NoZip)
            .expect("generator")
            .with_cities(CityQueue::new(vec!["Atlantis"]).expect("non-empty"));

        let error = generator
            .assemble(Gender::Male)
            .await
            .expect_err("unknown city");
        assert!(matches!(error, GenerationError::UnknownCity(city) if city == "Atlantis"));
    }

    #[tokio::test]
    async fn seeded_generators_are_reproducible() {
        let mut first = ProfileGenerator::new(tables(), NameRegistry::in_memory(), NoZip)
            .expect("generator")
            .with_seed(99)
            .with_birth_year(1999);
        let mut second = ProfileGenerator::new(tables(), NameRegistry::in_memory(), NoZip)
            .expect("generator")
            .with_seed(99)
            .with_birth_year(1999);
        let count = RecordCount::new(5).expect("count");

        let a = first.produce_batch(Gender::Female, count).await.expect("batch");
        let b = second.produce_batch(Gender::Female, count).await.expect("batch");
        assert_eq!(a, b);
        assert!(a
            .iter()
            .all(|profile| profile.date_of_birth().format("%Y").to_string() == "1999"));
    }
}
