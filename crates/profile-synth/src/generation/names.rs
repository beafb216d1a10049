use super::profile::Gender;
use fake::faker::name::raw::LastName;
use fake::locales::EN;
use fake::Fake;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Upper bound on draws before the name space is considered exhausted.
pub const MAX_NAME_ATTEMPTS: usize = 10_000;

const MALE_FIRST_NAMES: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
    "Charles", "Christopher", "Daniel", "Matthew", "Anthony", "Mark", "Donald", "Steven", "Paul",
    "Andrew", "Joshua", "Kenneth", "Kevin", "Brian", "George", "Timothy", "Ronald", "Edward",
    "Jason", "Jeffrey", "Ryan", "Jacob", "Gary", "Nicholas", "Eric", "Jonathan", "Stephen",
    "Larry", "Justin", "Scott", "Brandon", "Benjamin", "Samuel", "Gregory", "Alexander",
    "Patrick", "Frank", "Raymond", "Jack", "Dennis", "Jerry", "Tyler", "Aaron", "Jose", "Adam",
    "Nathan", "Henry", "Zachary", "Douglas", "Peter", "Kyle", "Noah", "Ethan", "Jeremy",
    "Walter", "Christian", "Keith", "Roger", "Terry", "Austin", "Sean", "Gerald", "Carl",
    "Harold", "Dylan", "Arthur", "Lawrence", "Jordan", "Jesse", "Bryan", "Billy", "Bruce",
    "Gabriel", "Joe", "Logan", "Alan", "Juan", "Albert", "Willie", "Elijah", "Wayne", "Randy",
    "Vincent", "Mason", "Roy", "Ralph", "Bobby", "Russell", "Bradley", "Philip", "Eugene",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica", "Sarah",
    "Karen", "Lisa", "Nancy", "Betty", "Sandra", "Margaret", "Ashley", "Kimberly", "Emily",
    "Donna", "Michelle", "Carol", "Amanda", "Melissa", "Deborah", "Stephanie", "Dorothy",
    "Rebecca", "Sharon", "Laura", "Cynthia", "Amy", "Kathleen", "Angela", "Shirley", "Brenda",
    "Emma", "Anna", "Pamela", "Nicole", "Samantha", "Katherine", "Christine", "Helen", "Debra",
    "Rachel", "Carolyn", "Janet", "Maria", "Catherine", "Heather", "Diane", "Olivia", "Julie",
    "Joyce", "Victoria", "Ruth", "Virginia", "Lauren", "Kelly", "Christina", "Joan", "Evelyn",
    "Judith", "Andrea", "Hannah", "Megan", "Cheryl", "Jacqueline", "Martha", "Madison",
    "Teresa", "Gloria", "Sara", "Janice", "Ann", "Kathryn", "Abigail", "Sophia", "Frances",
    "Jean", "Alice", "Judy", "Isabella", "Julia", "Grace", "Amber", "Denise", "Danielle",
    "Marilyn", "Beverly", "Charlotte", "Natalie", "Theresa", "Diana", "Brittany", "Doris",
    "Kayla", "Alexis", "Lori", "Marie",
];

#[derive(Debug, thiserror::Error)]
pub enum NameRegistryError {
    #[error("failed to read name registry at '{path}': {source}")]
    Load { path: PathBuf, source: io::Error },
    #[error("failed to append to name registry at '{path}': {source}")]
    Persist { path: PathBuf, source: io::Error },
    #[error("no unused name found after {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// Full names handed out so far, optionally mirrored to an append-only file
/// so uniqueness holds across runs.
#[derive(Debug)]
pub struct NameRegistry {
    used: HashSet<String>,
    store: Option<NameStore>,
}

#[derive(Debug)]
struct NameStore {
    path: PathBuf,
    file: Option<File>,
}

impl NameStore {
    fn append(&mut self, name: &str) -> io::Result<()> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.file = Some(file);
        }

        match self.file.as_mut() {
            Some(file) => {
                writeln!(file, "{name}")?;
                file.flush()
            }
            None => Ok(()),
        }
    }
}

impl NameRegistry {
    /// Registry that only remembers names for the lifetime of the value.
    pub fn in_memory() -> Self {
        Self {
            used: HashSet::new(),
            store: None,
        }
    }

    /// Loads names persisted by earlier runs. A missing file yields an empty
    /// registry; the file is created on the first append.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NameRegistryError> {
        let path = path.as_ref().to_path_buf();
        let used = match File::open(&path) {
            Ok(file) => read_names(BufReader::new(file)).map_err(|source| {
                NameRegistryError::Load {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashSet::new(),
            Err(source) => return Err(NameRegistryError::Load { path, source }),
        };

        info!(path = %path.display(), names = used.len(), "name registry loaded");

        Ok(Self {
            used,
            store: Some(NameStore { path, file: None }),
        })
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Draws first and last names until the pair has never been issued, then
    /// records it durably before returning.
    pub fn generate(
        &mut self,
        rng: &mut ChaCha8Rng,
        gender: Gender,
    ) -> Result<String, NameRegistryError> {
        let first_names = match gender {
            Gender::Male => MALE_FIRST_NAMES,
            Gender::Female => FEMALE_FIRST_NAMES,
        };

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let first = first_names.choose(rng).copied().unwrap_or("Alex");
            let last: String = LastName(EN).fake_with_rng(rng);
            let candidate = format!("{first} {last}");

            if self.used.contains(&candidate) {
                continue;
            }

            self.claim(&candidate)?;
            if attempt > 1 {
                debug!(attempt, "name collision resolved");
            }
            return Ok(candidate);
        }

        Err(NameRegistryError::Exhausted {
            attempts: MAX_NAME_ATTEMPTS,
        })
    }

    /// Persists then inserts, so a failed write leaves the set untouched.
    fn claim(&mut self, name: &str) -> Result<(), NameRegistryError> {
        if let Some(store) = self.store.as_mut() {
            store
                .append(name)
                .map_err(|source| NameRegistryError::Persist {
                    path: store.path.clone(),
                    source,
                })?;
        }
        self.used.insert(name.to_string());
        Ok(())
    }
}

fn read_names<R: BufRead>(reader: R) -> io::Result<HashSet<String>> {
    let mut names = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            names.insert(trimmed.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::io::Cursor;

    #[test]
    fn read_names_skips_blank_lines() {
        let names = read_names(Cursor::new("Ada Stone\n\n  Ben Hale  \n")).expect("read");
        assert_eq!(names.len(), 2);
        assert!(names.contains("Ben Hale"));
    }

    #[test]
    fn generated_names_use_gendered_first_names() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut registry = NameRegistry::in_memory();

        for _ in 0..20 {
            let name = registry
                .generate(&mut rng, Gender::Female)
                .expect("name generated");
            let first = name.split(' ').next().expect("first name");
            assert!(FEMALE_FIRST_NAMES.contains(&first), "{name}");
        }
        assert_eq!(registry.len(), 20);
    }

    #[test]
    fn in_memory_registry_never_repeats() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut registry = NameRegistry::in_memory();
        let mut seen = HashSet::new();

        for _ in 0..500 {
            let name = registry
                .generate(&mut rng, Gender::Male)
                .expect("name generated");
            assert!(seen.insert(name), "duplicate name issued");
        }
    }

    #[test]
    fn load_of_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = NameRegistry::load(dir.path().join("names.txt")).expect("loads");
        assert!(registry.is_empty());
    }

    #[test]
    fn persist_failure_leaves_registry_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry =
            NameRegistry::load(dir.path().join("missing").join("names.txt")).expect("loads");
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let error = registry
            .generate(&mut rng, Gender::Male)
            .expect_err("append must fail");
        assert!(matches!(error, NameRegistryError::Persist { .. }));
        assert!(registry.is_empty());
    }
}
