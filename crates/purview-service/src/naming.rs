//! Collection id validation and random id generation.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

use purview_core::error::AppError;

/// Shortest id the service accepts.
pub const MIN_ID_LEN: usize = 3;
/// Longest id the service accepts.
pub const MAX_ID_LEN: usize = 36;
/// Length of a generated replacement id.
pub const GENERATED_ID_LEN: usize = 6;

/// Whether `candidate` is usable verbatim as a collection id.
///
/// Ids are ASCII letters and digits only, between [`MIN_ID_LEN`] and
/// [`MAX_ID_LEN`] characters long.
pub fn is_valid_collection_id(candidate: &str) -> bool {
    (MIN_ID_LEN..=MAX_ID_LEN).contains(&candidate.len())
        && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Source of random lowercase strings.
///
/// Shared by every service that mints ids or nicknames. Seeding it makes
/// id generation reproducible.
pub struct NameGenerator {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl std::fmt::Debug for NameGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameGenerator").finish_non_exhaustive()
    }
}

impl NameGenerator {
    /// Seeded from `seed` when given, from OS entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_rng(StdRng::seed_from_u64(seed)),
            None => Self::from_rng(StdRng::from_entropy()),
        }
    }

    /// Wraps an arbitrary random source.
    pub fn from_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// `len` random characters from `a..=z`.
    pub fn lowercase(&self, len: usize) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..len)
            .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
            .collect()
    }
}

/// Turns candidate ids into ids that are valid and unused.
#[derive(Debug, Clone, Copy)]
pub struct NameValidator<'a> {
    generator: &'a NameGenerator,
    retry_budget: u32,
}

impl<'a> NameValidator<'a> {
    /// Creates a validator drawing replacements from `generator`.
    pub fn new(generator: &'a NameGenerator, retry_budget: u32) -> Self {
        Self {
            generator,
            retry_budget,
        }
    }

    /// Returns `candidate` if it is a valid, untaken id, else a fresh one.
    ///
    /// `taken` reports whether an id already exists, either in the
    /// directory snapshot or among ids minted earlier in the same
    /// operation.
    pub fn verify_name(
        &self,
        candidate: &str,
        taken: impl Fn(&str) -> bool,
    ) -> Result<String, AppError> {
        if is_valid_collection_id(candidate) && !taken(candidate) {
            return Ok(candidate.to_string());
        }
        self.mint(|id| id == candidate || taken(id))
    }

    /// Generates a random id for which `taken` is false.
    pub fn mint(&self, taken: impl Fn(&str) -> bool) -> Result<String, AppError> {
        for attempt in 1..=self.retry_budget {
            let id = self.generator.lowercase(GENERATED_ID_LEN);
            if !taken(&id) {
                return Ok(id);
            }
            debug!(attempt, id = %id, "Generated collection id already taken");
        }
        Err(AppError::exhausted_retries(format!(
            "Could not generate an unused collection id after {} attempts",
            self.retry_budget
        )))
    }
}
