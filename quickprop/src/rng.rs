//! Seedable random source threaded explicitly through every generation call.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// The random state owned by one run of the engine.
///
/// It is cheap to clone, and a clone replays exactly the same stream of
/// draws as the original, which is what regression replay relies on.
pub type RandomSource = StdRng;

/// Create a random source from an explicit seed
pub fn create_seeded_rng(seed: u64) -> RandomSource {
    StdRng::seed_from_u64(seed)
}

/// Draw a fresh seed from operating system entropy
pub fn random_seed() -> u64 {
    rand::random()
}

/// Derive an independent child source from `parent`.
///
/// Consumes exactly one `u64` from the parent, so forking is itself
/// deterministic given the parent's seed.
pub fn fork_rng(parent: &mut dyn RngCore) -> RandomSource {
    create_seeded_rng(parent.next_u64())
}

/// Where the seed of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// Supplied by the caller (configuration, environment, replay)
    Explicit(u64),
    /// Drawn from system entropy because nothing was supplied
    Entropy(u64),
}

impl SeedSource {
    /// Resolve an optional seed, falling back to entropy
    pub fn resolve(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => SeedSource::Explicit(seed),
            None => SeedSource::Entropy(random_seed()),
        }
    }

    /// The seed value, whatever its origin
    pub fn seed(&self) -> u64 {
        match *self {
            SeedSource::Explicit(seed) | SeedSource::Entropy(seed) => seed,
        }
    }

    /// Whether the seed was picked by the library rather than the caller
    pub fn is_entropy(&self) -> bool {
        matches!(self, SeedSource::Entropy(_))
    }

    /// Build the random source for this seed
    pub fn into_rng(self) -> RandomSource {
        create_seeded_rng(self.seed())
    }
}
