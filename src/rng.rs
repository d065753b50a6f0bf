//! Seedable random number generator for deterministic testing.
//!
//! When a seed is provided via [`ConfigBuilder::rng_seed`](crate::ConfigBuilder::rng_seed),
//! the hello randoms are deterministic. This is useful for testing and debugging.

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::provider::SecureRandom;

/// A random number generator that can be seeded for deterministic behavior.
///
/// When created with a seed, it produces deterministic random values.
/// When created without a seed, it reads from the operating system.
pub struct SeededRng {
    inner: Option<StdRng>,
}

impl SeededRng {
    /// Create a new RNG with an optional seed.
    pub fn new(seed: Option<u64>) -> Self {
        let inner = seed.map(StdRng::seed_from_u64);
        Self { inner }
    }

    pub fn is_seeded(&self) -> bool {
        self.inner.is_some()
    }
}

impl SecureRandom for SeededRng {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), String> {
        match self.inner.as_mut() {
            Some(rng) => {
                rng.fill_bytes(buf);
                Ok(())
            }
            None => OsRng.try_fill_bytes(buf).map_err(|e| e.to_string()),
        }
    }
}

impl std::fmt::Debug for SeededRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeededRng")
            .field("seeded", &self.is_seeded())
            .finish()
    }
}
