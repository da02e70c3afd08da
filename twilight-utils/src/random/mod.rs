//! Seeded random sources for noise construction.
//!
//! World generation needs every named noise to get the same generator state on
//! every machine for a given world seed. A [`RandomSplitter`] holds 128 bits of
//! seed material and derives an independent [`RandomSource`] per name by mixing
//! in the MD5 digest of that name.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The sequential random source used for noise initialization.
pub type RandomSource = ChaCha8Rng;

/// Derives named random sources from a fixed pair of seed halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSplitter {
    seed_lo: u64,
    seed_hi: u64,
}

impl RandomSplitter {
    /// Creates the root splitter for a world seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let mut random = RandomSource::seed_from_u64(seed);
        Self::fork(&mut random)
    }

    /// Forks a splitter off a sequential source, consuming two `u64`s.
    pub fn fork<R: Rng + ?Sized>(random: &mut R) -> Self {
        Self {
            seed_lo: random.random(),
            seed_hi: random.random(),
        }
    }

    /// Creates a sequential source seeded from this splitter and the hash of `name`.
    #[must_use]
    pub fn with_hash_of(&self, name: &str) -> RandomSource {
        let digest = md5::compute(name.as_bytes());
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&digest.0[..8]);
        hi.copy_from_slice(&digest.0[8..]);

        let lo = u64::from_be_bytes(lo) ^ self.seed_lo;
        let hi = u64::from_be_bytes(hi) ^ self.seed_hi;

        let mut seed = [0u8; 32];
        seed[..8].copy_from_slice(&lo.to_le_bytes());
        seed[8..16].copy_from_slice(&hi.to_le_bytes());
        seed[16..24].copy_from_slice(&(!lo).to_le_bytes());
        seed[24..].copy_from_slice(&(!hi).to_le_bytes());
        RandomSource::from_seed(seed)
    }
}
