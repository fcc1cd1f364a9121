//! Deterministic seed hierarchy for reproducible sample generation.
//!
//! [`SeedHierarchy`] provides a 3-level derivation tree:
//!
//! ```text
//! Run seed
//! └── Sample seed (per generated sample)
//!     └── Stage seed (params, layout attempt, ...)
//! ```
//!
//! Child seeds are derived deterministically via hashing, so a whole batch is
//! reproducible from a single root seed even when samples are generated in
//! parallel: each worker owns an RNG derived from `root + sample index` and
//! never touches shared random state.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Derive a child seed from a parent seed and a string key.
///
/// Uses `DefaultHasher` (SipHash-1-3) for fast, deterministic mixing.
///
/// # Example
///
/// ```
/// use cogs_core::seed::derive_seed;
///
/// let child = derive_seed(42, "layout:0");
/// assert_ne!(child, 42); // derived, not identical
/// let child2 = derive_seed(42, "layout:0");
/// assert_eq!(child, child2); // deterministic
/// ```
#[must_use]
pub fn derive_seed(parent: u64, key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

/// Derive a child seed from a parent seed and a numeric index.
///
/// Convenience wrapper for indexed children (sample numbers).
#[must_use]
pub fn derive_seed_indexed(parent: u64, index: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    index.hash(&mut hasher);
    hasher.finish()
}

/// Hierarchical seed manager for reproducible generation runs.
///
/// Stores the root (run-level) seed and derives deterministic child seeds
/// per sample and per named stage within a sample.
///
/// # Example
///
/// ```
/// use cogs_core::seed::SeedHierarchy;
///
/// let seeds = SeedHierarchy::new(42);
/// let sample = seeds.sample_seed(3);
/// let layout = seeds.stage_seed(3, "layout:0");
/// // All deterministic from root seed 42
/// ```
#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    root: u64,
}

impl SeedHierarchy {
    /// Create a new hierarchy from a root seed.
    #[must_use]
    pub const fn new(root: u64) -> Self {
        Self { root }
    }

    /// The root (run-level) seed.
    #[must_use]
    pub const fn root(&self) -> u64 {
        self.root
    }

    /// Derive a seed for a specific sample index.
    #[must_use]
    pub fn sample_seed(&self, sample_index: u64) -> u64 {
        derive_seed_indexed(self.root, sample_index)
    }

    /// Derive a seed for a named stage within a sample.
    #[must_use]
    pub fn stage_seed(&self, sample_index: u64, stage: &str) -> u64 {
        derive_seed(self.sample_seed(sample_index), stage)
    }

    /// Create a `ChaCha8Rng` from the root seed.
    #[must_use]
    pub fn root_rng(&self) -> rand_chacha::ChaCha8Rng {
        use rand::SeedableRng;
        rand_chacha::ChaCha8Rng::seed_from_u64(self.root)
    }

    /// Create a `ChaCha8Rng` from a sample-level seed.
    #[must_use]
    pub fn sample_rng(&self, sample_index: u64) -> rand_chacha::ChaCha8Rng {
        use rand::SeedableRng;
        rand_chacha::ChaCha8Rng::seed_from_u64(self.sample_seed(sample_index))
    }

    /// Create a `ChaCha8Rng` from a stage-level seed.
    #[must_use]
    pub fn stage_rng(&self, sample_index: u64, stage: &str) -> rand_chacha::ChaCha8Rng {
        use rand::SeedableRng;
        rand_chacha::ChaCha8Rng::seed_from_u64(self.stage_seed(sample_index, stage))
    }
}

impl Default for SeedHierarchy {
    fn default() -> Self {
        Self::new(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
