//! Deterministic randomness: seed derivation from transaction context and a
//! counter-mode hash PRNG with an unbiased bounded sampler.
//!
//! # Determinism
//! Nothing here draws on system entropy. The seed is a pure function of the
//! [`TxEnv`], and the generators are pure functions of `(seed, counter)`, so
//! any third party holding the persisted seed and participant data can replay
//! a selection bit for bit.

use sha2::{Digest, Sha256};

use crate::host::TxEnv;

/// Derives the 64-bit execution seed from transaction context.
///
/// Hashes, in fixed order: the transaction id (skipped when empty), the
/// block height as LE bytes (skipped when zero), the timestamp, and the
/// caller address. The low 8 bytes of the SHA-256 digest, little-endian,
/// become the seed. This is the single entropy source for an execution and
/// is persisted for later replay.
pub fn derive_seed(env: &TxEnv) -> u64 {
    let mut hasher = Sha256::new();

    if !env.tx_id.is_empty() {
        hasher.update(env.tx_id.as_bytes());
    }
    if env.block_height > 0 {
        hasher.update(env.block_height.to_le_bytes());
    }
    hasher.update((env.timestamp as u64).to_le_bytes());
    hasher.update(env.caller.as_bytes());

    let digest = hasher.finalize();
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(buf)
}

/// A deterministic stream of uniform 64-bit values.
///
/// Implementors must be pure functions of their construction parameters and
/// draw count. `index` is provided and shared: it converts raw draws into an
/// unbiased integer in `[0, n)` by rejection sampling, so every implementor
/// gets the same bias-free contract.
pub trait UniformRng {
    /// Next uniform 64-bit value; advances the stream.
    fn next_u64(&mut self) -> u64;

    /// Unbiased integer in `[0, n)`; returns 0 for `n == 0`.
    ///
    /// Rejects raw draws above the largest multiple of `n` representable in
    /// u64, redrawing until one lands below it (expected redraws ~0), which
    /// removes modulo bias exactly.
    fn index(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        let zone = u64::MAX - (u64::MAX % n);
        loop {
            let raw = self.next_u64();
            if raw < zone {
                return raw % n;
            }
        }
    }
}

/// Counter-mode SHA-256 generator: `next` hashes `(seed, counter)` and takes
/// the low 8 bytes, incrementing the counter after each draw.
#[derive(Debug, Clone)]
pub struct HashRng {
    seed: u64,
    counter: u64,
}

impl HashRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }
}

impl UniformRng for HashRng {
    fn next_u64(&mut self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(self.counter.to_le_bytes());
        self.counter += 1;

        let digest = hasher.finalize();
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(buf)
    }
}

/// Non-cryptographic fallback generator (MMIX linear congruential step).
///
/// Same `next_u64`/`index` contract and determinism as [`HashRng`]; suitable
/// where cryptographic unpredictability of the stream is not required.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl UniformRng for Lcg {
    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }
}
