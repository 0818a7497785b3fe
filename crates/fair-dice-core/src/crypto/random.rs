//! Cryptographically secure random source.

use super::RandomKey;
use crate::{Error, Result};
use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};

/// Default key length in bytes
pub const DEFAULT_KEY_LEN: usize = 32;

/// Source of uniform integers and symmetric keys.
///
/// Uniform values use rejection sampling over 32-bit draws: a draw is
/// accepted only below the largest multiple of `range` not exceeding 2^32,
/// so every value in `[0, range)` is exactly equally likely.
pub struct SecureRandom<R = ThreadRng> {
    rng: R,
}

impl SecureRandom<ThreadRng> {
    /// Create a source backed by the thread-local CSPRNG
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for SecureRandom<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> SecureRandom<R> {
    /// Create a source backed by the given CSPRNG
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate `length` bytes of fresh key material
    pub fn generate_key(&mut self, length: usize) -> Result<RandomKey> {
        if length == 0 {
            return Err(Error::InvalidKeyLength(length));
        }
        let mut bytes = vec![0u8; length];
        self.rng.fill_bytes(&mut bytes);
        Ok(RandomKey::from_bytes(bytes))
    }

    /// Generate a uniformly distributed value in `[0, range)`
    pub fn generate_uniform(&mut self, range: u32) -> Result<u32> {
        if range == 0 {
            return Err(Error::InvalidRange(range));
        }

        let span = 1u64 << 32;
        let range = u64::from(range);
        let limit = span - span % range;

        loop {
            let mut bytes = [0u8; 4];
            self.rng.fill_bytes(&mut bytes);
            let draw = u64::from(u32::from_be_bytes(bytes));
            if draw < limit {
                return Ok((draw % range) as u32);
            }
        }
    }

    /// Pick one element of `items` uniformly
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T> {
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let index = self.generate_uniform(len)? as usize;
        Ok(&items[index])
    }
}
