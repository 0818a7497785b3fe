//! Cryptographic primitives for the Fair Dice protocol.
//!
//! This module provides:
//! - SecureRandom for uniform values and key material
//! - RandomKey, Commitment and Revelation for the commit-reveal scheme
//! - CommitmentScheme, which ties key generation to HMAC-SHA3-256 tags

mod commitment;
mod random;

pub use commitment::{Commitment, CommitmentScheme, RandomKey, Revelation};
pub use random::{SecureRandom, DEFAULT_KEY_LEN};
