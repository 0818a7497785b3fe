//! RandomKey, Commitment and Revelation for the commit-reveal scheme.

use super::random::{SecureRandom, DEFAULT_KEY_LEN};
use crate::{Error, Result};
use hmac::{Hmac, Mac};
use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::Sha3_256;
use std::fmt;
use zeroize::Zeroize;

type HmacSha3_256 = Hmac<Sha3_256>;

/// Secret HMAC key backing one commitment
#[derive(Clone, PartialEq, Eq)]
pub struct RandomKey(Vec<u8>);

impl RandomKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of key bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the key holds no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex encoding, for display after reveal
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl Drop for RandomKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for RandomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RandomKey({} bytes)", self.0.len())
    }
}

impl Serialize for RandomKey {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_hex().serialize(s)
    }
}

impl<'de> Deserialize<'de> for RandomKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// Commitment = HMAC-SHA3-256(key, decimal(value)), bound to a range
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment {
    #[serde(with = "tag_serde")]
    tag: [u8; 32],
    range: u32,
}

impl Commitment {
    /// Commit to `value` in `[0, range)` under `key`
    pub fn new(value: u32, range: u32, key: &RandomKey) -> Result<Self> {
        check_value(value, range)?;
        let mac = keyed_mac(key, value).ok_or(Error::InvalidKeyLength(key.len()))?;
        Ok(Self {
            tag: mac.finalize().into_bytes().into(),
            range,
        })
    }

    /// Create from a published tag and range
    pub fn from_parts(tag: [u8; 32], range: u32) -> Self {
        Self { tag, range }
    }

    /// Get the tag bytes
    pub fn tag(&self) -> &[u8; 32] {
        &self.tag
    }

    /// Range the committed value was drawn from
    pub fn range(&self) -> u32 {
        self.range
    }

    /// Verify that the revealed value and key produce this commitment
    pub fn verify(&self, revelation: &Revelation) -> bool {
        if revelation.value >= self.range {
            return false;
        }
        keyed_mac(&revelation.key, revelation.value)
            .is_some_and(|mac| mac.verify_slice(&self.tag).is_ok())
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Commitment({}, range={})",
            hex::encode(&self.tag[..8]),
            self.range
        )
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.tag))
    }
}

/// Disclosed secret value and key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revelation {
    pub value: u32,
    pub key: RandomKey,
}

/// Produces commitments with fresh keys and checks revelations against them
pub struct CommitmentScheme<R = ThreadRng> {
    source: SecureRandom<R>,
    key_len: usize,
}

impl CommitmentScheme<ThreadRng> {
    /// Create a scheme backed by the thread-local CSPRNG
    pub fn new() -> Self {
        Self::with_source(SecureRandom::new())
    }
}

impl Default for CommitmentScheme<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> CommitmentScheme<R> {
    /// Create a scheme drawing keys from `source`
    pub fn with_source(source: SecureRandom<R>) -> Self {
        Self {
            source,
            key_len: DEFAULT_KEY_LEN,
        }
    }

    /// Use keys of `key_len` bytes instead of the default 32
    pub fn with_key_len(mut self, key_len: usize) -> Self {
        self.key_len = key_len;
        self
    }

    /// Commit to `value` under a freshly generated key
    pub fn commit(&mut self, value: u32, range: u32) -> Result<(Commitment, RandomKey)> {
        check_value(value, range)?;
        let key = self.source.generate_key(self.key_len)?;
        let commitment = Commitment::new(value, range, &key)?;
        Ok((commitment, key))
    }

    /// Check a revelation against a published commitment
    pub fn verify(&self, commitment: &Commitment, revelation: &Revelation) -> bool {
        commitment.verify(revelation)
    }

    /// Random source used for keys
    pub fn source_mut(&mut self) -> &mut SecureRandom<R> {
        &mut self.source
    }
}

fn check_value(value: u32, range: u32) -> Result<()> {
    if range == 0 {
        return Err(Error::InvalidRange(range));
    }
    if value >= range {
        return Err(Error::OutOfRange { value, range });
    }
    Ok(())
}

fn keyed_mac(key: &RandomKey, value: u32) -> Option<HmacSha3_256> {
    let Ok(mut mac) = HmacSha3_256::new_from_slice(key.as_bytes()) else {
        return None;
    };
    mac.update(value.to_string().as_bytes());
    Some(mac)
}

mod tag_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let hex_str = String::deserialize(d)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        if bytes.len() != 32 {
            return Err(serde::de::Error::custom("expected 32 bytes"));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> RandomKey {
        RandomKey::from_bytes(vec![byte; 32])
    }

    #[test]
    fn test_commitment_verification() {
        let mut scheme = CommitmentScheme::new();
        let (commitment, key) = scheme.commit(3, 6).unwrap();

        assert!(scheme.verify(&commitment, &Revelation { value: 3, key }));
    }

    #[test]
    fn test_tag_is_hmac_of_decimal_string() {
        let key = key(0x42);
        let commitment = Commitment::new(3, 6, &key).unwrap();

        let mut mac = HmacSha3_256::new_from_slice(key.as_bytes()).unwrap();
        mac.update(b"3");
        let expected: [u8; 32] = mac.finalize().into_bytes().into();

        assert_eq!(commitment.tag(), &expected);
        assert_eq!(commitment.to_string(), hex::encode(expected));
    }

    #[test]
    fn test_commitment_is_deterministic() {
        let commitment1 = Commitment::new(5, 10, &key(1)).unwrap();
        let commitment2 = Commitment::new(5, 10, &key(1)).unwrap();

        assert_eq!(commitment1, commitment2);
    }

    #[test]
    fn test_multi_digit_values_do_not_collide() {
        let key = key(9);
        let commitment1 = Commitment::new(1, 100, &key).unwrap();
        let commitment2 = Commitment::new(10, 100, &key).unwrap();

        assert_ne!(commitment1, commitment2);
    }

    #[test]
    fn test_wrong_value_fails_verification() {
        let commitment = Commitment::new(3, 6, &key(7)).unwrap();

        assert!(!commitment.verify(&Revelation {
            value: 5,
            key: key(7)
        }));
    }

    #[test]
    fn test_wrong_key_fails_verification() {
        let commitment = Commitment::new(3, 6, &key(7)).unwrap();

        assert!(!commitment.verify(&Revelation {
            value: 3,
            key: key(8)
        }));
    }

    #[test]
    fn test_revealed_value_beyond_range_fails_verification() {
        // Same tag, but claimed under a narrower range
        let tag = *Commitment::new(5, 10, &key(3)).unwrap().tag();
        let narrow = Commitment::from_parts(tag, 4);

        assert!(!narrow.verify(&Revelation {
            value: 5,
            key: key(3)
        }));
    }

    #[test]
    fn test_commit_rejects_bad_inputs() {
        let mut scheme = CommitmentScheme::new();

        assert_eq!(scheme.commit(0, 0).unwrap_err(), Error::InvalidRange(0));
        assert_eq!(
            scheme.commit(6, 6).unwrap_err(),
            Error::OutOfRange { value: 6, range: 6 }
        );
    }

    #[test]
    fn test_fresh_key_per_commitment() {
        let mut scheme = CommitmentScheme::new();
        let (commitment1, key1) = scheme.commit(1, 2).unwrap();
        let (commitment2, key2) = scheme.commit(1, 2).unwrap();

        assert_ne!(key1, key2);
        assert_ne!(commitment1, commitment2);
    }

    #[test]
    fn test_custom_key_length() {
        let mut scheme = CommitmentScheme::new().with_key_len(64);
        let (_, key) = scheme.commit(0, 2).unwrap();

        assert_eq!(key.len(), 64);
    }

    #[test]
    fn test_key_debug_hides_material() {
        let debug = format!("{:?}", key(0xab));

        assert_eq!(debug, "RandomKey(32 bytes)");
        assert!(!debug.contains("ab"));
    }

    #[test]
    fn test_commitment_wire_shape() {
        let commitment = Commitment::new(2, 6, &key(5)).unwrap();
        let json = serde_json::to_value(commitment).unwrap();

        assert_eq!(json["range"], 6);
        assert_eq!(json["tag"], commitment.to_string());

        let back: Commitment = serde_json::from_value(json).unwrap();
        assert_eq!(back, commitment);
    }

    #[test]
    fn test_revelation_wire_shape() {
        let revelation = Revelation {
            value: 4,
            key: key(0x0f),
        };
        let json = serde_json::to_value(&revelation).unwrap();

        assert_eq!(json["value"], 4);
        assert_eq!(json["key"], "0f".repeat(32));
    }
}
