//! Dice configuration: an ordered list of six-faced face-sets.

use crate::error::ConfigError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Faces on every die
pub const FACES_PER_SET: usize = 6;

/// Fewest face-sets a game can be played with
pub const MIN_FACE_SETS: usize = 3;

/// One die: six integer faces, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceSet([i64; FACES_PER_SET]);

impl FaceSet {
    pub fn new(faces: [i64; FACES_PER_SET]) -> Self {
        Self(faces)
    }

    pub fn faces(&self) -> &[i64; FACES_PER_SET] {
        &self.0
    }

    /// Face at `index`, if `index < 6`
    pub fn face(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }

    fn parse(raw: &str) -> Option<Self> {
        let mut faces = [0i64; FACES_PER_SET];
        let mut tokens = raw.split(',');
        for face in faces.iter_mut() {
            *face = tokens.next()?.trim().parse().ok()?;
        }
        if tokens.next().is_some() {
            return None;
        }
        Some(Self(faces))
    }
}

impl fmt::Display for FaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, face) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{face}")?;
        }
        Ok(())
    }
}

/// Validated, immutable list of face-sets
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceConfig {
    face_sets: Vec<FaceSet>,
}

impl DiceConfig {
    /// Parse comma-separated face lists, one string per die
    pub fn parse<S: AsRef<str>>(raw_configs: &[S]) -> Result<Self> {
        if raw_configs.len() < MIN_FACE_SETS {
            return Err(ConfigError::InsufficientConfigs {
                required: MIN_FACE_SETS,
                found: raw_configs.len(),
            }
            .into());
        }

        let face_sets = raw_configs
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let raw = raw.as_ref();
                FaceSet::parse(raw).ok_or_else(|| ConfigError::MalformedFaceSet {
                    index,
                    raw: raw.to_string(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { face_sets })
    }

    /// Build from already-constructed face-sets
    pub fn new(face_sets: Vec<FaceSet>) -> Result<Self> {
        if face_sets.len() < MIN_FACE_SETS {
            return Err(ConfigError::InsufficientConfigs {
                required: MIN_FACE_SETS,
                found: face_sets.len(),
            }
            .into());
        }
        Ok(Self { face_sets })
    }

    pub fn face_set_count(&self) -> usize {
        self.face_sets.len()
    }

    pub fn face_set_at(&self, index: usize) -> Result<&FaceSet> {
        self.face_sets.get(index).ok_or_else(|| {
            ConfigError::IndexOutOfRange {
                index,
                count: self.face_sets.len(),
            }
            .into()
        })
    }

    pub fn face_sets(&self) -> &[FaceSet] {
        &self.face_sets
    }
}
