//! Fair Dice Core Library
//!
//! This crate provides the commit-reveal primitives, the two-party fairness
//! exchange, and the dice game sequencing built on top of them.

pub mod crypto;
mod error;
pub mod games;
pub mod protocol;

pub use crypto::{Commitment, CommitmentScheme, RandomKey, Revelation, SecureRandom};
pub use error::{ConfigError, Error, Result};
pub use games::{
    DiceConfig, FaceSet, Game, GamePhase, GameState, ProbabilityTable, RoundResult, Turn,
};
pub use protocol::{
    CombineOp, Exchange, ExchangeOutcome, ExchangeResult, ExchangeState, FairnessProtocol,
    GameId, Party,
};
