//! Error types shared by every layer of the core.

use crate::games::GamePhase;
use crate::protocol::ExchangeState;
use thiserror::Error;

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from randomness, commitment, exchange and game operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid range: {0} (range must be positive)")]
    InvalidRange(u32),

    #[error("Invalid key length: {0} (key must be at least one byte)")]
    InvalidKeyLength(usize),

    #[error("Invalid dice configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Protocol order violation: {operation} is not allowed while the exchange is {state}")]
    ProtocolOrderViolation {
        operation: &'static str,
        state: ExchangeState,
    },

    #[error("Out of turn: {operation} is not allowed while the game is {phase}")]
    OutOfTurn {
        operation: &'static str,
        phase: GamePhase,
    },

    #[error("Value {value} is outside [0, {range})")]
    OutOfRange { value: u32, range: u32 },

    #[error("Face-set {0} is already taken")]
    FaceSetAlreadyTaken(usize),

    #[error("Game halted: an exchange failed verification")]
    Disputed,
}

/// Dice configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least {required} dice configurations are required, got {found}")]
    InsufficientConfigs { required: usize, found: usize },

    #[error("configuration {index} ({raw:?}) must contain exactly 6 comma-separated integers")]
    MalformedFaceSet { index: usize, raw: String },

    #[error("face-set index {index} is out of range (have {count})")]
    IndexOutOfRange { index: usize, count: usize },
}
