//! Dice configuration and game sequencing.

mod dice;
mod orchestrator;
mod probability;

pub use dice::{DiceConfig, FaceSet, FACES_PER_SET, MIN_FACE_SETS};
pub use orchestrator::{Game, GamePhase, GameState, RoundResult, Turn, FIRST_MOVE_RANGE};
pub use probability::{win_probability, ProbabilityTable};
