//! Fairness exchange, protocol types and messages.

mod exchange;
mod messages;
mod types;

pub use exchange::{
    CombineOp, Exchange, ExchangeOutcome, ExchangeResult, ExchangeState, FairnessProtocol,
};
pub use messages::{CommitMessage, RevealMessage};
pub use types::{GameId, Party};
