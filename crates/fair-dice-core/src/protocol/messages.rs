//! Protocol messages.
//!
//! Wire shapes for a host and guesser running in separate processes. The
//! core never sends these itself.

use crate::crypto::{Commitment, Revelation};
use crate::protocol::GameId;
use serde::{Deserialize, Serialize};

/// Host publishes its commitment before the guesser acts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitMessage {
    pub game_id: GameId,
    pub commitment: Commitment,
}

/// Host discloses value and key once the guesser has acted
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevealMessage {
    pub game_id: GameId,
    pub revelation: Revelation,
}
