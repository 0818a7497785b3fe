//! Game sequencing: first move, face-set selection, rolls, verdict.
//!
//! A [`Game`] plays the host side of every exchange. The guesser's input
//! comes in through `finish_*` calls. Once an exchange is disputed the game
//! halts, and no later step, including [`Game::verdict`], succeeds.

use super::{DiceConfig, FaceSet, FACES_PER_SET};
use crate::crypto::{Commitment, Revelation};
use crate::protocol::{
    CombineOp, Exchange, ExchangeOutcome, ExchangeResult, FairnessProtocol, GameId, Party,
};
use crate::{Error, Result};
use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::{info, warn};

/// Range of the first-move exchange: the guesser guesses one bit
pub const FIRST_MOVE_RANGE: u32 = 2;

const ROLL_RANGE: u32 = FACES_PER_SET as u32;

/// Where the game currently stands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    FirstMove,
    ChoosingFaceSets,
    Rolling,
    RoundComplete,
    Halted,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::FirstMove => "deciding the first move",
            GamePhase::ChoosingFaceSets => "choosing face-sets",
            GamePhase::Rolling => "rolling",
            GamePhase::RoundComplete => "round complete",
            GamePhase::Halted => "halted",
        };
        write!(f, "{name}")
    }
}

/// First mover and cumulative scores
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub first_mover: Option<Party>,
    pub host_score: u32,
    pub guesser_score: u32,
}

impl GameState {
    pub fn score(&self, party: Party) -> u32 {
        match party {
            Party::Host => self.host_score,
            Party::Guesser => self.guesser_score,
        }
    }

    fn add_point(&mut self, party: Party) {
        match party {
            Party::Host => self.host_score += 1,
            Party::Guesser => self.guesser_score += 1,
        }
    }
}

/// Faces rolled in a completed round and who won it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub host_roll: i64,
    pub guesser_roll: i64,
    /// `None` on a tie
    pub winner: Option<Party>,
}

/// Result of one game step driven by an exchange
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Turn<T> {
    Agreed {
        value: T,
        result: ExchangeResult,
        revelation: Revelation,
    },
    Disputed {
        commitment: Commitment,
        revelation: Revelation,
    },
}

impl<T> Turn<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Turn::Agreed { value, .. } => Some(value),
            Turn::Disputed { .. } => None,
        }
    }

    /// Host disclosure, for independent verification
    pub fn revelation(&self) -> &Revelation {
        match self {
            Turn::Agreed { revelation, .. } | Turn::Disputed { revelation, .. } => revelation,
        }
    }

    pub fn is_disputed(&self) -> bool {
        matches!(self, Turn::Disputed { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Purpose {
    FirstMove,
    Roll(Party),
}

#[derive(Debug)]
struct Pending {
    purpose: Purpose,
    exchange: Exchange,
}

/// Dice game between the host and a guesser
pub struct Game<R = ThreadRng> {
    id: GameId,
    config: DiceConfig,
    protocol: FairnessProtocol<R>,
    state: GameState,
    host_face_set: Option<usize>,
    guesser_face_set: Option<usize>,
    host_roll: Option<i64>,
    guesser_roll: Option<i64>,
    result: Option<RoundResult>,
    pending: Option<Pending>,
    disputed: bool,
}

impl Game<ThreadRng> {
    pub fn new(config: DiceConfig) -> Self {
        Self::with_protocol(config, FairnessProtocol::new())
    }
}

impl<R: RngCore + CryptoRng> Game<R> {
    pub fn with_protocol(config: DiceConfig, protocol: FairnessProtocol<R>) -> Self {
        let id = GameId::new();
        info!(game_id = %id, face_sets = config.face_set_count(), "game created");
        Self {
            id,
            config,
            protocol,
            state: GameState::default(),
            host_face_set: None,
            guesser_face_set: None,
            host_roll: None,
            guesser_roll: None,
            result: None,
            pending: None,
            disputed: false,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn config(&self) -> &DiceConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        if self.disputed {
            GamePhase::Halted
        } else if self.state.first_mover.is_none() {
            GamePhase::FirstMove
        } else if self.host_face_set.is_none() || self.guesser_face_set.is_none() {
            GamePhase::ChoosingFaceSets
        } else if self.host_roll.is_none() || self.guesser_roll.is_none() {
            GamePhase::Rolling
        } else {
            GamePhase::RoundComplete
        }
    }

    // First move

    /// Host commits to a random bit for the guesser to guess
    pub fn start_first_move(&mut self) -> Result<Commitment> {
        self.ensure_phase(GamePhase::FirstMove, "start_first_move")?;
        self.open(Purpose::FirstMove, FIRST_MOVE_RANGE, "start_first_move")
    }

    /// Settle the first move from the guesser's guess.
    ///
    /// A correct guess gives the guesser the first move.
    pub fn finish_first_move(&mut self, guess: u32) -> Result<Turn<Party>> {
        self.ensure_phase(GamePhase::FirstMove, "finish_first_move")?;
        let (revelation, outcome) = self.settle(Purpose::FirstMove, guess, "finish_first_move")?;
        self.conclude_first_move(revelation, outcome)
    }

    fn conclude_first_move(
        &mut self,
        revelation: Revelation,
        outcome: ExchangeOutcome,
    ) -> Result<Turn<Party>> {
        match outcome {
            ExchangeOutcome::Verified(result) => {
                let first = if result.outcome == 0 {
                    Party::Guesser
                } else {
                    Party::Host
                };
                self.state.first_mover = Some(first);
                info!(game_id = %self.id, first = %first, "first move decided");
                Ok(Turn::Agreed {
                    value: first,
                    result,
                    revelation,
                })
            }
            ExchangeOutcome::Disputed {
                commitment,
                revelation,
            } => Ok(self.halt(commitment, revelation)),
        }
    }

    // Face-set selection

    /// Party whose turn it is to pick a face-set
    pub fn chooser(&self) -> Option<Party> {
        if self.phase() != GamePhase::ChoosingFaceSets {
            return None;
        }
        let first = self.state.first_mover?;
        if self.face_set_index(first).is_none() {
            Some(first)
        } else {
            Some(first.opponent())
        }
    }

    /// Face-set indices nobody has claimed this round
    pub fn available_face_sets(&self) -> Vec<usize> {
        (0..self.config.face_set_count())
            .filter(|&i| self.host_face_set != Some(i) && self.guesser_face_set != Some(i))
            .collect()
    }

    /// Claim face-set `index` for `party`
    pub fn choose_face_set(&mut self, party: Party, index: usize) -> Result<&FaceSet> {
        self.ensure_phase(GamePhase::ChoosingFaceSets, "choose_face_set")?;
        if self.chooser() != Some(party) {
            return Err(Error::OutOfTurn {
                operation: "choose_face_set",
                phase: self.phase(),
            });
        }
        self.config.face_set_at(index)?;
        if self.face_set_index(party.opponent()) == Some(index) {
            return Err(Error::FaceSetAlreadyTaken(index));
        }

        match party {
            Party::Host => self.host_face_set = Some(index),
            Party::Guesser => self.guesser_face_set = Some(index),
        }
        info!(game_id = %self.id, party = %party, index, "face-set chosen");
        self.config.face_set_at(index)
    }

    /// Host picks uniformly among the unclaimed face-sets
    pub fn host_choose_face_set(&mut self) -> Result<usize> {
        self.ensure_phase(GamePhase::ChoosingFaceSets, "host_choose_face_set")?;
        let available = self.available_face_sets();
        let index = *self.protocol.source_mut().choose(&available)?;
        self.choose_face_set(Party::Host, index)?;
        Ok(index)
    }

    pub fn face_set_index(&self, party: Party) -> Option<usize> {
        match party {
            Party::Host => self.host_face_set,
            Party::Guesser => self.guesser_face_set,
        }
    }

    pub fn face_set_of(&self, party: Party) -> Option<&FaceSet> {
        self.face_set_index(party)
            .and_then(|index| self.config.face_sets().get(index))
    }

    // Rolling

    /// Host commits to a face index for `party`'s joint roll
    pub fn start_roll(&mut self, party: Party) -> Result<Commitment> {
        self.ensure_can_roll(party, "start_roll")?;
        self.open(Purpose::Roll(party), ROLL_RANGE, "start_roll")
    }

    /// Settle the pending roll: the face index is `(host + guess) mod 6`
    pub fn finish_roll(&mut self, guess: u32) -> Result<Turn<i64>> {
        self.ensure_phase(GamePhase::Rolling, "finish_roll")?;
        let party = match self.pending.as_ref().map(|p| p.purpose) {
            Some(Purpose::Roll(party)) => party,
            _ => {
                return Err(Error::OutOfTurn {
                    operation: "finish_roll",
                    phase: self.phase(),
                })
            }
        };
        let (revelation, outcome) = self.settle(Purpose::Roll(party), guess, "finish_roll")?;
        self.conclude_roll(party, revelation, outcome)
    }

    /// Party whose joint roll is awaiting the guesser's value
    pub fn pending_roll(&self) -> Option<Party> {
        match self.pending.as_ref()?.purpose {
            Purpose::Roll(party) => Some(party),
            Purpose::FirstMove => None,
        }
    }

    fn conclude_roll(
        &mut self,
        party: Party,
        revelation: Revelation,
        outcome: ExchangeOutcome,
    ) -> Result<Turn<i64>> {
        match outcome {
            ExchangeOutcome::Verified(result) => {
                let face = self.face_for(party, result.outcome)?;
                self.record_roll(party, face);
                Ok(Turn::Agreed {
                    value: face,
                    result,
                    revelation,
                })
            }
            ExchangeOutcome::Disputed {
                commitment,
                revelation,
            } => Ok(self.halt(commitment, revelation)),
        }
    }

    /// Roll `party`'s die straight from the secure source, without an exchange
    pub fn roll_direct(&mut self, party: Party) -> Result<i64> {
        self.ensure_can_roll(party, "roll_direct")?;
        let faces = *self.require_face_set(party)?.faces();
        let face = *self.protocol.source_mut().choose(&faces)?;
        self.record_roll(party, face);
        Ok(face)
    }

    pub fn roll_of(&self, party: Party) -> Option<i64> {
        match party {
            Party::Host => self.host_roll,
            Party::Guesser => self.guesser_roll,
        }
    }

    fn face_for(&self, party: Party, index: u32) -> Result<i64> {
        self.require_face_set(party)?
            .face(index as usize)
            .ok_or(Error::OutOfRange {
                value: index,
                range: ROLL_RANGE,
            })
    }

    fn require_face_set(&self, party: Party) -> Result<&FaceSet> {
        self.face_set_of(party).ok_or(Error::OutOfTurn {
            operation: "roll",
            phase: self.phase(),
        })
    }

    fn record_roll(&mut self, party: Party, face: i64) {
        match party {
            Party::Host => self.host_roll = Some(face),
            Party::Guesser => self.guesser_roll = Some(face),
        }
        info!(game_id = %self.id, party = %party, face, "roll recorded");

        let (Some(host_roll), Some(guesser_roll)) = (self.host_roll, self.guesser_roll) else {
            return;
        };
        let winner = match host_roll.cmp(&guesser_roll) {
            Ordering::Greater => Some(Party::Host),
            Ordering::Less => Some(Party::Guesser),
            Ordering::Equal => None,
        };
        if let Some(winner) = winner {
            self.state.add_point(winner);
        }
        self.result = Some(RoundResult {
            host_roll,
            guesser_roll,
            winner,
        });
        info!(
            game_id = %self.id,
            host_roll,
            guesser_roll,
            host_score = self.state.host_score,
            guesser_score = self.state.guesser_score,
            "round complete"
        );
    }

    // Verdict and rounds

    /// Result of the completed round
    pub fn verdict(&self) -> Result<RoundResult> {
        self.ensure_phase(GamePhase::RoundComplete, "verdict")?;
        self.result.ok_or(Error::OutOfTurn {
            operation: "verdict",
            phase: self.phase(),
        })
    }

    /// Start another round, keeping scores and the first mover
    pub fn next_round(&mut self) -> Result<()> {
        self.ensure_phase(GamePhase::RoundComplete, "next_round")?;
        self.clear_round();
        Ok(())
    }

    /// Forget the first mover, scores and the current round.
    ///
    /// A halted game stays halted.
    pub fn reset(&mut self) {
        self.clear_round();
        self.state = GameState::default();
    }

    fn clear_round(&mut self) {
        self.host_face_set = None;
        self.guesser_face_set = None;
        self.host_roll = None;
        self.guesser_roll = None;
        self.result = None;
        self.pending = None;
    }

    // Exchange plumbing

    fn open(&mut self, purpose: Purpose, range: u32, operation: &'static str) -> Result<Commitment> {
        if let Some(pending) = &self.pending {
            return Err(Error::ProtocolOrderViolation {
                operation,
                state: pending.exchange.state(),
            });
        }
        let exchange = self.protocol.begin_exchange(range)?;
        let commitment = exchange
            .commitment()
            .copied()
            .ok_or(Error::ProtocolOrderViolation {
                operation,
                state: exchange.state(),
            })?;
        self.pending = Some(Pending { purpose, exchange });
        Ok(commitment)
    }

    fn settle(
        &mut self,
        purpose: Purpose,
        guess: u32,
        operation: &'static str,
    ) -> Result<(Revelation, ExchangeOutcome)> {
        let phase = self.phase();
        let exchange = match self.pending.as_mut() {
            Some(pending) if pending.purpose == purpose => &mut pending.exchange,
            _ => return Err(Error::OutOfTurn { operation, phase }),
        };
        // An out-of-range guess leaves the exchange committed for a retry
        exchange.record_counterparty_value(guess)?;
        let revelation = exchange.reveal()?;
        let outcome = exchange.combine(CombineOp::ModuloSum)?;
        self.pending = None;
        Ok((revelation, outcome))
    }

    fn halt<T>(&mut self, commitment: Commitment, revelation: Revelation) -> Turn<T> {
        self.disputed = true;
        self.pending = None;
        warn!(game_id = %self.id, tag = %commitment, "exchange disputed, game halted");
        Turn::Disputed {
            commitment,
            revelation,
        }
    }

    fn ensure_phase(&self, expected: GamePhase, operation: &'static str) -> Result<()> {
        match self.phase() {
            GamePhase::Halted => Err(Error::Disputed),
            phase if phase == expected => Ok(()),
            phase => Err(Error::OutOfTurn { operation, phase }),
        }
    }

    fn ensure_can_roll(&self, party: Party, operation: &'static str) -> Result<()> {
        self.ensure_phase(GamePhase::Rolling, operation)?;
        // One roll at a time: a joint roll must be settled first
        if let Some(pending) = &self.pending {
            return Err(Error::ProtocolOrderViolation {
                operation,
                state: pending.exchange.state(),
            });
        }
        if self.roll_of(party).is_some() {
            return Err(Error::OutOfTurn {
                operation,
                phase: self.phase(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{RandomKey, SecureRandom};
    use crate::error::ConfigError;
    use crate::protocol::ExchangeState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> DiceConfig {
        DiceConfig::parse(&["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap()
    }

    fn seeded_game(seed: u64) -> Game<StdRng> {
        let source = SecureRandom::with_rng(StdRng::seed_from_u64(seed));
        Game::with_protocol(config(), FairnessProtocol::with_source(source))
    }

    fn decide_first_move<R: RngCore + CryptoRng>(game: &mut Game<R>) -> Party {
        game.start_first_move().unwrap();
        let turn = game.finish_first_move(0).unwrap();
        *turn.value().unwrap()
    }

    fn choose_both<R: RngCore + CryptoRng>(game: &mut Game<R>) {
        let first = game.state().first_mover.unwrap();
        for party in [first, first.opponent()] {
            match party {
                Party::Host => {
                    game.host_choose_face_set().unwrap();
                }
                Party::Guesser => {
                    let index = game.available_face_sets()[0];
                    game.choose_face_set(Party::Guesser, index).unwrap();
                }
            }
        }
    }

    fn disputed_outcome() -> (Revelation, ExchangeOutcome) {
        let key = RandomKey::from_bytes(vec![3u8; 32]);
        let mut exchange = Exchange::new(ROLL_RANGE).unwrap();
        exchange.begin_with(3, key.clone()).unwrap();
        exchange.record_counterparty_value(4).unwrap();
        let forged = Revelation { value: 5, key };
        exchange.accept_revelation(forged.clone()).unwrap();
        (forged, exchange.combine(CombineOp::ModuloSum).unwrap())
    }

    #[test]
    fn test_first_move_follows_guess() {
        let mut game = seeded_game(1);
        assert_eq!(game.phase(), GamePhase::FirstMove);

        let commitment = game.start_first_move().unwrap();
        assert_eq!(commitment.range(), FIRST_MOVE_RANGE);

        let turn = game.finish_first_move(1).unwrap();
        let Turn::Agreed {
            value, revelation, ..
        } = &turn
        else {
            panic!("honest host must not be disputed");
        };

        assert!(commitment.verify(revelation));
        let expected = if revelation.value == 1 {
            Party::Guesser
        } else {
            Party::Host
        };
        assert_eq!(*value, expected);
        assert_eq!(game.state().first_mover, Some(expected));
        assert_eq!(game.phase(), GamePhase::ChoosingFaceSets);
    }

    #[test]
    fn test_out_of_range_guess_can_be_retried() {
        let mut game = seeded_game(2);
        game.start_first_move().unwrap();

        assert_eq!(
            game.finish_first_move(2).unwrap_err(),
            Error::OutOfRange { value: 2, range: 2 }
        );
        assert!(game.finish_first_move(0).is_ok());
    }

    #[test]
    fn test_finish_without_start_is_out_of_turn() {
        let mut game = seeded_game(3);

        assert!(matches!(
            game.finish_first_move(0),
            Err(Error::OutOfTurn { .. })
        ));
    }

    #[test]
    fn test_double_start_rejected() {
        let mut game = seeded_game(3);
        game.start_first_move().unwrap();

        assert!(matches!(
            game.start_first_move(),
            Err(Error::ProtocolOrderViolation { .. })
        ));
    }

    #[test]
    fn test_face_set_selection_order() {
        let mut game = seeded_game(4);
        let first = decide_first_move(&mut game);

        assert_eq!(game.chooser(), Some(first));
        assert!(matches!(
            game.choose_face_set(first.opponent(), 0),
            Err(Error::OutOfTurn { .. })
        ));

        game.choose_face_set(first, 1).unwrap();
        assert_eq!(game.chooser(), Some(first.opponent()));
        assert_eq!(game.available_face_sets(), vec![0, 2]);

        assert_eq!(
            game.choose_face_set(first.opponent(), 1).unwrap_err(),
            Error::FaceSetAlreadyTaken(1)
        );
        assert_eq!(
            game.choose_face_set(first.opponent(), 3).unwrap_err(),
            Error::InvalidConfig(ConfigError::IndexOutOfRange { index: 3, count: 3 })
        );

        game.choose_face_set(first.opponent(), 2).unwrap();
        assert_eq!(game.phase(), GamePhase::Rolling);
        assert_eq!(game.face_set_index(first), Some(1));
        assert_eq!(game.face_set_index(first.opponent()), Some(2));
    }

    #[test]
    fn test_host_choice_avoids_claimed_set() {
        for seed in 0..20 {
            let mut game = seeded_game(seed);
            let first = decide_first_move(&mut game);
            choose_both(&mut game);

            assert_ne!(
                game.face_set_index(first),
                game.face_set_index(first.opponent())
            );
        }
    }

    #[test]
    fn test_joint_rolls_and_verdict() {
        let mut game = seeded_game(5);
        decide_first_move(&mut game);
        choose_both(&mut game);

        let mut faces = Vec::new();
        for party in [Party::Host, Party::Guesser] {
            let commitment = game.start_roll(party).unwrap();
            assert_eq!(commitment.range(), 6);
            assert_eq!(game.pending_roll(), Some(party));

            let turn = game.finish_roll(4).unwrap();
            let Turn::Agreed {
                value,
                result,
                revelation,
            } = turn
            else {
                panic!("honest host must not be disputed");
            };
            assert!(commitment.verify(&revelation));
            assert_eq!(result.outcome, (revelation.value + 4) % 6);

            let face_set = game.face_set_of(party).unwrap();
            assert_eq!(face_set.face(result.outcome as usize), Some(value));
            faces.push(value);
        }

        let verdict = game.verdict().unwrap();
        assert_eq!(verdict.host_roll, faces[0]);
        assert_eq!(verdict.guesser_roll, faces[1]);
        let expected = match faces[0].cmp(&faces[1]) {
            Ordering::Greater => Some(Party::Host),
            Ordering::Less => Some(Party::Guesser),
            Ordering::Equal => None,
        };
        assert_eq!(verdict.winner, expected);
        assert_eq!(
            game.state().host_score + game.state().guesser_score,
            u32::from(expected.is_some())
        );
    }

    #[test]
    fn test_roll_twice_rejected() {
        let mut game = seeded_game(6);
        decide_first_move(&mut game);
        choose_both(&mut game);

        game.roll_direct(Party::Host).unwrap();
        assert!(matches!(
            game.roll_direct(Party::Host),
            Err(Error::OutOfTurn { .. })
        ));
        assert!(matches!(
            game.start_roll(Party::Host),
            Err(Error::OutOfTurn { .. })
        ));
    }

    #[test]
    fn test_direct_roll_blocked_while_joint_roll_pending() {
        let mut game = seeded_game(12);
        decide_first_move(&mut game);
        choose_both(&mut game);

        let commitment = game.start_roll(Party::Host).unwrap();
        for party in [Party::Host, Party::Guesser] {
            assert_eq!(
                game.roll_direct(party).unwrap_err(),
                Error::ProtocolOrderViolation {
                    operation: "roll_direct",
                    state: ExchangeState::Committed,
                }
            );
        }
        assert_eq!(game.roll_of(Party::Host), None);
        assert_eq!(game.roll_of(Party::Guesser), None);

        let turn = game.finish_roll(0).unwrap();
        assert!(commitment.verify(turn.revelation()));
        assert_eq!(game.roll_of(Party::Host), turn.value().copied());
        assert!(matches!(
            game.start_roll(Party::Host),
            Err(Error::OutOfTurn { .. })
        ));
    }

    #[test]
    fn test_next_round_opens_fresh_exchanges() {
        let mut game = seeded_game(13);
        decide_first_move(&mut game);

        let mut tags = Vec::new();
        for _ in 0..2 {
            choose_both(&mut game);
            for party in [Party::Host, Party::Guesser] {
                let commitment = game.start_roll(party).unwrap();
                assert!(!tags.contains(&commitment));
                tags.push(commitment);
                game.finish_roll(1).unwrap();
            }
            assert_eq!(game.pending_roll(), None);
            game.verdict().unwrap();
            game.next_round().unwrap();
        }
        assert!(matches!(
            game.finish_roll(0),
            Err(Error::OutOfTurn { .. })
        ));
    }

    #[test]
    fn test_reset_drops_pending_exchange() {
        let mut game = seeded_game(14);
        decide_first_move(&mut game);
        choose_both(&mut game);
        game.start_roll(Party::Guesser).unwrap();

        game.reset();
        assert_eq!(game.pending_roll(), None);
        assert!(game.start_first_move().is_ok());
    }

    #[test]
    fn test_verdict_before_round_complete() {
        let mut game = seeded_game(7);
        decide_first_move(&mut game);

        assert!(matches!(game.verdict(), Err(Error::OutOfTurn { .. })));
    }

    #[test]
    fn test_direct_rolls_and_next_round() {
        let mut game = seeded_game(8);
        let first = decide_first_move(&mut game);

        for _ in 0..5 {
            choose_both(&mut game);
            let host = game.roll_direct(Party::Host).unwrap();
            let guesser = game.roll_direct(Party::Guesser).unwrap();
            assert!(game.face_set_of(Party::Host).unwrap().faces().contains(&host));
            assert!(game
                .face_set_of(Party::Guesser)
                .unwrap()
                .faces()
                .contains(&guesser));

            game.verdict().unwrap();
            game.next_round().unwrap();
        }

        let state = game.state();
        assert!(state.host_score + state.guesser_score <= 5);
        assert_eq!(state.first_mover, Some(first));
        assert_eq!(game.phase(), GamePhase::ChoosingFaceSets);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut game = seeded_game(9);
        decide_first_move(&mut game);
        choose_both(&mut game);
        game.roll_direct(Party::Host).unwrap();

        game.reset();
        assert_eq!(game.phase(), GamePhase::FirstMove);
        assert_eq!(*game.state(), GameState::default());
        assert_eq!(game.face_set_index(Party::Host), None);
    }

    #[test]
    fn test_disputed_roll_halts_game() {
        let mut game = seeded_game(10);
        decide_first_move(&mut game);
        choose_both(&mut game);
        game.roll_direct(Party::Guesser).unwrap();

        let (revelation, outcome) = disputed_outcome();
        let turn = game.conclude_roll(Party::Host, revelation, outcome).unwrap();

        assert!(turn.is_disputed());
        assert_eq!(turn.revelation().value, 5);
        assert_eq!(game.phase(), GamePhase::Halted);
        assert_eq!(game.roll_of(Party::Host), None);
        assert_eq!(game.verdict().unwrap_err(), Error::Disputed);
        assert_eq!(game.roll_direct(Party::Host).unwrap_err(), Error::Disputed);
        assert_eq!(game.state().host_score + game.state().guesser_score, 0);

        game.reset();
        assert_eq!(game.phase(), GamePhase::Halted);
    }

    #[test]
    fn test_disputed_first_move_halts_game() {
        let mut game = seeded_game(11);
        let (revelation, outcome) = disputed_outcome();
        let turn = game.conclude_first_move(revelation, outcome).unwrap();

        assert!(turn.is_disputed());
        assert_eq!(game.state().first_mover, None);
        assert_eq!(game.start_first_move().unwrap_err(), Error::Disputed);
    }
}
