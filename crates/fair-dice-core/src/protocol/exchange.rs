//! Fairness exchange: commit, counterparty acts, reveal, verify.
//!
//! An [`Exchange`] walks through
//! `Init -> Committed -> CounterpartyActed -> Revealed -> Verified | Disputed`.
//! Every operation checks the current state first, so the host can never
//! disclose its secret before the counterparty has fixed its own value.

use crate::crypto::{Commitment, CommitmentScheme, RandomKey, Revelation, SecureRandom};
use crate::{Error, Result};
use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Lifecycle state of an exchange
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExchangeState {
    Init,
    Committed,
    CounterpartyActed,
    Revealed,
    Verified,
    Disputed,
}

impl ExchangeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeState::Init => "init",
            ExchangeState::Committed => "committed",
            ExchangeState::CounterpartyActed => "counterparty-acted",
            ExchangeState::Revealed => "revealed",
            ExchangeState::Verified => "verified",
            ExchangeState::Disputed => "disputed",
        }
    }

    /// Verified and Disputed accept no further operations
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExchangeState::Verified | ExchangeState::Disputed)
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rule for turning the two contributions into an outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineOp {
    /// The host's revealed value on its own
    IdentitySelect,
    /// `(host + counterparty) mod range`
    ModuloSum,
    /// `host ^ counterparty`; power-of-two ranges only
    Xor,
}

impl CombineOp {
    /// Apply the rule to two values drawn from `[0, range)`
    pub fn apply(&self, host: u32, counterparty: u32, range: u32) -> Result<u32> {
        self.check_range(range)?;
        match self {
            CombineOp::IdentitySelect => Ok(host),
            CombineOp::ModuloSum => {
                let sum = u64::from(host) + u64::from(counterparty);
                Ok((sum % u64::from(range)) as u32)
            }
            CombineOp::Xor => Ok(host ^ counterparty),
        }
    }

    /// Fails with `InvalidRange` when the rule cannot be used over `[0, range)`
    pub fn check_range(&self, range: u32) -> Result<()> {
        match self {
            _ if range == 0 => Err(Error::InvalidRange(range)),
            CombineOp::Xor if !range.is_power_of_two() => Err(Error::InvalidRange(range)),
            _ => Ok(()),
        }
    }
}

/// Values and outcome of a verified exchange
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResult {
    pub host_value: u32,
    pub counterparty_value: u32,
    pub op: CombineOp,
    pub outcome: u32,
}

/// Terminal result of [`Exchange::combine`]
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Verified(ExchangeResult),
    /// The revelation did not match the published commitment
    Disputed {
        commitment: Commitment,
        revelation: Revelation,
    },
}

impl ExchangeOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, ExchangeOutcome::Verified(_))
    }

    pub fn result(&self) -> Option<&ExchangeResult> {
        match self {
            ExchangeOutcome::Verified(result) => Some(result),
            ExchangeOutcome::Disputed { .. } => None,
        }
    }

    /// Combined value, if verification succeeded
    pub fn outcome(&self) -> Option<u32> {
        self.result().map(|result| result.outcome)
    }
}

/// One commit-reveal exchange between host and guesser
pub struct Exchange {
    range: u32,
    state: ExchangeState,
    commitment: Option<Commitment>,
    /// Host-side secret, held until reveal
    secret: Option<Revelation>,
    counterparty_value: Option<u32>,
    revelation: Option<Revelation>,
}

impl Exchange {
    /// Create an exchange over `[0, range)` in the Init state
    pub fn new(range: u32) -> Result<Self> {
        if range == 0 {
            return Err(Error::InvalidRange(range));
        }
        Ok(Self {
            range,
            state: ExchangeState::Init,
            commitment: None,
            secret: None,
            counterparty_value: None,
            revelation: None,
        })
    }

    /// Guesser-side view of an exchange whose commitment came from the host
    pub fn observe(commitment: Commitment) -> Result<Self> {
        let mut exchange = Self::new(commitment.range())?;
        exchange.commitment = Some(commitment);
        exchange.state = ExchangeState::Committed;
        Ok(exchange)
    }

    /// Draw the host secret and a fresh key, then commit
    pub fn begin<R: RngCore + CryptoRng>(
        &mut self,
        scheme: &mut CommitmentScheme<R>,
    ) -> Result<&Commitment> {
        self.require_state(ExchangeState::Init, "begin")?;
        let value = scheme.source_mut().generate_uniform(self.range)?;
        let (commitment, key) = scheme.commit(value, self.range)?;
        Ok(self.store_commitment(commitment, Revelation { value, key }))
    }

    /// Commit to a host-chosen value under a host-chosen key
    pub fn begin_with(&mut self, value: u32, key: RandomKey) -> Result<&Commitment> {
        self.require_state(ExchangeState::Init, "begin")?;
        let commitment = Commitment::new(value, self.range, &key)?;
        Ok(self.store_commitment(commitment, Revelation { value, key }))
    }

    fn store_commitment(&mut self, commitment: Commitment, secret: Revelation) -> &Commitment {
        self.secret = Some(secret);
        self.state = ExchangeState::Committed;
        debug!(range = self.range, tag = %commitment, "exchange committed");
        self.commitment.insert(commitment)
    }

    /// Fix the guesser's contribution
    pub fn record_counterparty_value(&mut self, value: u32) -> Result<()> {
        self.require_state(ExchangeState::Committed, "record_counterparty_value")?;
        if value >= self.range {
            return Err(Error::OutOfRange {
                value,
                range: self.range,
            });
        }
        self.counterparty_value = Some(value);
        self.state = ExchangeState::CounterpartyActed;
        debug!(range = self.range, value, "counterparty value recorded");
        Ok(())
    }

    /// Disclose the host's value and key
    pub fn reveal(&mut self) -> Result<Revelation> {
        self.require_state(ExchangeState::CounterpartyActed, "reveal")?;
        let Some(secret) = self.secret.take() else {
            return Err(Error::ProtocolOrderViolation {
                operation: "reveal without a host secret",
                state: self.state,
            });
        };
        self.revelation = Some(secret.clone());
        self.state = ExchangeState::Revealed;
        debug!(range = self.range, value = secret.value, "host secret revealed");
        Ok(secret)
    }

    /// Record a revelation received from the host
    pub fn accept_revelation(&mut self, revelation: Revelation) -> Result<()> {
        self.require_state(ExchangeState::CounterpartyActed, "accept_revelation")?;
        self.secret = None;
        self.revelation = Some(revelation);
        self.state = ExchangeState::Revealed;
        Ok(())
    }

    /// Verify the revelation and combine both contributions.
    ///
    /// An op that does not fit the range is rejected before verification and
    /// leaves the exchange in Revealed.
    pub fn combine(&mut self, op: CombineOp) -> Result<ExchangeOutcome> {
        self.require_state(ExchangeState::Revealed, "combine")?;
        op.check_range(self.range)?;
        let (Some(commitment), Some(counterparty_value), Some(revelation)) = (
            self.commitment,
            self.counterparty_value,
            self.revelation.as_ref(),
        ) else {
            return Err(Error::ProtocolOrderViolation {
                operation: "combine",
                state: self.state,
            });
        };

        if !commitment.verify(revelation) {
            self.state = ExchangeState::Disputed;
            warn!(
                range = self.range,
                tag = %commitment,
                revealed = revelation.value,
                "revelation does not match commitment"
            );
            return Ok(ExchangeOutcome::Disputed {
                commitment,
                revelation: revelation.clone(),
            });
        }

        let outcome = op.apply(revelation.value, counterparty_value, self.range)?;
        self.state = ExchangeState::Verified;
        debug!(range = self.range, ?op, outcome, "exchange verified");
        Ok(ExchangeOutcome::Verified(ExchangeResult {
            host_value: revelation.value,
            counterparty_value,
            op,
            outcome,
        }))
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    /// Published commitment, once committed
    pub fn commitment(&self) -> Option<&Commitment> {
        self.commitment.as_ref()
    }

    pub fn counterparty_value(&self) -> Option<u32> {
        self.counterparty_value
    }

    fn require_state(&self, state: ExchangeState, operation: &'static str) -> Result<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(Error::ProtocolOrderViolation {
                operation,
                state: self.state,
            })
        }
    }
}

// The host secret stays out of debug output until it is revealed
impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("range", &self.range)
            .field("state", &self.state)
            .field("commitment", &self.commitment)
            .field("has_secret", &self.secret.is_some())
            .field("counterparty_value", &self.counterparty_value)
            .field("revelation", &self.revelation)
            .finish()
    }
}

/// Host side of the fairness protocol: opens committed exchanges
pub struct FairnessProtocol<R = ThreadRng> {
    scheme: CommitmentScheme<R>,
}

impl FairnessProtocol<ThreadRng> {
    /// Create a protocol backed by the thread-local CSPRNG
    pub fn new() -> Self {
        Self::with_scheme(CommitmentScheme::new())
    }
}

impl Default for FairnessProtocol<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> FairnessProtocol<R> {
    pub fn with_source(source: SecureRandom<R>) -> Self {
        Self::with_scheme(CommitmentScheme::with_source(source))
    }

    pub fn with_scheme(scheme: CommitmentScheme<R>) -> Self {
        Self { scheme }
    }

    /// Open an exchange over `[0, range)` with a fresh host commitment
    pub fn begin_exchange(&mut self, range: u32) -> Result<Exchange> {
        let mut exchange = Exchange::new(range)?;
        exchange.begin(&mut self.scheme)?;
        Ok(exchange)
    }

    pub fn verify(&self, commitment: &Commitment, revelation: &Revelation) -> bool {
        self.scheme.verify(commitment, revelation)
    }

    /// Random source shared with the commitment scheme
    pub fn source_mut(&mut self) -> &mut SecureRandom<R> {
        self.scheme.source_mut()
    }
}
