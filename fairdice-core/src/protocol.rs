//! Commit-reveal fair random generation.
//!
//! The house picks a secret value in `0..range` together with a fresh HMAC
//! key and publishes only the commitment. The counterpart then supplies its
//! own value, the two are added modulo `range`, and only after that does the
//! house disclose the key and secret so the counterpart can check both the
//! commitment and the sum.

use crate::commitment::{generate_key, CommitmentKey, CommitmentScheme, HmacCommitment};
use crate::{DiceError, Result};
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolState {
    Committed,
    ResultComputed,
    Revealed,
}

/// The counterpart's contribution and the combined value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub counter_value: i64,
    pub result: i64,
}

/// Key and secret disclosed at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    key: CommitmentKey,
    secret: i64,
}

impl Reveal {
    pub fn new(key: CommitmentKey, secret: i64) -> Self {
        Self { key, secret }
    }

    pub fn key(&self) -> &CommitmentKey {
        &self.key
    }

    pub fn key_hex(&self) -> String {
        hex::encode_upper(self.key)
    }

    pub fn secret(&self) -> i64 {
        self.secret
    }

    /// True if this key and secret reproduce `commitment`.
    pub fn verify(&self, commitment: &str) -> bool {
        HmacCommitment::verify(commitment, &self.key, &self.secret)
    }
}

/// `(secret + counter_value) mod range`, with both operands already in `0..range`.
pub fn combine(secret: i64, counter_value: i64, range: i64) -> i64 {
    // widened so values near i64::MAX cannot overflow
    ((secret as i128 + counter_value as i128) % range as i128) as i64
}

pub struct FairRandomProtocol {
    range: i64,
    key: CommitmentKey,
    secret: i64,
    commitment: String,
    state: ProtocolState,
    combined: Option<CombinedResult>,
}

impl FairRandomProtocol {
    /// Picks a key and a uniform secret in `0..range` and commits to them.
    pub fn initiate<R: RngCore + CryptoRng>(range: i64, rng: &mut R) -> Result<Self> {
        if range < 1 {
            return Err(DiceError::InvalidRange(range));
        }

        let key = generate_key(rng);
        let secret = rng.gen_range(0..range);
        let commitment = HmacCommitment::commit(&key, &secret)?;

        tracing::debug!("Committed to a value in 0..{}: {}", range, commitment);

        Ok(Self {
            range,
            key,
            secret,
            commitment,
            state: ProtocolState::Committed,
            combined: None,
        })
    }

    pub fn range(&self) -> i64 {
        self.range
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Lowercase hex HMAC published before the counterpart picks its value.
    pub fn commitment(&self) -> &str {
        &self.commitment
    }

    pub fn combined(&self) -> Option<CombinedResult> {
        self.combined
    }

    /// Adds the counterpart's value to the committed secret modulo the range.
    pub fn compute_result(&mut self, counter_value: i64) -> Result<i64> {
        if self.state != ProtocolState::Committed {
            return Err(DiceError::protocol_state(format!(
                "result can only be computed once, before reveal (state: {:?})",
                self.state
            )));
        }

        if !(0..self.range).contains(&counter_value) {
            return Err(DiceError::InvalidCounterValue {
                value: counter_value,
                range: self.range,
            });
        }

        let result = combine(self.secret, counter_value, self.range);
        self.combined = Some(CombinedResult {
            counter_value,
            result,
        });
        self.state = ProtocolState::ResultComputed;

        tracing::debug!(
            "Counter value {} accepted, combined result {} (mod {})",
            counter_value,
            result,
            self.range
        );
        Ok(result)
    }

    /// Discloses the key and secret. Repeated calls return the same values.
    ///
    /// Revealing straight from `Committed` is an abort: the run produced no
    /// result, and `compute_result` is refused afterwards.
    pub fn reveal(&mut self) -> Reveal {
        if self.state != ProtocolState::Revealed {
            if self.state == ProtocolState::Committed {
                tracing::warn!("Revealing before a counter value was supplied; run aborted");
            }
            self.state = ProtocolState::Revealed;
            tracing::info!("Revealed secret {} for commitment {}", self.secret, self.commitment);
        }

        Reveal::new(self.key, self.secret)
    }

    /// Combined result of a run that went through all three states.
    pub fn revealed_result(&self) -> Result<CombinedResult> {
        match (self.state, self.combined) {
            (ProtocolState::Revealed, Some(combined)) => Ok(combined),
            (state, _) => Err(DiceError::protocol_state(format!(
                "run has not completed commit, result and reveal (state: {:?})",
                state
            ))),
        }
    }
}

// keep the key and secret out of logs until reveal
impl fmt::Debug for FairRandomProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FairRandomProtocol")
            .field("range", &self.range)
            .field("commitment", &self.commitment)
            .field("state", &self.state)
            .field("combined", &self.combined)
            .finish()
    }
}
