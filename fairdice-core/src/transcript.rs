//! Auditable record of a game: every commitment, counter value and reveal.

use crate::commitment::{parse_key, verify_commitment};
use crate::game::{GameOutcome, Party};
use crate::protocol::{combine, FairRandomProtocol, Reveal};
use crate::{Die, DiceError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// What a protocol run was used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    FirstMove,
    Roll { party: Party, die: usize },
}

/// One completed commit-reveal run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolRecord {
    pub purpose: Purpose,
    pub range: i64,
    pub commitment: String,
    pub counter_value: i64,
    pub result: i64,
    pub key: String,
    pub secret: i64,
}

impl ProtocolRecord {
    pub fn new(purpose: Purpose, protocol: &FairRandomProtocol, reveal: &Reveal) -> Result<Self> {
        let combined = protocol.revealed_result()?;
        Ok(Self {
            purpose,
            range: protocol.range(),
            commitment: protocol.commitment().to_string(),
            counter_value: combined.counter_value,
            result: combined.result,
            key: reveal.key_hex(),
            secret: reveal.secret(),
        })
    }

    /// Re-checks the commitment against the revealed key and secret, then the modular sum.
    pub fn verify(&self) -> Result<()> {
        if self.range < 1 {
            return Err(DiceError::InvalidRange(self.range));
        }
        for value in [self.secret, self.counter_value] {
            if !(0..self.range).contains(&value) {
                return Err(DiceError::InvalidCounterValue {
                    value,
                    range: self.range,
                });
            }
        }

        let key = parse_key(&self.key)?;
        if !verify_commitment(&self.commitment, &key, self.secret) {
            return Err(DiceError::crypto(format!(
                "commitment {} does not match secret {} under key {}",
                self.commitment, self.secret, self.key
            )));
        }

        let expected = combine(self.secret, self.counter_value, self.range);
        if expected != self.result {
            return Err(DiceError::protocol_state(format!(
                "recorded result {} but {} + {} = {} (mod {})",
                self.result, self.secret, self.counter_value, expected, self.range
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTranscript {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub dice: Vec<Die>,
    pub records: Vec<ProtocolRecord>,
    pub outcome: Option<GameOutcome>,
}

impl GameTranscript {
    pub fn new(dice: Vec<Die>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            dice,
            records: Vec::new(),
            outcome: None,
        }
    }

    pub fn push(&mut self, record: ProtocolRecord) {
        self.records.push(record);
    }

    /// Verifies every record and, if the game finished, that the outcome follows from them.
    pub fn verify(&self) -> Result<()> {
        for (i, record) in self.records.iter().enumerate() {
            record.verify().map_err(|e| {
                DiceError::crypto(format!("record {} ({:?}) failed: {}", i, record.purpose, e))
            })?;
        }

        let Some(outcome) = &self.outcome else {
            return Ok(());
        };

        let [first_move, first_roll, second_roll] = self.records.as_slice() else {
            return Err(mismatch("run count"));
        };

        if first_move.purpose != Purpose::FirstMove || first_move.range != 2 {
            return Err(mismatch("first move run"));
        }
        let first = if first_move.result == 0 {
            Party::User
        } else {
            Party::House
        };
        if first != outcome.first_mover {
            return Err(mismatch("first mover"));
        }

        if outcome.user_die == outcome.house_die
            || outcome.user_die >= self.dice.len()
            || outcome.house_die >= self.dice.len()
        {
            return Err(mismatch("dice selection"));
        }

        for (record, party) in [(first_roll, first), (second_roll, first.other())] {
            let (die, roll) = match party {
                Party::User => (outcome.user_die, outcome.user_roll),
                Party::House => (outcome.house_die, outcome.house_roll),
            };
            if record.purpose != (Purpose::Roll { party, die }) {
                return Err(mismatch("roll order"));
            }
            let rolled = &self.dice[die];
            let face = usize::try_from(record.result)
                .ok()
                .and_then(|i| rolled.face(i));
            if record.range != rolled.face_count() as i64 || face != Some(roll) {
                return Err(mismatch("roll"));
            }
        }

        if outcome.winner != GameOutcome::decide(outcome.user_roll, outcome.house_roll) {
            return Err(mismatch("winner"));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved transcript {} to {}", self.id, path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn mismatch(what: &str) -> DiceError {
    DiceError::protocol_state(format!("outcome {} does not match the recorded runs", what))
}
