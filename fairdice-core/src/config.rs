use crate::{Die, DiceError, Result};
use serde::{Deserialize, Serialize};

/// Fewest dice a game can be played with.
pub const MIN_DICE: usize = 3;

pub const USAGE_EXAMPLE: &str = "fairdice play 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7";

/// Dice whose first face is negative must follow `--` so they aren't read as flags.
pub const NEGATIVE_FACES_EXAMPLE: &str = "fairdice play --save-transcript -- -1,4,4 0,0,5 3,3,-2";

/// Validated set of dice for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    dice: Vec<Die>,
}

impl GameConfig {
    pub fn new(dice: Vec<Die>) -> Result<Self> {
        let config = Self { dice };
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from raw die definitions such as `["1,2,3", "4,5,6", ...]`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() < MIN_DICE {
            return Err(too_few(args.len()));
        }

        let dice = args
            .iter()
            .map(|arg| arg.as_ref().parse::<Die>())
            .collect::<Result<Vec<_>>>()?;
        Self::new(dice)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dice.len() < MIN_DICE {
            return Err(too_few(self.dice.len()));
        }
        Ok(())
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn into_dice(self) -> Vec<Die> {
        self.dice
    }
}

fn too_few(count: usize) -> DiceError {
    DiceError::configuration(format!(
        "at least {} dice are required, got {}",
        MIN_DICE, count
    ))
}
