use crate::io::{InputSource, Menu, MenuReply, OutputSink};
use crate::protocol::FairRandomProtocol;
use crate::transcript::{GameTranscript, ProtocolRecord, Purpose};
use crate::{Die, DiceError, GameConfig, ProbabilityMatrix, Result};
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    User,
    House,
}

impl Party {
    pub fn other(self) -> Self {
        match self {
            Party::User => Party::House,
            Party::House => Party::User,
        }
    }
}

/// Result of one complete game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub first_mover: Party,
    pub user_die: usize,
    pub house_die: usize,
    pub user_roll: i64,
    pub house_roll: i64,
    /// `None` on a tie
    pub winner: Option<Party>,
}

impl GameOutcome {
    /// Strictly greater roll wins; equal rolls tie.
    pub fn decide(user_roll: i64, house_roll: i64) -> Option<Party> {
        match user_roll.cmp(&house_roll) {
            Ordering::Greater => Some(Party::User),
            Ordering::Less => Some(Party::House),
            Ordering::Equal => None,
        }
    }
}

/// Drives one game: first-move draw, dice selection, two fair rolls.
///
/// Every random draw the user could contest goes through a fresh
/// [`FairRandomProtocol`]. The house's die pick uses `rng` directly.
pub struct DiceGame<I, O, R> {
    dice: Vec<Die>,
    input: I,
    output: O,
    rng: R,
    transcript: GameTranscript,
}

impl<I, O, R> DiceGame<I, O, R>
where
    I: InputSource,
    O: OutputSink,
    R: RngCore + CryptoRng,
{
    pub fn new(config: GameConfig, input: I, output: O, rng: R) -> Self {
        let dice = config.into_dice();
        Self {
            transcript: GameTranscript::new(dice.clone()),
            dice,
            input,
            output,
            rng,
        }
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn transcript(&self) -> &GameTranscript {
        &self.transcript
    }

    pub fn into_transcript(self) -> GameTranscript {
        self.transcript
    }

    /// Plays a full game. Returns `DiceError::Aborted` if the user exits at any prompt.
    pub fn play(&mut self) -> Result<GameOutcome> {
        tracing::info!("Game {} started with {} dice", self.transcript.id, self.dice.len());

        let first_mover = self.determine_first_move()?;
        let (user_die, house_die) = self.select_dice(first_mover)?;

        let mut user_roll = 0;
        let mut house_roll = 0;
        for party in [first_mover, first_mover.other()] {
            match party {
                Party::User => user_roll = self.roll(Party::User, user_die)?,
                Party::House => house_roll = self.roll(Party::House, house_die)?,
            }
        }

        let winner = GameOutcome::decide(user_roll, house_roll);
        match winner {
            Some(Party::User) => self
                .output
                .message(&format!("You win ({} > {})!", user_roll, house_roll)),
            Some(Party::House) => self
                .output
                .message(&format!("I win ({} > {})!", house_roll, user_roll)),
            None => self
                .output
                .message(&format!("It's a tie ({} = {}).", user_roll, house_roll)),
        }

        let outcome = GameOutcome {
            first_mover,
            user_die,
            house_die,
            user_roll,
            house_roll,
            winner,
        };
        self.transcript.outcome = Some(outcome.clone());

        tracing::info!("Game {} completed: {:?}", self.transcript.id, winner);
        Ok(outcome)
    }

    fn determine_first_move(&mut self) -> Result<Party> {
        self.output.message("Let's determine who makes the first move.");
        let result = self.fair_random(
            Purpose::FirstMove,
            2,
            "Try to guess my selection.",
        )?;

        let first = if result == 0 { Party::User } else { Party::House };
        tracing::info!("First move: {:?}", first);
        Ok(first)
    }

    /// Returns `(user_die, house_die)` as indices into the configured dice.
    fn select_dice(&mut self, first_mover: Party) -> Result<(usize, usize)> {
        match first_mover {
            Party::User => {
                self.output.message("You make the first move.");
                let user_die = self.user_pick(&[])?;
                let house_die = self.house_pick(&[user_die], "I choose")?;
                Ok((user_die, house_die))
            }
            Party::House => {
                let house_die = self.house_pick(&[], "I make the first move and choose")?;
                let user_die = self.user_pick(&[house_die])?;
                Ok((user_die, house_die))
            }
        }
    }

    fn user_pick(&mut self, taken: &[usize]) -> Result<usize> {
        let available = self.available(taken);
        let options = available.iter().map(|&i| self.dice[i].to_string()).collect();
        let menu = Menu::new("Choose your dice:", options);

        let choice = available[self.ask(&menu)?];
        self.output
            .message(&format!("You choose the {} dice.", self.dice[choice]));
        Ok(choice)
    }

    fn house_pick(&mut self, taken: &[usize], announcement: &str) -> Result<usize> {
        let available = self.available(taken);
        let choice = available[self.rng.gen_range(0..available.len())];
        self.output.message(&format!(
            "{} the {} dice.",
            announcement, self.dice[choice]
        ));
        Ok(choice)
    }

    fn available(&self, taken: &[usize]) -> Vec<usize> {
        (0..self.dice.len()).filter(|i| !taken.contains(i)).collect()
    }

    fn roll(&mut self, party: Party, die_index: usize) -> Result<i64> {
        let die = self.dice[die_index].clone();
        let range = die.face_count() as i64;

        self.output.message(match party {
            Party::User => "It's time for your roll.",
            Party::House => "It's time for my roll.",
        });
        let index = self.fair_random(
            Purpose::Roll {
                party,
                die: die_index,
            },
            range,
            &format!("Add your number modulo {}.", range),
        )?;

        let value = usize::try_from(index)
            .ok()
            .and_then(|i| die.face(i))
            .ok_or_else(|| {
                DiceError::protocol_state(format!("roll index {} outside die {}", index, die))
            })?;

        self.output.message(&match party {
            Party::User => format!("Your roll result is {}.", value),
            Party::House => format!("My roll result is {}.", value),
        });
        tracing::debug!("{:?} rolled {} on {}", party, value, die);
        Ok(value)
    }

    /// Runs one commit-reveal exchange with the user and records it.
    fn fair_random(&mut self, purpose: Purpose, range: i64, prompt: &str) -> Result<i64> {
        let mut protocol = FairRandomProtocol::initiate(range, &mut self.rng)?;
        self.output.message(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            range - 1,
            protocol.commitment()
        ));

        // the commitment is out; only now ask for the user's value
        let counter_value = self.ask(&Menu::numbered(prompt, range as usize))? as i64;
        let result = protocol.compute_result(counter_value)?;
        let reveal = protocol.reveal();

        self.output.message(&format!(
            "My number is {} (KEY={}).",
            reveal.secret(),
            reveal.key_hex()
        ));
        self.output.message(&format!(
            "The fair number generation result is {} + {} = {} (mod {}).",
            reveal.secret(),
            counter_value,
            result,
            range
        ));

        self.transcript
            .push(ProtocolRecord::new(purpose, &protocol, &reveal)?);
        Ok(result)
    }

    /// Prompts until the user picks a valid option. Help is shown in place;
    /// exit aborts the game.
    fn ask(&mut self, menu: &Menu) -> Result<usize> {
        loop {
            self.output.menu(menu);
            let raw = self.input.read_reply(menu)?;

            match menu.parse_reply(&raw) {
                Ok(MenuReply::Select(index)) => return Ok(index),
                Ok(MenuReply::Help) => {
                    let matrix = ProbabilityMatrix::calculate(&self.dice);
                    self.output.probability_table(&self.dice, &matrix);
                }
                Ok(MenuReply::Exit) => {
                    tracing::info!("Game {} aborted by user", self.transcript.id);
                    return Err(DiceError::Aborted);
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Rejected reply {:?}: {}", raw, e);
                    self.output.message(&e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
    }
}
