//! Provably fair dice game.
//!
//! The house commits to each random value with an HMAC before the user
//! contributes theirs, so neither side can bias a draw. Dice may be
//! non-transitive; [`ProbabilityMatrix`] shows the pairwise odds.

pub mod commitment;
pub mod config;
pub mod die;
pub mod error;
pub mod game;
pub mod io;
pub mod probability;
pub mod protocol;
pub mod transcript;

pub use commitment::{verify_commitment, CommitmentScheme, HmacCommitment};
pub use config::GameConfig;
pub use die::Die;
pub use error::{DiceError, Result};
pub use game::{DiceGame, GameOutcome, Party};
pub use io::{InputSource, Menu, MenuReply, OutputSink};
pub use probability::{tie_probability, win_probability, ProbabilityMatrix};
pub use protocol::{FairRandomProtocol, ProtocolState, Reveal};
pub use transcript::{GameTranscript, ProtocolRecord, Purpose};
