use fairdice_core::{
    DiceError, DiceGame, Die, GameConfig, InputSource, Menu, OutputSink, Party,
    ProbabilityMatrix, Purpose, Result,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::VecDeque;

struct ScriptedInput {
    replies: VecDeque<String>,
}

impl ScriptedInput {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn read_reply(&mut self, _menu: &Menu) -> Result<String> {
        self.replies
            .pop_front()
            .ok_or_else(|| DiceError::dialog("script exhausted"))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Message(String),
    Menu(Menu),
    Table(usize),
}

#[derive(Default)]
struct RecordingOutput {
    events: Vec<Event>,
}

impl RecordingOutput {
    fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Message(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    fn menu_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Menu(_)))
            .count()
    }
}

impl OutputSink for RecordingOutput {
    fn message(&mut self, text: &str) {
        self.events.push(Event::Message(text.to_string()));
    }

    fn menu(&mut self, menu: &Menu) {
        self.events.push(Event::Menu(menu.clone()));
    }

    fn probability_table(&mut self, dice: &[Die], matrix: &ProbabilityMatrix) {
        assert_eq!(dice.len(), matrix.size());
        self.events.push(Event::Table(matrix.size()));
    }
}

fn config() -> GameConfig {
    GameConfig::from_args(&["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap()
}

#[test]
fn test_full_game_is_verifiable() {
    for seed in 0..20 {
        let mut output = RecordingOutput::default();
        let mut game = DiceGame::new(
            config(),
            ScriptedInput::new(&["0", "0", "0", "0"]),
            &mut output,
            ChaCha20Rng::seed_from_u64(seed),
        );

        let outcome = game.play().unwrap();
        let transcript = game.into_transcript();

        assert_ne!(outcome.user_die, outcome.house_die);
        assert_eq!(transcript.records.len(), 3);
        assert_eq!(transcript.records[0].purpose, Purpose::FirstMove);
        assert_eq!(
            transcript.records[1].purpose,
            Purpose::Roll {
                party: outcome.first_mover,
                die: match outcome.first_mover {
                    Party::User => outcome.user_die,
                    Party::House => outcome.house_die,
                },
            }
        );
        assert_eq!(transcript.outcome.as_ref(), Some(&outcome));
        transcript.verify().unwrap();

        let dice = config().into_dice();
        assert!(dice[outcome.user_die].faces().contains(&outcome.user_roll));
        assert!(dice[outcome.house_die].faces().contains(&outcome.house_roll));
        assert_eq!(output.menu_count(), 4);
    }
}

#[test]
fn test_commitment_published_before_counter_value() {
    let mut output = RecordingOutput::default();
    let mut game = DiceGame::new(
        config(),
        ScriptedInput::new(&["1", "0", "0", "0"]),
        &mut output,
        ChaCha20Rng::seed_from_u64(42),
    );
    game.play().unwrap();
    let transcript = game.into_transcript();

    // every numbered menu is preceded by its HMAC and followed by its KEY
    let mut runs = transcript.records.iter();
    let mut pending: Option<String> = None;
    for event in &output.events {
        match event {
            Event::Message(m) if m.contains("HMAC=") => {
                let record = runs.next().unwrap();
                assert!(m.contains(&record.commitment));
                assert!(pending.is_none());
                pending = Some(record.key.clone());
            }
            Event::Message(m) if m.contains("KEY=") => {
                let key = pending.take().unwrap();
                assert!(m.contains(&key));
            }
            _ => {}
        }
    }
    assert!(runs.next().is_none());
    assert!(pending.is_none());
}

#[test]
fn test_invalid_replies_are_reprompted() {
    let mut output = RecordingOutput::default();
    let mut game = DiceGame::new(
        config(),
        ScriptedInput::new(&["foo", "5", "0", "0", "0", "0"]),
        &mut output,
        ChaCha20Rng::seed_from_u64(3),
    );
    game.play().unwrap();

    let messages = output.messages();
    assert!(messages.iter().any(|m| m.contains("'foo' is not an option")));
    assert!(messages.iter().any(|m| m.contains("5 is out of range")));
    assert_eq!(output.menu_count(), 6);
}

#[test]
fn test_help_shows_probability_table() {
    let mut output = RecordingOutput::default();
    let mut game = DiceGame::new(
        config(),
        ScriptedInput::new(&["?", "0", "?", "0", "0", "0"]),
        &mut output,
        ChaCha20Rng::seed_from_u64(4),
    );
    game.play().unwrap();

    let tables = output
        .events
        .iter()
        .filter(|e| matches!(e, Event::Table(3)))
        .count();
    assert_eq!(tables, 2);
}

#[test]
fn test_exit_aborts_before_any_reveal() {
    let mut output = RecordingOutput::default();
    let mut game = DiceGame::new(
        config(),
        ScriptedInput::new(&["X"]),
        &mut output,
        ChaCha20Rng::seed_from_u64(5),
    );

    assert!(matches!(game.play(), Err(DiceError::Aborted)));
    assert!(game.transcript().records.is_empty());
    assert!(game.transcript().outcome.is_none());
    assert!(!output.messages().iter().any(|m| m.contains("KEY=")));
}

#[test]
fn test_exit_during_roll() {
    let mut game = DiceGame::new(
        config(),
        ScriptedInput::new(&["0", "0", "x"]),
        RecordingOutput::default(),
        ChaCha20Rng::seed_from_u64(6),
    );

    assert!(matches!(game.play(), Err(DiceError::Aborted)));
    assert_eq!(game.transcript().records.len(), 1);
}

#[test]
fn test_input_failure_is_fatal() {
    let mut game = DiceGame::new(
        config(),
        ScriptedInput::new(&["0"]),
        RecordingOutput::default(),
        ChaCha20Rng::seed_from_u64(7),
    );

    assert!(matches!(game.play(), Err(DiceError::Dialog(_))));
}

#[test]
fn test_tampered_transcript_is_rejected() {
    let mut game = DiceGame::new(
        config(),
        ScriptedInput::new(&["0", "0", "0", "0"]),
        RecordingOutput::default(),
        ChaCha20Rng::seed_from_u64(8),
    );
    game.play().unwrap();
    let mut transcript = game.into_transcript();
    transcript.verify().unwrap();

    let mut flipped = transcript.clone();
    if let Some(outcome) = flipped.outcome.as_mut() {
        outcome.first_mover = outcome.first_mover.other();
    }
    assert!(flipped.verify().is_err());

    transcript.records[2].counter_value = (transcript.records[2].counter_value + 1)
        % transcript.records[2].range;
    assert!(transcript.verify().is_err());
}
