use crate::config::{transcript_path, CliConfig};
use crate::console::{probability_table, ConsoleInput, ConsoleOutput};
use anyhow::{bail, Context};
use comfy_table::{presets::UTF8_FULL, Table};
use fairdice_core::commitment::parse_key;
use fairdice_core::{verify_commitment, DiceGame, GameConfig, GameTranscript, ProbabilityMatrix};
use rand::rngs::OsRng;
use std::path::{Path, PathBuf};

pub fn play(
    config: &CliConfig,
    dice: &[String],
    save_transcript: bool,
    transcript: Option<PathBuf>,
) -> anyhow::Result<()> {
    let game_config = GameConfig::from_args(dice)?;

    let mut game = DiceGame::new(game_config, ConsoleInput::new(), ConsoleOutput, OsRng);
    let played = game.play();
    let record = game.into_transcript();

    // an aborted game has nothing worth auditing
    played?;

    let path = match (transcript, save_transcript) {
        (Some(path), _) => Some(path),
        (None, true) => Some(transcript_path(&config.transcripts_dir(), record.id)),
        (None, false) => None,
    };
    if let Some(path) = path {
        record
            .save(&path)
            .with_context(|| format!("saving transcript to {}", path.display()))?;
        println!();
        println!("Transcript saved: {}", path.display());
        println!("Check it with: fairdice audit {}", path.display());
    }

    Ok(())
}

pub fn show_table(dice: &[String]) -> anyhow::Result<()> {
    let game_config = GameConfig::from_args(dice)?;
    let matrix = ProbabilityMatrix::calculate(game_config.dice());

    println!("Probability of the win for the user:");
    println!("{}", probability_table(game_config.dice(), &matrix));

    for (j, counter) in matrix.counters().into_iter().enumerate() {
        if let Some(i) = counter {
            println!(
                "{} is beaten by {} ({:.4})",
                game_config.dice()[j],
                game_config.dice()[i],
                matrix.get(i, j).unwrap_or_default()
            );
        }
    }

    Ok(())
}

pub fn verify(hmac: &str, key: &str, value: i64) -> anyhow::Result<()> {
    let key = parse_key(key)?;

    if !verify_commitment(hmac, &key, value) {
        bail!("HMAC does not match key and value {}", value);
    }

    println!("Commitment verified: {} was committed before your move.", value);
    Ok(())
}

pub fn audit(path: &Path) -> anyhow::Result<()> {
    let transcript = GameTranscript::load(path)
        .with_context(|| format!("loading transcript {}", path.display()))?;

    println!("Game: {}", transcript.id);
    println!("Started: {}", transcript.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "Dice: {}",
        transcript
            .dice
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Purpose", "Range", "HMAC", "Secret", "Counter", "Result"]);
    for record in &transcript.records {
        table.add_row(vec![
            format!("{:?}", record.purpose),
            record.range.to_string(),
            short_commitment(&record.commitment),
            record.secret.to_string(),
            record.counter_value.to_string(),
            record.result.to_string(),
        ]);
    }
    println!("{}", table);

    transcript.verify()?;

    match &transcript.outcome {
        Some(outcome) => println!(
            "All {} runs verified. User rolled {}, house rolled {}, winner: {:?}.",
            transcript.records.len(),
            outcome.user_roll,
            outcome.house_roll,
            outcome.winner
        ),
        None => println!(
            "All {} runs verified. The game did not finish.",
            transcript.records.len()
        ),
    }
    Ok(())
}

/// First 16 characters of a commitment read from a transcript file.
fn short_commitment(commitment: &str) -> String {
    let mut short: String = commitment.chars().take(16).collect();
    if commitment.chars().nth(16).is_some() {
        short.push('…');
    }
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_commitment() {
        let hmac = "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843";
        assert_eq!(short_commitment(hmac), "5bdcc146bf60754e…");
        assert_eq!(short_commitment("abcd"), "abcd");
        assert_eq!(short_commitment(""), "");
    }

    #[test]
    fn test_short_commitment_multibyte() {
        let tampered = format!("a{}", "é".repeat(17));
        assert_eq!(
            short_commitment(&tampered),
            format!("a{}…", "é".repeat(15))
        );
    }
}
