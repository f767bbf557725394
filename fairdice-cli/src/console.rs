use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use fairdice_core::{DiceError, Die, InputSource, Menu, OutputSink, ProbabilityMatrix, Result};
use std::io::{self, BufRead, IsTerminal, Write};

/// Reads replies from stdin: a dialoguer prompt on a terminal, plain lines otherwise.
///
/// Ctrl-C keeps the default signal behaviour and ends the process; no game
/// state outlives it. End of piped input is treated like choosing exit.
pub struct ConsoleInput {
    interactive: bool,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for ConsoleInput {
    fn read_reply(&mut self, _menu: &Menu) -> Result<String> {
        if self.interactive {
            return dialoguer::Input::<String>::new()
                .with_prompt("Your selection")
                .allow_empty(true)
                .interact_text()
                .map_err(|e| DiceError::dialog(e.to_string()));
        }

        print!("Your selection: ");
        io::stdout().flush()?;
        read_line_reply(&mut io::stdin().lock())
    }
}

/// One reply per line; a closed input is an abort.
fn read_line_reply<B: BufRead>(reader: &mut B) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        tracing::info!("Input closed");
        return Err(DiceError::Aborted);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Writes game output to stdout.
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn message(&mut self, text: &str) {
        println!("{}", text);
    }

    fn menu(&mut self, menu: &Menu) {
        println!("{}", menu.prompt);
        for line in menu.lines() {
            println!("{}", line);
        }
    }

    fn probability_table(&mut self, dice: &[Die], matrix: &ProbabilityMatrix) {
        println!("Probability of the win for the user:");
        println!("{}", probability_table(dice, matrix));
    }
}

/// Row die vs column die, one cell per `P(row beats column)`.
pub fn probability_table(dice: &[Die], matrix: &ProbabilityMatrix) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec![Cell::new("User dice v")];
    header.extend(dice.iter().map(|d| Cell::new(d.to_string())));
    table.set_header(header);

    for (die, row) in dice.iter().zip(matrix.rows()) {
        let mut cells = vec![Cell::new(die.to_string())];
        cells.extend(
            row.iter()
                .map(|p| Cell::new(format!("{:.4}", p)).set_alignment(CellAlignment::Right)),
        );
        table.add_row(cells);
    }

    table
}
