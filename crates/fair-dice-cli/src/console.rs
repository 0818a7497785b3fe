//! Line-oriented console: menus and plain messages.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// What the user picked from a menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Position of the chosen option
    Pick(usize),
    Help,
    Exit,
}

pub struct Console<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Show `options` and read a selection, re-prompting until it is valid.
    ///
    /// End of input counts as Exit.
    pub fn menu<S: AsRef<str>>(&mut self, options: &[S]) -> io::Result<Choice> {
        loop {
            writeln!(self.output, "Available options:")?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "{i} - {}", option.as_ref())?;
            }
            writeln!(self.output, "X - exit")?;
            writeln!(self.output, "? - help")?;
            write!(self.output, "Your selection: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Choice::Exit);
            }

            match parse_choice(line.trim(), options.len()) {
                Some(choice) => return Ok(choice),
                None => writeln!(
                    self.output,
                    "Invalid selection {:?}: enter a listed number, X or ?",
                    line.trim()
                )?,
            }
        }
    }

    pub fn into_output(self) -> O {
        self.output
    }
}

fn parse_choice(raw: &str, count: usize) -> Option<Choice> {
    match raw {
        "x" | "X" => Some(Choice::Exit),
        "?" => Some(Choice::Help),
        _ => raw
            .parse::<usize>()
            .ok()
            .filter(|&i| i < count)
            .map(Choice::Pick),
    }
}
