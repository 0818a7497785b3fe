//! Interactive game session: the computer hosts, the user guesses.

use crate::console::{Choice, Console};
use anyhow::{Context, Result};
use fair_dice_core::games::FIRST_MOVE_RANGE;
use fair_dice_core::{Commitment, Game, Party, ProbabilityTable, Revelation, Turn};
use rand::{CryptoRng, RngCore};
use std::cmp::Ordering;
use std::io::{BufRead, Write};
use tracing::info;

/// How a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ending {
    Finished,
    Quit,
    Disputed,
}

pub struct Session<R, I, O> {
    game: Game<R>,
    console: Console<I, O>,
    direct_rolls: bool,
}

/// Outcome of one interactive step
enum Step<T> {
    Continue(T),
    Stop(Ending),
}

/// Unwraps `Step::Continue`, passing `Step::Stop` up to the caller
macro_rules! step {
    ($step:expr) => {
        match $step {
            Step::Continue(value) => value,
            Step::Stop(ending) => return Ok(Step::Stop(ending)),
        }
    };
}

impl<R, I, O> Session<R, I, O>
where
    R: RngCore + CryptoRng,
    I: BufRead,
    O: Write,
{
    pub fn new(game: Game<R>, console: Console<I, O>, direct_rolls: bool) -> Self {
        Self {
            game,
            console,
            direct_rolls,
        }
    }

    /// Play `rounds` rounds, or until the user exits
    pub fn play(&mut self, rounds: u32) -> Result<Ending> {
        info!(game_id = %self.game.id(), rounds, "session started");
        if let Step::Stop(ending) = self.first_move()? {
            return Ok(ending);
        }

        for round in 1..=rounds {
            if rounds > 1 {
                self.console.say(format!("--- Round {round} of {rounds} ---"))?;
            }
            if let Step::Stop(ending) = self.play_round()? {
                return Ok(ending);
            }
            if round < rounds {
                self.game.next_round()?;
            }
        }
        Ok(Ending::Finished)
    }

    pub fn into_console(self) -> Console<I, O> {
        self.console
    }

    fn play_round(&mut self) -> Result<Step<()>> {
        step!(self.choose_face_sets()?);
        step!(self.roll(Party::Host)?);
        step!(self.roll(Party::Guesser)?);
        self.report_round()?;
        Ok(Step::Continue(()))
    }

    fn first_move(&mut self) -> Result<Step<()>> {
        self.console.say("Let's determine who makes the first move.")?;
        let commitment = self.game.start_first_move()?;
        self.announce_commitment(&commitment)?;
        self.console.say("Try to guess my selection.")?;

        let options: Vec<String> = (0..FIRST_MOVE_RANGE).map(|v| v.to_string()).collect();
        let guess = step!(self.pick(&options)?) as u32;

        let turn = self
            .game
            .finish_first_move(guess)
            .context("settling the first move")?;
        let first = *step!(self.disclose(&turn)?);
        match first {
            Party::Guesser => self.console.say("You guessed right, you make the first move.")?,
            Party::Host => self.console.say("I make the first move.")?,
        }
        Ok(Step::Continue(()))
    }

    fn choose_face_sets(&mut self) -> Result<Step<()>> {
        while let Some(chooser) = self.game.chooser() {
            match chooser {
                Party::Host => {
                    let index = self.game.host_choose_face_set()?;
                    let faces = self.game.config().face_set_at(index)?;
                    self.console.say(format!("I choose the [{faces}] dice."))?;
                }
                Party::Guesser => {
                    self.console.say("Choose your dice:")?;
                    let available = self.game.available_face_sets();
                    let options: Vec<String> = available
                        .iter()
                        .map(|&i| self.game.config().face_set_at(i).map(|f| f.to_string()))
                        .collect::<Result<_, _>>()?;
                    let position = step!(self.pick(&options)?);
                    let faces = self.game.choose_face_set(Party::Guesser, available[position])?;
                    self.console.say(format!("You choose the [{faces}] dice."))?;
                }
            }
        }
        Ok(Step::Continue(()))
    }

    fn roll(&mut self, party: Party) -> Result<Step<()>> {
        let (whose, whose_title) = match party {
            Party::Host => ("my", "My"),
            Party::Guesser => ("your", "Your"),
        };
        self.console.say(format!("It's time for {whose} roll."))?;

        if self.direct_rolls {
            let face = self.game.roll_direct(party)?;
            self.console.say(format!("{whose_title} roll result is {face}."))?;
            return Ok(Step::Continue(()));
        }

        let commitment = self.game.start_roll(party)?;
        self.announce_commitment(&commitment)?;
        self.console
            .say(format!("Add your number modulo {}.", commitment.range()))?;

        let options: Vec<String> = (0..commitment.range()).map(|v| v.to_string()).collect();
        let guess = step!(self.pick(&options)?) as u32;

        let turn = self.game.finish_roll(guess).context("settling the roll")?;
        let face = *step!(self.disclose(&turn)?);
        if let Turn::Agreed { result, .. } = &turn {
            self.console.say(format!(
                "The fair number generation result is {} + {} = {} (mod {}).",
                result.host_value,
                result.counterparty_value,
                result.outcome,
                commitment.range()
            ))?;
        }
        self.console.say(format!("{whose_title} roll result is {face}."))?;
        Ok(Step::Continue(()))
    }

    fn report_round(&mut self) -> Result<()> {
        let verdict = self.game.verdict()?;
        let (you, me) = (verdict.guesser_roll, verdict.host_roll);
        let line = match you.cmp(&me) {
            Ordering::Greater => format!("You win ({you} > {me})!"),
            Ordering::Less => format!("I win ({me} > {you})!"),
            Ordering::Equal => format!("It's a tie ({you} = {me})."),
        };
        self.console.say(line)?;

        let state = self.game.state();
        let score = format!(
            "Score: you {}, me {}.",
            state.guesser_score, state.host_score
        );
        self.console.say(score)?;
        Ok(())
    }

    fn announce_commitment(&mut self, commitment: &Commitment) -> Result<()> {
        self.console.say(format!(
            "I selected a random value in the range 0..{} (HMAC={commitment}).",
            commitment.range() - 1
        ))?;
        Ok(())
    }

    /// Print the host's disclosure, stopping the session on a dispute
    fn disclose<'t, T>(&mut self, turn: &'t Turn<T>) -> Result<Step<&'t T>> {
        let Revelation { value, key } = turn.revelation();
        self.console
            .say(format!("My selection: {value} (KEY={}).", key.to_hex()))?;

        match turn {
            Turn::Agreed { value, .. } => Ok(Step::Continue(value)),
            Turn::Disputed { commitment, .. } => {
                self.console.say(format!(
                    "Fairness violation: the revealed value does not match HMAC={commitment}. \
                     No result can be reported."
                ))?;
                Ok(Step::Stop(Ending::Disputed))
            }
        }
    }

    /// Menu with `?` showing the probability table
    fn pick(&mut self, options: &[String]) -> Result<Step<usize>> {
        loop {
            match self.console.menu(options)? {
                Choice::Pick(i) => return Ok(Step::Continue(i)),
                Choice::Exit => {
                    self.console.say("Goodbye.")?;
                    return Ok(Step::Stop(Ending::Quit));
                }
                Choice::Help => self.help()?,
            }
        }
    }

    fn help(&mut self) -> Result<()> {
        let table = ProbabilityTable::new(self.game.config());
        let labels: Vec<String> = self
            .game
            .config()
            .face_sets()
            .iter()
            .map(|f| f.to_string())
            .collect();
        let width = labels.iter().map(String::len).max().unwrap_or(0).max(6);

        self.console.say(
            "Probability that the row dice beats the column dice, \
             counted over all 36 face pairs:",
        )?;
        let mut header = format!("{:width$}", "");
        for label in &labels {
            header.push_str(&format!(" | {label:>width$}"));
        }
        self.console.say(header)?;

        for (label, row) in labels.iter().zip(table.rows()) {
            let mut line = format!("{label:width$}");
            for p in row {
                line.push_str(&format!(" | {:>width$}", format!("{p:.4}")));
            }
            self.console.say(line)?;
        }
        Ok(())
    }
}
