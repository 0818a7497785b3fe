//! Fair Dice Console
//!
//! Interactive, provably fair dice game. The computer hosts every exchange:
//! it publishes an HMAC commitment, waits for the user's number, then
//! reveals its value and key so the user can check the commitment.

mod console;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use console::Console;
use fair_dice_core::{DiceConfig, Error, Game};
use session::{Ending, Session};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const USAGE_EXAMPLE: &str = "fair-dice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3";

#[derive(Parser, Debug)]
#[command(name = "fair-dice", version, about = "Provably fair dice game")]
struct Args {
    /// Dice face-sets, each exactly six comma-separated integers (at least three)
    #[arg(allow_hyphen_values = true)]
    dice: Vec<String>,

    /// Number of rounds to play
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Roll straight from the secure random source instead of a joint exchange
    #[arg(long)]
    direct_rolls: bool,

    /// Log filter (tracing EnvFilter syntax)
    #[arg(long, env = "FAIR_DICE_LOG", default_value = "warn")]
    log: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let filter = EnvFilter::try_new(&args.log)
        .with_context(|| format!("invalid log filter {:?}", args.log))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = match DiceConfig::parse(args.dice.as_slice()) {
        Ok(config) => config,
        Err(err @ Error::InvalidConfig(_)) => {
            eprintln!("Error: {err}");
            eprintln!("Example: {USAGE_EXAMPLE}");
            return Ok(ExitCode::from(1));
        }
        Err(err) => return Err(err.into()),
    };
    info!(face_sets = config.face_set_count(), rounds = args.rounds, "configuration loaded");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock());
    let mut session = Session::new(Game::new(config), console, args.direct_rolls);

    let ending = session.play(args.rounds)?;
    session
        .into_console()
        .into_output()
        .flush()
        .context("flushing output")?;

    Ok(match ending {
        Ending::Finished | Ending::Quit => ExitCode::SUCCESS,
        Ending::Disputed => ExitCode::from(2),
    })
}
