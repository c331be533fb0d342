//! Terminal table for the house-always-wins blackjack engine.
//!
//! Reads one command per line from stdin and prints the table after each.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use rigged_blackjack::{session::CardView, Session, Snapshot, TableConfig};

#[derive(Parser, Debug)]
#[command(name = "play", about = "Blackjack against a dealer who never loses")]
struct Args {
    /// Starting bankroll
    #[arg(long, default_value_t = 1000)]
    bankroll: u32,
    #[arg(long, default_value_t = 10)]
    min_bet: u32,
    #[arg(long, default_value_t = 100)]
    max_bet: u32,
    /// Seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,
    /// Print each snapshot as a JSON line instead of a table
    #[arg(long)]
    json: bool,
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Deal(Option<u32>),
    DealMax,
    Hit,
    Stand,
    Restart,
    Reset,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Command, String> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or("").to_ascii_lowercase();
        let arg = words.next();
        match (verb.as_str(), arg) {
            ("deal" | "d", None) => Ok(Command::Deal(None)),
            ("deal" | "d", Some("max")) => Ok(Command::DealMax),
            ("deal" | "d", Some(amount)) => amount
                .parse()
                .map(|bet| Command::Deal(Some(bet)))
                .map_err(|_| format!("not a bet amount: {amount}")),
            ("hit" | "h", _) => Ok(Command::Hit),
            ("stand" | "s", _) => Ok(Command::Stand),
            ("restart" | "r", _) => Ok(Command::Restart),
            ("reset", _) => Ok(Command::Reset),
            ("help" | "?", _) => Ok(Command::Help),
            ("quit" | "q" | "exit", _) => Ok(Command::Quit),
            (other, _) => Err(format!("unknown command: {other}")),
        }
    }
}

const HELP: &str = "commands: deal [amount|max], hit, stand, restart, reset, help, quit";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();

    let config = TableConfig {
        starting_bankroll: args.bankroll,
        min_bet: args.min_bet,
        max_bet: args.max_bet,
        ..TableConfig::default()
    };
    let mut session = match args.seed {
        Some(seed) => Session::seeded(config, seed),
        None => Session::from_entropy(config),
    }
    .context("invalid table limits")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !args.json {
        writeln!(out, "{HELP}")?;
    }
    render(&mut out, &session.snapshot(), args.json)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}. {HELP}")?;
                continue;
            }
        };

        let result = match command {
            Command::Deal(bet) => {
                let bet = bet.unwrap_or(session.config().min_bet);
                session.start_round(bet)
            }
            Command::DealMax => {
                let bet = session.max_bet();
                session.start_round(bet)
            }
            Command::Hit => session.player_hit(),
            Command::Stand => session.player_stand(),
            Command::Restart => Ok(session.next_round()),
            Command::Reset => Ok(session.reset_session()),
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::Quit => break,
        };

        // Rejections already carry their text in the status line.
        let snapshot = result.unwrap_or_else(|_| session.snapshot());
        render(&mut out, &snapshot, args.json)?;
    }

    Ok(())
}

fn render(out: &mut impl Write, snapshot: &Snapshot, json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, snapshot)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(
        out,
        "Dealer: {:<24} ({})",
        cards(&snapshot.dealer_hand),
        snapshot.dealer_total_display
    )?;
    writeln!(
        out,
        "You:    {:<24} ({})",
        cards(&snapshot.player_hand),
        snapshot.player_total
    )?;
    writeln!(
        out,
        "Bankroll: {}  Bet: {}",
        snapshot.bankroll, snapshot.locked_bet
    )?;
    writeln!(out, "{}", snapshot.status_message)?;
    if snapshot.bankroll_exhausted {
        writeln!(out, "Bankroll exhausted. Type `reset` to start over.")?;
    }
    Ok(())
}

fn cards(hand: &[CardView]) -> String {
    hand.iter()
        .map(|card| {
            if card.face_down {
                "??".to_string()
            } else {
                card.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
