use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};

use motoprint::audio::{AudioCue, Cue};
use motoprint::config::{ConfigError, DeskConfig};
use motoprint::engine::{Action, Engine};
use motoprint::store::{CardId, ColorTag};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("nothing to print; the message is empty")]
    EmptyMessage,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "motoprint", about = "Print a message onto a paper card, one keystroke at a time")]
struct Cli {
    /// Message to print.
    message: String,

    /// Paper color: white, yellow, green or pink.
    #[arg(long, short, default_value = "white")]
    color: ColorTag,

    /// Tear the card off once it finishes typing.
    #[arg(long)]
    dismiss: bool,

    /// Dump the final desk snapshot as JSON.
    #[arg(long)]
    json: bool,

    /// Seed for placement and ids.
    #[arg(long, env = "MOTOPRINT_SEED")]
    seed: Option<u64>,
}

/// Rings the terminal bell when a card finishes. Key strikes are silent.
struct TerminalBell;

impl AudioCue for TerminalBell {
    fn trigger(&self, cue: Cue) {
        if cue != Cue::Ding {
            return;
        }
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(b"\x07").and_then(|()| out.flush()) {
            debug!(error = %e, "bell unavailable");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "motoprint failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    if cli.message.trim().is_empty() {
        return Err(AppError::EmptyMessage);
    }

    let mut config = DeskConfig::from_env()?;
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let mut engine = Engine::new(config, TerminalBell)?;
    let id = engine.print(&cli.message, cli.color);

    let mut out = io::stdout();
    if let Some(card) = engine.card(&id) {
        writeln!(out, "{} {} [{}]", card.label, card.created_at, card.color)?;
    }

    let mut shown = 0;
    let mut dismissed = false;
    while let Some(deadline) = engine.next_deadline() {
        let wait = deadline.saturating_sub(engine.now());
        tokio::time::sleep(wait).await;

        for action in engine.advance(wait) {
            match action {
                Action::TextRevealed { id: card, complete, .. } if card == id => {
                    shown = echo(&engine, id, shown, &mut out)?;
                    if complete && cli.dismiss && !dismissed {
                        dismissed = true;
                        engine.delete(&id);
                    }
                }
                Action::PhaseChanged { id: card, phase } => {
                    debug!(card_id = %card, phase = phase.as_str(), "phase changed");
                }
                Action::CardRemoved { id: card } => {
                    info!(card_id = %card, "card torn off");
                }
                Action::TextRevealed { .. } | Action::RenderNeeded => {}
            }
        }
    }
    writeln!(out)?;

    if cli.json {
        let snapshot = serde_json::to_string_pretty(&engine.snapshot())?;
        writeln!(out, "{snapshot}")?;
    }
    Ok(())
}

/// Write the characters revealed since the last call. Returns the new count.
fn echo(engine: &Engine, id: CardId, shown: usize, out: &mut impl Write) -> Result<usize, AppError> {
    let Some(card) = engine.card(&id) else {
        return Ok(shown);
    };
    let fresh: String = card.text.chars().skip(shown).collect();
    out.write_all(fresh.as_bytes())?;
    out.flush()?;
    Ok(shown + fresh.chars().count())
}
