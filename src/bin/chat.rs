//! Console chat front end for solace.

use anyhow::Context as _;
use clap::Parser;
use solace::composer::{DISCLAIMER, Disclaimer};
use solace::transcript::{TranscriptEvent, TranscriptWriter};
use solace::{EngineConfig, SafetyEngine, TurnOutcome};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Supportive text chat with crisis detection. Not a substitute for
/// professional care.
#[derive(Parser)]
#[command(name = "solace-chat", version, about)]
struct Cli {
    /// Path to TOML configuration file. Defaults to
    /// `~/.config/solace/config.toml` when that file exists.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lexicon file (TOML or JSON), overriding the config.
    #[arg(short, long)]
    lexicon: Option<PathBuf>,

    /// Append a JSONL transcript. Without a value, writes to the default
    /// data directory.
    #[arg(short, long, num_args = 0..=1)]
    transcript: Option<Option<PathBuf>>,

    /// Write the default configuration to the config path and exit.
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("solace=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(EngineConfig::default_config_path);

    if cli.init_config {
        EngineConfig::default()
            .save_to_file(&config_path)
            .with_context(|| format!("writing {}", config_path.display()))?;
        println!("Wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    let mut config = if cli.config.is_some() || config_path.exists() {
        EngineConfig::from_file(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?
    } else {
        EngineConfig::default()
    };
    if let Some(lexicon) = cli.lexicon {
        config.lexicon_path = Some(lexicon);
    }

    let engine = Arc::new(SafetyEngine::new(config).context("starting engine")?);
    let mut transcript = match cli.transcript {
        Some(path) => {
            let path = path.unwrap_or_else(TranscriptWriter::default_path);
            let writer = TranscriptWriter::open(&path)
                .with_context(|| format!("opening transcript {}", path.display()))?;
            info!(path = %path.display(), "writing transcript");
            Some(writer)
        }
        None => None,
    };

    run_chat(&engine, transcript.as_mut())
}

fn run_chat(
    engine: &Arc<SafetyEngine>,
    mut transcript: Option<&mut TranscriptWriter>,
) -> anyhow::Result<()> {
    print_banner();

    let mut session = engine.start_session();
    log_event(&mut transcript, &TranscriptEvent::session_start(&session));

    // Once a crisis turn shows the disclaimer, it stays for the session.
    let mut pin_disclaimer = false;
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        let text = line.trim();

        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            println!("Solace: Thank you for sharing with me today. Take care.");
            break;
        }
        if text.is_empty() {
            continue;
        }

        let outcome = session.respond(text);
        pin_disclaimer |= outcome.plan.disclaimer == Disclaimer::Persistent;
        print_reply(&outcome, pin_disclaimer);
        log_event(&mut transcript, &TranscriptEvent::Turn(outcome.record));
    }

    let summary = session.end();
    log_event(&mut transcript, &TranscriptEvent::SessionEnd(summary));
    Ok(())
}

fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("        Solace v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "=".repeat(60));
    println!("Hi, I'm an AI-based supportive chat assistant.");
    println!("I'm here to listen and help you explore your feelings.");
    println!("{DISCLAIMER}\n");
    println!("Type 'exit' or 'quit' anytime to stop.\n");
}

fn print_reply(outcome: &TurnOutcome, show_disclaimer: bool) {
    let plan = &outcome.plan;
    println!("\nSolace: {}", plan.reply_text);
    if let Some(action) = &plan.suggested_action {
        println!("\n  Something that might help: {}", action.text);
    }
    if show_disclaimer {
        println!("\n[{DISCLAIMER}]");
    }
    println!();
}

/// Transcript failures are reported but never end the conversation.
fn log_event(transcript: &mut Option<&mut TranscriptWriter>, event: &TranscriptEvent) {
    if let Some(writer) = transcript.as_deref_mut()
        && let Err(e) = writer.append(event)
    {
        warn!(path = %writer.path().display(), "transcript write failed: {e}");
    }
}
