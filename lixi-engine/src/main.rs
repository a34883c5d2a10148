//! Lucky draw (lixi) - Main entry point
//!
//! Terminal driver for the lucky-draw engine: stands in for the UI layer by
//! subscribing to engine events and forwarding spin/pick/reset commands
//! read from stdin. Rendering is textual; the engine itself never draws.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lixi_common::config::TomlConfig;
use lixi_common::events::{DrawEvent, SelectionMode};
use lixi_common::model::default_set;
use lixi_engine::audio::SoundDirector;
use lixi_engine::SelectionController;

/// Selection surface to run
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Weighted spinning wheel
    Wheel,
    /// Lucky envelope grid
    Envelopes,
}

impl From<ModeArg> for SelectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Wheel => SelectionMode::Wheel,
            ModeArg::Envelopes => SelectionMode::Envelopes,
        }
    }
}

/// Command-line arguments for lixi
#[derive(Parser, Debug)]
#[command(name = "lixi")]
#[command(about = "Weighted lucky-draw engine with a terminal front end")]
#[command(version)]
struct Args {
    /// Selection surface
    #[arg(short, long, value_enum, default_value = "wheel")]
    mode: ModeArg,

    /// Path to config file (falls back to LIXI_CONFIG, then platform dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with sound muted
    #[arg(long)]
    muted: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lixi_engine=info,lixi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = TomlConfig::load(args.config.as_ref()).context("Failed to load configuration")?;
    let mode: SelectionMode = args.mode.into();

    info!("Starting lucky draw in {} mode", mode);

    let sound = Arc::new(SoundDirector::new(config.audio.clone()));
    let controller = Arc::new(
        SelectionController::new(config, mode, default_set(), sound)
            .context("Failed to create selection controller")?,
    );
    if args.muted {
        controller.set_muted(true).await;
    }
    controller.start().await.context("Failed to arm controller")?;

    // Event printer: the history/confetti/modal collaborators in one place
    let mut events = controller.state().bus().subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                DrawEvent::RoundStarted { mode, .. } => {
                    println!(">> round started ({})", mode);
                }
                DrawEvent::ShuffleStarted { .. } => println!(">> shuffling envelopes..."),
                DrawEvent::BoardReady { .. } => println!(">> pick an envelope (pick <0-7>)"),
                DrawEvent::EnvelopePicked { slot, .. } => {
                    println!(">> envelope {} is opening...", slot);
                }
                DrawEvent::RoundResolved { winner, .. } => {
                    println!("\n   *** {} ***", winner.label);
                    println!("   Chuc mung nam moi! Type 'reset' to claim and play again.\n");
                }
                DrawEvent::RoundReset { .. } => println!(">> ready for a new round"),
                // Frame and cue traffic stays quiet on the terminal
                _ => {}
            }
        }
    });

    print_help(mode);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("spin") => controller.spin_wheel().await?,
            Some("pick") => {
                let slot = parts.next().and_then(|s| s.parse::<usize>().ok());
                match slot {
                    Some(slot) => controller.pick_envelope(slot).await?,
                    None => println!("usage: pick <slot>"),
                }
            }
            Some("reset") => controller.reset().await,
            Some("mute") => controller.set_muted(true).await,
            Some("unmute") => controller.set_muted(false).await,
            Some("history") => {
                let history = controller.state().history().await;
                if history.is_empty() {
                    println!("no wins yet");
                }
                for entry in history {
                    println!("{}  {}", entry.timestamp.format("%H:%M:%S"), entry.label);
                }
            }
            Some("quit") | Some("exit") => break,
            Some(_) => print_help(mode),
            None => {}
        }
    }

    info!("Shutting down");
    Ok(())
}

fn print_help(mode: SelectionMode) {
    match mode {
        SelectionMode::Wheel => {
            println!("commands: spin | reset | history | mute | unmute | quit")
        }
        SelectionMode::Envelopes => {
            println!("commands: pick <slot> | reset | history | mute | unmute | quit")
        }
    }
}
