//! Strictly Duel - CLI
//!
//! Runs one AI-vs-AI gomoku match and prints it move by move.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, PlayArgs};
use std::path::Path;
use strictly_duel::{Duel, DuelConfig, DuelEvent};
use tokio::sync::mpsc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play(args) => run_play(args).await,
        Command::Config { config } => print_config(config.as_deref()),
    }
}

/// Loads the config file (or defaults) and applies environment overrides.
#[instrument]
fn load_config(path: Option<&Path>) -> Result<DuelConfig> {
    let mut config = match path {
        Some(path) => DuelConfig::from_file(path)?,
        None => DuelConfig::default(),
    };
    config.apply_env_overrides();
    Ok(config)
}

/// Print the effective configuration
fn print_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Play one match
async fn run_play(args: PlayArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply_to(&mut config);
    config.validate()?;

    info!(
        board_size = config.board_size(),
        max_moves = config.max_moves(),
        offline = args.offline,
        "Starting Strictly Duel"
    );
    println!(
        "Gomoku {0}x{0}: {1} (X) vs {2} (O)",
        config.board_size(),
        config.player_x().name(),
        config.player_o().name()
    );

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut duel = Duel::from_config(&config, args.offline)?.with_events(event_tx);
    let handle = tokio::spawn(async move { duel.run().await });

    while let Some(event) = event_rx.recv().await {
        match event {
            DuelEvent::TurnStarted {
                number,
                agent,
                player,
            } => {
                println!("\nMove {number}: {agent} ({player}) is thinking...");
            }
            DuelEvent::MoveMade {
                agent,
                position,
                source,
                board,
                ..
            } => {
                println!("{agent} plays {position} [{source}]");
                println!("{board}");
            }
            DuelEvent::Finished(outcome) => {
                println!("\nGame over: {outcome}");
            }
        }
    }

    let outcome = handle.await?;
    info!(outcome = %outcome, "Strictly Duel finished");
    Ok(())
}
