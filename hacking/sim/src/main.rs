//! Hacking Simulator
//!
//! Plays one hacking session headlessly against a scripted mock host and
//! prints the lifecycle events it publishes.
//!
//! # Usage
//!
//! ```bash
//! # Win on the third confirm
//! hacking-sim --solution password --script hit,miss,win
//!
//! # Slow surface, JSON events
//! hacking-sim --ready-after 40 --json
//!
//! # With a config file and verbose logging
//! RUST_LOG=debug hacking-sim --config ./hacking.toml
//! ```
//!
//! # Exit Status
//!
//! - `0`: the session was solved
//! - `1`: the session failed, aborted, or was refused

mod simulator;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use hacking_core::testing::MockHost;
use hacking_core::{load_config, load_config_from_path, GameEvent, SessionParams};

use simulator::{ScriptStep, Simulator};

/// Hacking Simulator - play a rotating-lock session against a scripted host
#[derive(Parser, Debug)]
#[command(name = "hacking-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Solution word (8 characters)
    #[arg(short = 's', long, default_value = "PASSWORD")]
    solution: String,

    /// Mistakes allowed (config default when omitted)
    #[arg(short = 'l', long)]
    lives: Option<i32>,

    /// Lower column speed bound
    #[arg(long)]
    min_speed: Option<i32>,

    /// Upper column speed bound
    #[arg(long)]
    max_speed: Option<i32>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "HACKING_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Readiness poll on which the surface reports loaded
    #[arg(long, value_name = "POLLS", conflicts_with = "never_ready")]
    ready_after: Option<u32>,

    /// Surface never loads (exercises the bootstrap timeout)
    #[arg(long)]
    never_ready: bool,

    /// Confirm answers in order; misses once exhausted
    #[arg(long, value_enum, value_delimiter = ',')]
    script: Vec<ScriptStep>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hacking_sim=info".parse()?)
                .add_directive("hacking_core=info".parse()?),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config_from_path(Some(path.clone())),
        None => load_config(),
    }
    .with_context(|| "Failed to load hacking configuration")?;
    info!(source = %config.source(), "Configuration loaded");

    let host = if args.never_ready {
        MockHost::new().never_ready()
    } else {
        args.ready_after
            .map_or_else(MockHost::new, |polls| MockHost::new().ready_after(polls))
    };

    let params = SessionParams::new(&args.solution)
        .with_lives(args.lives.unwrap_or(config.default_lives))
        .with_speed_range(
            args.min_speed.unwrap_or(config.default_min_speed),
            args.max_speed.unwrap_or(config.default_max_speed),
        );

    let mut sim = Simulator::new(host, config, args.script.clone(), args.tick_ms);
    if let Err(e) = sim.start(params) {
        error!(error = %e, "Session refused");
        return Ok(ExitCode::FAILURE);
    }

    let mut success = false;
    for event in sim.drain() {
        print_event(&event, args.json)?;
    }

    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms.max(1)));
    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    while sim.is_running() {
        tokio::select! {
            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl+C")?;
                info!("Received Ctrl+C, stopping simulation");
                return Ok(ExitCode::FAILURE);
            }
            _ = interval.tick() => {}
        }

        for event in sim.step() {
            print_event(&event, args.json)?;
            if let GameEvent::Result { success: solved, .. } = event {
                success = solved;
            }
        }
    }

    info!(frames = sim.frames(), success, "Simulation finished");
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Write one event to stdout
fn print_event(event: &GameEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    match event {
        GameEvent::Started { session_id, lives } => {
            println!("started  {session_id} lives={lives}");
        }
        GameEvent::Result {
            session_id,
            success,
        } => {
            println!("result   {session_id} success={success}");
        }
        GameEvent::Aborted { session_id, reason } => {
            println!("aborted  {session_id} reason={reason}");
        }
    }
    Ok(())
}
