// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vx: drive a viewer from the command line

mod commands;
mod exit_error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vx_session::{SessionConfig, SyncBackendKind};

use crate::commands::{listen, rpc, set, sync};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "vx", version, about = "Send state to a running viewer and wait for it to catch up")]
struct Cli {
    /// Viewer socket path, or tcp://host:port
    #[arg(long, global = true, env = "VX_SOCKET")]
    socket: Option<String>,

    /// Output format
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t)]
    output: OutputFormat,

    /// Message suppression level: 0 shows everything, 3 shows errors only
    #[arg(long, global = true)]
    level: Option<u8>,

    /// Wait strategy for rendezvous: condvar or polling
    #[arg(long, global = true, value_parser = parse_backend)]
    backend: Option<SyncBackendKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait until the viewer has processed everything sent so far
    Sync,
    /// Set fields on a state object, then synchronize
    Set(set::SetArgs),
    /// Invoke a viewer RPC, then synchronize
    Rpc(rpc::RpcArgs),
    /// Print client methods the viewer invokes until it quits
    Listen(listen::ListenArgs),
}

fn parse_backend(raw: &str) -> Result<SyncBackendKind, String> {
    SyncBackendKind::parse(raw).ok_or_else(|| format!("unknown backend '{}': expected condvar or polling", raw))
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::from_env();
        if let Some(level) = self.level {
            config = config.message_level(level.min(vx_session::MAX_SUPPRESSION_LEVEL));
        }
        if let Some(backend) = self.backend {
            config = config.backend(backend);
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("vx: {}", exit.message);
                }
                exit.exit_code()
            }
            None => {
                eprintln!("vx: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.session_config();
    let session = commands::connect(cli.socket.as_deref(), config)?;
    let format = cli.output;
    let result = match cli.command {
        Commands::Sync => sync::handle(&session, format),
        Commands::Set(args) => set::handle(&session, args, format),
        Commands::Rpc(args) => rpc::handle(&session, args, format),
        Commands::Listen(args) => listen::handle(&session, args, format),
    };
    session.shutdown();
    result
}
