//! squidmap - squid abundance heatmap viewer for the Visayan Sea.
//!
//! Serves a web page where a user picks a year and month and requests a
//! precomputed abundance heatmap from a remote prediction service; until
//! the first successful prediction the page shows a default map of
//! Northern Iloilo.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

mod cli;
mod client;
mod errors;
mod models;
mod render;
mod server;
mod view;

use cli::{Cli, Command};
use client::{HttpPredictionClient, PredictionClient};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Predict(args) => cmd_predict(args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the `serve` command - start the web UI.
fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    let config = server::ServerConfig {
        port: args.port,
        host: args.host.clone(),
        service_url: args.service_url,
    };

    // Print startup message
    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🦑 Squidmap Web UI\x1b[0m");
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("  Local:   \x1b[96m{}\x1b[0m", url);
    println!("  Service: {}", config.service_url);
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("\x1b[2mPress Ctrl+C to stop\x1b[0m\n");

    // Open browser if requested (using xdg-open/open command)
    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    // Run the async server on tokio runtime
    tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(server::run_server(config))
}

/// Execute the `predict` command - one-shot fetch, markup to stdout.
fn cmd_predict(args: cli::PredictArgs) -> Result<()> {
    let client =
        HttpPredictionClient::new(args.service_url).context("failed to create prediction client")?;

    let markup = tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(client.predict(args.year, args.month))
        .context("failed to fetch heatmap")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{markup}")?;

    Ok(())
}
