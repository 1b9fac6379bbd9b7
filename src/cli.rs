//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use clap::{Parser, Subcommand};

use crate::client::DEFAULT_SERVICE_URL;
use crate::models::{Month, Year};

/// Squid abundance heatmap viewer for the Visayan Sea.
#[derive(Parser, Debug)]
#[command(name = "squidmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the heatmap web UI
    Serve(ServeArgs),

    /// Fetch a heatmap once and print its markup to stdout
    Predict(PredictArgs),
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Base URL of the prediction service
    #[arg(long, default_value = DEFAULT_SERVICE_URL)]
    pub service_url: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Arguments for the `predict` command.
#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Year to predict (2023-2025)
    #[arg(long, default_value = "2023", value_parser = parse_year)]
    pub year: Year,

    /// Month to predict (1-12)
    #[arg(long, default_value = "1", value_parser = parse_month)]
    pub month: Month,

    /// Base URL of the prediction service
    #[arg(long, default_value = DEFAULT_SERVICE_URL)]
    pub service_url: String,
}

/// Parse a year from string.
fn parse_year(s: &str) -> Result<Year, String> {
    s.parse()
}

/// Parse a month from string.
fn parse_month(s: &str) -> Result<Month, String> {
    s.parse()
}
