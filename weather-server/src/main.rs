//! Binary crate for the `weather-server` relay.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Serving `GET /api/weather` and static assets over HTTP

use clap::Parser;

mod api;
mod cli;
mod logging;
mod web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal; real environment variables still apply.
    dotenvy::dotenv().ok();

    let cmd = cli::Cli::parse();
    logging::init(cmd.json_logs);
    cmd.run().await
}
