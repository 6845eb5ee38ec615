use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weather_core::{Config, WeatherError, WeatherService, build_http_client, config::API_KEY_ENV};

use crate::{api::AppState, web};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather and air quality relay")]
pub struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the weather API and static assets.
    Serve(ServeArgs),

    /// Store an OpenWeather API key in the config file.
    Configure {
        /// Config file to write; defaults to the platform config directory.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Directory served for every path outside `/api`.
    #[arg(long, default_value = "public")]
    pub static_dir: PathBuf,

    /// Config file to read; defaults to the platform config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve(args) => serve(args).await,
            Command::Configure { config } => configure(config),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?.with_process_env();
    let http = build_http_client(&config).context("Failed to build HTTP client")?;

    let service = match WeatherService::from_config(&config, http) {
        Ok(service) => Some(Arc::new(service)),
        Err(WeatherError::MissingCredential) => {
            tracing::warn!(
                "no OpenWeather key configured; set {API_KEY_ENV} or run `weather-server configure`"
            );
            None
        }
        Err(err) => return Err(err.into()),
    };

    web::run(args.port, &args.static_dir, AppState::new(service)).await
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = load_config(path.as_ref())?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Saved OpenWeather key to {}", saved_to.display());
    Ok(())
}
