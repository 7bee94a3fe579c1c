/*
truthguard - main.rs
This binary either runs the mock scoring server or submits one URL to a running server.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use truthguard::client::{AnalysisForm, FormState, HttpDetectionApi};
use truthguard::report;
use truthguard::server::launch_rocket;

#[derive(Parser, Debug)]
#[command(name = "truthguard", about = "TruthGuard mock news credibility scoring")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP scoring server (default)
    Serve {
        /// Seed the score generator for reproducible responses
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Submit a URL to a running server and print the analysis
    Check {
        url: String,

        /// Server root, e.g. http://127.0.0.1:8000
        #[arg(long)]
        endpoint: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = load_config(args.config).await?;

    match args.command.unwrap_or(Command::Serve { seed: None }) {
        Command::Serve { seed } => serve(config, seed).await,
        Command::Check { url, endpoint, timeout } => check(&config, url, endpoint, timeout).await,
    }
}

/// Resolve config paths: `config.default.toml` layered under `--config` or `./config.toml`.
async fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = explicit {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let config = match Config::load_with_defaults(
        if default_path.exists() { Some(default_path.as_path()) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, override = ?override_path, "configuration loaded");
    Ok(config)
}

async fn serve(mut config: Config, seed: Option<u64>) -> Result<()> {
    if seed.is_some() {
        config.simulation.seed = seed;
    }

    info!("Launching Rocket HTTP server");
    if let Err(e) = launch_rocket(Arc::new(config)).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}

async fn check(
    config: &Config,
    url: String,
    endpoint: Option<String>,
    timeout: Option<u64>,
) -> Result<()> {
    let endpoint = endpoint.unwrap_or_else(|| config.client.endpoint.clone());
    let timeout = timeout.unwrap_or(config.client.timeout_seconds);

    let api = HttpDetectionApi::new(&endpoint, timeout)
        .with_context(|| format!("failed to prepare client for {}", endpoint))?;
    let endpoint = api.endpoint().to_string();

    let mut form = AnalysisForm::new(api);
    form.set_url(url);
    info!(%endpoint, url = %form.url(), "analyzing article");

    let outcome = form.submit().await.clone();
    match outcome {
        FormState::Displaying(result) => {
            println!("{}", report::render(&result));
            Ok(())
        }
        FormState::Failed(message) => anyhow::bail!("{}", message),
        FormState::Idle | FormState::Submitting => {
            let message = form.url_error().unwrap_or("URL was not submitted").to_string();
            anyhow::bail!("{}", message)
        }
    }
}
