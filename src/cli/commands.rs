//! CLI commands implementation.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use cep_race::http_client::build_client;
use cep_race::{Config, Racer};

use super::helpers::{normalize_cep, prompt_cep, render};

#[derive(Parser)]
#[command(name = "cep-race")]
#[command(about = "Look up a Brazilian CEP on several services and print the first answer")]
#[command(version)]
pub struct Cli {
    /// CEP to look up (prompted for when omitted)
    cep: Option<String>,

    /// Race timeout in milliseconds (default: 1000)
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// User agent sent to the lookup services
    #[arg(long)]
    user_agent: Option<String>,

    /// Config file (default: discovered cep-race config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings.
    fn apply_to(&self, config: &mut Config) {
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        if let Some(ua) = &self.user_agent {
            config.user_agent = Some(ua.clone());
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path).await?.with_env_overrides(),
        None => Config::load().await?,
    };
    cli.apply_to(&mut config);
    config.validate()?;

    let cep = match &cli.cep {
        Some(raw) => normalize_cep(raw)?,
        None => prompt_cep(io::stdin().lock(), io::stdout())?,
    };

    let client = build_client(config.user_agent.as_deref())?;
    let racer = Racer::new(client, config.endpoints.clone(), config.timeout());
    debug!(
        "Racing {} endpoints with a {}ms timeout",
        racer.endpoints().len(),
        racer.timeout().as_millis()
    );
    let result = racer.race(&cep).await;

    println!("{}", render(&result, cli.json)?);
    Ok(())
}
