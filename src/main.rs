//! `strata` binary: serves the users API.
//!
//! ```text
//! strata                         # defaults, 127.0.0.1:8081
//! strata --config strata.toml    # settings from a file
//! strata --bind 0.0.0.0:9000     # override the listen address
//! RUST_LOG=strata=debug strata   # verbose logs
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use strata::{Server, Settings, users};

#[derive(Debug, Parser)]
#[command(name = "strata", version, about = "Serve the strata users API")]
struct Cli {
    /// TOML settings file. Built-in defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address. Takes precedence over the file and STRATA_BIND.
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "strata=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), strata::Error> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .with_env_overrides();
    if let Some(bind) = cli.bind {
        settings.bind = bind;
    }
    settings.validate()?;

    info!(config = ?cli.config, bind = %settings.bind, "settings loaded");
    if settings.maintenance {
        warn!("maintenance mode is on, every request will get 503");
    }

    let app = users::app(&settings);
    for (method, path) in app.router().routes() {
        info!(%method, %path, "route registered");
    }

    Server::bind(&settings.bind)?.serve(app).await
}
