mod config;
use config::Settings;
mod error;
mod export;
mod finmath;
mod graphing;
mod inputs;
mod parity;
mod payoff;
mod pricing;
mod session;
use session::run_session;
mod utils;
use anyhow::Context;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let settings = Settings::load().context("\nmain() :: ERROR -> Failed to load settings")?;
    info!(?settings, "main() :: Starting option calculator");
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    let report = run_session(&mut input, &mut out, &settings)
        .context("\nmain() :: ERROR -> Calculator session ended before an option was priced")?;
    info!(attempts = report.attempts, "main() :: Done");
    Ok(())
}
