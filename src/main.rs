use anyhow::Context;
use clap::Parser;
use marketpulse::app::App;
use marketpulse::config::Config;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "marketpulse", version, about = "Market data refresh daemon")]
struct Args {
    /// Path to the TOML config file.
    #[arg(short, long, default_value = "config.toml")]
    config: std::path::PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    if args.check_config {
        println!("configuration OK");
        return Ok(());
    }

    config.init_logging();
    info!("marketpulse starting");

    tokio::select! {
        result = App::run(config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("marketpulse stopped");
    Ok(())
}
