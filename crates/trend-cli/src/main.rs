//! Stock trend CLI
//!
//! # Usage
//!
//! ```bash
//! export ALPHA_VANTAGE_API_KEY="your-key"
//! cargo run --bin stock-trend -- IBM MSFT --horizon 5 --model day-index
//! ```

mod cli;
mod output;

use clap::Parser;
use tracing::info;
use trend_utils::LogConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let mut log_config = LogConfig::from_env();
    if args.log_json {
        log_config = log_config.json();
    }
    trend_utils::init_tracing_with(&log_config);

    let config = args.into_config()?;
    info!(
        symbols = config.symbols.len(),
        horizon_days = config.horizon_days,
        model = %config.model,
        "starting stock-trend"
    );

    let report = match trend_stock::pipeline::run_alpha_vantage(&config).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(hint) = output::failure_hint(&e) {
                eprintln!("Hint: {hint}");
            }
            return Err(e.into());
        }
    };

    println!("{}", output::render(&report));
    Ok(())
}
