mod boosting;
mod config;
mod dashboard;
mod market;
mod pipeline;
mod projection;
mod ranking;
mod report;
mod scaler;

use crate::config::AppConfig;
use crate::market::MarketDataError;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load()?;

    match pipeline::run(&config).await {
        Ok(output) => {
            // Step 4: Display Results
            println!("\n--- Step 4: Displaying Results ---");
            report::print_summary(output.snapshot.fetched_at, &output.projections);
            dashboard::run(output, config).await
        }
        Err(err)
            if err
                .downcast_ref::<MarketDataError>()
                .is_some_and(MarketDataError::is_no_data) =>
        {
            println!("\n{}", report::NO_DATA_MESSAGE);
            Ok(())
        }
        Err(err) => Err(err),
    }
}
