//! The end-to-end run: fetch, rank, project. Invoked once at startup and
//! again by the dashboard's refresh key.

use crate::config::AppConfig;
use crate::market::{CoinCapClient, LOOKBACK_DAYS, MarketSnapshot};
use crate::projection::{Projection, project_earnings};
use crate::ranking::top_movers;
use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{debug, info};

pub struct PipelineOutput {
    pub snapshot: MarketSnapshot,
    pub projections: Vec<Projection>,
}

pub async fn run(config: &AppConfig) -> Result<PipelineOutput> {
    // Step 1: Fetch Snapshot
    println!("\n--- Step 1: Fetching Asset Snapshot ---");
    let end = Utc::now();
    let start = end - Duration::days(LOOKBACK_DAYS);

    let client = CoinCapClient::new(&config.api)?;
    let snapshot = client.fetch_assets(start, end).await?;

    // Step 2: Rank Movers
    println!("\n--- Step 2: Ranking 24h Movers ---");
    let top = top_movers(snapshot.change_percents.view(), config.top_n);
    info!("Selected {} of {} assets", top.len(), snapshot.len());

    // Step 3: Fit & Project
    println!("\n--- Step 3: Projecting Earnings ---");
    let projections = project_earnings(&snapshot, &top)?;
    for projection in &projections {
        debug!(
            "{}: predicted price {:.4}, implied change {:.4}%",
            projection.name, projection.predicted_price, projection.percent_change
        );
    }

    Ok(PipelineOutput {
        snapshot,
        projections,
    })
}
