use crate::config::ApiConfig;
use chrono::{DateTime, TimeZone, Utc};
use ndarray::Array1;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

/// Trailing window sent as `start`/`end` query parameters. The listing
/// endpoint returns a live snapshot regardless of these; nothing downstream
/// assumes historical coverage.
pub const LOOKBACK_DAYS: i64 = 180;

/// Errors that can occur while acquiring market data
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned HTTP {status}")]
    Status { status: StatusCode },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("API returned an empty asset list")]
    EmptyData,
}

impl MarketDataError {
    /// The handled acquisition-failure class: the caller shows the
    /// "Data not as expected." message instead of propagating.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::EmptyData)
    }
}

/// One market snapshot as three index-aligned sequences. Asset names carry
/// no uniqueness guarantee, so all downstream lookups go through indices.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub names: Vec<String>,
    pub prices: Array1<f64>,
    pub change_percents: Array1<f64>,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The most recent price in listing order, used as the training target.
    pub fn latest_price(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }
}

#[derive(Debug, Deserialize)]
struct AssetsResponse {
    data: Vec<AssetRecord>,
    timestamp: Option<i64>,
}

/// The numeric fields arrive string-encoded.
#[derive(Debug, Deserialize)]
struct AssetRecord {
    name: String,
    #[serde(rename = "priceUsd")]
    price_usd: String,
    #[serde(rename = "changePercent24Hr")]
    change_percent_24_hr: String,
}

/// CoinCap asset-listing client
#[derive(Debug, Clone)]
pub struct CoinCapClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CoinCapClient {
    pub fn new(config: &ApiConfig) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.key.clone(),
        })
    }

    /// Fetches the asset listing for the given window and extracts name,
    /// USD price and 24h change into index-aligned sequences.
    ///
    /// Any non-200 status maps to `MarketDataError::Status` with a single
    /// diagnostic log line; there is no retry and no partial result.
    pub async fn fetch_assets(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MarketSnapshot, MarketDataError> {
        let url = format!("{}/assets", self.base_url);

        debug!("Fetching asset listing: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-CoinCap-API-Key", self.api_key.as_str())
            .query(&[
                ("start", start.to_rfc3339()),
                ("end", end.to_rfc3339()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("Could not retrieve data from the API (HTTP {})", status);
            return Err(MarketDataError::Status { status });
        }

        let body = response.text().await?;
        let parsed: AssetsResponse =
            serde_json::from_str(&body).map_err(|e| MarketDataError::Parse(e.to_string()))?;

        let snapshot = snapshot_from_response(parsed)?;
        info!("Fetched {} assets", snapshot.len());

        Ok(snapshot)
    }
}

fn snapshot_from_response(response: AssetsResponse) -> Result<MarketSnapshot, MarketDataError> {
    if response.data.is_empty() {
        return Err(MarketDataError::EmptyData);
    }

    let fetched_at = response
        .timestamp
        .and_then(|ts| Utc.timestamp_millis_opt(ts).single())
        .unwrap_or_else(Utc::now);

    let mut names = Vec::with_capacity(response.data.len());
    let mut prices = Vec::with_capacity(response.data.len());
    let mut change_percents = Vec::with_capacity(response.data.len());

    for asset in response.data {
        let price: f64 = asset.price_usd.parse().map_err(|_| {
            MarketDataError::Parse(format!(
                "invalid priceUsd for {}: {:?}",
                asset.name, asset.price_usd
            ))
        })?;
        let change: f64 = asset.change_percent_24_hr.parse().map_err(|_| {
            MarketDataError::Parse(format!(
                "invalid changePercent24Hr for {}: {:?}",
                asset.name, asset.change_percent_24_hr
            ))
        })?;

        names.push(asset.name);
        prices.push(price);
        change_percents.push(change);
    }

    Ok(MarketSnapshot {
        names,
        prices: Array1::from(prices),
        change_percents: Array1::from(change_percents),
        fetched_at,
    })
}
