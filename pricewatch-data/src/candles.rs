//! Candle retrieval and normalisation for the chart view.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::DataError;
use crate::types::{Period, Symbol};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One OHLC bucket after normalisation: open time in epoch seconds,
/// prices numeric, series ordered oldest-first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Candle as served by `/api/candles`: OHLC as decimal strings and a
/// wall-clock open time, newest-first.
#[derive(Debug, Clone, Deserialize)]
struct RawCandle {
    open_time: String,
    open: String,
    high: String,
    low: String,
    close: String,
}

#[derive(Debug, Deserialize)]
struct CandleResponse {
    #[serde(default)]
    candles: Vec<RawCandle>,
}

/// HTTP client for the candle query endpoint.
#[derive(Debug, Clone)]
pub struct CandleClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CandleClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch the series for one (symbol, period) selection and normalise
    /// it for charting.
    ///
    /// One request per call; overlapping calls are the caller's business
    /// and are arbitrated by the chart view's generation counter.
    pub async fn fetch(&self, symbol: Symbol, period: Period) -> Result<Vec<Candle>, DataError> {
        let mut url = self
            .base_url
            .join("api/candles")
            .map_err(|e| DataError::Fetch(format!("invalid endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("symbol", symbol.as_str())
            .append_pair("period", period.as_str());

        let response = self.http.get(url).timeout(FETCH_TIMEOUT).send().await?;

        if !response.status().is_success() {
            return Err(DataError::Fetch(format!("http status {}", response.status())));
        }

        let body: CandleResponse = response.json().await?;

        Ok(normalize(body.candles))
    }
}

/// Convert wire candles into chart candles.
///
/// Parses the decimal strings, converts open times to epoch seconds, drops
/// malformed entries, and reorders the newest-first response to
/// oldest-first. Output is strictly increasing by open time: buckets are
/// sorted and duplicate open times collapse to the first occurrence.
fn normalize(raw: Vec<RawCandle>) -> Vec<Candle> {
    let mut candles = Vec::with_capacity(raw.len());
    for entry in raw {
        match parse_candle(&entry) {
            Some(candle) => candles.push(candle),
            None => debug!(?entry, "dropping malformed candle"),
        }
    }
    candles.sort_by_key(|c| c.open_time);
    candles.dedup_by_key(|c| c.open_time);
    candles
}

fn parse_candle(raw: &RawCandle) -> Option<Candle> {
    let open_time = raw.open_time.parse::<DateTime<Utc>>().ok()?.timestamp();
    Some(Candle {
        open_time,
        open: raw.open.parse().ok()?,
        high: raw.high.parse().ok()?,
        low: raw.low.parse().ok()?,
        close: raw.close.parse().ok()?,
    })
}
