//! Client for the AwesomeAPI currency quote service.
//!
//! Two endpoints are used:
//! - `/json/last/{pairs}` returns the latest quote per pair, keyed by the
//!   pair without its dash (`USDBRL`)
//! - `/{pair}/1?start_date=YYYYMMDD&end_date=YYYYMMDD` returns the most
//!   recent daily quote inside the window as a one-element array

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::MarketError;

pub const USD_BRL: &str = "USD-BRL";
pub const BTC_USD: &str = "BTC-USD";

#[derive(Debug, Deserialize)]
struct Quote {
    bid: String,
}

pub struct QuoteClient {
    http: Client,
    base_url: String,
}

impl QuoteClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Latest bid for each pair, keyed by pair (`USD-BRL`).
    pub async fn latest_bids(
        &self,
        pairs: &[&str],
    ) -> Result<HashMap<String, Decimal>, MarketError> {
        let url = format!("{}/json/last/{}", self.base_url, pairs.join(","));
        let body = self.get_text(&url).await?;
        parse_latest_bids(&body, pairs)
    }

    /// Most recent bid for `pair` between `start` and `end`, if any.
    pub async fn bid_between(
        &self,
        pair: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Decimal>, MarketError> {
        let url = format!(
            "{}/{pair}/1?start_date={}&end_date={}",
            self.base_url,
            start.format("%Y%m%d"),
            end.format("%Y%m%d")
        );
        let body = self.get_text(&url).await?;
        parse_history_bid(&body)
    }

    async fn get_text(&self, url: &str) -> Result<String, MarketError> {
        debug!(url = %url, "Fetching quotes");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Parse a `/json/last` body. Pairs missing from the body are omitted.
pub fn parse_latest_bids(
    body: &str,
    pairs: &[&str],
) -> Result<HashMap<String, Decimal>, MarketError> {
    let quotes: HashMap<String, Quote> = serde_json::from_str(body)?;
    let mut bids = HashMap::with_capacity(pairs.len());
    for pair in pairs {
        if let Some(quote) = quotes.get(&pair.replace('-', "")) {
            bids.insert(pair.to_string(), parse_bid(&quote.bid)?);
        }
    }
    Ok(bids)
}

/// Parse a daily history body, taking the first (most recent) entry.
pub fn parse_history_bid(body: &str) -> Result<Option<Decimal>, MarketError> {
    let quotes: Vec<Quote> = serde_json::from_str(body)?;
    quotes.first().map(|q| parse_bid(&q.bid)).transpose()
}

fn parse_bid(bid: &str) -> Result<Decimal, MarketError> {
    Decimal::from_str(bid.trim()).map_err(|e| MarketError::Parse(format!("bid {bid:?}: {e}")))
}
