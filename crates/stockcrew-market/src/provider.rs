use std::collections::HashMap;
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use stockcrew_models::{InstrumentQuote, MarketConfig, MarketContext};
use tracing::{info, warn};

use crate::client::{QuoteClient, BTC_USD, USD_BRL};
use crate::error::MarketError;
use crate::memory::SnapshotCache;

/// Width of the window searched for the "previous" quote.
const HISTORY_WINDOW_DAYS: u64 = 7;

/// Builds the market context attached to a run.
///
/// [`fetch`](Self::fetch) never fails: every fetch or parse error is logged
/// and leaves the affected fields empty.
pub struct MarketContextProvider {
    client: QuoteClient,
    cache: SnapshotCache,
    history_days: u32,
}

impl MarketContextProvider {
    pub fn new(client: QuoteClient, cache_ttl: Duration, history_days: u32) -> Self {
        Self {
            client,
            cache: SnapshotCache::new(cache_ttl),
            history_days,
        }
    }

    pub fn from_config(config: &MarketConfig) -> Result<Self, MarketError> {
        let client = QuoteClient::new(
            config.base_url.as_str(),
            Duration::from_secs(config.request_timeout_seconds),
        )?;
        Ok(Self::new(
            client,
            Duration::from_secs(config.cache_ttl_seconds),
            config.history_days,
        ))
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub async fn fetch(&self) -> MarketContext {
        let today = Local::now().date_naive();
        let cached = self
            .cache
            .get_or_fetch(async {
                let snapshot = self.fetch_snapshot(today).await;
                if snapshot.is_empty() {
                    warn!("No quotes available; continuing without market context");
                    None
                } else {
                    info!(
                        dollar = ?snapshot.dollar.current,
                        bitcoin = ?snapshot.bitcoin.current,
                        "Market context fetched"
                    );
                    Some(snapshot)
                }
            })
            .await;

        cached.unwrap_or_else(|| MarketContext {
            current_date: Some(format_date(today)),
            ..MarketContext::default()
        })
    }

    async fn fetch_snapshot(&self, today: NaiveDate) -> MarketContext {
        let latest = match self.client.latest_bids(&[USD_BRL, BTC_USD]).await {
            Ok(bids) => bids,
            Err(e) => {
                warn!(error = %e, "Latest quote fetch failed");
                HashMap::new()
            }
        };

        let (start, end) = previous_window(today, self.history_days);
        let previous_dollar = self.previous_bid(USD_BRL, start, end).await;
        let previous_bitcoin = self.previous_bid(BTC_USD, start, end).await;

        MarketContext {
            current_date: Some(format_date(today)),
            dollar: InstrumentQuote::from_values(latest.get(USD_BRL).copied(), previous_dollar),
            bitcoin: InstrumentQuote::from_values(latest.get(BTC_USD).copied(), previous_bitcoin),
        }
    }

    async fn previous_bid(&self, pair: &str, start: NaiveDate, end: NaiveDate) -> Option<Decimal> {
        match self.client.bid_between(pair, start, end).await {
            Ok(bid) => bid,
            Err(e) => {
                warn!(pair = %pair, error = %e, "Historical quote fetch failed");
                None
            }
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Window ending `history_days` before `today`.
fn previous_window(today: NaiveDate, history_days: u32) -> (NaiveDate, NaiveDate) {
    let end = today
        .checked_sub_days(Days::new(u64::from(history_days)))
        .unwrap_or(today);
    let start = end
        .checked_sub_days(Days::new(HISTORY_WINDOW_DAYS))
        .unwrap_or(end);
    (start, end)
}
