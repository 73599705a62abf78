use chrono::{DateTime, Local};
use stockcrew_models::MarketContext;
use uuid::Uuid;

use crate::error::PipelineError;

/// Immutable inputs of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    ticker: String,
    market_context: Option<MarketContext>,
    run_id: Uuid,
    started_at: DateTime<Local>,
}

impl RunContext {
    /// Validate a raw ticker and bind it, with optional enrichment, to a new run.
    ///
    /// The ticker is trimmed and upper-cased. Empty values and values with
    /// interior whitespace or control characters are rejected.
    pub fn bind(
        raw_ticker: &str,
        market_context: Option<MarketContext>,
    ) -> Result<Self, PipelineError> {
        let ticker = raw_ticker.trim();
        if ticker.is_empty() {
            return Err(PipelineError::InvalidInput(
                "ticker must not be empty".to_string(),
            ));
        }
        if ticker.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PipelineError::InvalidInput(format!(
                "ticker {ticker:?} contains whitespace or control characters"
            )));
        }

        Ok(Self {
            ticker: ticker.to_uppercase(),
            market_context,
            run_id: Uuid::new_v4(),
            started_at: Local::now(),
        })
    }

    /// Attach enrichment fetched after the ticker was validated.
    pub fn with_market_context(mut self, market_context: MarketContext) -> Self {
        self.market_context = Some(market_context);
        self
    }

    /// Pin the run start time, e.g. to reproduce an artifact name.
    pub fn with_started_at(mut self, started_at: DateTime<Local>) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn market_context(&self) -> Option<&MarketContext> {
        self.market_context.as_ref()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// `dd/mm/YYYY` date of the run, preferring the market snapshot's date.
    pub fn current_date(&self) -> String {
        self.market_context
            .as_ref()
            .and_then(|m| m.current_date.clone())
            .unwrap_or_else(|| self.started_at.format("%d/%m/%Y").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bind_normalizes_ticker() {
        let ctx = RunContext::bind("  wege3 ", None).unwrap();
        assert_eq!(ctx.ticker(), "WEGE3");
        assert!(ctx.market_context().is_none());
    }

    #[test]
    fn bind_rejects_empty_and_blank() {
        for raw in ["", "   ", "\t\n"] {
            let err = RunContext::bind(raw, None).unwrap_err();
            assert!(matches!(err, PipelineError::InvalidInput(_)), "{raw:?}");
        }
    }

    #[test]
    fn bind_rejects_interior_whitespace() {
        let err = RunContext::bind("PETR 4", None).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[test]
    fn market_context_attached_after_bind() {
        let ctx = RunContext::bind("VALE3", None)
            .unwrap()
            .with_market_context(MarketContext::default());
        assert!(ctx.market_context().is_some());
    }

    #[test]
    fn each_bind_gets_a_fresh_run_id() {
        let a = RunContext::bind("PETR4", None).unwrap();
        let b = RunContext::bind("PETR4", None).unwrap();
        assert_ne!(a.run_id(), b.run_id());
    }

    #[test]
    fn current_date_prefers_market_snapshot() {
        let started = Local.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap();
        let ctx = RunContext::bind("PETR4", None)
            .unwrap()
            .with_started_at(started);
        assert_eq!(ctx.current_date(), "15/10/2026");

        let market = MarketContext {
            current_date: Some("14/10/2026".to_string()),
            ..MarketContext::default()
        };
        let ctx = RunContext::bind("PETR4", Some(market))
            .unwrap()
            .with_started_at(started);
        assert_eq!(ctx.current_date(), "14/10/2026");
    }
}
