use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current and prior quote for one instrument. Any field may be missing
/// when the upstream fetch failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InstrumentQuote {
    pub current: Option<Decimal>,
    pub previous: Option<Decimal>,
    pub variation_percent: Option<Decimal>,
}

impl InstrumentQuote {
    /// Build a quote and derive its variation from the two values.
    pub fn from_values(current: Option<Decimal>, previous: Option<Decimal>) -> Self {
        let variation_percent = match (current, previous) {
            (Some(c), Some(p)) => variation_percent(c, p),
            _ => None,
        };
        Self {
            current,
            previous,
            variation_percent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.previous.is_none() && self.variation_percent.is_none()
    }
}

/// Percentage change from `previous` to `current`, rounded to 4 decimal places.
/// `None` when `previous` is zero or the result does not fit a `Decimal`.
pub fn variation_percent(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    let change = current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(change.round_dp(4))
}

/// Market snapshot attached to a run as enrichment for the agents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketContext {
    /// Date the snapshot was taken, `dd/mm/YYYY`.
    pub current_date: Option<String>,
    /// USD priced in BRL.
    pub dollar: InstrumentQuote,
    /// BTC priced in USD.
    pub bitcoin: InstrumentQuote,
}

impl MarketContext {
    /// True when no quote data made it into the snapshot.
    pub fn is_empty(&self) -> bool {
        self.dollar.is_empty() && self.bitcoin.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn variation_up_and_down() {
        assert_eq!(variation_percent(dec!(5.50), dec!(5.00)), Some(dec!(10)));
        assert_eq!(variation_percent(dec!(90000), dec!(100000)), Some(dec!(-10)));
    }

    #[test]
    fn variation_with_zero_previous() {
        assert_eq!(variation_percent(dec!(1), Decimal::ZERO), None);
    }

    #[test]
    fn variation_overflow_is_none() {
        let huge = dec!(7900000000000000000000000000);
        assert_eq!(variation_percent(huge, dec!(1)), None);

        let quote = InstrumentQuote::from_values(Some(huge), Some(dec!(1)));
        assert!(quote.variation_percent.is_none());
        assert!(!quote.is_empty());
    }

    #[test]
    fn quote_without_previous_has_no_variation() {
        let quote = InstrumentQuote::from_values(Some(dec!(5.12)), None);
        assert_eq!(quote.current, Some(dec!(5.12)));
        assert!(quote.variation_percent.is_none());
        assert!(!quote.is_empty());
    }

    #[test]
    fn all_null_context_deserializes() {
        let json = r#"{
            "current_date": null,
            "dollar": {"current": null, "previous": null, "variation_percent": null},
            "bitcoin": {"current": null, "previous": null, "variation_percent": null}
        }"#;
        let ctx: MarketContext = serde_json::from_str(json).unwrap();
        assert!(ctx.is_empty());
        assert_eq!(ctx, MarketContext::default());
    }

    #[test]
    fn decimals_serialize_as_strings() {
        let quote = InstrumentQuote::from_values(Some(dec!(5.25)), Some(dec!(5.00)));
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["current"], "5.25");
        let variation: Decimal = json["variation_percent"].as_str().unwrap().parse().unwrap();
        assert_eq!(variation, dec!(5));
    }
}
