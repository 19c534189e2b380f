// ============================================================================
// Quote Source Interface
// Boundary to an external reference-price feed
// ============================================================================

use crate::domain::Price;
use rust_decimal::Decimal;

/// Supplies a reference price for pricing new orders.
///
/// `None` means no usable price right now. The engine never depends on a
/// quote being available; callers decide whether to skip or fall back.
pub trait QuoteSource: Send + Sync {
    fn reference_price(&self) -> Option<Price>;
}

/// Constant quote, for tests and stale/default fallbacks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedQuote(pub Price);

impl QuoteSource for FixedQuote {
    fn reference_price(&self) -> Option<Price> {
        (self.0 > Decimal::ZERO).then_some(self.0)
    }
}

#[cfg(feature = "serde")]
pub use json::{parse_close_price, PayloadQuoteSource, QuoteError};

#[cfg(feature = "serde")]
mod json {
    use super::QuoteSource;
    use crate::domain::Price;
    use rust_decimal::Decimal;
    use serde_json::Value;
    use std::fmt;
    use std::str::FromStr;

    const CLOSE_FIELD: &str = "Close";

    /// Why a quote payload produced no price
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum QuoteError {
        /// Payload is not valid JSON
        Malformed(String),
        /// No usable `Close` field anywhere in the document
        MissingField,
        /// Price parsed but is zero or negative
        NonPositive,
    }

    impl fmt::Display for QuoteError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                QuoteError::Malformed(reason) => write!(f, "malformed quote payload: {}", reason),
                QuoteError::MissingField => write!(f, "quote payload has no {} price", CLOSE_FIELD),
                QuoteError::NonPositive => write!(f, "quote price is not positive"),
            }
        }
    }

    impl std::error::Error for QuoteError {}

    /// Extract the first `Close` price found in a JSON quote payload.
    ///
    /// The field may sit at any depth and may be a JSON number or a numeric
    /// string. A `Close` on an object wins over anything nested beneath it.
    pub fn parse_close_price(payload: &str) -> Result<Price, QuoteError> {
        let document: Value =
            serde_json::from_str(payload).map_err(|e| QuoteError::Malformed(e.to_string()))?;

        let price = find_close(&document).ok_or(QuoteError::MissingField)?;

        if price <= Decimal::ZERO {
            return Err(QuoteError::NonPositive);
        }
        Ok(price)
    }

    fn find_close(value: &Value) -> Option<Price> {
        match value {
            Value::Object(map) => {
                if let Some(price) = map.get(CLOSE_FIELD).and_then(to_decimal) {
                    return Some(price);
                }
                map.values().find_map(find_close)
            },
            Value::Array(items) => items.iter().find_map(find_close),
            _ => None,
        }
    }

    fn to_decimal(value: &Value) -> Option<Decimal> {
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            _ => return None,
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }

    /// Quote source backed by a payload fetcher.
    ///
    /// Fetch and parse failures are logged and reported as `None`; nothing is
    /// retried here.
    pub struct PayloadQuoteSource<F> {
        fetch: F,
    }

    impl<F> PayloadQuoteSource<F>
    where
        F: Fn() -> Result<String, String> + Send + Sync,
    {
        pub fn new(fetch: F) -> Self {
            Self { fetch }
        }
    }

    impl<F> QuoteSource for PayloadQuoteSource<F>
    where
        F: Fn() -> Result<String, String> + Send + Sync,
    {
        fn reference_price(&self) -> Option<Price> {
            let payload = match (self.fetch)() {
                Ok(payload) => payload,
                Err(reason) => {
                    tracing::error!("Quote fetch failed: {}", reason);
                    return None;
                },
            };

            match parse_close_price(&payload) {
                Ok(price) => {
                    tracing::debug!("Reference price updated: {}", price);
                    Some(price)
                },
                Err(e) => {
                    tracing::error!("Quote payload rejected: {}", e);
                    None
                },
            }
        }
    }
}
