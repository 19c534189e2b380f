// ============================================================================
// Cost Model
// Settlement cost and slippage for a single fill
// ============================================================================

use crate::domain::{Price, Quantity, Side};
use rust_decimal::Decimal;

/// Linear per-unit cost model.
///
/// `transaction_cost` is linear in quantity, so the cost of a fill never
/// depends on how an order was split across levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    cost_rate: Decimal,
}

impl CostModel {
    /// Negative rates are clamped to zero
    pub fn new(cost_rate: Decimal) -> Self {
        Self {
            cost_rate: cost_rate.max(Decimal::ZERO),
        }
    }

    pub fn cost_rate(&self) -> Decimal {
        self.cost_rate
    }

    /// `cost_rate * quantity`
    pub fn transaction_cost(&self, quantity: Quantity) -> Decimal {
        self.cost_rate * Decimal::from(quantity)
    }

    /// Signed slippage of an execution against a reference price.
    ///
    /// Positive is always unfavorable to the order's originator: a buy paid
    /// more than the reference, a sell received less.
    pub fn slippage(&self, reference_price: Price, execution_price: Price, side: Side) -> Decimal {
        match side {
            Side::Buy => execution_price - reference_price,
            Side::Sell => reference_price - execution_price,
        }
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(crate::domain::config::DEFAULT_COST_RATE)
    }
}
