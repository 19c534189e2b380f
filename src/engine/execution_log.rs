// ============================================================================
// Execution Log
// Append-only fill history with running totals
// ============================================================================

use crate::domain::{Fill, OrderId, Volume};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate statistics over every recorded fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutionStats {
    pub fill_count: usize,
    pub total_volume: Volume,
    pub total_cost: Decimal,
    pub total_slippage: Decimal,
}

impl ExecutionStats {
    fn include(&mut self, fill: &Fill) {
        self.fill_count += 1;
        self.total_volume += Volume::from(fill.quantity);
        self.total_cost += fill.cost;
        self.total_slippage += fill.slippage;
    }

    /// Slippage per unit of volume, if anything was filled
    pub fn average_slippage(&self) -> Option<Decimal> {
        if self.total_volume == 0 {
            return None;
        }
        Decimal::from_u128(self.total_volume).map(|volume| self.total_slippage / volume)
    }
}

/// Ordered record of fills in generation order.
///
/// Totals are kept incrementally and always equal the sum over `fills()`.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    fills: Vec<Fill>,
    stats: ExecutionStats,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append fills in argument order
    pub fn record<I>(&mut self, fills: I)
    where
        I: IntoIterator<Item = Fill>,
    {
        for fill in fills {
            self.stats.include(&fill);
            self.fills.push(fill);
        }
    }

    pub fn stats(&self) -> ExecutionStats {
        self.stats
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// Fills generated by one order, in generation order
    pub fn fills_for(&self, order_id: OrderId) -> impl Iterator<Item = &Fill> + '_ {
        self.fills.iter().filter(move |fill| fill.order_id == order_id)
    }

    pub fn len(&self) -> usize {
        self.fills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}
