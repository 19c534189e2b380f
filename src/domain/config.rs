// ============================================================================
// Engine Configuration
// Cost, view and settlement parameters for a single-instrument engine
// ============================================================================

use rust_decimal::Decimal;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default settlement cost per unit traded
pub const DEFAULT_COST_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Default number of price levels per side in the top-of-book view
pub const DEFAULT_DEPTH: usize = 5;

/// Default pre-match settlement delay: a quarter of a 12 second block
pub const DEFAULT_SETTLEMENT_DELAY: Duration = Duration::from_millis(12_000 / 4);

/// Complete configuration for creating an execution engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// The trading instrument (e.g., "BTC-USD")
    pub instrument: String,

    /// Cost charged per unit of filled quantity
    pub cost_rate: Decimal,

    /// Number of price levels per side in snapshots
    pub depth: usize,

    /// Wait applied by the settlement scheduler before an order is matched.
    /// The matching core itself never sleeps.
    pub settlement_delay: Duration,
}

impl EngineConfig {
    /// Create a new configuration with default parameters
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            cost_rate: DEFAULT_COST_RATE,
            depth: DEFAULT_DEPTH,
            settlement_delay: DEFAULT_SETTLEMENT_DELAY,
        }
    }

    /// Builder method: Set the per-unit cost rate
    pub fn with_cost_rate(mut self, cost_rate: Decimal) -> Self {
        self.cost_rate = cost_rate;
        self
    }

    /// Builder method: Set the top-of-book depth
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Builder method: Set the settlement delay
    pub fn with_settlement_delay(mut self, delay: Duration) -> Self {
        self.settlement_delay = delay;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.instrument.is_empty() {
            return Err("Instrument cannot be empty".to_string());
        }

        if self.cost_rate < Decimal::ZERO {
            return Err("Cost rate cannot be negative".to_string());
        }

        if self.depth == 0 {
            return Err("Depth must be at least one level".to_string());
        }

        Ok(())
    }

    /// Configuration without a settlement wait, for synchronous callers
    pub fn instant(instrument: impl Into<String>) -> Self {
        Self::new(instrument).with_settlement_delay(Duration::ZERO)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new("BTC-USD")
    }
}
