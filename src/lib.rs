// ============================================================================
// Execution Engine Library
// Single-instrument limit order matching with cost accounting
// ============================================================================

//! # Execution Engine
//!
//! A limit order matching engine for one instrument.
//!
//! ## Features
//!
//! - **Aggregated price levels**: resting liquidity is kept as a total per price
//! - **Price priority matching** with partial fills and resting remainders
//! - **Cost accounting**: per-fill settlement cost and signed slippage
//! - **Execution log** with running volume, cost and slippage totals
//! - **Serialized access** through a lock ([`SharedEngine`](engine::SharedEngine))
//!   or a single writer thread ([`EngineActor`](engine::EngineActor))
//!
//! ## Example
//!
//! ```rust
//! use execution_engine::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let mut engine = MatchingEngineBuilder::new("BTC-USD")
//!     .with_cost_rate(Decimal::new(1, 3))
//!     .build()
//!     .unwrap();
//!
//! engine.add_liquidity(Decimal::from(50000), 10, Side::Sell).unwrap();
//! engine.add_liquidity(Decimal::from(50010), 15, Side::Sell).unwrap();
//!
//! let execution = engine.submit(&Order::buy(Decimal::from(50015), 30)).unwrap();
//! assert_eq!(execution.fills.len(), 2);
//! assert_eq!(execution.rested, 5);
//!
//! println!("Best bid: {:?}", engine.best_bid());
//! println!("Spread: {:?}", engine.spread());
//! println!("Stats: {:?}", engine.stats());
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod interfaces;

#[cfg(feature = "logging")]
pub mod logging;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        EngineConfig, Fill, Order, OrderBook, OrderBookSnapshot, OrderId, OrderOutcome, Price,
        Quantity, Side, Volume,
    };
    pub use crate::engine::{
        create_from_config, CostModel, EngineActor, Execution, ExecutionLog, ExecutionStats,
        MatchingEngine, MatchingEngineBuilder, SharedEngine,
    };
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::interfaces::{
        EngineEvent, EventHandler, FixedQuote, LoggingEventHandler, NoOpEventHandler, QuoteSource,
    };

    #[cfg(feature = "async")]
    pub use crate::engine::{PendingSubmission, SettlementScheduler};
}
