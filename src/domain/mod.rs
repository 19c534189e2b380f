// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod fill;
pub mod order;
pub mod order_book;

pub use config::EngineConfig;
pub use fill::Fill;
pub use order::{Order, OrderId, OrderOutcome, Side};
pub use order_book::{BookSide, OrderBook, OrderBookSnapshot};

/// Limit and execution prices
pub type Price = rust_decimal::Decimal;

/// Order and level quantities (whole units)
pub type Quantity = u64;

/// Sums of quantities across levels or fills
pub type Volume = u128;
