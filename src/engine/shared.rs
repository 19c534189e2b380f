// ============================================================================
// Shared Engine
// Lock-serialized access to one matching engine from many threads
// ============================================================================

use crate::domain::{Order, OrderBookSnapshot, Price, Quantity, Side};
use crate::engine::{Execution, ExecutionStats, MatchingEngine};
use crate::error::EngineResult;
use parking_lot::RwLock;
use rust_decimal::Decimal;

/// Thread-safe handle around a [`MatchingEngine`].
///
/// Mutations hold the write lock for the whole call, so submissions never
/// interleave their book updates. Queries hold the read lock and always see
/// the book between submissions, never mid-match.
pub struct SharedEngine {
    inner: RwLock<MatchingEngine>,
}

impl SharedEngine {
    pub fn new(engine: MatchingEngine) -> Self {
        Self {
            inner: RwLock::new(engine),
        }
    }

    pub fn submit(&self, order: &Order) -> EngineResult<Execution> {
        self.inner.write().submit(order)
    }

    pub fn add_liquidity(&self, price: Price, quantity: Quantity, side: Side) -> EngineResult<()> {
        self.inner.write().add_liquidity(price, quantity, side)
    }

    pub fn remove_quantity(&self, price: Price, quantity: Quantity, side: Side) -> Quantity {
        self.inner.write().remove_quantity(price, quantity, side)
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.inner.read().best_bid()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.inner.read().best_ask()
    }

    pub fn spread(&self) -> Option<Decimal> {
        self.inner.read().spread()
    }

    pub fn snapshot(&self) -> OrderBookSnapshot {
        self.inner.read().snapshot()
    }

    pub fn stats(&self) -> ExecutionStats {
        self.inner.read().stats()
    }

    /// Run a read-only closure against one consistent view of the engine
    pub fn inspect<R>(&self, f: impl FnOnce(&MatchingEngine) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn into_inner(self) -> MatchingEngine {
        self.inner.into_inner()
    }
}

impl From<MatchingEngine> for SharedEngine {
    fn from(engine: MatchingEngine) -> Self {
        Self::new(engine)
    }
}
