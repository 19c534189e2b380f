// ============================================================================
// Event Handler Interface
// Defines the contract for handling order, fill and liquidity events
// ============================================================================

use crate::domain::{Fill, OrderId, OrderOutcome, Price, Quantity, Side};
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the execution engine
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EngineEvent {
    /// Order received by the engine
    OrderReceived {
        order_id: OrderId,
        timestamp: DateTime<Utc>,
    },

    /// Order rejected with reason; the book was not touched
    OrderRejected {
        order_id: OrderId,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Order matched against a resting level
    OrderMatched {
        fill: Fill,
        timestamp: DateTime<Utc>,
    },

    /// Unmatched remainder added to the book as anonymous liquidity
    OrderRested {
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Submission finished
    OrderCompleted {
        order_id: OrderId,
        outcome: OrderOutcome,
        timestamp: DateTime<Utc>,
    },

    /// Liquidity provided directly to the book
    LiquidityAdded {
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Quantity withdrawn from a level
    LiquidityRemoved {
        side: Side,
        price: Price,
        quantity: Quantity,
        remaining: Quantity,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing engine events
/// Implementations can handle logging, metrics, notifications, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an engine event
    fn on_event(&self, event: EngineEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<EngineEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: EngineEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: EngineEvent) {
        tracing::debug!("Execution engine event: {:?}", event);
    }
}
