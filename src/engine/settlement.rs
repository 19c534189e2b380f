// ============================================================================
// Settlement Scheduler
// Cancellable pre-match delay, kept outside the matching core
// ============================================================================

use crate::domain::{Order, OrderId};
use crate::engine::{Execution, SharedEngine};
use crate::error::{EngineError, EngineResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Holds orders for a confirmation delay before they reach the engine.
///
/// The wait runs on a tokio timer. The engine itself stays synchronous and
/// never sleeps.
pub struct SettlementScheduler {
    engine: Arc<SharedEngine>,
    delay: Duration,
}

impl SettlementScheduler {
    pub fn new(engine: Arc<SharedEngine>, delay: Duration) -> Self {
        Self { engine, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start the confirmation wait for an order.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, order: Order) -> PendingSubmission {
        let engine = Arc::clone(&self.engine);
        let delay = self.delay;
        let order_id = order.id;

        tracing::debug!("Order {} waiting {:?} for confirmation", order_id, delay);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // No await points past here: matching is not interruptible
            engine.submit(&order)
        });

        PendingSubmission { order_id, handle }
    }
}

/// An order waiting out its settlement delay
pub struct PendingSubmission {
    order_id: OrderId,
    handle: JoinHandle<EngineResult<Execution>>,
}

impl PendingSubmission {
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Cancel the wait. Has no effect once matching has started.
    pub fn cancel(&self) {
        tracing::debug!("Cancelling settlement of order {}", self.order_id);
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the order to be matched
    pub async fn outcome(self) -> EngineResult<Execution> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(EngineError::SettlementCancelled {
                order_id: self.order_id,
            }),
            Err(e) => {
                tracing::error!("Settlement task for order {} failed: {}", self.order_id, e);
                Err(EngineError::EngineStopped)
            },
        }
    }
}
