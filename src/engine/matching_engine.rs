// ============================================================================
// Matching Engine
// Core business logic for order matching
// ============================================================================

use crate::domain::{
    EngineConfig, Fill, Order, OrderBook, OrderBookSnapshot, OrderId, OrderOutcome, Price,
    Quantity, Side,
};
use crate::engine::{CostModel, ExecutionLog, ExecutionStats};
use crate::error::{EngineError, EngineResult};
use crate::interfaces::{EngineEvent, EventHandler, NoOpEventHandler};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Result of one submission
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub order_id: OrderId,
    /// Fills in price-priority order
    pub fills: Vec<Fill>,
    /// Quantity added to the book on the order's own side
    pub rested: Quantity,
    pub outcome: OrderOutcome,
}

impl Execution {
    pub fn filled_quantity(&self) -> Quantity {
        self.fills.iter().map(|fill| fill.quantity).sum()
    }
}

/// Single-instrument matching engine over an aggregated book.
///
/// All mutation goes through `&mut self`, so one submission always runs to
/// completion before the next can touch the book. Wrap it in
/// [`SharedEngine`](crate::engine::SharedEngine) or
/// [`EngineActor`](crate::engine::EngineActor) for concurrent callers.
pub struct MatchingEngine {
    book: OrderBook,
    cost_model: CostModel,
    log: ExecutionLog,
    /// Default number of levels per side in snapshots
    depth: usize,
    event_handler: Arc<dyn EventHandler>,
}

impl MatchingEngine {
    /// Create a new matching engine.
    ///
    /// The configuration is taken as given; use
    /// [`MatchingEngineBuilder`](crate::engine::MatchingEngineBuilder) to
    /// validate it first.
    pub fn new(config: &EngineConfig, event_handler: Arc<dyn EventHandler>) -> Self {
        Self {
            book: OrderBook::new(config.instrument.clone()),
            cost_model: CostModel::new(config.cost_rate),
            log: ExecutionLog::new(),
            depth: config.depth.max(1),
            event_handler,
        }
    }

    /// Submit an order to the matching engine.
    ///
    /// Invalid orders are rejected before the book is touched. Otherwise the
    /// order walks the opposite side best price first, and whatever is left
    /// rests at its limit price.
    pub fn submit(&mut self, order: &Order) -> EngineResult<Execution> {
        let mut events = vec![EngineEvent::OrderReceived {
            order_id: order.id,
            timestamp: Utc::now(),
        }];

        let checked = order
            .validate()
            .and_then(|()| self.check_rest_capacity(order));
        if let Err(reason) = checked {
            tracing::warn!("Rejected order {}: {}", order.id, reason);
            events.push(EngineEvent::OrderRejected {
                order_id: order.id,
                reason: reason.clone(),
                timestamp: Utc::now(),
            });
            self.event_handler.on_events(events);
            return Err(EngineError::InvalidOrder {
                order_id: order.id,
                reason,
            });
        }

        let (fills, remaining) = self.match_order(order);

        for fill in &fills {
            tracing::debug!(
                "Fill for order {}: {} @ {} (cost {}, slippage {})",
                fill.order_id,
                fill.quantity,
                fill.price,
                fill.cost,
                fill.slippage
            );
            events.push(EngineEvent::OrderMatched {
                fill: fill.clone(),
                timestamp: Utc::now(),
            });
        }

        if remaining > 0 {
            // Cannot cross: matching stopped at the first unacceptable level
            self.book
                .add_liquidity(order.price, remaining, order.side)
                .map_err(|reason| EngineError::InvalidOrder {
                    order_id: order.id,
                    reason,
                })?;
            tracing::debug!(
                "Order {} rests {} @ {} on {} side",
                order.id,
                remaining,
                order.price,
                order.side
            );
            events.push(EngineEvent::OrderRested {
                order_id: order.id,
                side: order.side,
                price: order.price,
                quantity: remaining,
                timestamp: Utc::now(),
            });
        }

        let filled = order.quantity - remaining;
        let outcome = OrderOutcome::from_quantities(filled, remaining);
        tracing::info!(
            "Order {} ({} {} @ {}) completed: {:?}, filled {}, rested {}",
            order.id,
            order.side,
            order.quantity,
            order.price,
            outcome,
            filled,
            remaining
        );
        events.push(EngineEvent::OrderCompleted {
            order_id: order.id,
            outcome,
            timestamp: Utc::now(),
        });

        self.log.record(fills.iter().cloned());
        self.event_handler.on_events(events);

        Ok(Execution {
            order_id: order.id,
            fills,
            rested: remaining,
            outcome,
        })
    }

    /// Add resting liquidity directly to the book (market makers).
    ///
    /// Liquidity priced through the opposite side is rejected rather than
    /// matched; submit an order to trade against the book.
    pub fn add_liquidity(
        &mut self,
        price: Price,
        quantity: Quantity,
        side: Side,
    ) -> EngineResult<()> {
        if quantity == 0 {
            return Err(Self::reject_liquidity("Quantity must be positive"));
        }
        if price <= Decimal::ZERO {
            return Err(Self::reject_liquidity("Price must be positive"));
        }

        self.book
            .add_liquidity(price, quantity, side)
            .map_err(|reason| Self::reject_liquidity(&reason))?;
        self.event_handler.on_event(EngineEvent::LiquidityAdded {
            side,
            price,
            quantity,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Withdraw quantity from a price level.
    ///
    /// Returns what remains at the level; a level reduced to zero is gone.
    /// Removing from a price with no level is a silent no-op.
    pub fn remove_quantity(&mut self, price: Price, quantity: Quantity, side: Side) -> Quantity {
        if self.book.level_quantity(side, price).is_none() {
            tracing::debug!("No {} level at {} to remove from", side, price);
            return 0;
        }

        let remaining = self.book.remove_quantity(price, quantity, side);
        self.event_handler.on_event(EngineEvent::LiquidityRemoved {
            side,
            price,
            quantity,
            remaining,
            timestamp: Utc::now(),
        });
        remaining
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.book.best_bid()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.book.best_ask()
    }

    pub fn spread(&self) -> Option<Decimal> {
        self.book.spread()
    }

    pub fn mid_price(&self) -> Option<Price> {
        self.book.mid_price()
    }

    /// Top-of-book view at the configured depth
    pub fn snapshot(&self) -> OrderBookSnapshot {
        self.book.snapshot(self.depth)
    }

    pub fn snapshot_with_depth(&self, depth: usize) -> OrderBookSnapshot {
        self.book.snapshot(depth)
    }

    pub fn stats(&self) -> ExecutionStats {
        self.log.stats()
    }

    pub fn execution_log(&self) -> &ExecutionLog {
        &self.log
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    pub fn instrument(&self) -> &str {
        self.book.instrument()
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    /// Walk the opposite side while the order has quantity left and the best
    /// level satisfies its limit. Returns the fills and the unmatched remainder.
    fn match_order(&mut self, order: &Order) -> (Vec<Fill>, Quantity) {
        let mut fills = Vec::new();
        let mut remaining = order.quantity;
        let opposite = self.book.side_mut(order.side.opposite());

        while remaining > 0 {
            let Some((level_price, available)) = opposite.best_level() else {
                break;
            };
            if !order.accepts(level_price) {
                break;
            }

            let fill_qty = remaining.min(available);
            opposite.reduce(level_price, fill_qty);

            // The order's own limit is the reference price for slippage
            fills.push(Fill::new(
                order.id,
                order.side,
                level_price,
                fill_qty,
                self.cost_model.transaction_cost(fill_qty),
                self.cost_model
                    .slippage(order.price, level_price, order.side),
            ));
            remaining -= fill_qty;
        }

        (fills, remaining)
    }

    /// An order only rests onto an existing own-side level when nothing on
    /// the other side accepts its price, so the whole quantity is what would
    /// be added there.
    fn check_rest_capacity(&self, order: &Order) -> Result<(), String> {
        if self.book.side(order.side).can_add(order.price, order.quantity) {
            Ok(())
        } else {
            Err(format!(
                "Resting quantity at {} would overflow the level",
                order.price
            ))
        }
    }

    fn reject_liquidity(reason: &str) -> EngineError {
        tracing::warn!("Rejected liquidity: {}", reason);
        EngineError::InvalidLiquidity {
            reason: reason.to_string(),
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default(), Arc::new(NoOpEventHandler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Book used throughout: asks 50000x10, 50010x15, 50020x20;
    /// bids 49990x12, 49980x18, 49970x25; cost rate 0.001
    fn seeded_engine() -> MatchingEngine {
        let mut engine = MatchingEngine::default();
        let liquidity = [
            (50000, 10, Side::Sell),
            (50010, 15, Side::Sell),
            (50020, 20, Side::Sell),
            (49990, 12, Side::Buy),
            (49980, 18, Side::Buy),
            (49970, 25, Side::Buy),
        ];
        for (price, quantity, side) in liquidity {
            engine
                .add_liquidity(Decimal::from(price), quantity, side)
                .unwrap();
        }
        engine
    }

    #[test]
    fn test_buy_sweeps_levels_and_rests_remainder() {
        let mut engine = seeded_engine();
        let order = Order::buy(Decimal::from(50015), 30);

        let execution = engine.submit(&order).unwrap();

        assert_eq!(execution.fills.len(), 2);
        let first = &execution.fills[0];
        assert_eq!(first.order_id, order.id);
        assert_eq!(first.price, Decimal::from(50000));
        assert_eq!(first.quantity, 10);
        assert_eq!(first.cost, Decimal::new(1, 2));
        assert_eq!(first.slippage, Decimal::from(-15));

        let second = &execution.fills[1];
        assert_eq!(second.price, Decimal::from(50010));
        assert_eq!(second.quantity, 15);
        assert_eq!(second.cost, Decimal::new(15, 3));
        assert_eq!(second.slippage, Decimal::from(-5));

        assert_eq!(execution.rested, 5);
        assert_eq!(execution.outcome, OrderOutcome::PartiallyFilled);
        assert_eq!(engine.best_bid(), Some(Decimal::from(50015)));
        assert_eq!(
            engine.book().level_quantity(Side::Buy, Decimal::from(50015)),
            Some(5)
        );
        assert_eq!(
            engine.book().depth(Side::Sell, 5),
            vec![(Decimal::from(50020), 20)]
        );
    }

    #[test]
    fn test_sell_matches_best_bid_after_partial_rest() {
        let mut engine = seeded_engine();
        engine
            .submit(&Order::buy(Decimal::from(50015), 30))
            .unwrap();

        // The resting 50015 bid is now best and ahead of 49990
        let order = Order::sell(Decimal::from(49985), 5);
        let execution = engine.submit(&order).unwrap();

        assert_eq!(execution.fills.len(), 1);
        assert_eq!(execution.fills[0].price, Decimal::from(50015));
        assert_eq!(execution.fills[0].quantity, 5);
        assert_eq!(execution.fills[0].slippage, Decimal::from(-30));
        assert_eq!(execution.outcome, OrderOutcome::FullyFilled);
        assert_eq!(
            engine.book().level_quantity(Side::Buy, Decimal::from(50015)),
            None
        );
        assert_eq!(engine.best_bid(), Some(Decimal::from(49990)));
    }

    #[test]
    fn test_sell_partially_consumes_level() {
        let mut engine = seeded_engine();
        let order = Order::sell(Decimal::from(49985), 5);

        let execution = engine.submit(&order).unwrap();

        assert_eq!(execution.fills.len(), 1);
        let fill = &execution.fills[0];
        assert_eq!(fill.price, Decimal::from(49990));
        assert_eq!(fill.quantity, 5);
        assert_eq!(fill.cost, Decimal::new(5, 3));
        assert_eq!(fill.slippage, Decimal::from(-5));
        assert_eq!(
            engine.book().level_quantity(Side::Buy, Decimal::from(49990)),
            Some(7)
        );
    }

    #[test]
    fn test_invalid_orders_leave_book_untouched() {
        let mut engine = seeded_engine();
        let before = engine.snapshot();

        for order in [
            Order::buy(Decimal::from(50015), 0),
            Order::buy(Decimal::ZERO, 10),
            Order::sell(Decimal::from(-1), 10),
        ] {
            let result = engine.submit(&order);
            assert!(matches!(
                result,
                Err(EngineError::InvalidOrder { order_id, .. }) if order_id == order.id
            ));
        }

        assert_eq!(engine.snapshot(), before);
        assert!(engine.execution_log().is_empty());
    }

    #[test]
    fn test_non_crossing_order_rests_entirely() {
        let mut engine = seeded_engine();
        let order = Order::buy(Decimal::from(49995), 4);

        let execution = engine.submit(&order).unwrap();

        assert!(execution.fills.is_empty());
        assert_eq!(execution.rested, 4);
        assert_eq!(execution.outcome, OrderOutcome::FullyRested);
        assert_eq!(engine.best_bid(), Some(Decimal::from(49995)));
        assert_eq!(engine.spread(), Some(Decimal::from(5)));
    }

    #[test]
    fn test_order_into_empty_side_rests() {
        let mut engine = MatchingEngine::default();

        let execution = engine
            .submit(&Order::sell(Decimal::from(100), 3))
            .unwrap();

        assert_eq!(execution.outcome, OrderOutcome::FullyRested);
        assert_eq!(engine.best_ask(), Some(Decimal::from(100)));
        assert_eq!(engine.best_bid(), None);
        assert_eq!(engine.spread(), None);
    }

    #[test]
    fn test_exact_level_consumption_erases_level() {
        let mut engine = seeded_engine();

        let execution = engine
            .submit(&Order::buy(Decimal::from(50000), 10))
            .unwrap();

        assert_eq!(execution.outcome, OrderOutcome::FullyFilled);
        assert_eq!(execution.rested, 0);
        assert_eq!(engine.best_ask(), Some(Decimal::from(50010)));
        assert_eq!(engine.best_bid(), Some(Decimal::from(49990)));
    }

    #[test]
    fn test_stats_accumulate_over_submissions() {
        let mut engine = seeded_engine();
        engine
            .submit(&Order::buy(Decimal::from(50015), 30))
            .unwrap();
        engine
            .submit(&Order::sell(Decimal::from(49985), 5))
            .unwrap();

        let stats = engine.stats();
        assert_eq!(stats.fill_count, 3);
        assert_eq!(stats.total_volume, 30);
        assert_eq!(stats.total_cost, Decimal::new(3, 2));
        assert_eq!(stats.total_slippage, Decimal::from(-50));
    }

    #[test]
    fn test_liquidity_validation() {
        let mut engine = MatchingEngine::default();

        assert!(matches!(
            engine.add_liquidity(Decimal::from(100), 0, Side::Buy),
            Err(EngineError::InvalidLiquidity { .. })
        ));
        assert!(matches!(
            engine.add_liquidity(Decimal::ZERO, 10, Side::Sell),
            Err(EngineError::InvalidLiquidity { .. })
        ));
        assert_eq!(engine.book().level_count(Side::Buy), 0);
        assert_eq!(engine.book().level_count(Side::Sell), 0);
    }

    #[test]
    fn test_remove_quantity_to_zero() {
        let mut engine = seeded_engine();

        assert_eq!(engine.remove_quantity(Decimal::from(49990), 12, Side::Buy), 0);
        assert_eq!(engine.best_bid(), Some(Decimal::from(49980)));
        assert_eq!(engine.remove_quantity(Decimal::from(50000), 4, Side::Sell), 6);
        assert_eq!(engine.best_ask(), Some(Decimal::from(50000)));
    }

    #[test]
    fn test_crossing_liquidity_rejected() {
        let mut engine = MatchingEngine::default();
        engine
            .add_liquidity(Decimal::from(100), 5, Side::Buy)
            .unwrap();

        assert!(matches!(
            engine.add_liquidity(Decimal::from(90), 5, Side::Sell),
            Err(EngineError::InvalidLiquidity { .. })
        ));

        let execution = engine.submit(&Order::buy(Decimal::from(50), 1)).unwrap();
        assert_eq!(execution.outcome, OrderOutcome::FullyRested);
        assert_eq!(engine.best_bid(), Some(Decimal::from(100)));
        assert_eq!(engine.best_ask(), None);
        assert!(!engine.book().is_crossed());
    }

    #[test]
    fn test_overflowing_liquidity_rejected() {
        let mut engine = MatchingEngine::default();
        engine
            .add_liquidity(Decimal::from(100), u64::MAX, Side::Sell)
            .unwrap();

        assert!(matches!(
            engine.add_liquidity(Decimal::from(100), 1, Side::Sell),
            Err(EngineError::InvalidLiquidity { .. })
        ));
        assert_eq!(
            engine.book().level_quantity(Side::Sell, Decimal::from(100)),
            Some(u64::MAX)
        );
    }

    #[test]
    fn test_overflowing_rest_rejects_order_before_mutation() {
        let mut engine = MatchingEngine::default();
        engine
            .add_liquidity(Decimal::from(100), u64::MAX, Side::Sell)
            .unwrap();
        engine
            .add_liquidity(Decimal::from(90), 3, Side::Buy)
            .unwrap();
        let before = engine.snapshot();

        let order = Order::sell(Decimal::from(100), 7);
        let result = engine.submit(&order);

        assert!(matches!(
            result,
            Err(EngineError::InvalidOrder { order_id, .. }) if order_id == order.id
        ));
        assert_eq!(engine.snapshot(), before);
        assert!(engine.execution_log().is_empty());

        // A smaller order at another price still rests normally
        let execution = engine.submit(&Order::sell(Decimal::from(101), 7)).unwrap();
        assert_eq!(execution.rested, 7);
        assert_eq!(
            engine.book().level_quantity(Side::Sell, Decimal::from(101)),
            Some(7)
        );
    }

    fn arb_side() -> impl Strategy<Value = Side> {
        prop_oneof![Just(Side::Buy), Just(Side::Sell)]
    }

    proptest! {
        #[test]
        fn prop_fills_plus_rest_conserve_quantity(
            book in prop::collection::vec((90i64..110, 1u64..50, arb_side()), 0..30),
            orders in prop::collection::vec((90i64..110, 1u64..80, arb_side()), 1..30),
        ) {
            let mut engine = MatchingEngine::default();
            for (price, quantity, side) in book {
                let crosses = engine.book().crossing_price(Decimal::from(price), side).is_some();
                let result = engine.add_liquidity(Decimal::from(price), quantity, side);
                prop_assert_eq!(result.is_err(), crosses);
                prop_assert!(!engine.book().is_crossed());
            }

            for (price, quantity, side) in orders {
                let order = Order::new(side, Decimal::from(price), quantity);
                let execution = engine.submit(&order).unwrap();

                prop_assert_eq!(execution.filled_quantity() + execution.rested, quantity);
                prop_assert!(execution.fills.iter().all(|f| f.quantity > 0));
                prop_assert!(execution.fills.iter().all(|f| order.accepts(f.price)));
                prop_assert!(!engine.book().is_crossed());
                for side in [Side::Buy, Side::Sell] {
                    prop_assert!(engine.book().side(side).iter().all(|(_, qty)| qty > 0));
                }
            }
        }

        #[test]
        fn prop_removals_never_leave_empty_levels(
            adds in prop::collection::vec((1i64..20, 1u64..30), 1..20),
            removals in prop::collection::vec((1i64..20, 0u64..60), 0..40),
        ) {
            let mut engine = MatchingEngine::default();
            for (price, quantity) in adds {
                engine.add_liquidity(Decimal::from(price), quantity, Side::Buy).unwrap();
            }
            for (price, quantity) in removals {
                let remaining = engine.remove_quantity(Decimal::from(price), quantity, Side::Buy);
                prop_assert_eq!(
                    engine.book().level_quantity(Side::Buy, Decimal::from(price)),
                    (remaining > 0).then_some(remaining)
                );
            }
            prop_assert!(engine.book().side(Side::Buy).iter().all(|(_, qty)| qty > 0));
        }
    }
}
