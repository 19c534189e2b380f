// ============================================================================
// Order Book Domain Model
// ============================================================================

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::{Price, Quantity, Side, Volume};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Book Side
// ============================================================================

/// One side of the book: aggregate resting quantity keyed by price.
///
/// Individual orders are not retained once they rest, only the total per
/// price. A level whose aggregate drops to zero is erased immediately, so
/// every stored aggregate is strictly positive.
#[derive(Debug, Clone)]
pub struct BookSide {
    /// Ascending by price; bids are read from the back, asks from the front
    levels: BTreeMap<Price, Quantity>,
    side: Side,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            levels: BTreeMap::new(),
            side,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Add quantity to a price level, creating the level if absent.
    ///
    /// Fails without touching the level if the aggregate would overflow.
    pub fn add(&mut self, price: Price, quantity: Quantity) -> Result<(), String> {
        if quantity == 0 {
            return Ok(());
        }
        if !self.can_add(price, quantity) {
            return Err(format!("Aggregate quantity at {} would overflow", price));
        }
        *self.levels.entry(price).or_insert(0) += quantity;
        Ok(())
    }

    /// Whether `quantity` more fits into the level at `price`
    pub fn can_add(&self, price: Price, quantity: Quantity) -> bool {
        self.quantity_at(price)
            .is_none_or(|level| level.checked_add(quantity).is_some())
    }

    /// Remove quantity from a price level.
    ///
    /// The aggregate is clamped at zero and a zeroed level is erased.
    /// Returns what is left at the level afterwards (0 if it no longer exists).
    pub fn reduce(&mut self, price: Price, quantity: Quantity) -> Quantity {
        let Some(level) = self.levels.get_mut(&price) else {
            return 0;
        };

        *level = level.saturating_sub(quantity);
        if *level == 0 {
            self.levels.remove(&price);
            return 0;
        }
        *level
    }

    /// Get the best (top-of-book) price
    pub fn best_price(&self) -> Option<Price> {
        self.best_level().map(|(price, _)| price)
    }

    /// Get the best price level as (price, aggregate quantity)
    pub fn best_level(&self) -> Option<(Price, Quantity)> {
        let entry = match self.side {
            // Highest bid (last in sorted order)
            Side::Buy => self.levels.iter().next_back(),
            // Lowest ask (first in sorted order)
            Side::Sell => self.levels.iter().next(),
        };
        entry.map(|(price, quantity)| (*price, *quantity))
    }

    /// Iterate levels in priority order (best first)
    pub fn iter(&self) -> Box<dyn Iterator<Item = (Price, Quantity)> + '_> {
        let iter = self.levels.iter().map(|(price, qty)| (*price, *qty));
        match self.side {
            Side::Buy => Box::new(iter.rev()),
            Side::Sell => Box::new(iter),
        }
    }

    /// Get depth at N levels, best first
    pub fn depth(&self, num_levels: usize) -> Vec<(Price, Quantity)> {
        self.iter().take(num_levels).collect()
    }

    pub fn quantity_at(&self, price: Price) -> Option<Quantity> {
        self.levels.get(&price).copied()
    }

    pub fn total_quantity(&self) -> Volume {
        self.levels.values().map(|&qty| Volume::from(qty)).sum()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

// ============================================================================
// Order Book
// ============================================================================

/// Aggregated two-sided book for a single instrument
#[derive(Debug, Clone)]
pub struct OrderBook {
    instrument: String,
    bids: BookSide,
    asks: BookSide,
}

impl OrderBook {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Add resting liquidity at a price level.
    ///
    /// Callers are expected to have checked `price > 0` and `quantity > 0`.
    /// Liquidity that would cross the opposite side, or overflow the level,
    /// is refused and the book is left as it was.
    pub fn add_liquidity(
        &mut self,
        price: Price,
        quantity: Quantity,
        side: Side,
    ) -> Result<(), String> {
        if let Some(best) = self.crossing_price(price, side) {
            return Err(format!(
                "{} at {} crosses best {} at {}",
                side,
                price,
                side.opposite(),
                best
            ));
        }
        self.side_mut(side).add(price, quantity)
    }

    /// Best opposite price that `price` on `side` would cross, if any
    pub fn crossing_price(&self, price: Price, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.best_ask().filter(|ask| price >= *ask),
            Side::Sell => self.best_bid().filter(|bid| price <= *bid),
        }
    }

    /// Remove quantity from a price level, erasing the level when it empties.
    /// Returns the aggregate left at that price.
    pub fn remove_quantity(&mut self, price: Price, quantity: Quantity, side: Side) -> Quantity {
        self.side_mut(side).reduce(price, quantity)
    }

    /// Highest resting buy price
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Lowest resting sell price
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Best ask minus best bid, when both sides have liquidity
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        }
    }

    /// Top N price levels on one side, best first
    pub fn depth(&self, side: Side, num_levels: usize) -> Vec<(Price, Quantity)> {
        self.side(side).depth(num_levels)
    }

    pub fn level_quantity(&self, side: Side, price: Price) -> Option<Quantity> {
        self.side(side).quantity_at(price)
    }

    pub fn level_count(&self, side: Side) -> usize {
        self.side(side).level_count()
    }

    pub fn total_quantity(&self, side: Side) -> Volume {
        self.side(side).total_quantity()
    }

    /// Whether the best bid is at or above the best ask
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    /// Bounded top-of-book view
    pub fn snapshot(&self, num_levels: usize) -> OrderBookSnapshot {
        OrderBookSnapshot::with_depth(
            self.instrument.clone(),
            self.bids.depth(num_levels),
            self.asks.depth(num_levels),
        )
    }
}

// ============================================================================
// Order Book Snapshot
// ============================================================================

/// Immutable snapshot of the order book state
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookSnapshot {
    pub instrument: String,
    /// Bid levels (price, quantity), highest first
    pub bids: Vec<(Price, Quantity)>,
    /// Ask levels (price, quantity), lowest first
    pub asks: Vec<(Price, Quantity)>,
    /// Current spread (ask - bid)
    pub spread: Option<Decimal>,
    /// Mid price
    pub mid_price: Option<Price>,
}

impl OrderBookSnapshot {
    pub fn with_depth(
        instrument: String,
        bids: Vec<(Price, Quantity)>,
        asks: Vec<(Price, Quantity)>,
    ) -> Self {
        let (spread, mid_price) = match (bids.first(), asks.first()) {
            (Some((bid, _)), Some((ask, _))) => {
                (Some(ask - bid), Some((bid + ask) / Decimal::from(2)))
            },
            _ => (None, None),
        };

        Self {
            instrument,
            bids,
            asks,
            spread,
            mid_price,
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|(price, _)| *price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|(price, _)| *price)
    }

    pub fn total_bid_quantity(&self) -> Volume {
        self.bids.iter().map(|&(_, qty)| Volume::from(qty)).sum()
    }

    pub fn total_ask_quantity(&self) -> Volume {
        self.asks.iter().map(|&(_, qty)| Volume::from(qty)).sum()
    }
}
