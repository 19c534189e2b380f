// ============================================================================
// Order Domain Model
// ============================================================================

use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

use super::{Price, Quantity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an order of this side trades against
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

// ============================================================================
// Order Outcome
// ============================================================================

/// Terminal state of a submission.
///
/// An order lives only for the duration of one `submit` call, so there is no
/// pending/accepted bookkeeping: it either converts into fills, rests, or both.
/// Resting quantity loses its order identity once it joins a price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderOutcome {
    /// Every unit was matched against resting liquidity
    FullyFilled,
    /// Some units matched, the remainder rests in the book
    PartiallyFilled,
    /// Nothing crossed; the whole order rests in the book
    FullyRested,
}

impl OrderOutcome {
    /// Derive the outcome from matched and rested quantities
    pub fn from_quantities(filled: Quantity, rested: Quantity) -> Self {
        match (filled, rested) {
            (_, 0) => OrderOutcome::FullyFilled,
            (0, _) => OrderOutcome::FullyRested,
            _ => OrderOutcome::PartiallyFilled,
        }
    }

    pub fn has_fills(&self) -> bool {
        !matches!(self, OrderOutcome::FullyRested)
    }

    pub fn has_resting_remainder(&self) -> bool {
        !matches!(self, OrderOutcome::FullyFilled)
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// A limit order as submitted. Immutable; the engine tracks the remaining
/// quantity in a local working copy while matching.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    /// Limit price, also the reference price for slippage
    pub price: Price,
    pub quantity: Quantity,
}

impl Order {
    pub fn new(side: Side, price: Price, quantity: Quantity) -> Self {
        Self::with_id(OrderId::new(), side, price, quantity)
    }

    pub fn with_id(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            id,
            side,
            price,
            quantity,
        }
    }

    pub fn buy(price: Price, quantity: Quantity) -> Self {
        Self::new(Side::Buy, price, quantity)
    }

    pub fn sell(price: Price, quantity: Quantity) -> Self {
        Self::new(Side::Sell, price, quantity)
    }

    /// Check the order against the submission rules.
    ///
    /// Returns the reason for rejection, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.quantity == 0 {
            return Err("Quantity must be positive".to_string());
        }

        if self.price <= Decimal::ZERO {
            return Err("Price must be positive".to_string());
        }

        Ok(())
    }

    /// Whether a resting level at `level_price` satisfies this order's limit
    pub fn accepts(&self, level_price: Price) -> bool {
        match self.side {
            Side::Buy => level_price <= self.price,
            Side::Sell => level_price >= self.price,
        }
    }
}
