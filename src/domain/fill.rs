// ============================================================================
// Fill Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{OrderId, Price, Quantity, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A quantity matched against one resting price level
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fill {
    /// Unique fill identifier
    pub id: Uuid,

    /// Order that generated the fill (the incoming order)
    pub order_id: OrderId,

    /// Side of the incoming order
    pub side: Side,

    /// Execution price: the resting level's price, not the order's limit
    pub price: Price,

    /// Executed quantity
    pub quantity: Quantity,

    /// Settlement cost charged for this fill
    pub cost: Decimal,

    /// Signed deviation from the order's limit price, positive = unfavorable
    pub slippage: Decimal,

    /// Fill timestamp
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    pub fn new(
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        cost: Decimal,
        slippage: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            side,
            price,
            quantity,
            cost,
            slippage,
            timestamp: Utc::now(),
        }
    }

    /// Notional value of the fill (price * quantity)
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
