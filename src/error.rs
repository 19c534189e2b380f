// ============================================================================
// Engine Errors
// ============================================================================

use crate::domain::OrderId;
use std::fmt;

/// Errors surfaced by the execution engine.
///
/// None of these are fatal: the book is left untouched by a rejected call
/// and stays usable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Order with non-positive price or zero quantity
    InvalidOrder { order_id: OrderId, reason: String },
    /// Liquidity with non-positive price or zero quantity
    InvalidLiquidity { reason: String },
    /// Configuration failed validation
    InvalidConfig(String),
    /// The engine thread could not be started
    WorkerSpawn(String),
    /// The engine actor has shut down
    EngineStopped,
    /// A delayed submission was cancelled before matching began
    SettlementCancelled { order_id: OrderId },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidOrder { order_id, reason } => {
                write!(f, "invalid order {}: {}", order_id, reason)
            },
            EngineError::InvalidLiquidity { reason } => {
                write!(f, "invalid liquidity: {}", reason)
            },
            EngineError::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
            EngineError::WorkerSpawn(reason) => {
                write!(f, "failed to start engine thread: {}", reason)
            },
            EngineError::EngineStopped => write!(f, "engine is no longer running"),
            EngineError::SettlementCancelled { order_id } => {
                write!(f, "settlement of order {} was cancelled", order_id)
            },
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
