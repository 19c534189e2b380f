// ============================================================================
// Engine Module
// Contains the core matching engine business logic
// ============================================================================

mod actor;
mod cost_model;
mod execution_log;
mod matching_engine;
mod shared;

#[cfg(feature = "async")]
mod settlement;

pub mod factory;

pub use actor::EngineActor;
pub use cost_model::CostModel;
pub use execution_log::{ExecutionLog, ExecutionStats};
pub use factory::{create_from_config, MatchingEngineBuilder};
pub use matching_engine::{Execution, MatchingEngine};
pub use shared::SharedEngine;

#[cfg(feature = "async")]
pub use settlement::{PendingSubmission, SettlementScheduler};
