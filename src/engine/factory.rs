// ============================================================================
// Engine Factory
// Creates matching engines with validated configuration
// ============================================================================

use crate::domain::EngineConfig;
use crate::engine::{EngineActor, MatchingEngine, SharedEngine};
use crate::error::{EngineError, EngineResult};
use crate::interfaces::{EventHandler, NoOpEventHandler};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Creates a matching engine from configuration
///
/// # Example
/// ```
/// use execution_engine::prelude::*;
/// use std::sync::Arc;
///
/// let config = EngineConfig::instant("BTC-USD");
/// let engine = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(engine.instrument(), "BTC-USD");
/// ```
pub fn create_from_config(
    config: EngineConfig,
    event_handler: Arc<dyn EventHandler>,
) -> EngineResult<MatchingEngine> {
    config.validate().map_err(EngineError::InvalidConfig)?;

    tracing::info!(
        "Creating engine for {} (cost rate {}, depth {})",
        config.instrument,
        config.cost_rate,
        config.depth
    );

    Ok(MatchingEngine::new(&config, event_handler))
}

// ============================================================================
// Builder Pattern
// ============================================================================

/// Builder for creating matching engines with fluent API
///
/// # Example
/// ```
/// use execution_engine::prelude::*;
/// use rust_decimal::Decimal;
/// use std::sync::Arc;
///
/// let engine = MatchingEngineBuilder::new("BTC-USD")
///     .with_cost_rate(Decimal::new(1, 3))
///     .with_depth(10)
///     .with_event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
/// assert_eq!(engine.snapshot().instrument, "BTC-USD");
/// ```
pub struct MatchingEngineBuilder {
    config: EngineConfig,
    event_handler: Arc<dyn EventHandler>,
}

impl MatchingEngineBuilder {
    /// Create a new builder for the specified instrument
    pub fn new(instrument: impl Into<String>) -> Self {
        Self::from_config(EngineConfig::new(instrument))
    }

    /// Start from an existing configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    pub fn with_cost_rate(mut self, cost_rate: Decimal) -> Self {
        self.config.cost_rate = cost_rate;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.config.depth = depth;
        self
    }

    pub fn with_settlement_delay(mut self, delay: Duration) -> Self {
        self.config.settlement_delay = delay;
        self
    }

    pub fn with_event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    /// Get the current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the matching engine
    pub fn build(self) -> EngineResult<MatchingEngine> {
        create_from_config(self.config, self.event_handler)
    }

    /// Build behind a read/write lock for multi-threaded callers
    pub fn build_shared(self) -> EngineResult<SharedEngine> {
        self.build().map(SharedEngine::new)
    }

    /// Build and move onto a dedicated engine thread
    pub fn build_actor(self) -> EngineResult<EngineActor> {
        self.build().and_then(EngineActor::spawn)
    }
}
