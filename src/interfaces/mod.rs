// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod event_handler;
mod quote_source;

pub use event_handler::{EngineEvent, EventHandler, LoggingEventHandler, NoOpEventHandler};
pub use quote_source::{FixedQuote, QuoteSource};

#[cfg(feature = "serde")]
pub use quote_source::{parse_close_price, PayloadQuoteSource, QuoteError};
