/// Pricewatch Data - market data client library
///
/// Provides the ingestion and retrieval layer for the price-tracker backend:
/// - Wire and domain types for trades, candles, symbols, and periods
/// - A reconnecting WebSocket client for the live trade stream
/// - A bounded trade buffer with a stable presentation ordering
/// - Aggregate trade statistics derived from buffer snapshots
/// - An HTTP client for the candle query endpoint
pub mod buffer;
pub mod candles;
pub mod connection;
pub mod error;
pub mod summary;
pub mod types;

// Re-export commonly used types for convenience
pub use buffer::{TradeBuffer, TRADE_CAPACITY};
pub use candles::{Candle, CandleClient};
pub use connection::{ConnectionConfig, ConnectionManager};
pub use error::DataError;
pub use summary::TradeSummary;
pub use types::{ConnectionState, Period, Symbol, TradeEvent, TradeMessage};
