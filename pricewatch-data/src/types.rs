/// Core data types for the live trade feed and candle queries
///
/// These types match the JSON formats served by the price-tracker backend
/// (the `/ws/trades` stream and the `/api/candles` endpoint).
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Lifecycle of the streaming connection.
///
/// Exactly one value holds at any instant. `Errored` marks a transport
/// fault; the transport's own close path still decides `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
    Errored,
}

impl ConnectionState {
    /// Status text for the dashboard indicator.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Errored => "Connection Error",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Trade message as broadcast by the backend stream.
///
/// Price and quantity arrive as decimal strings on the wire; `Decimal`'s
/// deserializer also tolerates plain numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeMessage {
    pub symbol: SmolStr,
    pub price: Decimal,
    pub quantity: Decimal,
    pub trade_id: u64,
    /// Execution time, epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub trade_time: DateTime<Utc>,
}

impl TradeMessage {
    /// Stamp the local ingestion time, producing the buffered event form.
    pub fn received(self, at: DateTime<Utc>) -> TradeEvent {
        TradeEvent {
            symbol: self.symbol,
            price: self.price,
            quantity: self.quantity,
            trade_id: self.trade_id,
            trade_time: self.trade_time,
            received_at: at,
        }
    }
}

/// A single executed trade observed on the stream.
///
/// Immutable once buffered. `received_at` is assigned locally at ingestion,
/// never by the feed, and only disambiguates otherwise-identical rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeEvent {
    pub symbol: SmolStr,
    pub price: Decimal,
    pub quantity: Decimal,
    pub trade_id: u64,
    pub trade_time: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
}

impl TradeEvent {
    /// Stable row identity: survives the buffer being re-sorted for display.
    pub fn display_key(&self) -> (SmolStr, u64, i64) {
        (
            self.symbol.clone(),
            self.trade_id,
            self.received_at.timestamp_millis(),
        )
    }
}

/// Symbols the candle endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Btcusdt,
    Ethusdt,
    Adausdt,
    Dotusdt,
    Linkusdt,
}

impl Symbol {
    pub const ALL: [Symbol; 5] = [
        Symbol::Btcusdt,
        Symbol::Ethusdt,
        Symbol::Adausdt,
        Symbol::Dotusdt,
        Symbol::Linkusdt,
    ];

    /// Wire form used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Btcusdt => "BTCUSDT",
            Symbol::Ethusdt => "ETHUSDT",
            Symbol::Adausdt => "ADAUSDT",
            Symbol::Dotusdt => "DOTUSDT",
            Symbol::Linkusdt => "LINKUSDT",
        }
    }

    /// Display form with the quote suffix stripped.
    pub fn base(&self) -> &'static str {
        match self {
            Symbol::Btcusdt => "BTC",
            Symbol::Ethusdt => "ETH",
            Symbol::Adausdt => "ADA",
            Symbol::Dotusdt => "DOT",
            Symbol::Linkusdt => "LINK",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Candle aggregation periods the backend can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    S10,
    S30,
    M1,
    M2,
    M5,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::S10,
        Period::S30,
        Period::M1,
        Period::M2,
        Period::M5,
    ];

    /// Wire form used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::S10 => "10s",
            Period::S30 => "30s",
            Period::M1 => "1m",
            Period::M2 => "2m",
            Period::M5 => "5m",
        }
    }

    /// Human-readable form for the period selector.
    pub fn label(&self) -> &'static str {
        match self {
            Period::S10 => "10 Seconds",
            Period::S30 => "30 Seconds",
            Period::M1 => "1 Minute",
            Period::M2 => "2 Minutes",
            Period::M5 => "5 Minutes",
        }
    }

    /// Bucket width in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Period::S10 => 10,
            Period::S30 => 30,
            Period::M1 => 60,
            Period::M2 => 120,
            Period::M5 => 300,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_trade_message_with_string_decimals() {
        let raw = r#"{
            "symbol": "BTCUSDT",
            "price": "43251.12",
            "quantity": "0.00150000",
            "tradeTime": 1719000000123,
            "tradeId": 28457
        }"#;

        let msg: TradeMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.symbol, "BTCUSDT");
        assert_eq!(msg.price, dec!(43251.12));
        assert_eq!(msg.quantity, dec!(0.0015));
        assert_eq!(msg.trade_id, 28457);
        assert_eq!(msg.trade_time.timestamp_millis(), 1_719_000_000_123);
    }

    #[test]
    fn test_parse_trade_message_with_numeric_decimals() {
        let raw = r#"{"symbol":"ETHUSDT","price":2301.5,"quantity":1.25,"tradeTime":1719000000000,"tradeId":7}"#;

        let msg: TradeMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.price, dec!(2301.5));
        assert_eq!(msg.quantity, dec!(1.25));
    }

    #[test]
    fn test_malformed_trade_message_rejected() {
        let raw = r#"{"symbol":"BTCUSDT","price":"not-a-number","quantity":"1","tradeTime":1,"tradeId":1}"#;
        assert!(serde_json::from_str::<TradeMessage>(raw).is_err());

        let missing = r#"{"symbol":"BTCUSDT","price":"1.0"}"#;
        assert!(serde_json::from_str::<TradeMessage>(missing).is_err());
    }

    #[test]
    fn test_received_stamps_ingestion_time() {
        let raw = r#"{"symbol":"BTCUSDT","price":"1","quantity":"2","tradeTime":1719000000000,"tradeId":9}"#;
        let msg: TradeMessage = serde_json::from_str(raw).unwrap();

        let now = Utc::now();
        let event = msg.received(now);
        assert_eq!(event.received_at, now);
        assert_eq!(event.trade_id, 9);
    }

    #[test]
    fn test_symbol_round_trip() {
        for symbol in Symbol::ALL {
            assert!(symbol.as_str().ends_with("USDT"));
            assert!(symbol.as_str().starts_with(symbol.base()));
        }
        assert_eq!(Symbol::Btcusdt.to_string(), "BTCUSDT");
        assert_eq!(Symbol::Btcusdt.base(), "BTC");
    }

    #[test]
    fn test_period_forms() {
        assert_eq!(Period::S10.as_str(), "10s");
        assert_eq!(Period::S10.label(), "10 Seconds");
        assert_eq!(Period::M5.as_secs(), 300);
        let secs: Vec<u64> = Period::ALL.iter().map(Period::as_secs).collect();
        assert!(secs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_connection_state_labels() {
        assert_eq!(ConnectionState::Connected.label(), "Connected");
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Errored.is_connected());
    }
}
