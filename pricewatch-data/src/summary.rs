//! Aggregate statistics over a trade buffer snapshot.

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::types::TradeEvent;

/// Roll-up of the retained trade window, shown as the summary cards.
///
/// Pure derivation: recomputed from a snapshot whenever the buffer
/// changes, no state carried between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TradeSummary {
    pub total_trades: usize,
    pub active_symbols: usize,
    /// Trade time of the logically newest event; `None` while empty.
    pub latest_trade_time: Option<DateTime<Utc>>,
}

impl TradeSummary {
    pub fn of(trades: &[TradeEvent]) -> Self {
        Self {
            total_trades: trades.len(),
            active_symbols: trades.iter().map(|t| &t.symbol).unique().count(),
            latest_trade_time: trades
                .iter()
                .max_by_key(|t| (t.received_at, t.trade_id))
                .map(|t| t.trade_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use smol_str::SmolStr;

    fn trade(symbol: &str, trade_id: u64, trade_time_ms: i64, received_ms: i64) -> TradeEvent {
        TradeEvent {
            symbol: SmolStr::new(symbol),
            price: dec!(10.0),
            quantity: dec!(0.5),
            trade_id,
            trade_time: Utc.timestamp_millis_opt(trade_time_ms).unwrap(),
            received_at: Utc.timestamp_millis_opt(received_ms).unwrap(),
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let summary = TradeSummary::of(&[]);
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.active_symbols, 0);
        assert_eq!(summary.latest_trade_time, None);
    }

    #[test]
    fn test_counts_and_distinct_symbols() {
        let trades = vec![
            trade("BTCUSDT", 1, 100, 100),
            trade("ETHUSDT", 2, 101, 101),
            trade("BTCUSDT", 3, 102, 102),
            trade("ADAUSDT", 4, 103, 103),
        ];

        let summary = TradeSummary::of(&trades);
        assert_eq!(summary.total_trades, 4);
        assert_eq!(summary.active_symbols, 3);
    }

    #[test]
    fn test_latest_follows_receipt_order() {
        // The last-received trade reports an older trade time; the summary
        // must still surface it as the latest update.
        let trades = vec![
            trade("BTCUSDT", 1, 500, 1000),
            trade("ETHUSDT", 2, 300, 2000),
        ];

        let summary = TradeSummary::of(&trades);
        assert_eq!(
            summary.latest_trade_time,
            Some(Utc.timestamp_millis_opt(300).unwrap())
        );
    }
}
