//! Bounded, receipt-ordered store of the most recent trades.

use std::collections::VecDeque;

use crate::types::TradeEvent;

/// Maximum number of trades retained for display.
pub const TRADE_CAPACITY: usize = 100;

/// In-memory window over the live trade stream.
///
/// Insertion order is receipt order, newest at the front. Eviction is pure
/// capacity overflow, oldest first; nothing is dropped by age. Display
/// ordering is a property of [`snapshot`](TradeBuffer::snapshot), not of
/// the store itself.
#[derive(Debug)]
pub struct TradeBuffer {
    trades: VecDeque<TradeEvent>,
    capacity: usize,
}

impl TradeBuffer {
    pub fn new() -> Self {
        Self::with_capacity(TRADE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            trades: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the logical head, evicting from the tail once full.
    pub fn push(&mut self, event: TradeEvent) {
        self.trades.push_front(event);
        self.trades.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// The logically newest event by receipt order.
    pub fn newest(&self) -> Option<&TradeEvent> {
        self.trades.front()
    }

    /// Owned copy of the retained trades in presentation order: symbol
    /// ascending, then trade time newest-first within a symbol.
    ///
    /// Sorted fresh on every call. The sort is stable, so rows with equal
    /// keys keep their receipt order and repeated snapshots of unchanged
    /// contents are identical.
    pub fn snapshot(&self) -> Vec<TradeEvent> {
        let mut rows: Vec<TradeEvent> = self.trades.iter().cloned().collect();
        rows.sort_by(|a, b| {
            a.symbol
                .cmp(&b.symbol)
                .then_with(|| b.trade_time.cmp(&a.trade_time))
        });
        rows
    }
}

impl Default for TradeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use smol_str::SmolStr;

    fn trade(symbol: &str, trade_id: u64, trade_time_ms: i64) -> TradeEvent {
        TradeEvent {
            symbol: SmolStr::new(symbol),
            price: dec!(100.0),
            quantity: dec!(1.0),
            trade_id,
            trade_time: Utc.timestamp_millis_opt(trade_time_ms).unwrap(),
            received_at: Utc.timestamp_millis_opt(trade_time_ms + 5).unwrap(),
        }
    }

    #[test]
    fn test_capacity_eviction_keeps_most_recent() {
        let mut buffer = TradeBuffer::new();
        for id in 0..105 {
            buffer.push(trade("BTCUSDT", id, id as i64));
        }

        assert_eq!(buffer.len(), 100);
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 100);

        // Oldest five evicted, everything else retained
        let ids: Vec<u64> = snapshot.iter().map(|t| t.trade_id).collect();
        assert!(!ids.contains(&0));
        assert!(!ids.contains(&4));
        assert!(ids.contains(&5));
        assert!(ids.contains(&104));
    }

    #[test]
    fn test_snapshot_presentation_order() {
        let mut buffer = TradeBuffer::new();
        buffer.push(trade("BTCUSDT", 1, 100));
        buffer.push(trade("ETHUSDT", 2, 101));
        buffer.push(trade("BTCUSDT", 3, 102));

        let snapshot = buffer.snapshot();
        let keys: Vec<(&str, i64)> = snapshot
            .iter()
            .map(|t| (t.symbol.as_str(), t.trade_time.timestamp_millis()))
            .collect();
        assert_eq!(
            keys,
            vec![("BTCUSDT", 102), ("BTCUSDT", 100), ("ETHUSDT", 101)]
        );
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let mut buffer = TradeBuffer::new();
        for id in 0..20 {
            let symbol = if id % 2 == 0 { "BTCUSDT" } else { "ETHUSDT" };
            buffer.push(trade(symbol, id, 1000 - id as i64));
        }

        assert_eq!(buffer.snapshot(), buffer.snapshot());
    }

    #[test]
    fn test_newest_follows_receipt_order() {
        let mut buffer = TradeBuffer::new();
        assert!(buffer.newest().is_none());

        buffer.push(trade("ETHUSDT", 1, 500));
        buffer.push(trade("ADAUSDT", 2, 400));
        // Older trade time, but received last
        assert_eq!(buffer.newest().map(|t| t.trade_id), Some(2));
    }

    #[test]
    fn test_display_keys_unique() {
        let mut buffer = TradeBuffer::new();
        for id in 0..50 {
            buffer.push(trade("BTCUSDT", id, 100));
        }
        // Same trade id from another symbol must not collide either
        buffer.push(trade("ETHUSDT", 0, 100));

        let snapshot = buffer.snapshot();
        let mut keys: Vec<_> = snapshot.iter().map(|t| t.display_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), snapshot.len());
    }

    #[test]
    fn test_custom_capacity() {
        let mut buffer = TradeBuffer::with_capacity(3);
        for id in 0..5 {
            buffer.push(trade("BTCUSDT", id, id as i64));
        }
        let ids: Vec<u64> = buffer.snapshot().iter().map(|t| t.trade_id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }
}
