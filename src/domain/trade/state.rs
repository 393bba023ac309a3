//! Trade state containers: app-owned, SDK-provided update logic.

use super::Trade;
use crate::shared::InstrumentName;
use std::collections::{HashMap, VecDeque};

/// Number of prints kept per instrument.
pub const DEFAULT_TAPE_CAPACITY: usize = 50;

/// Rolling trade tape for one instrument, newest first.
#[derive(Debug, Clone)]
pub struct TradeHistory {
    pub instrument: InstrumentName,
    trades: VecDeque<Trade>,
    max_size: usize,
}

impl TradeHistory {
    pub fn new(instrument: InstrumentName, max_size: usize) -> Self {
        Self {
            instrument,
            trades: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Push a new trade, evicting the oldest if at capacity.
    pub fn push(&mut self, trade: Trade) {
        if self.trades.len() >= self.max_size {
            self.trades.pop_back();
        }
        self.trades.push_front(trade);
    }

    /// Push a batch as delivered by one WS message. Oldest is pushed first so the
    /// newest print ends up at the front.
    pub fn extend(&mut self, mut batch: Vec<Trade>) {
        batch.sort_by_key(|t| (t.timestamp, t.trade_id));
        for trade in batch {
            self.push(trade);
        }
    }

    pub fn trades(&self) -> &VecDeque<Trade> {
        &self.trades
    }

    pub fn latest(&self) -> Option<&Trade> {
        self.trades.front()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

/// Trade tapes for every subscribed instrument.
#[derive(Debug, Clone)]
pub struct TradeTapes {
    tapes: HashMap<InstrumentName, TradeHistory>,
    capacity: usize,
}

impl TradeTapes {
    pub fn new(capacity: usize) -> Self {
        Self {
            tapes: HashMap::new(),
            capacity,
        }
    }

    pub fn apply(&mut self, instrument: &InstrumentName, batch: Vec<Trade>) {
        let capacity = self.capacity;
        self.tapes
            .entry(instrument.clone())
            .or_insert_with(|| TradeHistory::new(instrument.clone(), capacity))
            .extend(batch);
    }

    pub fn get(&self, instrument: &InstrumentName) -> Option<&TradeHistory> {
        self.tapes.get(instrument)
    }

    pub fn remove(&mut self, instrument: &InstrumentName) {
        self.tapes.remove(instrument);
    }

    pub fn clear(&mut self) {
        self.tapes.clear();
    }
}

impl Default for TradeTapes {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Side;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn make_trade(tid: u64, at_ms: i64) -> Trade {
        Trade {
            instrument: InstrumentName::from("BTC"),
            trade_id: tid,
            timestamp: Utc.timestamp_millis_opt(at_ms).unwrap(),
            price: Decimal::from(65_000),
            size: Decimal::ONE,
            side: Side::Bid,
            hash: String::new(),
        }
    }

    #[test]
    fn test_push_newest_first() {
        let mut th = TradeHistory::new("BTC".into(), 10);
        th.push(make_trade(1, 1_000));
        th.push(make_trade(2, 2_000));
        assert_eq!(th.len(), 2);
        assert_eq!(th.latest().unwrap().trade_id, 2);
    }

    #[test]
    fn test_rolling_buffer_evicts_oldest() {
        let mut th = TradeHistory::new("BTC".into(), 3);
        for tid in 1..=4 {
            th.push(make_trade(tid, tid as i64 * 1_000));
        }
        let ids: Vec<_> = th.trades().iter().map(|t| t.trade_id).collect();
        assert_eq!(ids, [4, 3, 2]);
    }

    #[test]
    fn test_extend_orders_batch_by_time() {
        let mut th = TradeHistory::new("BTC".into(), 10);
        th.extend(vec![make_trade(3, 3_000), make_trade(1, 1_000), make_trade(2, 2_000)]);
        let ids: Vec<_> = th.trades().iter().map(|t| t.trade_id).collect();
        assert_eq!(ids, [3, 2, 1]);
    }

    #[test]
    fn test_default_tape_capped_at_fifty() {
        let mut tapes = TradeTapes::default();
        let btc = InstrumentName::from("BTC");
        let batch: Vec<_> = (0..80).map(|i| make_trade(i, i as i64)).collect();
        tapes.apply(&btc, batch);
        let tape = tapes.get(&btc).unwrap();
        assert_eq!(tape.len(), DEFAULT_TAPE_CAPACITY);
        assert_eq!(tape.latest().unwrap().trade_id, 79);
    }

    #[test]
    fn test_remove_tape() {
        let mut tapes = TradeTapes::default();
        let btc = InstrumentName::from("BTC");
        tapes.apply(&btc, vec![make_trade(1, 1)]);
        tapes.remove(&btc);
        assert!(tapes.get(&btc).is_none());
    }
}
