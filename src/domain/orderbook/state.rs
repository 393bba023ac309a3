//! Orderbook state containers: app-owned, SDK-provided update logic.

use super::grouping::GroupingToken;
use super::wire::WsBook;
use super::BookLevel;
use crate::shared::InstrumentName;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Live book for one instrument at one grouping.
///
/// Upstream only sends full snapshots, so every message replaces both sides.
#[derive(Debug, Clone)]
pub struct OrderbookSnapshot {
    pub instrument: InstrumentName,
    pub grouping: GroupingToken,
    pub time: Option<DateTime<Utc>>,
    bids: BTreeMap<Decimal, BookLevel>,
    asks: BTreeMap<Decimal, BookLevel>,
}

impl OrderbookSnapshot {
    pub fn new(instrument: InstrumentName, grouping: GroupingToken) -> Self {
        Self {
            instrument,
            grouping,
            time: None,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
        }
    }

    /// Replace both sides with the levels of a WS book message.
    pub fn apply(&mut self, book: &WsBook) {
        self.bids.clear();
        self.asks.clear();
        self.time = Some(book.time);

        let [bids, asks] = &book.levels;
        for level in bids.iter().filter(|l| !l.sz.is_zero()) {
            self.bids.insert(level.px, level.into());
        }
        for level in asks.iter().filter(|l| !l.sz.is_zero()) {
            self.asks.insert(level.px, level.into());
        }
    }

    /// Bid levels, best (highest) first.
    pub fn bids(&self) -> Vec<BookLevel> {
        self.bids.values().rev().copied().collect()
    }

    /// Ask levels, best (lowest) first.
    pub fn asks(&self) -> Vec<BookLevel> {
        self.asks.values().copied().collect()
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        }
    }

    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// All live books, keyed by `(instrument, grouping)`.
#[derive(Debug, Clone, Default)]
pub struct OrderBooks {
    books: HashMap<(InstrumentName, GroupingToken), OrderbookSnapshot>,
}

impl OrderBooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, grouping: &GroupingToken, book: &WsBook) {
        self.books
            .entry((book.coin.clone(), grouping.clone()))
            .or_insert_with(|| OrderbookSnapshot::new(book.coin.clone(), grouping.clone()))
            .apply(book);
    }

    pub fn get(
        &self,
        instrument: &InstrumentName,
        grouping: &GroupingToken,
    ) -> Option<&OrderbookSnapshot> {
        self.books.get(&(instrument.clone(), grouping.clone()))
    }

    pub fn remove(&mut self, instrument: &InstrumentName, grouping: &GroupingToken) {
        self.books.remove(&(instrument.clone(), grouping.clone()));
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn clear(&mut self) {
        self.books.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::orderbook::wire::WsLevel;

    fn book(coin: &str, bids: Vec<(i64, i64)>, asks: Vec<(i64, i64)>) -> WsBook {
        let level = |(px, sz): (i64, i64)| WsLevel {
            px: Decimal::from(px),
            sz: Decimal::from(sz),
            n: 1,
        };
        WsBook {
            coin: InstrumentName::from(coin),
            time: Utc::now(),
            levels: [
                bids.into_iter().map(level).collect(),
                asks.into_iter().map(level).collect(),
            ],
        }
    }

    #[test]
    fn test_snapshot_replaces_state() {
        let mut snap = OrderbookSnapshot::new("BTC".into(), GroupingToken::from("1"));
        snap.apply(&book("BTC", vec![(50, 10), (49, 1)], vec![(51, 5)]));
        assert_eq!(snap.bids().len(), 2);
        assert_eq!(snap.best_bid(), Some(Decimal::from(50)));

        snap.apply(&book("BTC", vec![(48, 20)], vec![(52, 8)]));
        assert_eq!(snap.bids().len(), 1);
        assert_eq!(snap.asks().len(), 1);
        assert_eq!(snap.best_bid(), Some(Decimal::from(48)));
        assert_eq!(snap.best_ask(), Some(Decimal::from(52)));
    }

    #[test]
    fn test_levels_sorted_best_first() {
        let mut snap = OrderbookSnapshot::new("BTC".into(), GroupingToken::from("1"));
        snap.apply(&book(
            "BTC",
            vec![(47, 1), (50, 1), (49, 1)],
            vec![(53, 1), (51, 1), (52, 1)],
        ));
        let bid_px: Vec<_> = snap.bids().iter().map(|l| l.price).collect();
        let ask_px: Vec<_> = snap.asks().iter().map(|l| l.price).collect();
        assert_eq!(bid_px, [Decimal::from(50), Decimal::from(49), Decimal::from(47)]);
        assert_eq!(ask_px, [Decimal::from(51), Decimal::from(52), Decimal::from(53)]);
    }

    #[test]
    fn test_mid_price_and_spread() {
        let mut snap = OrderbookSnapshot::new("BTC".into(), GroupingToken::from("1"));
        snap.apply(&book("BTC", vec![(50, 10)], vec![(52, 5)]));
        assert_eq!(snap.mid_price(), Some(Decimal::from(51)));
        assert_eq!(snap.spread(), Some(Decimal::from(2)));
    }

    #[test]
    fn test_books_keyed_by_grouping() {
        let mut books = OrderBooks::new();
        let fine = GroupingToken::from("1");
        let coarse = GroupingToken::from("100");
        books.apply(&fine, &book("BTC", vec![(50, 1)], vec![(51, 1)]));
        books.apply(&coarse, &book("BTC", vec![(0, 1)], vec![(100, 1)]));
        assert_eq!(books.len(), 2);

        let btc = InstrumentName::from("BTC");
        assert_eq!(books.get(&btc, &fine).unwrap().best_ask(), Some(Decimal::from(51)));

        books.remove(&btc, &fine);
        assert!(books.get(&btc, &fine).is_none());
        assert!(books.get(&btc, &coarse).is_some());
    }
}
