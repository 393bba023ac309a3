//! Snapshot store: the latest known value of every tracked topic.
//!
//! Pure and synchronous: set/merge operations plus read accessors. Written only
//! by the orchestrator (deliveries, evictions, topic errors) and the session
//! (connectivity, HTTP seeding); read freely by everything else.

use crate::domain::account::wire::WsWebData2;
use crate::domain::account::{AccountSnapshot, AccountState, AccountUpdate, TwapState};
use crate::domain::asset_config::wire::WsActiveAssetData;
use crate::domain::asset_config::{
    ActiveAssetConfig, AssetConfigFallback, AssetConfigUpdate, AssetConfigs,
};
use crate::domain::market::wire::MetaAndAssetCtxs;
use crate::domain::market::AssetContexts;
use crate::domain::mids::wire::WsAllMids;
use crate::domain::mids::AllMids;
use crate::domain::orderbook::wire::WsBook;
use crate::domain::orderbook::{GroupingToken, OrderBooks, OrderbookSnapshot};
use crate::domain::trade::wire::WsTrade;
use crate::domain::trade::{Trade, TradeHistory, TradeTapes, DEFAULT_TAPE_CAPACITY};
use crate::domain::user::wire::{WsUserFills, WsUserFundings};
use crate::domain::user::{Fill, Funding, UserHistory};
use crate::shared::InstrumentName;
use crate::sync::key::SubscriptionKey;
use crate::ws::Kind;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

// ─── TopicError ──────────────────────────────────────────────────────────────

/// A subscribe that failed on the last identity pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicError {
    pub key: SubscriptionKey,
    pub message: String,
    pub at: DateTime<Utc>,
}

// ─── SnapshotStore ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SnapshotStore {
    mids: AllMids,
    account: AccountState,
    contexts: AssetContexts,
    fills: UserHistory<Fill>,
    fundings: UserHistory<Funding>,
    books: OrderBooks,
    tapes: TradeTapes,
    asset_configs: AssetConfigs,
    topic_errors: BTreeMap<SubscriptionKey, TopicError>,
    connected: bool,
    mids_revision: u64,
    contexts_revision: u64,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_CAPACITY, AssetConfigFallback::default())
    }
}

impl SnapshotStore {
    pub fn new(trade_tape_capacity: usize, config_fallback: AssetConfigFallback) -> Self {
        Self {
            mids: AllMids::new(),
            account: AccountState::new(),
            contexts: AssetContexts::new(),
            fills: UserHistory::new(),
            fundings: UserHistory::new(),
            books: OrderBooks::new(),
            tapes: TradeTapes::new(trade_tape_capacity),
            asset_configs: AssetConfigs::new(config_fallback),
            topic_errors: BTreeMap::new(),
            connected: false,
            mids_revision: 0,
            contexts_revision: 0,
        }
    }

    /// Writes one inbound message received for `key`.
    ///
    /// A payload that does not belong to the key's topic is ignored.
    pub fn apply(&mut self, key: &SubscriptionKey, payload: Kind) {
        match (key, payload) {
            (SubscriptionKey::AllMids, Kind::AllMids(mids)) => self.apply_all_mids(mids),
            (SubscriptionKey::AccountSnapshot { .. }, Kind::WebData2(data)) => {
                self.apply_account_snapshot(*data)
            }
            (SubscriptionKey::Fills { .. }, Kind::UserFills(fills)) => self.apply_fills(fills),
            (SubscriptionKey::Fundings { .. }, Kind::UserFundings(fundings)) => {
                self.apply_fundings(fundings)
            }
            (SubscriptionKey::OrderBook { grouping, .. }, Kind::L2Book(book)) => {
                self.apply_order_book(grouping, &book)
            }
            (SubscriptionKey::Trades { instrument }, Kind::Trades(trades)) => {
                self.apply_trades(instrument, trades)
            }
            (SubscriptionKey::ActiveAssetConfig { .. }, Kind::ActiveAssetData(data)) => {
                self.merge_asset_config(data)
            }
            (key, _) => tracing::debug!(%key, "Payload does not match topic, ignoring"),
        }
    }

    // ── Writers ──────────────────────────────────────────────────────────

    pub fn apply_all_mids(&mut self, update: WsAllMids) {
        self.mids.replace(update);
        self.mids_revision += 1;
    }

    /// Replaces the account snapshot and TWAP projection, and the public asset
    /// contexts carried by the same payload.
    pub fn apply_account_snapshot(&mut self, data: WsWebData2) {
        let AccountUpdate {
            snapshot,
            twap_states,
            perp_contexts,
            spot_contexts,
        } = data.into();

        self.account.replace(snapshot, twap_states);
        if let Some((meta, ctxs)) = perp_contexts {
            self.replace_perp_contexts((meta, ctxs));
        }
        if let Some(spots) = spot_contexts {
            self.contexts.replace_spots(spots);
        }
        self.contexts_revision += 1;
    }

    /// Seeds public asset contexts from the info endpoint.
    pub fn seed_asset_contexts(&mut self, seed: MetaAndAssetCtxs) {
        self.replace_perp_contexts(seed);
        self.contexts_revision += 1;
    }

    fn replace_perp_contexts(&mut self, (meta, ctxs): MetaAndAssetCtxs) {
        for entry in &meta.universe {
            self.asset_configs
                .learn_max_leverage(&entry.name, entry.max_leverage);
        }
        self.contexts.replace_perps(meta, ctxs);
    }

    pub fn apply_fills(&mut self, update: WsUserFills) {
        let batch = update.fills.into_iter().map(Fill::from).collect();
        self.fills.apply(update.is_snapshot, batch);
    }

    pub fn apply_fundings(&mut self, update: WsUserFundings) {
        let batch = update.fundings.into_iter().map(Funding::from).collect();
        self.fundings.apply(update.is_snapshot, batch);
    }

    pub fn apply_order_book(&mut self, grouping: &GroupingToken, book: &WsBook) {
        self.books.apply(grouping, book);
    }

    pub fn apply_trades(&mut self, instrument: &InstrumentName, trades: Vec<WsTrade>) {
        let batch = trades.into_iter().map(Trade::from).collect();
        self.tapes.apply(instrument, batch);
    }

    /// Merges a config message into the per-instrument map. Counts as a context
    /// change, since the selected view-model shows the learned max leverage.
    pub fn merge_asset_config(&mut self, data: WsActiveAssetData) {
        self.asset_configs.merge(AssetConfigUpdate::from(data));
        self.contexts_revision += 1;
    }

    /// Drops the data owned by a released subscription.
    pub fn evict(&mut self, key: &SubscriptionKey) {
        match key {
            SubscriptionKey::OrderBook {
                instrument,
                grouping,
            } => self.books.remove(instrument, grouping),
            SubscriptionKey::Trades { instrument } => self.tapes.remove(instrument),
            SubscriptionKey::AccountSnapshot { .. } => self.account.clear(),
            SubscriptionKey::Fills { .. } => self.fills.clear(),
            SubscriptionKey::Fundings { .. } => self.fundings.clear(),
            SubscriptionKey::ActiveAssetConfig { .. } | SubscriptionKey::AllMids => {}
        }
    }

    /// Forgets the per-viewer parts of every asset config. Learned max leverage
    /// stays.
    pub fn forget_viewer(&mut self) {
        self.asset_configs.forget_viewer();
        self.contexts_revision += 1;
    }

    // ── Topic errors ─────────────────────────────────────────────────────

    pub fn record_topic_error(&mut self, key: SubscriptionKey, message: impl Into<String>) {
        let error = TopicError {
            key: key.clone(),
            message: message.into(),
            at: Utc::now(),
        };
        self.topic_errors.insert(key, error);
    }

    pub fn clear_topic_error(&mut self, key: &SubscriptionKey) {
        self.topic_errors.remove(key);
    }

    pub fn topic_errors(&self) -> impl Iterator<Item = &TopicError> {
        self.topic_errors.values()
    }

    pub fn topic_error(&self, key: &SubscriptionKey) -> Option<&TopicError> {
        self.topic_errors.get(key)
    }

    // ── Connectivity ─────────────────────────────────────────────────────

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // ── Readers ──────────────────────────────────────────────────────────

    pub fn mids(&self) -> &AllMids {
        &self.mids
    }

    pub fn account(&self) -> Option<&AccountSnapshot> {
        self.account.snapshot()
    }

    pub fn twap_states(&self) -> &[TwapState] {
        self.account.twap_states()
    }

    pub fn asset_contexts(&self) -> &AssetContexts {
        &self.contexts
    }

    pub fn fills(&self) -> &UserHistory<Fill> {
        &self.fills
    }

    pub fn fundings(&self) -> &UserHistory<Funding> {
        &self.fundings
    }

    pub fn order_book(
        &self,
        instrument: &InstrumentName,
        grouping: &GroupingToken,
    ) -> Option<&OrderbookSnapshot> {
        self.books.get(instrument, grouping)
    }

    pub fn order_books(&self) -> &OrderBooks {
        &self.books
    }

    pub fn trade_tape(&self, instrument: &InstrumentName) -> Option<&TradeHistory> {
        self.tapes.get(instrument)
    }

    pub fn asset_config(&self, instrument: &InstrumentName) -> ActiveAssetConfig {
        self.asset_configs.get(instrument)
    }

    pub fn asset_configs(&self) -> &AssetConfigs {
        &self.asset_configs
    }

    /// Bumped on every mid-price update.
    pub fn mids_revision(&self) -> u64 {
        self.mids_revision
    }

    /// Bumped whenever asset contexts or asset configs change.
    pub fn contexts_revision(&self) -> u64 {
        self.contexts_revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{Address, LeverageMode};
    use crate::ws::MessageIn;
    use rust_decimal::Decimal;

    const VIEWER: &str = "0x0000000000000000000000000000000000000001";

    fn kind(json: &str) -> Kind {
        serde_json::from_str::<MessageIn>(json).unwrap().kind
    }

    fn web_data2() -> Kind {
        kind(&format!(
            r#"{{"channel":"webData2","data":{{
                "clearinghouseState":{{
                    "marginSummary":{{"accountValue":"100","totalNtlPos":"0","totalRawUsd":"100","totalMarginUsed":"0"}},
                    "crossMarginSummary":{{"accountValue":"100","totalNtlPos":"0","totalRawUsd":"100","totalMarginUsed":"0"}},
                    "withdrawable":"100"
                }},
                "meta":{{"universe":[{{"name":"BTC","szDecimals":5,"maxLeverage":40}}]}},
                "assetCtxs":[{{"funding":"0.00001","openInterest":"10","prevDayPx":"60000",
                              "dayNtlVlm":"1","oraclePx":"61000","markPx":"61000"}}],
                "serverTime":1700000000000,
                "user":"{VIEWER}"
            }}}}"#
        ))
    }

    fn fills(is_snapshot: bool, tids: &[u64]) -> Kind {
        let fills: Vec<String> = tids
            .iter()
            .map(|tid| {
                format!(
                    r#"{{"coin":"ETH","px":"3000","sz":"1","side":"B","time":{},
                        "startPosition":"0","dir":"Open Long","closedPnl":"0","hash":"0x",
                        "oid":1,"crossed":true,"fee":"0.1","tid":{}}}"#,
                    1_700_000_000_000u64 + tid,
                    tid
                )
            })
            .collect();
        kind(&format!(
            r#"{{"channel":"userFills","data":{{"isSnapshot":{},"user":"{}","fills":[{}]}}}}"#,
            is_snapshot,
            VIEWER,
            fills.join(",")
        ))
    }

    fn fills_key() -> SubscriptionKey {
        SubscriptionKey::Fills {
            user: Address::new(VIEWER),
        }
    }

    #[test]
    fn test_fills_snapshot_then_incremental() {
        let mut store = SnapshotStore::default();
        store.apply(&fills_key(), fills(true, &[1, 2, 3]));
        store.apply(&fills_key(), fills(false, &[4]));

        let tids: Vec<u64> = store.fills().entries().iter().map(|f| f.trade_id).collect();
        assert_eq!(tids, [4, 3, 2, 1]);
    }

    #[test]
    fn test_account_snapshot_feeds_contexts_and_max_leverage() {
        let mut store = SnapshotStore::default();
        let key = SubscriptionKey::AccountSnapshot {
            user: Address::new(VIEWER),
        };
        store.apply(&key, web_data2());

        assert!(store.account().is_some());
        assert!(store.asset_contexts().resolve("btc", None).is_some());
        assert_eq!(store.asset_config(&"BTC".into()).max_leverage, 40);
        assert_eq!(store.contexts_revision(), 1);
    }

    #[test]
    fn test_mismatched_payload_is_ignored() {
        let mut store = SnapshotStore::default();
        store.apply(&SubscriptionKey::AllMids, fills(true, &[1]));
        assert!(!store.fills().is_loaded());
        assert_eq!(store.mids_revision(), 0);
    }

    #[test]
    fn test_evict_viewer_scoped_data() {
        let mut store = SnapshotStore::default();
        let account = SubscriptionKey::AccountSnapshot {
            user: Address::new(VIEWER),
        };
        store.apply(&account, web_data2());
        store.apply(&fills_key(), fills(true, &[1, 2]));

        store.evict(&account);
        store.evict(&fills_key());
        assert!(store.account().is_none());
        assert!(store.fills().is_empty());
        // Contexts are public and survive the viewer.
        assert!(!store.asset_contexts().is_empty());
    }

    #[test]
    fn test_evict_order_book_leaves_trades() {
        let mut store = SnapshotStore::default();
        let book = kind(
            r#"{"channel":"l2Book","data":{"coin":"ETH","time":1700000000000,
                "levels":[[{"px":"2999","sz":"1","n":1}],[{"px":"3001","sz":"2","n":1}]]}}"#,
        );
        let trades = kind(
            r#"{"channel":"trades","data":[{"coin":"ETH","side":"A","px":"3000","sz":"0.5",
                "time":1700000000000,"hash":"0x","tid":9}]}"#,
        );
        let book_key = SubscriptionKey::OrderBook {
            instrument: "ETH".into(),
            grouping: "1".into(),
        };
        let trades_key = SubscriptionKey::Trades {
            instrument: "ETH".into(),
        };
        store.apply(&book_key, book);
        store.apply(&trades_key, trades);
        assert_eq!(
            store
                .order_book(&"ETH".into(), &"1".into())
                .and_then(|b| b.mid_price()),
            Some(Decimal::from(3_000))
        );

        store.evict(&book_key);
        assert!(store.order_book(&"ETH".into(), &"1".into()).is_none());
        assert_eq!(store.trade_tape(&"ETH".into()).map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_forget_viewer_keeps_max_leverage() {
        let mut store = SnapshotStore::default();
        let key = SubscriptionKey::ActiveAssetConfig {
            user: Address::new(VIEWER),
            instrument: "ETH".into(),
        };
        store.apply(
            &key,
            kind(&format!(
                r#"{{"channel":"activeAssetData","data":{{"user":"{VIEWER}","coin":"ETH",
                    "leverage":{{"type":"isolated","value":7}},"maxLeverage":25}}}}"#
            )),
        );
        assert_eq!(store.asset_config(&"ETH".into()).leverage, 7);

        store.evict(&key);
        store.forget_viewer();
        let config = store.asset_config(&"ETH".into());
        assert_eq!(config.max_leverage, 25);
        assert_eq!(config.mode, LeverageMode::Cross);
        assert_eq!(config.leverage, 20);
    }

    #[test]
    fn test_topic_errors() {
        let mut store = SnapshotStore::default();
        store.record_topic_error(SubscriptionKey::AllMids, "rejected");
        assert_eq!(store.topic_errors().count(), 1);
        assert_eq!(
            store.topic_error(&SubscriptionKey::AllMids).map(|e| e.message.as_str()),
            Some("rejected")
        );
        store.clear_topic_error(&SubscriptionKey::AllMids);
        assert_eq!(store.topic_errors().count(), 0);
    }
}
