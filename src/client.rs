//! High-level client: `TerminalClient` (configuration + HTTP seeding) and
//! `TerminalSession` (the composition root).
//!
//! The session owns both stores, the orchestrator and the selection-sync engine,
//! and drives them from viewer actions and inbound deliveries. Nothing in it is
//! shared or locked; the embedding application holds it and calls in.

use crate::domain::orderbook::{available_groupings, GroupingToken};
use crate::domain::selection::{
    DurableStorage, MemoryLocation, MemoryStorage, SelectedAsset, SelectionStore, UrlLocation,
};
use crate::error::{SdkError, SelectionError};
use crate::shared::{Address, InstrumentName, Viewer};
use crate::store::SnapshotStore;
use crate::sync::{
    IdentityTriple, SelectionSync, SubscriptionOrchestrator, SyncConfig, Transport,
};
use crate::ws::{WsConfig, WsEvent};

#[cfg(feature = "http")]
use crate::domain::market::wire::MetaAndAssetCtxs;
#[cfg(feature = "http")]
use crate::http::InfoHttp;
#[cfg(feature = "http")]
use async_lock::RwLock;
#[cfg(feature = "http")]
use std::sync::Arc;
#[cfg(feature = "http")]
use std::time::{Duration, Instant};

/// Entry point: holds configuration and the HTTP client, and opens sessions.
#[derive(Clone)]
pub struct TerminalClient {
    #[cfg(feature = "http")]
    pub(crate) http: InfoHttp,
    pub(crate) ws_config: WsConfig,
    pub(crate) sync_config: SyncConfig,
    /// Last `metaAndAssetCtxs` response and when it was fetched.
    #[cfg(feature = "http")]
    pub(crate) contexts_cache: Arc<RwLock<Option<(MetaAndAssetCtxs, Instant)>>>,
    #[cfg(feature = "http")]
    pub(crate) contexts_cache_ttl: Duration,
}

impl TerminalClient {
    pub fn builder() -> TerminalClientBuilder {
        TerminalClientBuilder::default()
    }

    /// WS config for creating the streaming transport.
    ///
    /// The transport is not embedded in the client; its lifetime belongs to
    /// the application.
    pub fn ws_config(&self) -> &WsConfig {
        &self.ws_config
    }

    pub fn sync_config(&self) -> &SyncConfig {
        &self.sync_config
    }

    /// Create a new native WS client from the current config.
    #[cfg(feature = "ws-native")]
    pub fn ws_native(&self) -> crate::ws::native::WsClient {
        crate::ws::native::WsClient::new(self.ws_config.clone())
    }

    #[cfg(feature = "http")]
    pub fn http(&self) -> &InfoHttp {
        &self.http
    }

    /// Perp universe and contexts from `/info`, cached for the configured TTL.
    #[cfg(feature = "http")]
    pub async fn asset_contexts(&self) -> Result<MetaAndAssetCtxs, SdkError> {
        if let Some((cached, fetched_at)) = self.contexts_cache.read().await.as_ref() {
            if fetched_at.elapsed() < self.contexts_cache_ttl {
                return Ok(cached.clone());
            }
        }

        let fresh = self.http.meta_and_asset_ctxs().await?;
        *self.contexts_cache.write().await = Some((fresh.clone(), Instant::now()));
        Ok(fresh)
    }

    #[cfg(feature = "http")]
    pub async fn clear_cache(&self) {
        *self.contexts_cache.write().await = None;
    }

    /// Opens a session whose selection is kept in memory only.
    pub fn session<T: Transport>(&self, transport: T) -> TerminalSession<T> {
        self.session_with_persistence(
            transport,
            Box::new(MemoryStorage::new()),
            Box::new(MemoryLocation::default()),
        )
    }

    /// Opens a session that persists the selection to `storage` and `location`.
    pub fn session_with_persistence<T: Transport>(
        &self,
        transport: T,
        storage: Box<dyn DurableStorage>,
        location: Box<dyn UrlLocation>,
    ) -> TerminalSession<T> {
        let selection = SelectionStore::new(
            storage,
            location,
            self.sync_config.default_grouping.clone(),
        );
        TerminalSession::new(transport, selection, &self.sync_config)
    }
}

impl std::fmt::Debug for TerminalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalClient")
            .field("ws_url", &self.ws_config.url)
            .field("sync_config", &self.sync_config)
            .finish()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct TerminalClientBuilder {
    api_url: String,
    ws_config: WsConfig,
    sync_config: SyncConfig,
    contexts_cache_ttl: std::time::Duration,
}

impl Default for TerminalClientBuilder {
    fn default() -> Self {
        Self {
            api_url: crate::network::DEFAULT_API_URL.to_string(),
            ws_config: WsConfig::default(),
            sync_config: SyncConfig::default(),
            contexts_cache_ttl: std::time::Duration::from_secs(60),
        }
    }
}

impl TerminalClientBuilder {
    pub fn api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    pub fn ws_url(mut self, url: &str) -> Self {
        self.ws_config.url = url.to_string();
        self
    }

    /// Replaces the whole WS config, including its URL.
    pub fn ws_config(mut self, config: WsConfig) -> Self {
        self.ws_config = config;
        self
    }

    pub fn default_instrument(mut self, name: &str) -> Self {
        self.sync_config.default_instrument = InstrumentName::from(name);
        self
    }

    pub fn default_grouping(mut self, grouping: &str) -> Self {
        self.sync_config.default_grouping = GroupingToken::from(grouping);
        self
    }

    pub fn trade_tape_capacity(mut self, capacity: usize) -> Self {
        self.sync_config.trade_tape_capacity = capacity;
        self
    }

    pub fn contexts_cache_ttl(mut self, ttl: std::time::Duration) -> Self {
        self.contexts_cache_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<TerminalClient, SdkError> {
        if self.sync_config.trade_tape_capacity == 0 {
            return Err(SdkError::Validation(
                "trade_tape_capacity must be at least 1".into(),
            ));
        }
        if self.sync_config.default_instrument.as_str().is_empty() {
            return Err(SdkError::Validation("default_instrument is empty".into()));
        }

        #[cfg(not(feature = "http"))]
        let _ = (self.api_url, self.contexts_cache_ttl);

        Ok(TerminalClient {
            #[cfg(feature = "http")]
            http: InfoHttp::new(&self.api_url)?,
            ws_config: self.ws_config,
            sync_config: self.sync_config,
            #[cfg(feature = "http")]
            contexts_cache: Arc::new(RwLock::new(None)),
            #[cfg(feature = "http")]
            contexts_cache_ttl: self.contexts_cache_ttl,
        })
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Session
// ═════════════════════════════════════════════════════════════════════════════

/// One viewer session: stores, orchestrator and selection sync wired together.
pub struct TerminalSession<T: Transport> {
    store: SnapshotStore,
    selection: SelectionStore,
    orchestrator: SubscriptionOrchestrator<T>,
    selection_sync: SelectionSync,
    viewer: Viewer,
}

impl<T: Transport> TerminalSession<T> {
    pub fn new(transport: T, selection: SelectionStore, config: &SyncConfig) -> Self {
        Self {
            store: SnapshotStore::new(config.trade_tape_capacity, Default::default()),
            selection,
            orchestrator: SubscriptionOrchestrator::new(transport),
            selection_sync: SelectionSync::new(config.default_instrument.clone()),
            viewer: Viewer::Anonymous,
        }
    }

    // ── Readers ──────────────────────────────────────────────────────────

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn selected(&self) -> Option<&SelectedAsset> {
        self.selection.selected()
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn orchestrator(&self) -> &SubscriptionOrchestrator<T> {
        &self.orchestrator
    }

    pub fn selection_sync(&self) -> &SelectionSync {
        &self.selection_sync
    }

    /// The triple the current viewer, selection and grouping describe.
    pub fn identity(&self) -> IdentityTriple {
        IdentityTriple::new(
            self.viewer.clone(),
            self.selection.selected_name().cloned(),
            self.selection.grouping().clone(),
        )
    }

    // ── Viewer actions ───────────────────────────────────────────────────

    /// First identity pass: mids plus the anonymous account snapshot.
    pub async fn start(&mut self) {
        self.reconcile().await;
    }

    pub async fn connect_wallet(&mut self, address: Address) {
        tracing::info!(%address, "Wallet connected");
        self.viewer = Viewer::Connected(address);
        self.reconcile().await;
    }

    pub async fn disconnect_wallet(&mut self) {
        tracing::info!("Wallet disconnected");
        self.viewer = Viewer::Anonymous;
        self.reconcile().await;
    }

    /// User-driven instrument pick. Unknown names change nothing.
    pub async fn select_instrument(&mut self, name: &str) -> Result<(), SelectionError> {
        self.selection_sync
            .select(name, &self.store, &mut self.selection)?;
        self.reconcile().await;
        Ok(())
    }

    /// User-driven grouping pick. While an instrument is selected the token
    /// must be one it currently offers.
    pub async fn set_grouping(&mut self, grouping: GroupingToken) -> Result<(), SdkError> {
        if let Some(selected) = self.selection.selected() {
            if !available_groupings(selected.price).contains(&grouping) {
                return Err(SdkError::Validation(format!(
                    "grouping {} not offered for {}",
                    grouping, selected.name
                )));
            }
        }
        if self.selection.set_grouping(grouping) {
            self.reconcile().await;
        }
        Ok(())
    }

    /// Seeds asset contexts (usually from [`TerminalClient::asset_contexts`]).
    #[cfg(feature = "http")]
    pub async fn seed_asset_contexts(&mut self, seed: MetaAndAssetCtxs) {
        self.store.seed_asset_contexts(seed);
        self.sync_selection().await;
    }

    // ── Inbound ──────────────────────────────────────────────────────────

    /// Applies every queued delivery, then refreshes the selection, then runs
    /// another identity pass if the selection changed the instrument or grouping.
    /// Returns the number of deliveries applied.
    pub async fn pump(&mut self) -> usize {
        let applied = self.orchestrator.pump(&mut self.store);
        self.sync_selection().await;
        applied
    }

    /// Waits for at least one delivery, then behaves like [`pump`](Self::pump).
    pub async fn next(&mut self) -> usize {
        let first = match self.orchestrator.next_delivery().await {
            Some(delivery) => usize::from(self.orchestrator.handle_delivery(delivery, &mut self.store)),
            None => 0,
        };
        first + self.pump().await
    }

    /// Tracks the transport's connectivity.
    pub fn on_transport_event(&mut self, event: &WsEvent) {
        match event {
            WsEvent::Connected => self.store.set_connected(true),
            WsEvent::Disconnected { .. } | WsEvent::MaxReconnectReached => {
                self.store.set_connected(false)
            }
            WsEvent::Error(message) => tracing::warn!("Transport error: {}", message),
        }
    }

    /// Releases every subscription.
    pub async fn shutdown(&mut self) {
        self.orchestrator.teardown().await;
    }

    async fn sync_selection(&mut self) {
        if self
            .selection_sync
            .on_selection_inputs_changed(&self.store, &mut self.selection)
        {
            self.reconcile().await;
        }
    }

    async fn reconcile(&mut self) {
        let triple = self.identity();
        self.orchestrator
            .on_identity_changed(triple, &mut self.store)
            .await;
    }
}

impl<T: Transport> std::fmt::Debug for TerminalSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSession")
            .field("viewer", &self.viewer)
            .field("selection", &self.selection)
            .field("orchestrator", &self.orchestrator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = TerminalClient::builder().build().unwrap();
        assert_eq!(client.ws_config().url, crate::network::DEFAULT_WS_URL);
        assert_eq!(client.sync_config().default_instrument.as_str(), "BTC");
        assert_eq!(client.sync_config().default_grouping.as_str(), "1");
        assert_eq!(client.sync_config().trade_tape_capacity, 50);
    }

    #[test]
    fn test_builder_overrides() {
        let client = TerminalClient::builder()
            .ws_url("ws://localhost:9000/ws")
            .default_instrument("ETH")
            .default_grouping("10")
            .trade_tape_capacity(10)
            .build()
            .unwrap();
        assert_eq!(client.ws_config().url, "ws://localhost:9000/ws");
        assert_eq!(client.sync_config().default_instrument.as_str(), "ETH");
        assert_eq!(client.sync_config().default_grouping.as_str(), "10");
    }

    #[test]
    fn test_clear_cache_leaves_cache_empty() {
        let client = TerminalClient::builder().build().unwrap();
        tokio_test::block_on(client.clear_cache());
        assert!(tokio_test::block_on(client.contexts_cache.read()).is_none());
    }

    #[test]
    fn test_builder_rejects_zero_capacity() {
        let result = TerminalClient::builder().trade_tape_capacity(0).build();
        assert!(matches!(result, Err(SdkError::Validation(_))));
    }
}
