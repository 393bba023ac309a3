//! Subscription orchestrator: reconciles the active subscription set against the
//! identity triple.
//!
//! Every identity pass computes the required key set, releases what is no longer
//! required, then acquires what is missing. All releases of a pass are awaited
//! before its first acquire, so a replaced key never has two live upstream
//! subscriptions at once.
//!
//! Each acquired subscription gets a fresh generation number. Deliveries carry the
//! generation they were subscribed under; anything that no longer matches the
//! active entry for its key is dropped before it reaches the store.

use super::identity::IdentityTriple;
use super::key::{required_keys, SubscriptionKey};
use super::transport::{Delivery, MessageSink, SubscriptionHandle, SubscriptionTag, Transport};
use crate::store::SnapshotStore;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::mpsc;

// ─── ReconcilePlan ───────────────────────────────────────────────────────────

/// The diff between the active and the required key sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Active but no longer required.
    pub release: Vec<SubscriptionKey>,
    /// Required but not active.
    pub acquire: Vec<SubscriptionKey>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.release.is_empty() && self.acquire.is_empty()
    }
}

/// Pure diff. Keys present in both sets are left alone.
pub fn plan<'a>(
    active: impl IntoIterator<Item = &'a SubscriptionKey>,
    required: &BTreeSet<SubscriptionKey>,
) -> ReconcilePlan {
    let active: BTreeSet<&SubscriptionKey> = active.into_iter().collect();
    ReconcilePlan {
        release: active
            .iter()
            .filter(|k| !required.contains(**k))
            .map(|k| (*k).clone())
            .collect(),
        acquire: required
            .iter()
            .filter(|k| !active.contains(k))
            .cloned()
            .collect(),
    }
}

// ─── SubscriptionOrchestrator ────────────────────────────────────────────────

struct ActiveEntry<H> {
    generation: u64,
    handle: H,
}

/// Owns the active subscription set. At most one entry per key.
pub struct SubscriptionOrchestrator<T: Transport> {
    transport: T,
    active: BTreeMap<SubscriptionKey, ActiveEntry<T::Handle>>,
    current: Option<IdentityTriple>,
    next_generation: u64,
    delivery_tx: mpsc::UnboundedSender<Delivery>,
    delivery_rx: mpsc::UnboundedReceiver<Delivery>,
}

impl<T: Transport> SubscriptionOrchestrator<T> {
    pub fn new(transport: T) -> Self {
        let (delivery_tx, delivery_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            active: BTreeMap::new(),
            current: None,
            next_generation: 1,
            delivery_tx,
            delivery_rx,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The triple of the last completed pass.
    pub fn identity(&self) -> Option<&IdentityTriple> {
        self.current.as_ref()
    }

    pub fn active_keys(&self) -> impl Iterator<Item = &SubscriptionKey> {
        self.active.keys()
    }

    pub fn is_active(&self, key: &SubscriptionKey) -> bool {
        self.active.contains_key(key)
    }

    /// Brings the active set in line with `triple`.
    ///
    /// An unchanged triple performs no network operations. Failures never escape:
    /// subscribe failures become per-topic errors in the store and are retried on
    /// the next pass with a different triple.
    pub async fn on_identity_changed(&mut self, triple: IdentityTriple, store: &mut SnapshotStore) {
        if self.current.as_ref() == Some(&triple) {
            return;
        }

        let viewer_changed = self
            .current
            .as_ref()
            .is_some_and(|current| current.viewer != triple.viewer);

        let required = required_keys(&triple);
        let diff = plan(self.active.keys(), &required);
        tracing::info!(
            identity = %triple,
            release = diff.release.len(),
            acquire = diff.acquire.len(),
            "Identity pass"
        );

        for key in &diff.release {
            self.release(key, store).await;
        }
        if viewer_changed {
            store.forget_viewer();
        }
        for key in diff.acquire {
            self.acquire(key, store).await;
        }

        let stale_errors: Vec<SubscriptionKey> = store
            .topic_errors()
            .filter(|e| !required.contains(&e.key))
            .map(|e| e.key.clone())
            .collect();
        for key in &stale_errors {
            store.clear_topic_error(key);
        }

        self.current = Some(triple);
    }

    /// Unsubscribes every active entry. Errors are logged and ignored; the next
    /// identity pass starts from an empty set.
    pub async fn teardown(&mut self) {
        let active = std::mem::take(&mut self.active);
        tracing::info!("Tearing down {} subscription(s)", active.len());
        for (key, entry) in active {
            if let Err(e) = entry.handle.unsubscribe().await {
                tracing::warn!(%key, "Unsubscribe failed during teardown: {}", e);
            }
        }
        self.current = None;
    }

    /// Applies one delivery if it belongs to a live entry. Returns whether it was
    /// applied.
    pub fn handle_delivery(&self, delivery: Delivery, store: &mut SnapshotStore) -> bool {
        let live = self
            .active
            .get(&delivery.tag.key)
            .is_some_and(|entry| entry.generation == delivery.tag.generation);
        if !live {
            tracing::trace!(
                key = %delivery.tag.key,
                generation = delivery.tag.generation,
                "Dropping stale delivery"
            );
            return false;
        }
        store.apply(&delivery.tag.key, delivery.payload);
        true
    }

    /// Applies every queued delivery without waiting. Returns how many were applied.
    pub fn pump(&mut self, store: &mut SnapshotStore) -> usize {
        let mut applied = 0;
        while let Ok(delivery) = self.delivery_rx.try_recv() {
            if self.handle_delivery(delivery, store) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next delivery from any subscription.
    pub async fn next_delivery(&mut self) -> Option<Delivery> {
        self.delivery_rx.recv().await
    }

    async fn release(&mut self, key: &SubscriptionKey, store: &mut SnapshotStore) {
        let Some(entry) = self.active.remove(key) else {
            return;
        };
        tracing::debug!(%key, generation = entry.generation, "Unsubscribing");
        if let Err(e) = entry.handle.unsubscribe().await {
            tracing::warn!(%key, "Unsubscribe failed: {}", e);
        }
        store.evict(key);
    }

    async fn acquire(&mut self, key: SubscriptionKey, store: &mut SnapshotStore) {
        let generation = self.next_generation;
        self.next_generation += 1;

        let sink = MessageSink::new(
            SubscriptionTag {
                key: key.clone(),
                generation,
            },
            self.delivery_tx.clone(),
        );

        tracing::debug!(%key, generation, "Subscribing");
        match self.transport.subscribe(key.to_params(), sink).await {
            Ok(handle) => {
                store.clear_topic_error(&key);
                self.active.insert(key, ActiveEntry { generation, handle });
            }
            Err(e) => {
                tracing::warn!(%key, "Subscribe failed: {}", e);
                store.record_topic_error(key, e.to_string());
            }
        }
    }
}

impl<T: Transport> std::fmt::Debug for SubscriptionOrchestrator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionOrchestrator")
            .field("current", &self.current)
            .field("active", &self.active.keys().collect::<Vec<_>>())
            .finish()
    }
}
