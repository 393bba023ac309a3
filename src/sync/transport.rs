//! The streaming-transport contract the orchestrator drives.
//!
//! A transport owns reconnection, keep-alive and re-establishing its own
//! subscriptions after a reconnect. The orchestrator only asks it to start or
//! stop one subscription at a time and receives messages through a
//! [`MessageSink`].

use super::key::SubscriptionKey;
use crate::error::WsError;
use crate::ws::{Kind, SubscribeParams};
use std::future::Future;
use tokio::sync::mpsc;

/// Identifies the subscription a message was delivered for.
///
/// `generation` increases every time the orchestrator (re)establishes a key, so a
/// late message from a superseded subscription for the same key is told apart
/// from one for the live subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionTag {
    pub key: SubscriptionKey,
    pub generation: u64,
}

/// One inbound message, tagged with the subscription it arrived for.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub tag: SubscriptionTag,
    pub payload: Kind,
}

/// Where a transport pushes messages for one subscription.
#[derive(Debug, Clone)]
pub struct MessageSink {
    tag: SubscriptionTag,
    tx: mpsc::UnboundedSender<Delivery>,
}

impl MessageSink {
    pub fn new(tag: SubscriptionTag, tx: mpsc::UnboundedSender<Delivery>) -> Self {
        Self { tag, tx }
    }

    pub fn tag(&self) -> &SubscriptionTag {
        &self.tag
    }

    /// Returns `false` once the receiving side is gone.
    pub fn deliver(&self, payload: Kind) -> bool {
        self.tx
            .send(Delivery {
                tag: self.tag.clone(),
                payload,
            })
            .is_ok()
    }
}

/// A live upstream subscription. Dropping it without calling
/// [`unsubscribe`](SubscriptionHandle::unsubscribe) leaves it running.
pub trait SubscriptionHandle {
    fn unsubscribe(self) -> impl Future<Output = Result<(), WsError>>;
}

pub trait Transport {
    type Handle: SubscriptionHandle;

    /// Starts one subscription; resolves once the upstream has accepted it.
    fn subscribe(
        &self,
        params: SubscribeParams,
        sink: MessageSink,
    ) -> impl Future<Output = Result<Self::Handle, WsError>>;
}
