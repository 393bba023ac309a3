//! WebSocket layer: messages, subscriptions, events.
//!
//! The actual WS transport lives in `native.rs` (`ws-native` feature,
//! `tokio-tungstenite`). This module defines the shared message/event types.

pub mod subscriptions;

#[cfg(feature = "ws-native")]
pub mod native;

use crate::domain::account::wire::WsWebData2;
use crate::domain::asset_config::wire::WsActiveAssetData;
use crate::domain::mids::wire::WsAllMids;
use crate::domain::orderbook::wire::WsBook;
use crate::domain::trade::wire::WsTrade;
use crate::domain::user::wire::{WsUserFills, WsUserFundings};
use serde::{Deserialize, Serialize};

pub use subscriptions::SubscribeParams;

// ─── Outbound messages ───────────────────────────────────────────────────────

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum MessageOut {
    Subscribe { subscription: SubscribeParams },
    Unsubscribe { subscription: SubscribeParams },
    Ping,
}

impl MessageOut {
    pub fn subscribe(subscription: SubscribeParams) -> Self {
        Self::Subscribe { subscription }
    }

    pub fn unsubscribe(subscription: SubscribeParams) -> Self {
        Self::Unsubscribe { subscription }
    }
}

// ─── Inbound messages ────────────────────────────────────────────────────────

/// Raw inbound message from the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct MessageIn {
    pub kind: Kind,
}

/// Inbound message, discriminated by `channel` with the body under `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "channel", content = "data", rename_all = "camelCase")]
pub enum Kind {
    AllMids(WsAllMids),
    WebData2(Box<WsWebData2>),
    UserFills(WsUserFills),
    UserFundings(WsUserFundings),
    L2Book(WsBook),
    Trades(Vec<WsTrade>),
    ActiveAssetData(WsActiveAssetData),
    Pong,
    SubscriptionResponse(SubscriptionAck),
    Error(String),
}

impl Kind {
    /// Key used to route a data message to its subscription, matching
    /// [`SubscribeParams::route_key`]. `None` for control messages.
    pub fn route_key(&self) -> Option<String> {
        match self {
            Kind::AllMids(_) => Some("allMids".to_string()),
            Kind::WebData2(d) => Some(format!("webData2:{}", d.user)),
            Kind::UserFills(d) => Some(format!("userFills:{}", d.user)),
            Kind::UserFundings(d) => Some(format!("userFundings:{}", d.user)),
            Kind::L2Book(d) => Some(format!("l2Book:{}", d.coin)),
            Kind::Trades(d) => d.first().map(|t| format!("trades:{}", t.coin)),
            Kind::ActiveAssetData(d) => {
                Some(format!("activeAssetData:{}:{}", d.user, d.coin))
            }
            Kind::Pong | Kind::SubscriptionResponse(_) | Kind::Error(_) => None,
        }
    }
}

/// Echo of an accepted subscribe/unsubscribe request.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionAck {
    pub method: String,
    pub subscription: serde_json::Value,
}

impl SubscriptionAck {
    pub fn params(&self) -> Option<SubscribeParams> {
        serde_json::from_value(self.subscription.clone()).ok()
    }

    pub fn is_subscribe(&self) -> bool {
        self.method == "subscribe"
    }
}

// ─── WsEvent ─────────────────────────────────────────────────────────────────

/// Connection lifecycle events emitted by the WS client to the consumer.
/// Data messages go to subscription sinks, not here.
#[derive(Debug, Clone, PartialEq)]
pub enum WsEvent {
    /// Connection established (first connect or reconnect).
    Connected,
    /// Connection lost (may trigger reconnect).
    Disconnected { code: Option<u16>, reason: String },
    /// A deserialization or protocol error.
    Error(String),
    /// Reconnection gave up after `max_reconnect_attempts`.
    MaxReconnectReached,
}

// ─── ReadyState ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl From<u16> for ReadyState {
    fn from(v: u16) -> Self {
        match v {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }
}

// ─── WsConfig ────────────────────────────────────────────────────────────────

/// Configuration for the WS client.
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub url: String,
    pub reconnect: bool,
    pub max_reconnect_attempts: u32,
    pub base_reconnect_delay_ms: u32,
    pub ping_interval_ms: u32,
    pub pong_timeout_ms: u32,
    /// How long `subscribe` waits for the upstream acknowledgement.
    pub subscribe_timeout_ms: u32,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: crate::network::DEFAULT_WS_URL.to_string(),
            reconnect: true,
            max_reconnect_attempts: 10,
            base_reconnect_delay_ms: 1000,
            ping_interval_ms: 30_000,
            pong_timeout_ms: 10_000,
            subscribe_timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_out_wire_format() {
        let sub = MessageOut::subscribe(SubscribeParams::AllMids);
        assert_eq!(
            serde_json::to_value(&sub).unwrap(),
            serde_json::json!({"method": "subscribe", "subscription": {"type": "allMids"}})
        );
        assert_eq!(
            serde_json::to_value(&MessageOut::Ping).unwrap(),
            serde_json::json!({"method": "ping"})
        );
    }

    #[test]
    fn test_pong_without_data() {
        let msg: MessageIn = serde_json::from_str(r#"{"channel":"pong"}"#).unwrap();
        assert!(matches!(msg.kind, Kind::Pong));
        assert!(msg.kind.route_key().is_none());
    }

    #[test]
    fn test_subscription_response() {
        let msg: MessageIn = serde_json::from_str(
            r#"{"channel":"subscriptionResponse","data":{"method":"subscribe",
                "subscription":{"type":"l2Book","coin":"BTC","nSigFigs":5,"mantissa":2}}}"#,
        )
        .unwrap();
        let Kind::SubscriptionResponse(ack) = msg.kind else {
            panic!("expected subscriptionResponse");
        };
        assert!(ack.is_subscribe());
        assert_eq!(
            ack.params(),
            Some(SubscribeParams::L2Book {
                coin: "BTC".into(),
                n_sig_figs: Some(5),
                mantissa: Some(2),
            })
        );
    }

    #[test]
    fn test_route_keys_match_params() {
        let msg: MessageIn = serde_json::from_str(
            r#"{"channel":"l2Book","data":{"coin":"ETH","time":1700000000000,
                "levels":[[{"px":"3000","sz":"1","n":1}],[]]}}"#,
        )
        .unwrap();
        let params = SubscribeParams::L2Book {
            coin: "ETH".into(),
            n_sig_figs: None,
            mantissa: None,
        };
        assert_eq!(msg.kind.route_key(), Some(params.route_key()));

        let trades: MessageIn = serde_json::from_str(
            r#"{"channel":"trades","data":[{"coin":"ETH","side":"A","px":"3000",
                "sz":"0.5","time":1700000000000,"hash":"0x","tid":1}]}"#,
        )
        .unwrap();
        assert_eq!(
            trades.kind.route_key(),
            Some(SubscribeParams::Trades { coin: "ETH".into() }.route_key())
        );
    }

    #[test]
    fn test_error_channel() {
        let msg: MessageIn =
            serde_json::from_str(r#"{"channel":"error","data":"Invalid subscription"}"#).unwrap();
        assert!(matches!(msg.kind, Kind::Error(ref s) if s == "Invalid subscription"));
    }

    #[test]
    fn test_ready_state_from_u16() {
        assert_eq!(ReadyState::from(1), ReadyState::Open);
        assert_eq!(ReadyState::from(99), ReadyState::Closed);
    }
}
