//! Integration tests for the native WebSocket transport.
//!
//! These tests connect to the public WS endpoint and exercise the full
//! connect → subscribe → receive → unsubscribe → disconnect lifecycle, and one
//! session driven end to end over the real transport.
//!
//! All tests are `#[ignore]` because they require network access. The endpoint
//! can be overridden with `PERPS_WS_URL` / `PERPS_API_URL` in a `.env` file.
//!
//! Run with:
//! ```bash
//! cargo test --features native --test ws_native_integration -- --ignored
//! ```

#![cfg(all(feature = "ws-native", feature = "http"))]

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::time::timeout;

use perps_terminal_sdk::client::TerminalClient;
use perps_terminal_sdk::shared::InstrumentName;
use perps_terminal_sdk::sync::{
    Delivery, MessageSink, SubscriptionHandle, SubscriptionKey, SubscriptionTag, Transport,
};
use perps_terminal_sdk::ws::native::WsClient;
use perps_terminal_sdk::ws::{Kind, SubscribeParams, WsConfig, WsEvent};

const TEST_TIMEOUT: Duration = Duration::from_secs(15);

fn ws_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("PERPS_WS_URL")
        .unwrap_or_else(|_| perps_terminal_sdk::network::DEFAULT_WS_URL.to_string())
}

fn api_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("PERPS_API_URL")
        .unwrap_or_else(|_| perps_terminal_sdk::network::DEFAULT_API_URL.to_string())
}

fn test_config() -> WsConfig {
    WsConfig {
        url: ws_url(),
        reconnect: false,
        ..Default::default()
    }
}

/// Connect and wait for the `Connected` event.
async fn connected_client() -> WsClient {
    let mut client = WsClient::new(test_config());
    client.connect().await.expect("connect should succeed");

    let first = {
        let mut events = client.events();
        timeout(TEST_TIMEOUT, events.next())
            .await
            .expect("timed out waiting for Connected")
            .expect("event stream ended")
    };
    assert!(
        matches!(first, WsEvent::Connected),
        "first event should be Connected, got: {first:?}"
    );

    client
}

fn sink(key: SubscriptionKey) -> (MessageSink, mpsc::UnboundedReceiver<Delivery>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MessageSink::new(SubscriptionTag { key, generation: 1 }, tx), rx)
}

async fn next_delivery(rx: &mut mpsc::UnboundedReceiver<Delivery>) -> Delivery {
    timeout(TEST_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for a delivery")
        .expect("delivery channel closed")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn connect_and_receive_connected_event() {
    let mut client = connected_client().await;
    assert!(client.is_connected());
    client.disconnect().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn subscribe_all_mids_receives_data() {
    let mut client = connected_client().await;

    let (sink, mut rx) = sink(SubscriptionKey::AllMids);
    let handle = client
        .subscribe(SubscribeParams::AllMids, sink)
        .await
        .expect("allMids should be acknowledged");

    let delivery = next_delivery(&mut rx).await;
    match delivery.payload {
        Kind::AllMids(mids) => assert!(mids.mids.contains_key(&InstrumentName::from("BTC"))),
        other => panic!("expected AllMids, got: {other:?}"),
    }

    handle.unsubscribe().await.unwrap();
    client.disconnect().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn subscribe_quantized_book() {
    let mut client = connected_client().await;

    let key = SubscriptionKey::OrderBook {
        instrument: "BTC".into(),
        grouping: "100".into(),
    };
    let (sink, mut rx) = sink(key.clone());
    let handle = client
        .subscribe(key.to_params(), sink)
        .await
        .expect("l2Book should be acknowledged");

    match next_delivery(&mut rx).await.payload {
        Kind::L2Book(book) => {
            assert_eq!(book.coin.as_str(), "BTC");
            assert!(!book.levels[0].is_empty());
        }
        other => panic!("expected L2Book, got: {other:?}"),
    }

    handle.unsubscribe().await.unwrap();
    client.disconnect().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn unsubscribe_stops_delivery() {
    let mut client = connected_client().await;

    let (sink, mut rx) = sink(SubscriptionKey::AllMids);
    let handle = client
        .subscribe(SubscribeParams::AllMids, sink)
        .await
        .expect("subscribe");
    next_delivery(&mut rx).await;

    handle.unsubscribe().await.unwrap();
    while rx.try_recv().is_ok() {}

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(rx.try_recv().is_err(), "no delivery expected after unsubscribe");

    client.disconnect().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn session_bootstraps_default_instrument() {
    let client = TerminalClient::builder()
        .api_url(&api_url())
        .ws_config(test_config())
        .build()
        .unwrap();

    let mut ws = client.ws_native();
    ws.connect().await.unwrap();
    let mut session = client.session(ws);
    session.start().await;
    session
        .seed_asset_contexts(client.asset_contexts().await.unwrap())
        .await;

    timeout(TEST_TIMEOUT, async {
        while session.selected().is_none() {
            session.next().await;
        }
    })
    .await
    .expect("selection should bootstrap");

    assert_eq!(session.selected().unwrap().name.as_str(), "BTC");
    assert!(session.orchestrator().is_active(&SubscriptionKey::Trades {
        instrument: "BTC".into()
    }));

    session.shutdown().await;
}

#[tokio::test]
#[ignore]
async fn graceful_disconnect() {
    let mut client = connected_client().await;
    assert!(client.is_connected());

    client
        .disconnect()
        .await
        .expect("disconnect should succeed");
    assert!(!client.is_connected());
}
