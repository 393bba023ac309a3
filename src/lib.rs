//! # Perps Terminal SDK
//!
//! The client-side real-time data plane of a perpetuals trading terminal:
//! upstream subscriptions kept in step with who is looking at which instrument,
//! a snapshot store fed by those subscriptions, and a selected-instrument
//! view-model that stays fresh and survives reloads.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Shared newtypes and domain slices (always available, WASM-safe)
//! 2. **Store**: `SnapshotStore`, the latest value of every tracked topic
//! 3. **Sync**: Subscription orchestrator and selection-sync engine over a
//!    `Transport` contract
//! 4. **WebSocket**: Wire messages plus a `tokio-tungstenite` transport (`ws-native`)
//! 5. **HTTP**: `InfoHttp` for seeding asset contexts (`http`)
//! 6. **Session**: `TerminalClient` and `TerminalSession`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use perps_terminal_sdk::prelude::*;
//!
//! let client = TerminalClient::builder().build()?;
//! let mut ws = client.ws_native();
//! ws.connect().await?;
//!
//! let mut session = client.session(ws);
//! session.start().await;
//! session.seed_asset_contexts(client.asset_contexts().await?).await;
//!
//! loop {
//!     session.next().await;
//!     if let Some(asset) = session.selected() {
//!         println!("{} {}", asset.name, asset.price);
//!     }
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Store ───────────────────────────────────────────────────────────

/// Snapshot store: every tracked topic's latest value.
pub mod store;

// ── Layer 3: Sync ────────────────────────────────────────────────────────────

/// Identity triple, subscription keys, orchestrator, selection sync.
pub mod sync;

// ── Layer 4: WebSocket ───────────────────────────────────────────────────────

/// WebSocket client: messages, subscriptions, events.
pub mod ws;

// ── Layer 5: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 6: Session ─────────────────────────────────────────────────────────

/// `TerminalClient` and `TerminalSession`: the primary entry points.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{
        Address, InstrumentKind, InstrumentName, LeverageMode, Side, Viewer,
        ANONYMOUS_PLACEHOLDER,
    };

    // Domain types
    pub use crate::domain::account::{AccountSnapshot, OpenOrder, Position, TwapState};
    pub use crate::domain::asset_config::ActiveAssetConfig;
    pub use crate::domain::market::AssetContext;
    pub use crate::domain::orderbook::{
        available_groupings, quantization_params, GroupingToken, OrderbookSnapshot,
        QuantizationParams,
    };
    pub use crate::domain::selection::{
        DurableStorage, FileStorage, MemoryLocation, MemoryStorage, SelectedAsset,
        SelectionStore, UrlLocation,
    };
    #[cfg(feature = "web")]
    pub use crate::domain::selection::web::{BrowserLocation, LocalStorage};
    pub use crate::domain::trade::{Trade, TradeHistory};
    pub use crate::domain::user::{Fill, Funding};

    // Errors
    pub use crate::error::{HttpError, PersistError, SdkError, SelectionError, WsError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_WS_URL};

    // Store + sync
    pub use crate::store::{SnapshotStore, TopicError};
    pub use crate::sync::{
        IdentityTriple, MessageSink, SelectionPhase, SubscriptionHandle, SubscriptionKey,
        SyncConfig, Transport,
    };

    // Session
    pub use crate::client::{TerminalClient, TerminalClientBuilder, TerminalSession};

    // HTTP
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
    #[cfg(feature = "http")]
    pub use crate::http::InfoHttp;

    // WebSocket types
    pub use crate::ws::{Kind, MessageIn, MessageOut, SubscribeParams, WsConfig, WsEvent};
    #[cfg(feature = "ws-native")]
    pub use crate::ws::native::WsClient;
}
