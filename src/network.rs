//! Network URL constants for the terminal SDK.

/// Default REST API base URL (the `/info` endpoint lives under it).
pub const DEFAULT_API_URL: &str = "https://api.hyperliquid.xyz";

/// Default WebSocket URL.
pub const DEFAULT_WS_URL: &str = "wss://api.hyperliquid.xyz/ws";
