//! Wire types for per-viewer history channels (`userFills`, `userFundings`).

use crate::shared::{Address, InstrumentName, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `userFills` payload. The first message after subscribing is a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsUserFills {
    #[serde(default)]
    pub is_snapshot: bool,
    pub user: Address,
    pub fills: Vec<WsFill>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsFill {
    pub coin: InstrumentName,
    pub px: Decimal,
    pub sz: Decimal,
    pub side: Side,
    #[serde(with = "crate::shared::serde_util::timestamp_ms")]
    pub time: DateTime<Utc>,
    pub start_position: Decimal,
    /// Human-readable direction, e.g. `"Open Long"`, `"Close Short"`.
    pub dir: String,
    pub closed_pnl: Decimal,
    pub hash: String,
    pub oid: u64,
    pub crossed: bool,
    pub fee: Decimal,
    pub tid: u64,
    #[serde(default)]
    pub fee_token: String,
}

/// `userFundings` payload. Same snapshot/incremental duality as fills.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsUserFundings {
    #[serde(default)]
    pub is_snapshot: bool,
    pub user: Address,
    pub fundings: Vec<WsFunding>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsFunding {
    #[serde(with = "crate::shared::serde_util::timestamp_ms")]
    pub time: DateTime<Utc>,
    pub coin: InstrumentName,
    /// Amount paid (negative) or received, in USDC.
    pub usdc: Decimal,
    /// Signed position size the payment was computed on.
    pub szi: Decimal,
    pub funding_rate: Decimal,
}
