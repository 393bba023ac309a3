//! Wire types for the `webData2` channel, the per-viewer account snapshot.

use crate::domain::market::wire::{WsMeta, WsPerpAssetCtx, WsSpotAssetCtx};
use crate::shared::{Address, InstrumentName, LeverageMode, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One complete account snapshot. Every message replaces the previous one.
///
/// Public asset contexts ride along in the same payload, so this channel also
/// feeds market statistics while the anonymous placeholder is subscribed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsWebData2 {
    pub clearinghouse_state: WsClearinghouseState,
    #[serde(default)]
    pub open_orders: Vec<WsOpenOrder>,
    #[serde(default)]
    pub meta: Option<WsMeta>,
    #[serde(default)]
    pub asset_ctxs: Option<Vec<WsPerpAssetCtx>>,
    #[serde(default)]
    pub spot_asset_ctxs: Option<Vec<WsSpotAssetCtx>>,
    /// `[id, state]` pairs.
    #[serde(default)]
    pub twap_states: Vec<(u64, WsTwapState)>,
    #[serde(default)]
    pub spot_state: Option<WsSpotState>,
    #[serde(with = "crate::shared::serde_util::timestamp_ms")]
    pub server_time: DateTime<Utc>,
    pub user: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsClearinghouseState {
    pub margin_summary: WsMarginSummary,
    pub cross_margin_summary: WsMarginSummary,
    #[serde(default)]
    pub cross_maintenance_margin_used: Decimal,
    pub withdrawable: Decimal,
    #[serde(default)]
    pub asset_positions: Vec<WsAssetPosition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsMarginSummary {
    pub account_value: Decimal,
    pub total_ntl_pos: Decimal,
    pub total_raw_usd: Decimal,
    pub total_margin_used: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WsAssetPosition {
    pub position: WsPosition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsPosition {
    pub coin: InstrumentName,
    /// Signed size: positive long, negative short.
    pub szi: Decimal,
    pub leverage: WsLeverage,
    #[serde(default, deserialize_with = "crate::shared::serde_util::opt_decimal::deserialize")]
    pub entry_px: Option<Decimal>,
    pub position_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub return_on_equity: Decimal,
    #[serde(default, deserialize_with = "crate::shared::serde_util::opt_decimal::deserialize")]
    pub liquidation_px: Option<Decimal>,
    pub margin_used: Decimal,
    pub max_leverage: u32,
    #[serde(default)]
    pub cum_funding: Option<WsCumFunding>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsLeverage {
    #[serde(rename = "type")]
    pub mode: LeverageMode,
    pub value: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsCumFunding {
    pub all_time: Decimal,
    pub since_open: Decimal,
    pub since_change: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsOpenOrder {
    pub coin: InstrumentName,
    pub side: Side,
    pub limit_px: Decimal,
    pub sz: Decimal,
    pub oid: u64,
    #[serde(with = "crate::shared::serde_util::timestamp_ms")]
    pub timestamp: DateTime<Utc>,
    pub orig_sz: Decimal,
    #[serde(default)]
    pub reduce_only: bool,
    #[serde(default)]
    pub order_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsTwapState {
    pub coin: InstrumentName,
    pub side: Side,
    pub sz: Decimal,
    pub executed_sz: Decimal,
    pub executed_ntl: Decimal,
    pub minutes: u32,
    pub reduce_only: bool,
    pub randomize: bool,
    #[serde(with = "crate::shared::serde_util::timestamp_ms")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WsSpotState {
    #[serde(default)]
    pub balances: Vec<WsSpotBalance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsSpotBalance {
    pub coin: String,
    pub hold: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub entry_ntl: Decimal,
}
