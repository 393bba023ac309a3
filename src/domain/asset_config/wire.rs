//! Wire types for the `activeAssetData` channel.

use crate::shared::{Address, InstrumentName, LeverageMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-viewer, per-instrument trading configuration.
///
/// Fields other than `user` and `coin` may be omitted by the upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsActiveAssetData {
    pub user: Address,
    pub coin: InstrumentName,
    #[serde(default)]
    pub leverage: Option<WsAssetLeverage>,
    #[serde(default)]
    pub max_leverage: Option<u32>,
    /// `[buy, sell]`.
    #[serde(default)]
    pub max_trade_szs: Option<[Decimal; 2]>,
    /// `[buy, sell]`.
    #[serde(default)]
    pub available_to_trade: Option<[Decimal; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WsAssetLeverage {
    #[serde(rename = "type")]
    pub mode: LeverageMode,
    pub value: u32,
}
