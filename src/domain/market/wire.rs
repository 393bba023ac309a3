//! Wire types for asset metadata and contexts.
//!
//! The same shapes arrive in two places: embedded in the streamed account snapshot
//! (`meta`, `assetCtxs`, `spotAssetCtxs`) and from the `metaAndAssetCtxs` info request.

use crate::shared::InstrumentName;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Perp universe. `universe[i]` describes the instrument whose context is `assetCtxs[i]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WsMeta {
    pub universe: Vec<WsUniverseEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsUniverseEntry {
    pub name: InstrumentName,
    pub sz_decimals: u32,
    pub max_leverage: u32,
    #[serde(default)]
    pub only_isolated: bool,
    #[serde(default)]
    pub is_delisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsPerpAssetCtx {
    pub funding: Decimal,
    pub open_interest: Decimal,
    pub prev_day_px: Decimal,
    pub day_ntl_vlm: Decimal,
    #[serde(default, deserialize_with = "crate::shared::serde_util::opt_decimal::deserialize")]
    pub premium: Option<Decimal>,
    pub oracle_px: Decimal,
    pub mark_px: Decimal,
    #[serde(default, deserialize_with = "crate::shared::serde_util::opt_decimal::deserialize")]
    pub mid_px: Option<Decimal>,
    #[serde(default)]
    pub impact_pxs: Option<Vec<Decimal>>,
    #[serde(default)]
    pub day_base_vlm: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WsSpotAssetCtx {
    pub coin: InstrumentName,
    pub prev_day_px: Decimal,
    pub day_ntl_vlm: Decimal,
    pub mark_px: Decimal,
    #[serde(default, deserialize_with = "crate::shared::serde_util::opt_decimal::deserialize")]
    pub mid_px: Option<Decimal>,
    #[serde(default)]
    pub circulating_supply: Decimal,
    #[serde(default)]
    pub total_supply: Decimal,
    #[serde(default)]
    pub day_base_vlm: Decimal,
}

/// `metaAndAssetCtxs` response: a two-element array `[meta, assetCtxs]`.
pub type MetaAndAssetCtxs = (WsMeta, Vec<WsPerpAssetCtx>);
