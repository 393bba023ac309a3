//! Market domain: per-instrument metadata and rolling 24h context.

pub mod categories;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{InstrumentKind, InstrumentName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use categories::categories_for;
pub use state::AssetContexts;

// ─── RawAssetRecord ──────────────────────────────────────────────────────────

/// The upstream records an [`AssetContext`] was built from, kept for consumers
/// that need fields this SDK does not model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RawAssetRecord {
    Perp {
        meta: wire::WsUniverseEntry,
        ctx: wire::WsPerpAssetCtx,
    },
    Spot {
        ctx: wire::WsSpotAssetCtx,
    },
}

// ─── AssetContext ────────────────────────────────────────────────────────────

/// Metadata and 24h statistics for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetContext {
    pub name: InstrumentName,
    pub kind: InstrumentKind,
    pub size_decimals: u32,
    /// Perps only.
    pub max_leverage: Option<u32>,
    pub only_isolated: bool,
    pub mark_price: Decimal,
    pub mid_price: Option<Decimal>,
    /// Perps only.
    pub oracle_price: Option<Decimal>,
    pub prev_day_price: Decimal,
    /// Hourly funding rate. Perps only.
    pub funding_rate: Option<Decimal>,
    pub day_notional_volume: Decimal,
    /// Open interest in base units. Perps only.
    pub open_interest: Option<Decimal>,
    pub raw: RawAssetRecord,
}

impl AssetContext {
    /// Best available price: streamed mid, else context mid, else mark.
    pub fn reference_price(&self, streamed_mid: Option<Decimal>) -> Decimal {
        streamed_mid.or(self.mid_price).unwrap_or(self.mark_price)
    }
}
