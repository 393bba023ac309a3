//! Selection domain: the "currently selected instrument" view-model, its
//! store, and persistence across page loads.

mod convert;
pub mod persist;
pub mod state;
#[cfg(feature = "web")]
pub mod web;

use crate::domain::market::RawAssetRecord;
use crate::shared::{InstrumentKind, InstrumentName};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use persist::{
    decode_trade_path, encode_trade_path, DurableStorage, FileStorage, MemoryLocation,
    MemoryStorage, PersistedSelection, UrlLocation, SELECTION_STORAGE_KEY,
};
pub use state::{RestoreCandidate, SelectionStore};

// ─── SelectedAsset ───────────────────────────────────────────────────────────

/// Denormalized view of the selected instrument, recomputed whenever mids or
/// asset contexts change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedAsset {
    pub name: InstrumentName,
    pub kind: InstrumentKind,
    /// Streamed mid if known, else the context mid, else mark.
    pub price: Decimal,
    pub mark_price: Decimal,
    pub oracle_price: Option<Decimal>,
    pub prev_day_price: Decimal,
    pub change_24h: Decimal,
    /// Percent, e.g. `2.5` for +2.5%.
    pub change_24h_pct: Decimal,
    pub funding_rate: Option<Decimal>,
    pub volume_24h: Decimal,
    /// Base units.
    pub open_interest: Option<Decimal>,
    /// Open interest valued at the mark price.
    pub open_interest_notional: Option<Decimal>,
    pub max_leverage: Option<u32>,
    pub size_decimals: u32,
    pub categories: Vec<String>,
    pub raw: RawAssetRecord,
    pub selected_at: DateTime<Utc>,
}

impl SelectedAsset {
    pub fn persisted(&self) -> PersistedSelection {
        PersistedSelection {
            name: self.name.to_string(),
            kind: self.kind,
            selected_at: self.selected_at,
        }
    }
}
