//! Active-asset config domain: per-instrument leverage settings for the viewer.

mod convert;
pub mod state;
pub mod wire;

use crate::shared::{InstrumentName, LeverageMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::AssetConfigs;

/// Resolved configuration for one instrument. Every field is populated, from the
/// freshest message, else what was learned earlier, else [`AssetConfigFallback`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAssetConfig {
    pub instrument: InstrumentName,
    pub leverage: u32,
    pub mode: LeverageMode,
    pub max_leverage: u32,
    /// `[buy, sell]`, if the upstream has sent them.
    pub max_trade_sizes: Option<[Decimal; 2]>,
    pub available_to_trade: Option<[Decimal; 2]>,
}

/// One partial update. `None` means "not present in this message".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetConfigUpdate {
    pub instrument: InstrumentName,
    pub leverage: Option<u32>,
    pub mode: Option<LeverageMode>,
    pub max_leverage: Option<u32>,
    pub max_trade_sizes: Option<[Decimal; 2]>,
    pub available_to_trade: Option<[Decimal; 2]>,
}

/// Values used for any field nothing has ever reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetConfigFallback {
    pub leverage: u32,
    pub mode: LeverageMode,
    pub max_leverage: u32,
}

impl Default for AssetConfigFallback {
    fn default() -> Self {
        Self {
            leverage: 20,
            mode: LeverageMode::Cross,
            max_leverage: 50,
        }
    }
}
