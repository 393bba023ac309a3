//! Active-asset config state: additive, never drops instruments.

use super::{ActiveAssetConfig, AssetConfigFallback, AssetConfigUpdate};
use crate::shared::{InstrumentName, LeverageMode};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
struct Learned {
    leverage: Option<u32>,
    mode: Option<LeverageMode>,
    max_leverage: Option<u32>,
    max_trade_sizes: Option<[Decimal; 2]>,
    available_to_trade: Option<[Decimal; 2]>,
}

/// Everything learned so far about per-instrument leverage, keyed by instrument.
///
/// A message for one instrument never touches the others, so max leverage learned
/// while an instrument was selected survives after switching away from it.
#[derive(Debug, Clone, Default)]
pub struct AssetConfigs {
    learned: HashMap<InstrumentName, Learned>,
    fallback: AssetConfigFallback,
}

impl AssetConfigs {
    pub fn new(fallback: AssetConfigFallback) -> Self {
        Self {
            learned: HashMap::new(),
            fallback,
        }
    }

    /// Field-wise merge: a value present in `update` wins, otherwise the
    /// previously learned value is kept.
    pub fn merge(&mut self, update: AssetConfigUpdate) {
        let entry = self.learned.entry(update.instrument).or_default();
        entry.leverage = update.leverage.or(entry.leverage);
        entry.mode = update.mode.or(entry.mode);
        entry.max_leverage = update.max_leverage.or(entry.max_leverage);
        entry.max_trade_sizes = update.max_trade_sizes.or(entry.max_trade_sizes);
        entry.available_to_trade = update.available_to_trade.or(entry.available_to_trade);
    }

    /// Records a max leverage from market metadata. Never overrides a value
    /// already learned from the config channel.
    pub fn learn_max_leverage(&mut self, instrument: &InstrumentName, max_leverage: u32) {
        let entry = self.learned.entry(instrument.clone()).or_default();
        if entry.max_leverage.is_none() {
            entry.max_leverage = Some(max_leverage);
        }
    }

    /// Drops the per-viewer parts (leverage, mode, trade sizes) for every
    /// instrument. Max leverage is a property of the instrument and is kept.
    pub fn forget_viewer(&mut self) {
        for entry in self.learned.values_mut() {
            entry.leverage = None;
            entry.mode = None;
            entry.max_trade_sizes = None;
            entry.available_to_trade = None;
        }
    }

    /// Resolved config for `instrument`. Unknown instruments resolve to the fallback.
    pub fn get(&self, instrument: &InstrumentName) -> ActiveAssetConfig {
        let learned = self.learned.get(instrument);
        ActiveAssetConfig {
            instrument: instrument.clone(),
            leverage: learned
                .and_then(|l| l.leverage)
                .unwrap_or(self.fallback.leverage),
            mode: learned.and_then(|l| l.mode).unwrap_or(self.fallback.mode),
            max_leverage: learned
                .and_then(|l| l.max_leverage)
                .unwrap_or(self.fallback.max_leverage),
            max_trade_sizes: learned.and_then(|l| l.max_trade_sizes),
            available_to_trade: learned.and_then(|l| l.available_to_trade),
        }
    }

    /// Max leverage learned from either source, without the fallback.
    pub fn max_leverage(&self, instrument: &InstrumentName) -> Option<u32> {
        self.learned.get(instrument).and_then(|l| l.max_leverage)
    }

    pub fn contains(&self, instrument: &InstrumentName) -> bool {
        self.learned.contains_key(instrument)
    }

    pub fn len(&self) -> usize {
        self.learned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.learned.is_empty()
    }
}
