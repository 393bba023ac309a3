//! Mid-price state container.

use super::wire::WsAllMids;
use crate::shared::InstrumentName;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Latest mid price per instrument, replaced wholesale on every update.
#[derive(Debug, Clone, Default)]
pub struct AllMids {
    mids: HashMap<InstrumentName, String>,
}

impl AllMids {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, update: WsAllMids) {
        self.mids = update.mids;
    }

    /// The raw mid string as the upstream sent it.
    pub fn get(&self, instrument: &InstrumentName) -> Option<&str> {
        self.mids.get(instrument).map(String::as_str)
    }

    /// Parsed mid. `None` if absent or not a decimal.
    pub fn price(&self, instrument: &InstrumentName) -> Option<Decimal> {
        self.get(instrument).and_then(|s| Decimal::from_str(s).ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InstrumentName, &str)> {
        self.mids.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.mids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mids.is_empty()
    }
}
