//! Trade domain: public trade prints and the per-instrument tape.

mod convert;
pub mod state;
pub mod wire;

use crate::shared::{InstrumentName, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{TradeHistory, TradeTapes, DEFAULT_TAPE_CAPACITY};

/// A public trade print.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub instrument: InstrumentName,
    pub trade_id: u64,
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    pub size: Decimal,
    pub side: Side,
    pub hash: String,
}
