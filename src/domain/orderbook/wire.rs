//! Wire types for order-book messages (WS `l2Book` channel).

use crate::shared::InstrumentName;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// WS order-book snapshot. Every message is a full snapshot of both sides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WsBook {
    pub coin: InstrumentName,
    #[serde(with = "crate::shared::serde_util::timestamp_ms")]
    pub time: DateTime<Utc>,
    /// `[bids, asks]`, each already sorted best-first.
    pub levels: [Vec<WsLevel>; 2],
}

/// A single aggregated price level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WsLevel {
    pub px: Decimal,
    pub sz: Decimal,
    /// Number of resting orders at this level.
    pub n: u32,
}
