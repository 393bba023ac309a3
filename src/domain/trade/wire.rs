//! Wire types for trade messages (WS `trades` channel).

use crate::shared::{InstrumentName, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// WS trade event. The channel delivers these as an array per message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WsTrade {
    pub coin: InstrumentName,
    pub side: Side,
    pub px: Decimal,
    pub sz: Decimal,
    #[serde(with = "crate::shared::serde_util::timestamp_ms")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub hash: String,
    pub tid: u64,
}
