//! User domain: the connected viewer's fills and funding payments.

mod convert;
pub mod state;
pub mod wire;

use crate::shared::{InstrumentName, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{Timestamped, UserHistory};

/// One execution against one of the viewer's orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fill {
    pub instrument: InstrumentName,
    pub price: Decimal,
    pub size: Decimal,
    pub side: Side,
    pub time: DateTime<Utc>,
    pub start_position: Decimal,
    pub direction: String,
    pub closed_pnl: Decimal,
    pub fee: Decimal,
    pub fee_token: String,
    pub order_id: u64,
    pub trade_id: u64,
    pub crossed: bool,
    pub hash: String,
}

/// One hourly funding payment on an open position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Funding {
    pub instrument: InstrumentName,
    pub time: DateTime<Utc>,
    pub usdc: Decimal,
    pub position_size: Decimal,
    pub funding_rate: Decimal,
}

impl Timestamped for Fill {
    fn timestamp(&self) -> DateTime<Utc> {
        self.time
    }
}

impl Timestamped for Funding {
    fn timestamp(&self) -> DateTime<Utc> {
        self.time
    }
}
