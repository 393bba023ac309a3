//! Orderbook domain: aggregated L2 books per instrument and display precision.

mod convert;
pub mod grouping;
pub mod state;
pub mod wire;

pub use grouping::{
    available_groupings, quantization_params, resolve_grouping, GroupingToken, QuantizationParams,
};
pub use state::{OrderBooks, OrderbookSnapshot};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One aggregated price level on either side of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub size: Decimal,
    pub orders: u32,
}
