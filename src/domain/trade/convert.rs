//! Conversions from wire types to domain types for trades.

use super::wire::WsTrade;
use super::Trade;

impl From<WsTrade> for Trade {
    fn from(t: WsTrade) -> Self {
        Self {
            instrument: t.coin,
            trade_id: t.tid,
            timestamp: t.time,
            price: t.px,
            size: t.sz,
            side: t.side,
            hash: t.hash,
        }
    }
}
