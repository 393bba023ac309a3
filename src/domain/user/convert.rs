//! Conversions from wire types to domain types for fills and fundings.

use super::wire::{WsFill, WsFunding};
use super::{Fill, Funding};

impl From<WsFill> for Fill {
    fn from(f: WsFill) -> Self {
        Self {
            instrument: f.coin,
            price: f.px,
            size: f.sz,
            side: f.side,
            time: f.time,
            start_position: f.start_position,
            direction: f.dir,
            closed_pnl: f.closed_pnl,
            fee: f.fee,
            fee_token: f.fee_token,
            order_id: f.oid,
            trade_id: f.tid,
            crossed: f.crossed,
            hash: f.hash,
        }
    }
}

impl From<WsFunding> for Funding {
    fn from(f: WsFunding) -> Self {
        Self {
            instrument: f.coin,
            time: f.time,
            usdc: f.usdc,
            position_size: f.szi,
            funding_rate: f.funding_rate,
        }
    }
}
