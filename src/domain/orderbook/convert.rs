//! Conversion: WsLevel → BookLevel.

use super::wire::WsLevel;
use super::BookLevel;

impl From<&WsLevel> for BookLevel {
    fn from(level: &WsLevel) -> Self {
        Self {
            price: level.px,
            size: level.sz,
            orders: level.n,
        }
    }
}
