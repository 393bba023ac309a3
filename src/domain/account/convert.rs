//! Conversions from the `webData2` wire payload to account domain types.

use super::wire::{WsOpenOrder, WsPosition, WsSpotBalance, WsTwapState, WsWebData2};
use super::{AccountSnapshot, AccountUpdate, OpenOrder, Position, SpotBalance, TwapState};
use rust_decimal::Decimal;

impl From<WsPosition> for Position {
    fn from(p: WsPosition) -> Self {
        Self {
            instrument: p.coin,
            size: p.szi,
            leverage_mode: p.leverage.mode,
            leverage: p.leverage.value,
            max_leverage: p.max_leverage,
            entry_price: p.entry_px,
            position_value: p.position_value,
            unrealized_pnl: p.unrealized_pnl,
            return_on_equity: p.return_on_equity,
            liquidation_price: p.liquidation_px,
            margin_used: p.margin_used,
            funding_since_open: p
                .cum_funding
                .map(|f| f.since_open)
                .unwrap_or(Decimal::ZERO),
        }
    }
}

impl From<WsOpenOrder> for OpenOrder {
    fn from(o: WsOpenOrder) -> Self {
        Self {
            instrument: o.coin,
            order_id: o.oid,
            side: o.side,
            price: o.limit_px,
            remaining: o.sz,
            original_size: o.orig_sz,
            reduce_only: o.reduce_only,
            order_type: o.order_type,
            placed_at: o.timestamp,
        }
    }
}

impl From<WsSpotBalance> for SpotBalance {
    fn from(b: WsSpotBalance) -> Self {
        Self {
            token: b.coin,
            total: b.total,
            hold: b.hold,
            entry_notional: b.entry_ntl,
        }
    }
}

impl From<(u64, WsTwapState)> for TwapState {
    fn from((id, t): (u64, WsTwapState)) -> Self {
        Self {
            id,
            instrument: t.coin,
            side: t.side,
            size: t.sz,
            executed_size: t.executed_sz,
            executed_notional: t.executed_ntl,
            minutes: t.minutes,
            reduce_only: t.reduce_only,
            randomize: t.randomize,
            started_at: t.timestamp,
        }
    }
}

impl From<WsWebData2> for AccountUpdate {
    fn from(data: WsWebData2) -> Self {
        let ch = data.clearinghouse_state;
        let snapshot = AccountSnapshot {
            user: data.user,
            account_value: ch.margin_summary.account_value,
            total_notional: ch.margin_summary.total_ntl_pos,
            total_margin_used: ch.margin_summary.total_margin_used,
            cross_account_value: ch.cross_margin_summary.account_value,
            cross_maintenance_margin_used: ch.cross_maintenance_margin_used,
            withdrawable: ch.withdrawable,
            positions: ch
                .asset_positions
                .into_iter()
                .map(|ap| ap.position.into())
                .collect(),
            open_orders: data.open_orders.into_iter().map(Into::into).collect(),
            spot_balances: data
                .spot_state
                .map(|s| s.balances.into_iter().map(Into::into).collect())
                .unwrap_or_default(),
            server_time: data.server_time,
        };

        let perp_contexts = match (data.meta, data.asset_ctxs) {
            (Some(meta), Some(ctxs)) => Some((meta, ctxs)),
            _ => None,
        };

        Self {
            snapshot,
            twap_states: data.twap_states.into_iter().map(Into::into).collect(),
            perp_contexts,
            spot_contexts: data.spot_asset_ctxs,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::LeverageMode;

    pub(crate) const WEB_DATA2: &str = r#"{
        "clearinghouseState": {
            "marginSummary": {"accountValue":"10500.25","totalNtlPos":"6400","totalRawUsd":"4100.25","totalMarginUsed":"320"},
            "crossMarginSummary": {"accountValue":"10500.25","totalNtlPos":"6400","totalRawUsd":"4100.25","totalMarginUsed":"320"},
            "crossMaintenanceMarginUsed": "80",
            "withdrawable": "10180.25",
            "assetPositions": [{
                "type": "oneWay",
                "position": {
                    "coin": "BTC", "szi": "0.1",
                    "leverage": {"type": "cross", "value": 20},
                    "entryPx": "63000", "positionValue": "6400", "unrealizedPnl": "100",
                    "returnOnEquity": "0.31", "liquidationPx": null, "marginUsed": "320",
                    "maxLeverage": 50,
                    "cumFunding": {"allTime": "1.5", "sinceOpen": "0.5", "sinceChange": "0.5"}
                }
            }],
            "time": 1700000000000
        },
        "openOrders": [{
            "coin": "ETH", "side": "A", "limitPx": "3500", "sz": "1", "oid": 99,
            "timestamp": 1700000000000, "origSz": "2"
        }],
        "meta": {"universe": [{"name":"BTC","szDecimals":5,"maxLeverage":50}]},
        "assetCtxs": [{"funding":"0.0000125","openInterest":"1200","prevDayPx":"62000",
                       "dayNtlVlm":"1000000","oraclePx":"64010","markPx":"64000","midPx":"64001"}],
        "twapStates": [[7, {"coin":"BTC","user":"0x01","side":"B","sz":"1","executedSz":"0.25",
                            "executedNtl":"16000","minutes":30,"reduceOnly":false,"randomize":true,
                            "timestamp":1700000000000}]],
        "serverTime": 1700000000500,
        "user": "0x0000000000000000000000000000000000000001"
    }"#;

    #[test]
    fn test_web_data2_split() {
        let wire: WsWebData2 = serde_json::from_str(WEB_DATA2).unwrap();
        let update = AccountUpdate::from(wire);

        let snap = &update.snapshot;
        assert_eq!(snap.account_value, Decimal::new(1050025, 2));
        assert_eq!(snap.positions.len(), 1);
        let btc = snap.position(&"BTC".into()).unwrap();
        assert!(btc.is_long());
        assert_eq!(btc.leverage_mode, LeverageMode::Cross);
        assert_eq!(btc.funding_since_open, Decimal::new(5, 1));
        assert!(btc.liquidation_price.is_none());

        assert_eq!(snap.open_orders_for(&"ETH".into()).count(), 1);

        assert_eq!(update.twap_states.len(), 1);
        assert_eq!(update.twap_states[0].id, 7);
        assert_eq!(update.twap_states[0].progress(), Decimal::new(25, 2));
        assert_eq!(
            update.twap_states[0].average_price(),
            Some(Decimal::from(64_000))
        );

        let (meta, ctxs) = update.perp_contexts.unwrap();
        assert_eq!(meta.universe.len(), ctxs.len());
        assert!(update.spot_contexts.is_none());
    }
}
