//! Conversions from asset wire types to [`AssetContext`].

use super::wire::{WsPerpAssetCtx, WsSpotAssetCtx, WsUniverseEntry};
use super::{AssetContext, RawAssetRecord};
use crate::shared::InstrumentKind;

/// Size decimals the spot context does not carry; spot sizes are shown at this precision.
const SPOT_SIZE_DECIMALS: u32 = 2;

impl From<(WsUniverseEntry, WsPerpAssetCtx)> for AssetContext {
    fn from((meta, ctx): (WsUniverseEntry, WsPerpAssetCtx)) -> Self {
        Self {
            name: meta.name.clone(),
            kind: InstrumentKind::Perp,
            size_decimals: meta.sz_decimals,
            max_leverage: Some(meta.max_leverage),
            only_isolated: meta.only_isolated,
            mark_price: ctx.mark_px,
            mid_price: ctx.mid_px,
            oracle_price: Some(ctx.oracle_px),
            prev_day_price: ctx.prev_day_px,
            funding_rate: Some(ctx.funding),
            day_notional_volume: ctx.day_ntl_vlm,
            open_interest: Some(ctx.open_interest),
            raw: RawAssetRecord::Perp { meta, ctx },
        }
    }
}

impl From<WsSpotAssetCtx> for AssetContext {
    fn from(ctx: WsSpotAssetCtx) -> Self {
        Self {
            name: ctx.coin.clone(),
            kind: InstrumentKind::Spot,
            size_decimals: SPOT_SIZE_DECIMALS,
            max_leverage: None,
            only_isolated: false,
            mark_price: ctx.mark_px,
            mid_price: ctx.mid_px,
            oracle_price: None,
            prev_day_price: ctx.prev_day_px,
            funding_rate: None,
            day_notional_volume: ctx.day_ntl_vlm,
            open_interest: None,
            raw: RawAssetRecord::Spot { ctx },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::wire::MetaAndAssetCtxs;
    use rust_decimal::Decimal;

    #[test]
    fn test_meta_and_asset_ctxs_tuple() {
        let (meta, ctxs): MetaAndAssetCtxs = serde_json::from_str(
            r#"[
                {"universe":[{"name":"BTC","szDecimals":5,"maxLeverage":50}]},
                [{"funding":"0.0000125","openInterest":"1200.5","prevDayPx":"63000",
                  "dayNtlVlm":"1500000000","premium":null,"oraclePx":"64010",
                  "markPx":"64000","midPx":"64001","impactPxs":["64000","64002"],
                  "dayBaseVlm":"23000"}]
            ]"#,
        )
        .unwrap();

        let entry = meta.universe.into_iter().next().unwrap();
        let ctx = ctxs.into_iter().next().unwrap();
        let asset = AssetContext::from((entry, ctx));

        assert_eq!(asset.kind, InstrumentKind::Perp);
        assert_eq!(asset.max_leverage, Some(50));
        assert_eq!(asset.size_decimals, 5);
        assert_eq!(asset.open_interest, Some(Decimal::new(12005, 1)));
        assert_eq!(asset.mid_price, Some(Decimal::from(64_001)));
        assert!(matches!(asset.raw, RawAssetRecord::Perp { .. }));
    }

    #[test]
    fn test_spot_ctx_without_mid() {
        let ctx: WsSpotAssetCtx = serde_json::from_str(
            r#"{"coin":"PURR/USDC","prevDayPx":"0.2","dayNtlVlm":"100000",
                "markPx":"0.21","midPx":null,"circulatingSupply":"1000000"}"#,
        )
        .unwrap();
        let asset = AssetContext::from(ctx);
        assert_eq!(asset.kind, InstrumentKind::Spot);
        assert!(asset.mid_price.is_none());
        assert!(asset.funding_rate.is_none());
        assert_eq!(asset.reference_price(None), Decimal::new(21, 2));
    }
}
