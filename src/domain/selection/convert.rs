//! Builds [`SelectedAsset`] from market data.

use super::SelectedAsset;
use crate::domain::market::{categories_for, AssetContext};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

impl SelectedAsset {
    /// Computes the full view-model. `max_leverage` overrides the context's
    /// value when the viewer's config channel has reported one.
    pub fn build(
        ctx: &AssetContext,
        streamed_mid: Option<Decimal>,
        max_leverage: Option<u32>,
        selected_at: DateTime<Utc>,
    ) -> Self {
        let price = ctx.reference_price(streamed_mid);
        let change_24h = price - ctx.prev_day_price;
        let change_24h_pct = if ctx.prev_day_price.is_zero() {
            Decimal::ZERO
        } else {
            (change_24h / ctx.prev_day_price * Decimal::ONE_HUNDRED).round_dp(4)
        };

        Self {
            name: ctx.name.clone(),
            kind: ctx.kind,
            price,
            mark_price: ctx.mark_price,
            oracle_price: ctx.oracle_price,
            prev_day_price: ctx.prev_day_price,
            change_24h,
            change_24h_pct,
            funding_rate: ctx.funding_rate,
            volume_24h: ctx.day_notional_volume,
            open_interest: ctx.open_interest,
            open_interest_notional: ctx.open_interest.map(|oi| oi * ctx.mark_price),
            max_leverage: max_leverage.or(ctx.max_leverage),
            size_decimals: ctx.size_decimals,
            categories: categories_for(&ctx.name, ctx.kind),
            raw: ctx.raw.clone(),
            selected_at,
        }
    }
}
