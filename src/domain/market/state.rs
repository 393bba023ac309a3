//! Asset-context state container.

use super::wire::{WsMeta, WsPerpAssetCtx, WsSpotAssetCtx};
use super::AssetContext;
use crate::shared::{InstrumentKind, InstrumentName};

/// Perp and spot asset contexts, each list in upstream order.
#[derive(Debug, Clone, Default)]
pub struct AssetContexts {
    perps: Vec<AssetContext>,
    spots: Vec<AssetContext>,
}

impl AssetContexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every perp context. `meta.universe` and `ctxs` are index-aligned.
    pub fn replace_perps(&mut self, meta: WsMeta, ctxs: Vec<WsPerpAssetCtx>) {
        if meta.universe.len() != ctxs.len() {
            tracing::warn!(
                universe = meta.universe.len(),
                contexts = ctxs.len(),
                "Perp universe and contexts differ in length; extra entries ignored"
            );
        }
        self.perps = meta
            .universe
            .into_iter()
            .zip(ctxs)
            .map(AssetContext::from)
            .collect();
    }

    pub fn replace_spots(&mut self, ctxs: Vec<WsSpotAssetCtx>) {
        self.spots = ctxs.into_iter().map(AssetContext::from).collect();
    }

    /// Case-insensitive lookup. An exact-case match wins; perps are preferred
    /// over spots when `kind` is not given.
    pub fn resolve(&self, name: &str, kind: Option<InstrumentKind>) -> Option<&AssetContext> {
        let pools: &[&Vec<AssetContext>] = match kind {
            Some(InstrumentKind::Perp) => &[&self.perps],
            Some(InstrumentKind::Spot) => &[&self.spots],
            None => &[&self.perps, &self.spots],
        };

        pools
            .iter()
            .find_map(|pool| pool.iter().find(|a| a.name.as_str() == name))
            .or_else(|| {
                pools
                    .iter()
                    .find_map(|pool| pool.iter().find(|a| a.name.eq_ignore_case(name)))
            })
    }

    pub fn get(&self, name: &InstrumentName, kind: InstrumentKind) -> Option<&AssetContext> {
        let pool = match kind {
            InstrumentKind::Perp => &self.perps,
            InstrumentKind::Spot => &self.spots,
        };
        pool.iter().find(|a| &a.name == name)
    }

    pub fn perps(&self) -> &[AssetContext] {
        &self.perps
    }

    pub fn spots(&self) -> &[AssetContext] {
        &self.spots
    }

    pub fn is_empty(&self) -> bool {
        self.perps.is_empty() && self.spots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::wire::WsUniverseEntry;
    use rust_decimal::Decimal;

    fn perp_ctx(mark: i64) -> WsPerpAssetCtx {
        WsPerpAssetCtx {
            funding: Decimal::ZERO,
            open_interest: Decimal::ONE,
            prev_day_px: Decimal::from(mark),
            day_ntl_vlm: Decimal::ZERO,
            premium: None,
            oracle_px: Decimal::from(mark),
            mark_px: Decimal::from(mark),
            mid_px: None,
            impact_pxs: None,
            day_base_vlm: Decimal::ZERO,
        }
    }

    fn entry(name: &str) -> WsUniverseEntry {
        WsUniverseEntry {
            name: name.into(),
            sz_decimals: 2,
            max_leverage: 10,
            only_isolated: false,
            is_delisted: false,
        }
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let mut contexts = AssetContexts::new();
        contexts.replace_perps(
            WsMeta {
                universe: vec![entry("BTC"), entry("kPEPE")],
            },
            vec![perp_ctx(65_000), perp_ctx(1)],
        );

        assert_eq!(contexts.resolve("KPEPE", None).unwrap().name.as_str(), "kPEPE");
        assert!(contexts.resolve("DOGE", None).is_none());
        assert!(contexts.resolve("BTC", Some(InstrumentKind::Spot)).is_none());
    }

    #[test]
    fn test_length_mismatch_truncates() {
        let mut contexts = AssetContexts::new();
        contexts.replace_perps(
            WsMeta {
                universe: vec![entry("BTC"), entry("ETH")],
            },
            vec![perp_ctx(65_000)],
        );
        assert_eq!(contexts.perps().len(), 1);
    }
}
