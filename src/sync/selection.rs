//! Selection-sync engine: keeps the selected-instrument view-model fresh and
//! bootstraps it on first load.
//!
//! `Uninitialized → Bootstrapping → Selected(name) → Selected(name')`. The only
//! way back to `Bootstrapping` is an explicit [`SelectionSync::clear`].

use crate::domain::market::AssetContext;
use crate::domain::orderbook::resolve_grouping;
use crate::domain::selection::{SelectedAsset, SelectionStore};
use crate::error::SelectionError;
use crate::shared::InstrumentName;
use crate::store::SnapshotStore;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPhase {
    Uninitialized,
    /// Waiting until both mids and asset contexts have arrived.
    Bootstrapping,
    Selected(InstrumentName),
}

#[derive(Debug)]
pub struct SelectionSync {
    phase: SelectionPhase,
    default_instrument: InstrumentName,
    /// `(mids_revision, contexts_revision)` of the last observed inputs.
    observed: Option<(u64, u64)>,
}

impl SelectionSync {
    pub fn new(default_instrument: InstrumentName) -> Self {
        Self {
            phase: SelectionPhase::Uninitialized,
            default_instrument,
            observed: None,
        }
    }

    pub fn phase(&self) -> &SelectionPhase {
        &self.phase
    }

    /// Reacts to a possible change in mids or asset contexts.
    ///
    /// Returns whether the selected instrument or the grouping changed, i.e.
    /// whether the identity triple needs another pass.
    pub fn on_selection_inputs_changed(
        &mut self,
        store: &SnapshotStore,
        selection: &mut SelectionStore,
    ) -> bool {
        let revisions = (store.mids_revision(), store.contexts_revision());
        if self.observed == Some(revisions) {
            return false;
        }
        self.observed = Some(revisions);

        if self.phase == SelectionPhase::Uninitialized {
            self.phase = SelectionPhase::Bootstrapping;
        }

        match &self.phase {
            SelectionPhase::Selected(_) => self.refresh(store, selection),
            _ => self.bootstrap(store, selection),
        }
    }

    /// User-driven selection. Unknown names leave everything unchanged.
    ///
    /// Returns whether the grouping had to change for the new instrument's price.
    pub fn select(
        &mut self,
        name: &str,
        store: &SnapshotStore,
        selection: &mut SelectionStore,
    ) -> Result<bool, SelectionError> {
        let contexts = store.asset_contexts();
        if contexts.is_empty() {
            return Err(SelectionError::DataNotReady);
        }
        let ctx = contexts
            .resolve(name, None)
            .ok_or_else(|| SelectionError::UnknownInstrument(name.to_string()))?;

        Ok(self.commit(store, ctx, selection))
    }

    /// Forgets the selection; the next input change bootstraps again.
    pub fn clear(&mut self, selection: &mut SelectionStore) {
        selection.clear();
        self.phase = SelectionPhase::Bootstrapping;
        self.observed = None;
    }

    fn bootstrap(&mut self, store: &SnapshotStore, selection: &mut SelectionStore) -> bool {
        if let Some(current) = selection.selected() {
            self.phase = SelectionPhase::Selected(current.name.clone());
            return self.refresh(store, selection);
        }

        let contexts = store.asset_contexts();
        if store.mids().is_empty() || contexts.is_empty() {
            return false;
        }

        let restored = selection.restore_candidates().into_iter().find_map(|c| {
            let found = contexts.resolve(&c.name, c.kind);
            if found.is_none() {
                tracing::warn!(name = %c.name, "Persisted instrument not found");
            }
            found
        });

        let ctx = match restored {
            Some(ctx) => ctx,
            None => match contexts.resolve(self.default_instrument.as_str(), None) {
                Some(ctx) => ctx,
                None => {
                    tracing::warn!(
                        name = %self.default_instrument,
                        "Default instrument not found, still bootstrapping"
                    );
                    return false;
                }
            },
        };

        tracing::info!(name = %ctx.name, kind = %ctx.kind, "Selection bootstrapped");
        self.commit(store, ctx, selection);
        true
    }

    fn refresh(&mut self, store: &SnapshotStore, selection: &mut SelectionStore) -> bool {
        if selection.selected().is_none() {
            self.phase = SelectionPhase::Bootstrapping;
            return self.bootstrap(store, selection);
        }
        let Some(current) = selection.selected() else {
            return false;
        };

        let Some(ctx) = store.asset_contexts().get(&current.name, current.kind) else {
            tracing::debug!(name = %current.name, "No context for selected instrument");
            return false;
        };

        let asset = build(store, ctx, current.selected_at);
        let grouping = resolve_grouping(selection.grouping(), asset.price);
        selection.refresh(asset);
        selection.set_grouping(grouping)
    }

    fn commit(
        &mut self,
        store: &SnapshotStore,
        ctx: &AssetContext,
        selection: &mut SelectionStore,
    ) -> bool {
        let asset = build(store, ctx, Utc::now());
        let grouping = resolve_grouping(selection.grouping(), asset.price);

        self.phase = SelectionPhase::Selected(asset.name.clone());
        if let Err(e) = selection.select(asset) {
            tracing::warn!("Failed to persist selection: {}", e);
        }
        selection.set_grouping(grouping)
    }
}

fn build(store: &SnapshotStore, ctx: &AssetContext, selected_at: DateTime<Utc>) -> SelectedAsset {
    SelectedAsset::build(
        ctx,
        store.mids().price(&ctx.name),
        store.asset_configs().max_leverage(&ctx.name),
        selected_at,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::wire::{WsMeta, WsPerpAssetCtx, WsUniverseEntry};
    use crate::domain::mids::wire::WsAllMids;
    use crate::domain::orderbook::GroupingToken;
    use crate::domain::selection::{MemoryLocation, MemoryStorage};
    use crate::shared::InstrumentKind;
    use rust_decimal::Decimal;

    fn perp(name: &str, mark: i64) -> (WsUniverseEntry, WsPerpAssetCtx) {
        (
            WsUniverseEntry {
                name: name.into(),
                sz_decimals: 3,
                max_leverage: 20,
                only_isolated: false,
                is_delisted: false,
            },
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
            },
        )
    }

    fn loaded_store(mids: &[(&str, &str)]) -> SnapshotStore {
        let mut store = SnapshotStore::default();
        let (universe, ctxs): (Vec<_>, Vec<_>) =
            [perp("BTC", 64_000), perp("ETH", 3_000), perp("DOGE", 1)]
                .into_iter()
                .unzip();
        store.seed_asset_contexts((WsMeta { universe }, ctxs));
        store.apply_all_mids(WsAllMids {
            mids: mids
                .iter()
                .map(|(k, v)| (InstrumentName::from(*k), v.to_string()))
                .collect(),
        });
        store
    }

    #[test]
    fn test_waits_for_both_inputs() {
        let mut store = SnapshotStore::default();
        let mut selection = SelectionStore::in_memory();
        let mut sync = SelectionSync::new("BTC".into());

        store.apply_all_mids(WsAllMids::default());
        assert!(!sync.on_selection_inputs_changed(&store, &mut selection));
        assert_eq!(sync.phase(), &SelectionPhase::Bootstrapping);
        assert!(selection.selected().is_none());
    }

    #[test]
    fn test_bootstrap_defaults_to_fallback_instrument() {
        let store = loaded_store(&[("BTC", "64100")]);
        let mut selection = SelectionStore::in_memory();
        let mut sync = SelectionSync::new("BTC".into());

        assert!(sync.on_selection_inputs_changed(&store, &mut selection));
        assert_eq!(sync.phase(), &SelectionPhase::Selected("BTC".into()));
        assert_eq!(selection.selected().unwrap().price, Decimal::from(64_100));
    }

    #[test]
    fn test_bootstrap_restores_from_url_path() {
        let store = loaded_store(&[("ETH", "3001")]);
        let mut selection = SelectionStore::new(
            Box::new(MemoryStorage::new()),
            Box::new(MemoryLocation::new("/trade/ETH-PERP")),
            GroupingToken::from("10000"),
        );
        let mut sync = SelectionSync::new("BTC".into());

        assert!(sync.on_selection_inputs_changed(&store, &mut selection));
        let selected = selection.selected().unwrap();
        assert_eq!(selected.name.as_str(), "ETH");
        assert_eq!(selected.kind, InstrumentKind::Perp);
        // "10000" is not offered at ~3000, so the coarsest token is taken.
        assert_eq!(selection.grouping().as_str(), "0.1");
    }

    #[test]
    fn test_refresh_preserves_selected_at_and_skips_unchanged_inputs() {
        let mut store = loaded_store(&[("BTC", "64100")]);
        let mut selection = SelectionStore::in_memory();
        let mut sync = SelectionSync::new("BTC".into());
        sync.on_selection_inputs_changed(&store, &mut selection);
        let selected_at = selection.selected().unwrap().selected_at;

        assert!(!sync.on_selection_inputs_changed(&store, &mut selection));

        store.apply_all_mids(WsAllMids {
            mids: [("BTC".into(), "65000".to_string())].into(),
        });
        sync.on_selection_inputs_changed(&store, &mut selection);
        let refreshed = selection.selected().unwrap();
        assert_eq!(refreshed.price, Decimal::from(65_000));
        assert_eq!(refreshed.selected_at, selected_at);
    }

    #[test]
    fn test_select_unknown_is_noop() {
        let store = loaded_store(&[("BTC", "64100")]);
        let mut selection = SelectionStore::in_memory();
        let mut sync = SelectionSync::new("BTC".into());
        sync.on_selection_inputs_changed(&store, &mut selection);

        let result = sync.select("NOPE", &store, &mut selection);
        assert_eq!(
            result,
            Err(SelectionError::UnknownInstrument("NOPE".into()))
        );
        assert_eq!(selection.selected_name().unwrap().as_str(), "BTC");
    }

    #[test]
    fn test_select_case_insensitive_and_persisted() {
        let store = loaded_store(&[("BTC", "64100"), ("DOGE", "1.2")]);
        let mut selection = SelectionStore::in_memory();
        let mut sync = SelectionSync::new("BTC".into());
        sync.on_selection_inputs_changed(&store, &mut selection);

        let grouping_changed = sync.select("doge", &store, &mut selection).unwrap();
        assert!(grouping_changed);
        assert_eq!(selection.grouping().as_str(), "0.0001");
        let persisted = selection.read_persisted().unwrap().unwrap();
        assert_eq!(persisted.name, "DOGE");
        assert_eq!(sync.phase(), &SelectionPhase::Selected("DOGE".into()));
    }

    #[test]
    fn test_clear_returns_to_bootstrapping() {
        let store = loaded_store(&[("BTC", "64100")]);
        let mut selection = SelectionStore::in_memory();
        let mut sync = SelectionSync::new("BTC".into());
        sync.on_selection_inputs_changed(&store, &mut selection);

        sync.clear(&mut selection);
        assert_eq!(sync.phase(), &SelectionPhase::Bootstrapping);
        assert!(selection.selected().is_none());
    }
}
