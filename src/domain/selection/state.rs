//! Selection state container: the selected instrument plus the grouping preference.

use super::persist::{
    decode_trade_path, encode_trade_path, DurableStorage, MemoryLocation, MemoryStorage,
    PersistedSelection, UrlLocation, SELECTION_STORAGE_KEY,
};
use super::SelectedAsset;
use crate::domain::orderbook::GroupingToken;
use crate::error::PersistError;
use crate::shared::{InstrumentKind, InstrumentName};

/// A persisted instrument the bootstrap pass should try to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreCandidate {
    pub name: String,
    pub kind: Option<InstrumentKind>,
}

/// Holds the selected instrument and reads/writes its persisted copy.
///
/// Only user-driven selections are persisted; data refreshes are not.
pub struct SelectionStore {
    selected: Option<SelectedAsset>,
    grouping: GroupingToken,
    storage: Box<dyn DurableStorage>,
    location: Box<dyn UrlLocation>,
}

impl SelectionStore {
    pub fn new(
        storage: Box<dyn DurableStorage>,
        location: Box<dyn UrlLocation>,
        grouping: GroupingToken,
    ) -> Self {
        Self {
            selected: None,
            grouping,
            storage,
            location,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryStorage::new()),
            Box::new(MemoryLocation::default()),
            GroupingToken::default(),
        )
    }

    pub fn selected(&self) -> Option<&SelectedAsset> {
        self.selected.as_ref()
    }

    pub fn selected_name(&self) -> Option<&InstrumentName> {
        self.selected.as_ref().map(|a| &a.name)
    }

    pub fn grouping(&self) -> &GroupingToken {
        &self.grouping
    }

    /// Returns whether the grouping changed.
    pub fn set_grouping(&mut self, grouping: GroupingToken) -> bool {
        if self.grouping == grouping {
            return false;
        }
        self.grouping = grouping;
        true
    }

    /// Stores a user-driven selection and persists it to storage and the URL.
    ///
    /// The selection is stored even if persisting fails; the first persistence
    /// error is returned.
    pub fn select(&mut self, asset: SelectedAsset) -> Result<(), PersistError> {
        let persisted = asset.persisted();
        self.selected = Some(asset);

        let stored = serde_json::to_string(&persisted)
            .map_err(|e| PersistError::Malformed(e.to_string()))
            .and_then(|json| self.storage.set(SELECTION_STORAGE_KEY, &json));
        let located = self
            .location
            .replace_path(&encode_trade_path(&persisted.name, persisted.kind));

        stored.and(located)
    }

    /// Overwrites the view-model after a data change, keeping the original
    /// `selected_at`. Never persists.
    pub fn refresh(&mut self, mut asset: SelectedAsset) {
        if let Some(current) = &self.selected {
            asset.selected_at = current.selected_at;
        }
        self.selected = Some(asset);
    }

    /// Persisted selections in priority order: URL path first, then durable storage.
    /// Unreadable or malformed sources are skipped.
    pub fn restore_candidates(&self) -> Vec<RestoreCandidate> {
        let mut candidates = Vec::new();

        match self.location.path().and_then(|p| decode_trade_path(&p)) {
            Ok(Some((name, kind))) => candidates.push(RestoreCandidate {
                name,
                kind: Some(kind),
            }),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring trade path: {}", e),
        }

        match self.read_persisted() {
            Ok(Some(p)) => candidates.push(RestoreCandidate {
                name: p.name,
                kind: Some(p.kind),
            }),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring persisted selection: {}", e),
        }

        candidates
    }

    pub fn read_persisted(&self) -> Result<Option<PersistedSelection>, PersistError> {
        match self.storage.get(SELECTION_STORAGE_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| PersistError::Malformed(e.to_string())),
            None => Ok(None),
        }
    }

    /// Forget the selection. The next sync pass bootstraps again.
    pub fn clear(&mut self) {
        self.selected = None;
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("selected", &self.selected_name())
            .field("grouping", &self.grouping)
            .finish()
    }
}
