//! Persistence of the selected instrument: a durable key/value store and the
//! `/trade/{NAME}-{TYPE}` URL path.

use crate::error::PersistError;
use crate::shared::InstrumentKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Durable storage key holding the JSON-encoded [`PersistedSelection`].
pub const SELECTION_STORAGE_KEY: &str = "selected_instrument";

const TRADE_PATH_PREFIX: &str = "/trade/";

// ─── PersistedSelection ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSelection {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InstrumentKind,
    #[serde(rename = "selectedAt", with = "crate::shared::serde_util::timestamp_ms")]
    pub selected_at: DateTime<Utc>,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Key/value storage that survives a restart.
pub trait DurableStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// The current location path, e.g. `/trade/BTC-PERP`.
pub trait UrlLocation {
    fn path(&self) -> Result<String, PersistError>;
    /// Replace the current path without adding a history entry.
    fn replace_path(&mut self, path: &str) -> Result<(), PersistError>;
}

// ─── Path codec ──────────────────────────────────────────────────────────────

/// `("kPEPE", Perp)` → `/trade/KPEPE-PERP`. Names are upper-cased and
/// percent-encoded so `PURR/USDC` stays one segment.
pub fn encode_trade_path(name: &str, kind: InstrumentKind) -> String {
    format!(
        "{}{}-{}",
        TRADE_PATH_PREFIX,
        urlencoding::encode(&name.to_ascii_uppercase()),
        kind.as_path_segment()
    )
}

/// Parses a trade path. `Ok(None)` when the path is not a trade path at all.
pub fn decode_trade_path(path: &str) -> Result<Option<(String, InstrumentKind)>, PersistError> {
    let Some(slug) = path.strip_prefix(TRADE_PATH_PREFIX) else {
        return Ok(None);
    };
    let slug = slug.trim_end_matches('/');
    if slug.is_empty() {
        return Ok(None);
    }

    let (name, kind) = slug
        .rsplit_once('-')
        .ok_or_else(|| PersistError::MalformedPath(path.to_string()))?;
    let kind = InstrumentKind::from_path_segment(kind)
        .ok_or_else(|| PersistError::MalformedPath(path.to_string()))?;
    let name = urlencoding::decode(name)
        .map_err(|e| PersistError::MalformedPath(format!("{path}: {e}")))?;
    if name.is_empty() {
        return Err(PersistError::MalformedPath(path.to_string()));
    }

    Ok(Some((name.into_owned(), kind)))
}

// ─── In-memory implementations ───────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryLocation {
    path: String,
}

impl MemoryLocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl UrlLocation for MemoryLocation {
    fn path(&self) -> Result<String, PersistError> {
        Ok(self.path.clone())
    }

    fn replace_path(&mut self, path: &str) -> Result<(), PersistError> {
        self.path = path.to_string();
        Ok(())
    }
}

// ─── FileStorage ─────────────────────────────────────────────────────────────

/// One file per key under a directory. For native terminals.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(self.file_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistError::Unavailable(e.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(self.file_for(key), value))
            .map_err(|e| PersistError::Unavailable(e.to_string()))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        match std::fs::remove_file(self.file_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::Unavailable(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_selection_json_shape() {
        let sel = PersistedSelection {
            name: "ETH".into(),
            kind: InstrumentKind::Perp,
            selected_at: DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap(),
        };
        let json: serde_json::Value = serde_json::to_value(&sel).unwrap();
        assert_eq!(json["name"], "ETH");
        assert_eq!(json["type"], "perp");
        assert_eq!(json["selectedAt"], 1_700_000_000_000i64);
    }

    #[test]
    fn test_encode_trade_path() {
        assert_eq!(encode_trade_path("kPEPE", InstrumentKind::Perp), "/trade/KPEPE-PERP");
        assert_eq!(
            encode_trade_path("purr/usdc", InstrumentKind::Spot),
            "/trade/PURR%2FUSDC-SPOT"
        );
    }

    #[test]
    fn test_decode_trade_path() {
        assert_eq!(
            decode_trade_path("/trade/PURR%2FUSDC-SPOT").unwrap(),
            Some(("PURR/USDC".to_string(), InstrumentKind::Spot))
        );
        assert_eq!(
            decode_trade_path("/trade/BTC-PERP/").unwrap(),
            Some(("BTC".to_string(), InstrumentKind::Perp))
        );
        assert_eq!(decode_trade_path("/portfolio").unwrap(), None);
        assert_eq!(decode_trade_path("/trade/").unwrap(), None);
    }

    #[test]
    fn test_decode_malformed_trade_path() {
        assert!(matches!(
            decode_trade_path("/trade/BTC"),
            Err(PersistError::MalformedPath(_))
        ));
        assert!(matches!(
            decode_trade_path("/trade/BTC-FUTURE"),
            Err(PersistError::MalformedPath(_))
        ));
    }

    #[test]
    fn test_file_storage_missing_key() {
        let dir = std::env::temp_dir().join(format!("terminal-sdk-test-{}", std::process::id()));
        let mut storage = FileStorage::new(&dir);
        assert_eq!(storage.get("absent").unwrap(), None);
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
        let _ = std::fs::remove_dir_all(dir);
    }
}
