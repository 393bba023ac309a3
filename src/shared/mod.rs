//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the upstream service sends, so they can be used directly in wire
//! types without conversion overhead.

pub mod serde_util;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── InstrumentName ──────────────────────────────────────────────────────────

/// Newtype for instrument identifiers as the upstream names them (e.g. `"BTC"`,
/// `"kPEPE"`, `"PURR/USDC"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrumentName(String);

impl InstrumentName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison. The URL form of a selection is upper-cased,
    /// so lookups coming from persisted state go through this.
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl std::fmt::Display for InstrumentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstrumentName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for InstrumentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for InstrumentName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(InstrumentName(s.to_string()))
    }
}

impl Serialize for InstrumentName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for InstrumentName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(InstrumentName(s))
    }
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// Sentinel address used for viewer-scoped public subscriptions while no wallet
/// is connected. Never a signing or balance identity.
pub const ANONYMOUS_PLACEHOLDER: &str = "0x0000000000000000000000000000000000000000";

/// A `0x`-prefixed hex account address, normalized to lowercase so that
/// structural equality matches upstream semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    pub fn new(s: &str) -> Self {
        Self(s.to_ascii_lowercase())
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_PLACEHOLDER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_PLACEHOLDER
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Address::new(&s))
    }
}

// ─── Viewer ──────────────────────────────────────────────────────────────────

/// Who is looking at the terminal: a connected wallet or nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Viewer {
    #[default]
    Anonymous,
    Connected(Address),
}

impl Viewer {
    /// Address used for viewer-scoped subscriptions. Falls back to the anonymous
    /// placeholder so public per-viewer topics stay alive without a wallet.
    pub fn subscription_address(&self) -> Address {
        match self {
            Viewer::Anonymous => Address::anonymous(),
            Viewer::Connected(address) => address.clone(),
        }
    }

    /// The real wallet address, if any. Never returns the placeholder.
    pub fn wallet(&self) -> Option<&Address> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Connected(address) => Some(address),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Viewer::Connected(_))
    }
}

impl std::fmt::Display for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Viewer::Anonymous => write!(f, "anonymous"),
            Viewer::Connected(address) => write!(f, "{}", address),
        }
    }
}

// ─── Side ────────────────────────────────────────────────────────────────────

/// Trade/fill side: Bid (buy) or Ask (sell). Upstream encodes these as `"B"`/`"A"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "B")]
    Bid,
    #[serde(rename = "A")]
    Ask,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Side::Bid => write!(f, "Buy"),
            Side::Ask => write!(f, "Sell"),
        }
    }
}

// ─── InstrumentKind ──────────────────────────────────────────────────────────

/// Market type of an instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    #[default]
    Perp,
    Spot,
}

impl InstrumentKind {
    /// Upper-case form used in the `/trade/{NAME}-{TYPE}` path.
    pub fn as_path_segment(&self) -> &'static str {
        match self {
            Self::Perp => "PERP",
            Self::Spot => "SPOT",
        }
    }

    pub fn from_path_segment(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PERP" => Some(Self::Perp),
            "SPOT" => Some(Self::Spot),
            _ => None,
        }
    }
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perp => write!(f, "Perp"),
            Self::Spot => write!(f, "Spot"),
        }
    }
}

// ─── LeverageMode ────────────────────────────────────────────────────────────

/// Margin mode of a per-instrument leverage setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeverageMode {
    #[default]
    Cross,
    Isolated,
}
