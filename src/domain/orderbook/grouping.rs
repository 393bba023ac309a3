//! Price-grouping policy: display-precision levels for order books.
//!
//! Pure functions only. A grouping token names one display precision; the
//! available tokens depend on the magnitude of the instrument's price, and each
//! token maps to the quantization parameters the `l2Book` subscription takes.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── GroupingToken ───────────────────────────────────────────────────────────

/// A display-precision level, e.g. `"1"`, `"50"`, `"0.001"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupingToken(String);

impl GroupingToken {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GroupingToken {
    fn default() -> Self {
        Self("1".to_string())
    }
}

impl std::fmt::Display for GroupingToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GroupingToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Serialize for GroupingToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GroupingToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(GroupingToken(s))
    }
}

// ─── QuantizationParams ──────────────────────────────────────────────────────

/// Quantization for an order-book subscription. `None` on both fields means
/// full precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QuantizationParams {
    /// 2, 3, 4 or 5.
    pub significant_figures: Option<u8>,
    /// 2 or 5; only meaningful with 5 significant figures.
    pub rounding_mantissa: Option<u8>,
}

impl QuantizationParams {
    pub const FULL: Self = Self {
        significant_figures: None,
        rounding_mantissa: None,
    };

    const fn sig(figures: u8) -> Self {
        Self {
            significant_figures: Some(figures),
            rounding_mantissa: None,
        }
    }

    const fn mantissa(mantissa: u8) -> Self {
        Self {
            significant_figures: Some(5),
            rounding_mantissa: Some(mantissa),
        }
    }

    pub fn is_full_precision(&self) -> bool {
        self.significant_figures.is_none()
    }
}

// ─── Price buckets ───────────────────────────────────────────────────────────

/// `(threshold mantissa, threshold scale, tokens)`, checked top to bottom.
const BUCKETS: &[(i64, u32, &[&str])] = &[
    (100_000, 0, &["1", "10", "20", "50", "100", "1000", "10000"]),
    (10_000, 0, &["1", "2", "5", "10", "100", "1000"]),
    (1_000, 0, &["0.1", "0.2", "0.5", "1", "10", "100"]),
    (100, 0, &["0.01", "0.02", "0.05", "0.1", "1", "10"]),
    (10, 0, &["0.001", "0.002", "0.005", "0.01", "0.1", "1"]),
    (1, 0, &["0.0001", "0.0002", "0.0005", "0.001", "0.01", "0.1"]),
    (1, 1, &["0.00001", "0.00002", "0.00005", "0.0001", "0.001", "0.01"]),
    (1, 2, &["0.01", "0.001", "0.0001"]),
    (1, 3, &["0.001", "0.0001", "0.00001"]),
];

const SMALLEST_BUCKET: &[&str] = &["0.0001", "0.00001", "0.000001"];

/// Valid grouping tokens for an instrument currently priced at `price`.
///
/// Deterministic: the same price bucket always yields the same ordered list.
pub fn available_groupings(price: Decimal) -> Vec<GroupingToken> {
    bucket_for(price).iter().map(|t| GroupingToken::from(*t)).collect()
}

fn bucket_for(price: Decimal) -> &'static [&'static str] {
    BUCKETS
        .iter()
        .find(|(mantissa, scale, _)| price >= Decimal::new(*mantissa, *scale))
        .map(|(_, _, tokens)| *tokens)
        .unwrap_or(SMALLEST_BUCKET)
}

/// Quantization parameters for a grouping token. Unknown tokens get full precision.
pub fn quantization_params(token: &GroupingToken) -> QuantizationParams {
    match token.as_str() {
        "10000" => QuantizationParams::sig(2),
        "1000" => QuantizationParams::sig(3),
        "100" => QuantizationParams::sig(4),
        "10" => QuantizationParams::sig(5),
        "50" | "5" | "0.5" | "0.05" | "0.005" | "0.0005" | "0.00005" => {
            QuantizationParams::mantissa(5)
        }
        "20" | "2" | "0.2" | "0.02" | "0.002" | "0.0002" | "0.00002" => {
            QuantizationParams::mantissa(2)
        }
        "1" | "0.1" | "0.01" | "0.001" | "0.0001" | "0.00001" | "0.000001" => {
            QuantizationParams::FULL
        }
        _ => QuantizationParams::FULL,
    }
}

/// Keeps `current` if it is still offered at `price`, otherwise falls back to
/// the first token of the new bucket.
pub fn resolve_grouping(current: &GroupingToken, price: Decimal) -> GroupingToken {
    let tokens = bucket_for(price);
    if tokens.contains(&current.as_str()) {
        current.clone()
    } else {
        GroupingToken::from(tokens[0])
    }
}
