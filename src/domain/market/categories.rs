//! Static category tags per instrument.

use crate::shared::{InstrumentKind, InstrumentName};
use std::collections::HashMap;

lazy_static::lazy_static! {
    /// Curated category tags keyed by upper-cased instrument name.
    static ref CATEGORIES: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("BTC", &["Majors", "L1"]);
        m.insert("ETH", &["Majors", "L1"]);
        m.insert("SOL", &["Majors", "L1"]);
        m.insert("AVAX", &["L1"]);
        m.insert("SUI", &["L1"]);
        m.insert("APT", &["L1"]);
        m.insert("SEI", &["L1"]);
        m.insert("TIA", &["L1"]);
        m.insert("ARB", &["L2"]);
        m.insert("OP", &["L2"]);
        m.insert("MATIC", &["L2"]);
        m.insert("STRK", &["L2"]);
        m.insert("HYPE", &["DeFi"]);
        m.insert("UNI", &["DeFi"]);
        m.insert("AAVE", &["DeFi"]);
        m.insert("LDO", &["DeFi"]);
        m.insert("PENDLE", &["DeFi"]);
        m.insert("JUP", &["DeFi"]);
        m.insert("DOGE", &["Meme"]);
        m.insert("KPEPE", &["Meme"]);
        m.insert("WIF", &["Meme"]);
        m.insert("KBONK", &["Meme"]);
        m.insert("POPCAT", &["Meme"]);
        m.insert("FARTCOIN", &["Meme"]);
        m.insert("TAO", &["AI"]);
        m.insert("RENDER", &["AI"]);
        m.insert("FET", &["AI"]);
        m.insert("VIRTUAL", &["AI"]);
        m.insert("IMX", &["Gaming"]);
        m.insert("GALA", &["Gaming"]);
        m
    };
}

/// Category tags for an instrument: curated tags (if any) followed by the kind tag.
pub fn categories_for(name: &InstrumentName, kind: InstrumentKind) -> Vec<String> {
    let upper = name.as_str().to_ascii_uppercase();
    let mut tags: Vec<String> = CATEGORIES
        .get(upper.as_str())
        .map(|list| list.iter().map(|t| t.to_string()).collect())
        .unwrap_or_default();
    tags.push(kind_tag(kind).to_string());
    tags
}

fn kind_tag(kind: InstrumentKind) -> &'static str {
    match kind {
        InstrumentKind::Perp => "Perps",
        InstrumentKind::Spot => "Spot",
    }
}
