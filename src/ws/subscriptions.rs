//! Subscription descriptors and routing.

use crate::shared::{Address, InstrumentName};
use serde::{Deserialize, Serialize};

/// Parameters for subscribing to a WS channel.
///
/// Wire format uses `#[serde(tag = "type")]`; subscribe and unsubscribe carry the
/// same descriptor, discriminated by the outer `method` field.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SubscribeParams {
    AllMids,
    /// Comprehensive account snapshot.
    WebData2 {
        user: Address,
    },
    UserFills {
        user: Address,
    },
    UserFundings {
        user: Address,
    },
    L2Book {
        coin: InstrumentName,
        #[serde(rename = "nSigFigs", default, skip_serializing_if = "Option::is_none")]
        n_sig_figs: Option<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mantissa: Option<u8>,
    },
    Trades {
        coin: InstrumentName,
    },
    ActiveAssetData {
        user: Address,
        coin: InstrumentName,
    },
}

impl SubscribeParams {
    /// Key that inbound data messages for this subscription carry, matching
    /// [`Kind::route_key`](crate::ws::Kind::route_key).
    ///
    /// Book quantization is not echoed in book messages, so two book
    /// subscriptions for the same coin share a route key.
    pub fn route_key(&self) -> String {
        match self {
            SubscribeParams::AllMids => "allMids".to_string(),
            SubscribeParams::WebData2 { user } => format!("webData2:{user}"),
            SubscribeParams::UserFills { user } => format!("userFills:{user}"),
            SubscribeParams::UserFundings { user } => format!("userFundings:{user}"),
            SubscribeParams::L2Book { coin, .. } => format!("l2Book:{coin}"),
            SubscribeParams::Trades { coin } => format!("trades:{coin}"),
            SubscribeParams::ActiveAssetData { user, coin } => {
                format!("activeAssetData:{user}:{coin}")
            }
        }
    }
}
