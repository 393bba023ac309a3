//! Subscription keys and the required-set computation.

use super::identity::IdentityTriple;
use crate::domain::orderbook::{quantization_params, GroupingToken};
use crate::shared::{Address, InstrumentName};
use crate::ws::SubscribeParams;
use std::collections::BTreeSet;

/// Identifies one upstream topic instance. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubscriptionKey {
    AllMids,
    AccountSnapshot {
        user: Address,
    },
    Fills {
        user: Address,
    },
    Fundings {
        user: Address,
    },
    OrderBook {
        instrument: InstrumentName,
        grouping: GroupingToken,
    },
    Trades {
        instrument: InstrumentName,
    },
    ActiveAssetConfig {
        user: Address,
        instrument: InstrumentName,
    },
}

impl SubscriptionKey {
    pub fn topic(&self) -> &'static str {
        match self {
            Self::AllMids => "allMids",
            Self::AccountSnapshot { .. } => "accountSnapshot",
            Self::Fills { .. } => "fills",
            Self::Fundings { .. } => "fundings",
            Self::OrderBook { .. } => "orderBook",
            Self::Trades { .. } => "trades",
            Self::ActiveAssetConfig { .. } => "activeAssetConfig",
        }
    }

    /// The upstream subscription this key stands for.
    pub fn to_params(&self) -> SubscribeParams {
        match self {
            Self::AllMids => SubscribeParams::AllMids,
            Self::AccountSnapshot { user } => SubscribeParams::WebData2 { user: user.clone() },
            Self::Fills { user } => SubscribeParams::UserFills { user: user.clone() },
            Self::Fundings { user } => SubscribeParams::UserFundings { user: user.clone() },
            Self::OrderBook {
                instrument,
                grouping,
            } => {
                let q = quantization_params(grouping);
                SubscribeParams::L2Book {
                    coin: instrument.clone(),
                    n_sig_figs: q.significant_figures,
                    mantissa: q.rounding_mantissa,
                }
            }
            Self::Trades { instrument } => SubscribeParams::Trades {
                coin: instrument.clone(),
            },
            Self::ActiveAssetConfig { user, instrument } => SubscribeParams::ActiveAssetData {
                user: user.clone(),
                coin: instrument.clone(),
            },
        }
    }

    /// The viewer address this key is scoped to, if any.
    pub fn user(&self) -> Option<&Address> {
        match self {
            Self::AccountSnapshot { user }
            | Self::Fills { user }
            | Self::Fundings { user }
            | Self::ActiveAssetConfig { user, .. } => Some(user),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllMids => write!(f, "allMids"),
            Self::AccountSnapshot { user } => write!(f, "accountSnapshot:{user}"),
            Self::Fills { user } => write!(f, "fills:{user}"),
            Self::Fundings { user } => write!(f, "fundings:{user}"),
            Self::OrderBook {
                instrument,
                grouping,
            } => write!(f, "orderBook:{instrument}:{grouping}"),
            Self::Trades { instrument } => write!(f, "trades:{instrument}"),
            Self::ActiveAssetConfig { user, instrument } => {
                write!(f, "activeAssetConfig:{user}:{instrument}")
            }
        }
    }
}

/// Every key the triple requires.
///
/// - `allMids` always.
/// - The account snapshot under the viewer's subscription address, which is the
///   anonymous placeholder while no wallet is connected.
/// - Fills, fundings and the active-asset config only for a connected wallet.
/// - Order book and trades only while an instrument is selected.
pub fn required_keys(triple: &IdentityTriple) -> BTreeSet<SubscriptionKey> {
    let mut keys = BTreeSet::new();
    keys.insert(SubscriptionKey::AllMids);
    keys.insert(SubscriptionKey::AccountSnapshot {
        user: triple.viewer.subscription_address(),
    });

    if let Some(wallet) = triple.viewer.wallet() {
        keys.insert(SubscriptionKey::Fills {
            user: wallet.clone(),
        });
        keys.insert(SubscriptionKey::Fundings {
            user: wallet.clone(),
        });
        if let Some(instrument) = &triple.instrument {
            keys.insert(SubscriptionKey::ActiveAssetConfig {
                user: wallet.clone(),
                instrument: instrument.clone(),
            });
        }
    }

    if let Some(instrument) = &triple.instrument {
        keys.insert(SubscriptionKey::OrderBook {
            instrument: instrument.clone(),
            grouping: triple.grouping.clone(),
        });
        keys.insert(SubscriptionKey::Trades {
            instrument: instrument.clone(),
        });
    }

    keys
}
