//! Sync layer: keeps upstream subscriptions and the selected instrument in step
//! with the identity triple.
//!
//! - [`orchestrator::SubscriptionOrchestrator`] reconciles the active subscription
//!   set against what the triple requires and feeds the snapshot store.
//! - [`selection::SelectionSync`] keeps the selected-instrument view-model fresh
//!   and bootstraps it from persisted state.

pub mod identity;
pub mod key;
pub mod orchestrator;
pub mod selection;
pub mod transport;

pub use identity::IdentityTriple;
pub use key::{required_keys, SubscriptionKey};
pub use orchestrator::{plan, ReconcilePlan, SubscriptionOrchestrator};
pub use selection::{SelectionPhase, SelectionSync};
pub use transport::{Delivery, MessageSink, SubscriptionHandle, SubscriptionTag, Transport};

use crate::domain::orderbook::GroupingToken;
use crate::domain::trade::DEFAULT_TAPE_CAPACITY;
use crate::shared::InstrumentName;

/// Instrument selected when nothing persisted resolves.
pub const DEFAULT_INSTRUMENT: &str = "BTC";

/// Session-level defaults for the sync engines.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub default_instrument: InstrumentName,
    pub default_grouping: GroupingToken,
    pub trade_tape_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_instrument: InstrumentName::from(DEFAULT_INSTRUMENT),
            default_grouping: GroupingToken::default(),
            trade_tape_capacity: DEFAULT_TAPE_CAPACITY,
        }
    }
}
