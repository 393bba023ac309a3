//! Account domain: the viewer's comprehensive account snapshot.
//!
//! Balances, positions, open orders and margin summary arrive together in one
//! payload and are replaced wholesale. Running TWAP orders are a read-only
//! projection of that same payload.

mod convert;
pub mod state;
pub mod wire;

use crate::domain::market::wire::{WsMeta, WsPerpAssetCtx, WsSpotAssetCtx};
use crate::shared::{Address, InstrumentName, LeverageMode, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::AccountState;

// ─── AccountSnapshot ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountSnapshot {
    pub user: Address,
    pub account_value: Decimal,
    pub total_notional: Decimal,
    pub total_margin_used: Decimal,
    pub cross_account_value: Decimal,
    pub cross_maintenance_margin_used: Decimal,
    pub withdrawable: Decimal,
    pub positions: Vec<Position>,
    pub open_orders: Vec<OpenOrder>,
    pub spot_balances: Vec<SpotBalance>,
    pub server_time: DateTime<Utc>,
}

impl AccountSnapshot {
    pub fn position(&self, instrument: &InstrumentName) -> Option<&Position> {
        self.positions.iter().find(|p| &p.instrument == instrument)
    }

    pub fn open_orders_for<'a>(
        &'a self,
        instrument: &'a InstrumentName,
    ) -> impl Iterator<Item = &'a OpenOrder> + 'a {
        self.open_orders
            .iter()
            .filter(move |o| &o.instrument == instrument)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub instrument: InstrumentName,
    /// Signed size: positive long, negative short.
    pub size: Decimal,
    pub leverage_mode: LeverageMode,
    pub leverage: u32,
    pub max_leverage: u32,
    pub entry_price: Option<Decimal>,
    pub position_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub return_on_equity: Decimal,
    pub liquidation_price: Option<Decimal>,
    pub margin_used: Decimal,
    pub funding_since_open: Decimal,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.size > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenOrder {
    pub instrument: InstrumentName,
    pub order_id: u64,
    pub side: Side,
    pub price: Decimal,
    pub remaining: Decimal,
    pub original_size: Decimal,
    pub reduce_only: bool,
    pub order_type: Option<String>,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpotBalance {
    pub token: String,
    pub total: Decimal,
    pub hold: Decimal,
    pub entry_notional: Decimal,
}

// ─── TwapState ───────────────────────────────────────────────────────────────

/// Server-tracked progress of a running time-weighted order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwapState {
    pub id: u64,
    pub instrument: InstrumentName,
    pub side: Side,
    pub size: Decimal,
    pub executed_size: Decimal,
    pub executed_notional: Decimal,
    pub minutes: u32,
    pub reduce_only: bool,
    pub randomize: bool,
    pub started_at: DateTime<Utc>,
}

impl TwapState {
    /// Executed fraction in `[0, 1]`.
    pub fn progress(&self) -> Decimal {
        if self.size.is_zero() {
            return Decimal::ZERO;
        }
        (self.executed_size / self.size).min(Decimal::ONE)
    }

    pub fn average_price(&self) -> Option<Decimal> {
        if self.executed_size.is_zero() {
            None
        } else {
            Some(self.executed_notional / self.executed_size)
        }
    }
}

// ─── AccountUpdate ───────────────────────────────────────────────────────────

/// A decoded account payload split into the parts the store keeps separately.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub snapshot: AccountSnapshot,
    pub twap_states: Vec<TwapState>,
    pub perp_contexts: Option<(WsMeta, Vec<WsPerpAssetCtx>)>,
    pub spot_contexts: Option<Vec<WsSpotAssetCtx>>,
}
