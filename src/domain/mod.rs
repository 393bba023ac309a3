//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Domain types
//! - `wire.rs`: Raw serde structs matching upstream messages
//! - `convert.rs`: `From` conversions from wire to domain types
//! - `state.rs`: App-owned state containers with update methods

pub mod account;
pub mod asset_config;
pub mod market;
pub mod mids;
pub mod orderbook;
pub mod selection;
pub mod trade;
pub mod user;
