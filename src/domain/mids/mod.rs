//! Mids domain: the global instrument → mid-price map.

pub mod state;
pub mod wire;

pub use state::AllMids;
