//! Wire types for the `allMids` channel.

use crate::shared::InstrumentName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every instrument's current mid, as decimal strings. Each message is complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WsAllMids {
    pub mids: HashMap<InstrumentName, String>,
}
