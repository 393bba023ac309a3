//! The identity triple that drives every subscription decision.

use crate::domain::orderbook::GroupingToken;
use crate::shared::{InstrumentName, Viewer};

/// Who is looking, at what, at which display precision.
///
/// Mutated only by external signals: wallet connect/disconnect, instrument pick,
/// grouping pick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IdentityTriple {
    pub viewer: Viewer,
    pub instrument: Option<InstrumentName>,
    pub grouping: GroupingToken,
}

impl IdentityTriple {
    pub fn new(viewer: Viewer, instrument: Option<InstrumentName>, grouping: GroupingToken) -> Self {
        Self {
            viewer,
            instrument,
            grouping,
        }
    }

    pub fn with_viewer(&self, viewer: Viewer) -> Self {
        Self {
            viewer,
            ..self.clone()
        }
    }

    pub fn with_instrument(&self, instrument: Option<InstrumentName>) -> Self {
        Self {
            instrument,
            ..self.clone()
        }
    }

    pub fn with_grouping(&self, grouping: GroupingToken) -> Self {
        Self {
            grouping,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for IdentityTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "viewer={} instrument={} grouping={}",
            self.viewer,
            self.instrument.as_ref().map(|i| i.as_str()).unwrap_or("-"),
            self.grouping
        )
    }
}
