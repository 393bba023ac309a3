//! Account state container: app-owned, SDK-provided update logic.

use super::{AccountSnapshot, TwapState};
use crate::shared::Address;

/// Latest account snapshot for the subscribed viewer, plus its TWAP projection.
#[derive(Debug, Clone, Default)]
pub struct AccountState {
    snapshot: Option<AccountSnapshot>,
    twap_states: Vec<TwapState>,
}

impl AccountState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace wholesale. The TWAP list is only ever written here.
    pub fn replace(&mut self, snapshot: AccountSnapshot, twap_states: Vec<TwapState>) {
        self.snapshot = Some(snapshot);
        self.twap_states = twap_states;
    }

    pub fn snapshot(&self) -> Option<&AccountSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn twap_states(&self) -> &[TwapState] {
        &self.twap_states
    }

    /// The viewer the current snapshot belongs to.
    pub fn owner(&self) -> Option<&Address> {
        self.snapshot.as_ref().map(|s| &s.user)
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
        self.twap_states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::convert::tests::WEB_DATA2;
    use crate::domain::account::wire::WsWebData2;
    use crate::domain::account::AccountUpdate;

    #[test]
    fn test_replace_and_clear() {
        let wire: WsWebData2 = serde_json::from_str(WEB_DATA2).unwrap();
        let update = AccountUpdate::from(wire);

        let mut state = AccountState::new();
        state.replace(update.snapshot, update.twap_states);
        assert_eq!(
            state.owner().map(|a| a.as_str()),
            Some("0x0000000000000000000000000000000000000001")
        );
        assert_eq!(state.twap_states().len(), 1);

        state.clear();
        assert!(state.snapshot().is_none());
        assert!(state.twap_states().is_empty());
    }
}
