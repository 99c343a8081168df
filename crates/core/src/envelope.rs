use crate::types::{ActionId, Tick};

/// An action scheduled to run at a specific tick.
#[derive(Clone, Debug)]
pub struct ActionEnvelope<A> {
    pub action_id: ActionId,
    pub intended_tick: Tick,
    pub payload: A,
}
