use crate::envelope::ActionEnvelope;
use crate::types::Tick;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalOutcome {
    Win,
    Lose,
}

/// A deterministic fixed-step simulation.
///
/// The host owns the tick counter and calls `step` once per tick with the
/// actions scheduled for that tick, already sorted by `ActionId`.
pub trait Game: Sized {
    type Config: Clone + Send + Sync + 'static;
    type Action: Clone + Send + Sync + 'static;
    type Observation: Clone + Send + Sync + 'static;
    type Event: Clone + Send + Sync + 'static;

    fn new(config: Self::Config, seed: u64) -> Self;

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    );

    fn observe(&self, tick: Tick) -> Self::Observation;

    fn is_terminal(&self) -> Option<TerminalOutcome>;
}
