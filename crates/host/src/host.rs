use sim_core::{ActionEnvelope, ActionId, Game, TerminalOutcome, Tick};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct RunResult<G: Game> {
    pub outcome: Option<TerminalOutcome>,
    pub final_tick: Tick,
    pub events: Vec<G::Event>,
}

/// Drives a [`Game`] one fixed step at a time.
///
/// The host is purely synchronous: it never sleeps and never spawns. Real-time
/// pacing lives in `sim_server`, which wraps a host behind a lock.
pub struct MatchHost<G: Game> {
    game: G,
    current_tick: Tick,
    tick_hz: u32,
    next_action_id: ActionId,
    pending_actions: BTreeMap<Tick, Vec<ActionEnvelope<G::Action>>>,
}

impl<G: Game> MatchHost<G> {
    pub fn new(config: G::Config, seed: u64, tick_hz: u32) -> Self {
        Self {
            game: G::new(config, seed),
            current_tick: 0,
            tick_hz,
            next_action_id: 1,
            pending_actions: BTreeMap::new(),
        }
    }

    /// Queue an action to be executed at the given tick.
    /// If `intended_tick` is in the past or current, schedules for the next tick.
    /// Returns the assigned action id and the tick it will run on.
    pub fn submit(&mut self, payload: G::Action, intended_tick: Tick) -> (ActionId, Tick) {
        let scheduled_tick = if intended_tick <= self.current_tick {
            self.current_tick + 1
        } else {
            intended_tick
        };

        let action_id = self.next_action_id;
        self.next_action_id += 1;

        self.pending_actions
            .entry(scheduled_tick)
            .or_default()
            .push(ActionEnvelope {
                action_id,
                intended_tick: scheduled_tick,
                payload,
            });

        (action_id, scheduled_tick)
    }

    pub fn run_for_ticks(&mut self, max_ticks: Tick) -> RunResult<G> {
        let mut all_events = Vec::new();

        for _ in 0..max_ticks {
            match self.step_one_tick() {
                Some(events) => all_events.extend(events),
                None => break,
            }
        }

        RunResult {
            outcome: self.game.is_terminal(),
            final_tick: self.current_tick,
            events: all_events,
        }
    }

    /// Advance by one tick. Returns None if the game is already terminal,
    /// otherwise the events from this tick.
    pub fn step_one_tick(&mut self) -> Option<Vec<G::Event>> {
        if self.game.is_terminal().is_some() {
            return None;
        }

        self.current_tick += 1;

        let mut actions = self
            .pending_actions
            .remove(&self.current_tick)
            .unwrap_or_default();
        actions.sort_by_key(|a| a.action_id);

        let mut tick_events = Vec::new();
        self.game
            .step(self.current_tick, &actions, &mut tick_events);

        if let Some(outcome) = self.game.is_terminal() {
            tracing::info!(tick = self.current_tick, ?outcome, "match reached terminal state");
        }

        Some(tick_events)
    }

    pub fn observe(&self) -> G::Observation {
        self.game.observe(self.current_tick)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Mutable access for synchronous intents issued between ticks.
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    pub fn pending_action_count(&self) -> usize {
        self.pending_actions.values().map(Vec::len).sum()
    }

    pub fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.game.is_terminal()
    }
}
