use crate::actions::DefenseAction;
use crate::clock::{ScheduledTask, SimulationClock};
use crate::combat;
use crate::config::{BuildingKind, Cost, DefenseConfig};
use crate::economy;
use crate::error::{IntentError, PlacementError, UpgradeError};
use crate::events::DefenseEvent;
use crate::grid::Cell;
use crate::observe::build_snapshot;
use crate::placement;
use crate::state::DefenseState;
use crate::upgrades;
use crate::waves::{self, WaveStart};
use crate::world::BuildingId;
use defense_types::DefenseSnapshot;
use sim_core::{ActionEnvelope, Game, Micros, TerminalOutcome, Tick};

/// The base defense game.
///
/// Intents can be called directly between ticks (the events they produce are
/// delivered with the next step) or queued as [`DefenseAction`]s.
pub struct DefenseGame {
    state: DefenseState,
    clock: SimulationClock,
    pending_events: Vec<DefenseEvent>,
}

impl DefenseGame {
    pub fn state(&self) -> &DefenseState {
        &self.state
    }

    /// Mutable state for tests and tools that stage scenarios directly.
    pub fn state_mut(&mut self) -> &mut DefenseState {
        &mut self.state
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn place_building(&mut self, kind: BuildingKind) -> Result<(), PlacementError> {
        placement::begin_placement(&mut self.state, kind, &mut self.pending_events)
            .inspect_err(|e| tracing::warn!(%kind, error = %e, "placement refused"))
    }

    pub fn cancel_placement(&mut self) -> Option<BuildingKind> {
        placement::cancel_placement(&mut self.state, &mut self.pending_events)
    }

    pub fn confirm_placement(&mut self, x: i32, z: i32) -> Result<BuildingId, PlacementError> {
        placement::confirm_placement(&mut self.state, Cell::new(x, z), &mut self.pending_events)
            .inspect_err(|e| tracing::warn!(x, z, error = %e, "placement rejected"))
    }

    pub fn select_building(&self, x: i32, z: i32) -> Option<BuildingId> {
        placement::select_building(&self.state, Cell::new(x, z))
    }

    pub fn quote_upgrade(&self, id: BuildingId) -> Result<Cost, UpgradeError> {
        upgrades::quote_upgrade(&self.state, id)
    }

    pub fn upgrade_building(&mut self, id: BuildingId) -> Result<u32, UpgradeError> {
        upgrades::upgrade(&mut self.state, id, &mut self.pending_events)
            .inspect_err(|e| tracing::warn!(?id, error = %e, "upgrade rejected"))
    }

    pub fn snapshot(&self, tick: Tick) -> DefenseSnapshot {
        build_snapshot(&self.state, &self.clock, tick)
    }

    fn apply_action(&mut self, action: &DefenseAction) -> Result<(), IntentError> {
        match action {
            DefenseAction::BeginPlacement { kind } => self.place_building(*kind)?,
            DefenseAction::CancelPlacement => {
                self.cancel_placement();
            }
            DefenseAction::ConfirmPlacement { x, z } => {
                self.confirm_placement(*x, *z)?;
            }
            DefenseAction::Upgrade { building } => {
                self.upgrade_building(*building)?;
            }
        }
        Ok(())
    }

    fn run_task(&mut self, at: Micros, task: ScheduledTask, events: &mut Vec<DefenseEvent>) {
        match task {
            ScheduledTask::CombatTick => {
                if let Some(start) = combat::combat_tick(&mut self.state, events) {
                    self.schedule_wave(at, start);
                }
                self.clock
                    .schedule_at(at + self.state.config.combat_period(), ScheduledTask::CombatTick);
            }
            ScheduledTask::ProductionTick => {
                if !self.state.game_over {
                    economy::apply_production(&mut self.state, events);
                }
                self.clock.schedule_at(
                    at + self.state.config.production_period(),
                    ScheduledTask::ProductionTick,
                );
            }
            ScheduledTask::SpawnEnemy { wave } => {
                if !self.state.game_over {
                    waves::spawn_enemy(&mut self.state, wave, events);
                }
            }
        }
    }

    /// One release every spawn interval, the first one immediately.
    fn schedule_wave(&mut self, at: Micros, start: WaveStart) {
        let interval = self.state.config.spawn_interval();
        for i in 0..start.quota {
            self.clock
                .schedule_at(at + interval * i, ScheduledTask::SpawnEnemy { wave: start.wave });
        }
    }
}

impl Game for DefenseGame {
    type Config = DefenseConfig;
    type Action = DefenseAction;
    type Observation = DefenseSnapshot;
    type Event = DefenseEvent;

    fn new(config: Self::Config, seed: u64) -> Self {
        let mut clock = SimulationClock::new();
        clock.schedule_at(config.combat_period(), ScheduledTask::CombatTick);
        clock.schedule_at(config.production_period(), ScheduledTask::ProductionTick);

        Self {
            state: DefenseState::new(config, seed),
            clock,
            pending_events: Vec::new(),
        }
    }

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        // 1. Events from direct intent calls since the last step
        out_events.append(&mut self.pending_events);

        // 2. Queued intents
        for action in actions {
            if let Err(e) = self.apply_action(&action.payload) {
                out_events.push(DefenseEvent::IntentRejected {
                    reason: e.to_string(),
                });
            }
            out_events.append(&mut self.pending_events);
        }

        // 3. Scheduled tasks due by the start of this tick
        self.clock
            .advance_to(Micros::at_tick(tick, self.state.config.tick_hz));
        while let Some((at, task)) = self.clock.pop_due() {
            self.run_task(at, task, out_events);
        }
    }

    fn observe(&self, tick: Tick) -> Self::Observation {
        self.snapshot(tick)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.state.game_over.then_some(TerminalOutcome::Lose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceKind;

    fn envelope(action_id: u64, tick: Tick, payload: DefenseAction) -> ActionEnvelope<DefenseAction> {
        ActionEnvelope {
            action_id,
            intended_tick: tick,
            payload,
        }
    }

    #[test]
    fn first_combat_tick_lands_after_one_second() {
        let mut game = DefenseGame::new(DefenseConfig::default(), 0);
        let mut events = Vec::new();

        for tick in 1..=19 {
            game.step(tick, &[], &mut events);
        }
        assert_eq!(game.state().waves.ticks_remaining(), 30);

        game.step(20, &[], &mut events);
        assert_eq!(game.state().waves.ticks_remaining(), 29);
        assert_eq!(game.clock().now(), Micros::from_secs(1));
    }

    #[test]
    fn queued_actions_apply_in_order_and_report_rejections() {
        let mut game = DefenseGame::new(DefenseConfig::default(), 0);
        let mut events = Vec::new();
        let actions = [
            envelope(1, 1, DefenseAction::BeginPlacement { kind: BuildingKind::Wall }),
            envelope(2, 1, DefenseAction::ConfirmPlacement { x: 0, z: 0 }),
            envelope(3, 1, DefenseAction::ConfirmPlacement { x: 1, z: 0 }),
        ];
        game.step(1, &actions, &mut events);

        assert!(events
            .iter()
            .any(|e| matches!(e, DefenseEvent::IntentRejected { reason } if reason.contains("occupied"))));
        assert!(events
            .iter()
            .any(|e| matches!(e, DefenseEvent::BuildingPlaced { kind: BuildingKind::Wall, .. })));
        assert!(game.select_building(1, 0).is_some());
        assert_eq!(game.state().economy.get(ResourceKind::Gold), 450);
    }

    #[test]
    fn direct_intent_events_arrive_with_next_step() {
        let mut game = DefenseGame::new(DefenseConfig::default(), 0);
        game.place_building(BuildingKind::Turret).unwrap();
        game.confirm_placement(2, 2).unwrap();

        let mut events = Vec::new();
        game.step(1, &[], &mut events);
        assert!(matches!(
            events.first(),
            Some(DefenseEvent::PlacementStarted { kind: BuildingKind::Turret })
        ));
    }

    #[test]
    fn losing_mid_wave_stops_releases_and_reports_countdown() {
        let mut game = DefenseGame::new(DefenseConfig::default(), 0);
        let mut events = Vec::new();
        for tick in 1..=610 {
            game.step(tick, &[], &mut events);
        }
        assert!(game.state().waves.is_spawning());

        let base = game.state().main_base.unwrap();
        combat::destroy_building(game.state_mut(), base, &mut Vec::new());

        events.clear();
        for tick in 611..=700 {
            game.step(tick, &[], &mut events);
        }
        assert!(!events
            .iter()
            .any(|e| matches!(e, DefenseEvent::EnemySpawned { .. })));
        assert!(matches!(
            game.snapshot(700).wave.status,
            defense_types::WaveStatus::Countdown { .. }
        ));
    }

    #[test]
    fn intents_are_refused_after_game_over() {
        let mut game = DefenseGame::new(DefenseConfig::default(), 0);
        game.state_mut().game_over = true;

        assert_eq!(game.place_building(BuildingKind::Wall), Err(PlacementError::GameOver));
        let base = game.state().main_base.unwrap();
        assert_eq!(game.upgrade_building(base), Err(UpgradeError::GameOver));
        assert_eq!(game.is_terminal(), Some(TerminalOutcome::Lose));
    }
}
