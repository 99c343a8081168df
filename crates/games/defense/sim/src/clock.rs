use sim_core::Micros;
use std::collections::BTreeMap;

/// Work the simulation schedules against itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduledTask {
    CombatTick,
    ProductionTick,
    /// One staggered release; carries the wave that owes the enemy.
    SpawnEnemy { wave: u32 },
}

/// Cooperative scheduler in simulated time.
///
/// Tasks are keyed by `(deadline, sequence)` so tasks sharing a deadline run
/// in the order they were scheduled. Nothing runs on its own: the owner
/// advances the clock and drains due tasks one at a time, so no two tasks
/// ever interleave.
#[derive(Clone, Debug, Default)]
pub struct SimulationClock {
    now: Micros,
    next_seq: u64,
    queue: BTreeMap<(Micros, u64), ScheduledTask>,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Micros {
        self.now
    }

    pub fn schedule_at(&mut self, at: Micros, task: ScheduledTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((at, seq), task);
    }

    pub fn schedule_after(&mut self, delay: Micros, task: ScheduledTask) {
        self.schedule_at(self.now + delay, task);
    }

    /// Moves time forward. Never moves backwards.
    pub fn advance_to(&mut self, at: Micros) {
        if at > self.now {
            self.now = at;
        }
    }

    /// Removes and returns the earliest task whose deadline has passed.
    ///
    /// Tasks scheduled while draining are picked up by later calls if they
    /// are already due.
    pub fn pop_due(&mut self) -> Option<(Micros, ScheduledTask)> {
        let (&(at, seq), _) = self.queue.first_key_value()?;
        if at > self.now {
            return None;
        }
        self.queue.remove(&(at, seq)).map(|task| (at, task))
    }

    /// Earliest deadline among tasks matching `pred`.
    pub fn next_deadline(&self, pred: impl Fn(&ScheduledTask) -> bool) -> Option<Micros> {
        self.queue
            .iter()
            .find(|(_, task)| pred(task))
            .map(|(&(at, _), _)| at)
    }

    pub fn pending(&self, pred: impl Fn(&ScheduledTask) -> bool) -> usize {
        self.queue.values().filter(|task| pred(task)).count()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
