use crate::errors::SubmitError;
use crate::events::EventBuffer;
use crate::types::{EventCursor, Frame, MatchStatus, ServerEvent};
use sim_core::{ActionId, Game, Tick};
use sim_host::MatchHost;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

struct MatchInner<G: Game> {
    host: MatchHost<G>,
    events: EventBuffer<G::Event>,
    status: MatchStatus,
}

/// Thread-safe handle to a running match.
///
/// Every tick and every intent goes through the same mutex, so a tick body is
/// never observed half-applied and intents always land between ticks.
pub struct MatchHandle<G: Game> {
    inner: Arc<Mutex<MatchInner<G>>>,
    shutdown: Arc<AtomicBool>,
    tick_hz: u32,
}

impl<G: Game> Clone for MatchHandle<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            shutdown: Arc::clone(&self.shutdown),
            tick_hz: self.tick_hz,
        }
    }
}

impl<G: Game> MatchHandle<G> {
    pub fn new(host: MatchHost<G>, event_buffer_capacity: usize) -> Self {
        let tick_hz = host.tick_hz();
        Self {
            inner: Arc::new(Mutex::new(MatchInner {
                host,
                events: EventBuffer::new(event_buffer_capacity),
                status: MatchStatus::Running,
            })),
            shutdown: Arc::new(AtomicBool::new(false)),
            tick_hz,
        }
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Queue an action for a future tick.
    /// Returns (action_id, scheduled_tick) - the tick when the action will actually execute.
    pub async fn submit_action(
        &self,
        action: G::Action,
        intended_tick: Tick,
    ) -> Result<(ActionId, Tick), SubmitError> {
        let mut inner = self.inner.lock().await;
        if inner.status.is_over() {
            return Err(SubmitError::Terminated);
        }
        Ok(inner.host.submit(action, intended_tick))
    }

    /// Run a synchronous intent against the game between ticks.
    pub async fn with_game_mut<R>(&self, f: impl FnOnce(&mut G) -> R) -> Result<R, SubmitError> {
        let mut inner = self.inner.lock().await;
        if inner.status.is_over() {
            return Err(SubmitError::Terminated);
        }
        Ok(f(inner.host.game_mut()))
    }

    /// Read the game between ticks.
    pub async fn with_game<R>(&self, f: impl FnOnce(&G) -> R) -> R {
        let inner = self.inner.lock().await;
        f(inner.host.game())
    }

    /// Get the current observation.
    pub async fn observe(&self) -> G::Observation {
        let inner = self.inner.lock().await;
        inner.host.observe()
    }

    /// Poll events from the given cursor.
    pub async fn poll_events(&self, cursor: EventCursor) -> (Vec<ServerEvent<G::Event>>, EventCursor) {
        let inner = self.inner.lock().await;
        inner.events.get_from_cursor(cursor)
    }

    /// Observation plus new events since `cursor`, consistent with each other.
    pub async fn frame(&self, cursor: EventCursor) -> Frame<G::Observation, G::Event> {
        let inner = self.inner.lock().await;
        let (events, cursor) = inner.events.get_from_cursor(cursor);
        Frame {
            tick: inner.host.current_tick(),
            status: inner.status,
            observation: inner.host.observe(),
            events,
            cursor,
        }
    }

    pub async fn current_tick(&self) -> Tick {
        let inner = self.inner.lock().await;
        inner.host.current_tick()
    }

    pub async fn status(&self) -> MatchStatus {
        let inner = self.inner.lock().await;
        inner.status
    }

    /// Step one tick and update status.
    /// Returns true if the match is now over.
    pub async fn step_one_tick(&self) -> bool {
        let mut inner = self.inner.lock().await;

        if inner.status.is_over() {
            return true;
        }

        if let Some(events) = inner.host.step_one_tick() {
            let tick = inner.host.current_tick();
            inner.events.extend(tick, events);
        }

        if let Some(outcome) = inner.host.is_terminal() {
            inner.status = MatchStatus::Finished(outcome);
            return true;
        }

        false
    }

    /// Terminate the match and stop its tick loop.
    pub async fn terminate(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.status.is_over() {
            inner.status = MatchStatus::Terminated;
        }
        drop(inner);
        self.request_shutdown();
    }
}
