use sim_core::{TerminalOutcome, Tick};

/// Tracks position in an event stream for cursor-based retrieval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EventCursor(pub u64);

/// Status of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    Running,
    Finished(TerminalOutcome),
    Terminated,
}

impl MatchStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, MatchStatus::Running)
    }
}

/// An event with a sequence number for cursor tracking.
#[derive(Clone, Debug)]
pub struct ServerEvent<E> {
    pub sequence: u64,
    pub tick: Tick,
    pub event: E,
}

/// Everything a presentation loop needs for one frame, read under a single
/// lock acquisition so the observation and the events agree on the tick.
#[derive(Clone, Debug)]
pub struct Frame<O, E> {
    pub tick: Tick,
    pub status: MatchStatus,
    pub observation: O,
    pub events: Vec<ServerEvent<E>>,
    /// Cursor to pass to the next `frame` call.
    pub cursor: EventCursor,
}

/// Configuration for a real-time match.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Tick rate of the match (ticks per second).
    pub tick_hz: u32,
    /// Capacity of the event buffer.
    pub event_buffer_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_hz: 20,
            event_buffer_capacity: 1024,
        }
    }
}
