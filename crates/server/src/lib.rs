pub mod errors;
pub mod events;
pub mod match_handle;
pub mod tick_loop;
pub mod types;

pub use errors::SubmitError;
pub use events::EventBuffer;
pub use match_handle::MatchHandle;
pub use tick_loop::{run_tick_loop, spawn_tick_loop, LoopExit, LoopReport};
pub use types::{EventCursor, Frame, MatchStatus, ServerConfig, ServerEvent};
