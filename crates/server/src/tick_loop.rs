use crate::match_handle::MatchHandle;
use crate::types::MatchStatus;
use sim_core::Game;
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};

/// Why a tick loop returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// The match reached a terminal state or was terminated.
    MatchOver(MatchStatus),
    /// `request_shutdown` was called while the match was still running.
    Shutdown,
}

/// Summary of one tick loop run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopReport {
    pub exit: LoopExit,
    pub ticks_stepped: u64,
    /// Ticks whose body took longer than one tick period.
    pub overruns: u64,
}

/// Drives `step_one_tick` at the handle's tick rate until the match is over
/// or shutdown is requested. Late wakeups are skipped, never replayed in a
/// burst.
pub async fn run_tick_loop<G: Game + Send + 'static>(handle: MatchHandle<G>) -> LoopReport
where
    G::Action: Send,
    G::Observation: Send,
    G::Event: Send,
    G::Config: Send,
{
    let tick_hz = handle.tick_hz().max(1);
    let period = Duration::from_secs_f64(1.0 / f64::from(tick_hz));

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut ticks_stepped = 0;
    let mut overruns = 0;
    tracing::info!(tick_hz, "tick loop started");

    let exit = loop {
        ticker.tick().await;

        if handle.should_shutdown() {
            break LoopExit::Shutdown;
        }

        let started = Instant::now();
        let over = handle.step_one_tick().await;
        ticks_stepped += 1;
        if started.elapsed() > period {
            overruns += 1;
            tracing::warn!(elapsed = ?started.elapsed(), ?period, "tick overran its period");
        }

        if over {
            break LoopExit::MatchOver(handle.status().await);
        }
    };

    tracing::info!(?exit, ticks_stepped, overruns, "tick loop stopped");
    LoopReport {
        exit,
        ticks_stepped,
        overruns,
    }
}

/// Spawns [`run_tick_loop`] on the current tokio runtime.
pub fn spawn_tick_loop<G: Game + Send + 'static>(
    handle: MatchHandle<G>,
) -> tokio::task::JoinHandle<LoopReport>
where
    G::Action: Send,
    G::Observation: Send,
    G::Event: Send,
    G::Config: Send,
{
    tokio::spawn(run_tick_loop(handle))
}
