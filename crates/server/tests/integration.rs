use sim_core::{ActionEnvelope, Game, TerminalOutcome, Tick};
use sim_host::MatchHost;
use sim_server::{
    spawn_tick_loop, EventCursor, LoopExit, LoopReport, MatchHandle, MatchStatus, SubmitError,
};
use std::time::Duration;
use tokio::time::sleep;

/// A simple counter game for testing.
/// Each tick, the counter may be incremented. Lose when counter reaches the limit.
#[derive(Clone)]
struct CounterGame {
    counter: u64,
    limit: u64,
}

#[derive(Clone, Debug)]
enum CounterAction {
    Increment(u64),
}

#[derive(Clone, Debug, PartialEq)]
enum CounterEvent {
    Incremented { amount: u64, new_value: u64 },
    TickAdvanced { tick: Tick },
}

impl Game for CounterGame {
    type Config = u64;
    type Action = CounterAction;
    type Observation = u64;
    type Event = CounterEvent;

    fn new(limit: Self::Config, _seed: u64) -> Self {
        Self { counter: 0, limit }
    }

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        for action in actions {
            match &action.payload {
                CounterAction::Increment(amount) => {
                    self.counter += amount;
                    out_events.push(CounterEvent::Incremented {
                        amount: *amount,
                        new_value: self.counter,
                    });
                }
            }
        }
        out_events.push(CounterEvent::TickAdvanced { tick });
    }

    fn observe(&self, _tick: Tick) -> Self::Observation {
        self.counter
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        (self.counter >= self.limit).then_some(TerminalOutcome::Lose)
    }
}

fn start(limit: u64) -> (MatchHandle<CounterGame>, tokio::task::JoinHandle<LoopReport>) {
    let host = MatchHost::<CounterGame>::new(limit, 42, 100);
    let handle = MatchHandle::new(host, 256);
    let task = spawn_tick_loop(handle.clone());
    (handle, task)
}

#[tokio::test(start_paused = true)]
async fn test_submit_action_and_poll_events() {
    let (handle, task) = start(1000);

    let current_tick = handle.current_tick().await;
    let intended_tick = current_tick + 5;

    let (action_id, scheduled_tick) = handle
        .submit_action(CounterAction::Increment(10), intended_tick)
        .await
        .unwrap();
    assert_eq!(action_id, 1);
    assert_eq!(scheduled_tick, intended_tick);

    sleep(Duration::from_millis(200)).await;

    let (events, cursor) = handle.poll_events(EventCursor(0)).await;
    assert!(!events.is_empty());
    assert!(cursor.0 > 0);

    let increment = events
        .iter()
        .find(|e| matches!(e.event, CounterEvent::Incremented { .. }))
        .expect("increment event should be present");
    assert_eq!(increment.tick, scheduled_tick);
    assert_eq!(
        increment.event,
        CounterEvent::Incremented {
            amount: 10,
            new_value: 10
        }
    );

    handle.terminate().await;
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_game_finishes_and_rejects_further_actions() {
    let (handle, task) = start(10);

    let current_tick = handle.current_tick().await;
    handle
        .submit_action(CounterAction::Increment(10), current_tick + 2)
        .await
        .unwrap();

    let report = task.await.unwrap();

    assert_eq!(
        report.exit,
        LoopExit::MatchOver(MatchStatus::Finished(TerminalOutcome::Lose))
    );
    assert_eq!(report.ticks_stepped, current_tick + 2);
    assert_eq!(
        handle.status().await,
        MatchStatus::Finished(TerminalOutcome::Lose)
    );
    assert_eq!(
        handle
            .submit_action(CounterAction::Increment(1), 0)
            .await
            .unwrap_err(),
        SubmitError::Terminated
    );
    assert!(handle.with_game_mut(|g| g.counter).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_terminate_stops_the_loop() {
    let (handle, task) = start(1000);

    sleep(Duration::from_millis(50)).await;
    handle.terminate().await;
    let report = task.await.unwrap();
    assert!(matches!(
        report.exit,
        LoopExit::Shutdown | LoopExit::MatchOver(MatchStatus::Terminated)
    ));

    let stopped_at = handle.current_tick().await;
    sleep(Duration::from_millis(100)).await;

    assert_eq!(handle.current_tick().await, stopped_at);
    assert_eq!(handle.status().await, MatchStatus::Terminated);
}

#[tokio::test(start_paused = true)]
async fn test_direct_intent_is_visible_to_observers() {
    let (handle, task) = start(1000);

    handle.with_game_mut(|game| game.counter = 7).await.unwrap();

    assert_eq!(handle.observe().await, 7);
    assert_eq!(handle.with_game(|game| game.limit).await, 1000);

    handle.terminate().await;
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_ticks_advance_at_configured_rate() {
    let (handle, task) = start(u64::MAX);

    sleep(Duration::from_millis(505)).await;
    let tick = handle.current_tick().await;

    // 100 Hz for ~0.5s; the first interval tick fires immediately.
    assert!((49..=52).contains(&tick), "unexpected tick {tick}");

    handle.terminate().await;
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_frame_pairs_observation_with_events() {
    let (handle, task) = start(1000);

    handle
        .submit_action(CounterAction::Increment(3), 2)
        .await
        .unwrap();
    sleep(Duration::from_millis(100)).await;

    let frame = handle.frame(EventCursor::default()).await;
    assert_eq!(frame.status, MatchStatus::Running);
    assert_eq!(frame.observation, 3);
    assert_eq!(frame.events.last().map(|e| e.tick), Some(frame.tick));

    let next = handle.frame(frame.cursor).await;
    assert!(next.events.iter().all(|e| e.tick > frame.tick));

    handle.terminate().await;
    task.await.unwrap();
}
