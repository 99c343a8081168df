use clap::Parser;
use sim_core::Tick;
use sim_defense::DefenseSnapshot;
use sim_defense::{BuildingId, BuildingKind, DefenseAction, DefenseConfig, DefenseEvent, DefenseGame};
use sim_host::MatchHost;
use sim_server::{spawn_tick_loop, EventCursor, MatchHandle, ServerConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "headless-runner")]
#[command(about = "Runs a scripted base defense without a presentation layer")]
struct Args {
    /// Number of host ticks to simulate
    #[arg(long, default_value = "12000")]
    ticks: Tick,

    /// RNG seed for spawn angles and particles
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Host tick rate; overrides the config file
    #[arg(long)]
    tick_hz: Option<u32>,

    /// Pace ticks against the wall clock through the match server
    #[arg(long, short = 'r')]
    realtime: bool,

    /// JSON file overriding any subset of the default config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Turret cells in the order the script tries to fill them.
const TURRET_RING: [(i32, i32); 8] = [
    (2, 0),
    (-2, 0),
    (0, 2),
    (0, -2),
    (2, 2),
    (-2, -2),
    (2, -2),
    (-2, 2),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DefenseConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => DefenseConfig::default(),
    };
    if let Some(hz) = args.tick_hz {
        config.tick_hz = hz;
    }
    config.validate()?;

    let tick_hz = config.tick_hz;
    let mut host = MatchHost::<DefenseGame>::new(config, args.seed, tick_hz);
    let scheduled = script_defense(&mut host)?;
    tracing::info!(scheduled, tick_hz, seed = args.seed, "defense scripted");

    let snapshot = if args.realtime {
        run_realtime(host, args.ticks).await?
    } else {
        run_fast(&mut host, args.ticks)
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}

/// Opening build placed directly, later turrets and upgrades queued for
/// future ticks. Queued intents that cannot be paid for show up as
/// rejections in the event stream.
fn script_defense(host: &mut MatchHost<DefenseGame>) -> Result<usize, Box<dyn std::error::Error>> {
    let tick_hz = Tick::from(host.tick_hz());
    let game = host.game_mut();

    game.place_building(BuildingKind::Mine)?;
    let mine: BuildingId = game.confirm_placement(0, 3)?;
    for &(x, z) in &TURRET_RING[..2] {
        game.place_building(BuildingKind::Turret)?;
        game.confirm_placement(x, z)?;
    }

    let mut scheduled = 0;
    for (i, &(x, z)) in TURRET_RING[2..].iter().enumerate() {
        let at = (i as Tick + 1) * 20 * tick_hz;
        host.submit(
            DefenseAction::BeginPlacement {
                kind: BuildingKind::Turret,
            },
            at,
        );
        host.submit(DefenseAction::ConfirmPlacement { x, z }, at);
        host.submit(DefenseAction::CancelPlacement, at);
        scheduled += 3;
    }
    for round in 1..=3 {
        host.submit(DefenseAction::Upgrade { building: mine }, round * 45 * tick_hz);
        scheduled += 1;
    }

    Ok(scheduled)
}

fn run_fast(host: &mut MatchHost<DefenseGame>, ticks: Tick) -> DefenseSnapshot {
    let result = host.run_for_ticks(ticks);

    println!("=== Base Defense Simulation Complete ===");
    println!("Outcome: {:?}", result.outcome);
    println!("Final tick: {}", result.final_tick);
    print_status(host.current_tick(), host.tick_hz(), &host.observe());
    print_event_summary(&result.events);
    host.observe()
}

async fn run_realtime(
    host: MatchHost<DefenseGame>,
    ticks: Tick,
) -> Result<DefenseSnapshot, Box<dyn std::error::Error>> {
    let server = ServerConfig {
        tick_hz: host.tick_hz(),
        ..ServerConfig::default()
    };
    let handle = MatchHandle::new(host, server.event_buffer_capacity);
    let loop_task = spawn_tick_loop(handle.clone());

    println!("=== Running in Real-Time Mode ({}Hz) ===", server.tick_hz);

    let mut cursor = EventCursor::default();
    let mut all_events = Vec::new();
    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let frame = handle.frame(cursor).await;
        cursor = frame.cursor;
        for e in frame.events {
            print_event(e.tick, &e.event);
            all_events.push(e.event);
        }
        print_status(frame.tick, server.tick_hz, &frame.observation);

        if frame.status.is_over() || frame.tick >= ticks {
            break;
        }
    }

    handle.terminate().await;
    let report = loop_task.await?;

    println!("\n=== Base Defense Simulation Complete ===");
    println!("Status: {:?}", handle.status().await);
    println!(
        "Loop: {:?} after {} ticks ({} overruns)",
        report.exit, report.ticks_stepped, report.overruns
    );
    print_event_summary(&all_events);
    Ok(handle.observe().await)
}

fn print_event(tick: Tick, event: &DefenseEvent) {
    match event {
        DefenseEvent::BuildingPlaced { kind, cell, .. } => {
            println!("[{tick:>6}] {kind} placed at {cell}")
        }
        DefenseEvent::BuildingUpgraded { level, cost, .. } => {
            println!("[{tick:>6}] Upgraded to level {level} for {cost}")
        }
        DefenseEvent::BuildingDestroyed { kind, cell, .. } => {
            println!("[{tick:>6}] {kind} DESTROYED at {cell}")
        }
        DefenseEvent::WaveStarted { wave, quota } => {
            println!("[{tick:>6}] === Wave {wave} started ({quota} enemies) ===")
        }
        DefenseEvent::IntentRejected { reason } => println!("[{tick:>6}] Rejected: {reason}"),
        DefenseEvent::GameOver { wave } => println!("[{tick:>6}] GAME OVER in wave {wave}"),
        _ => {}
    }
}

fn print_status(tick: Tick, tick_hz: u32, snapshot: &DefenseSnapshot) {
    let time_secs = tick as f64 / f64::from(tick_hz.max(1));
    let r = snapshot.resources;
    println!(
        "  [{:>6.1}s] Wave {} (next in {}), Enemies: {}, Buildings: {}, Gold/Wood/Stone: {}/{}/{}",
        time_secs,
        snapshot.wave.wave,
        snapshot.wave.ticks_remaining,
        snapshot.wave.enemies_alive,
        snapshot.buildings.len(),
        r.gold,
        r.wood,
        r.stone,
    );
}

fn print_event_summary(events: &[DefenseEvent]) {
    let mut placed = 0;
    let mut upgraded = 0;
    let mut destroyed = 0;
    let mut spawned = 0;
    let mut killed = 0;
    let mut shots = 0;
    let mut rejected = 0;

    for event in events {
        match event {
            DefenseEvent::BuildingPlaced { .. } => placed += 1,
            DefenseEvent::BuildingUpgraded { .. } => upgraded += 1,
            DefenseEvent::BuildingDestroyed { .. } => destroyed += 1,
            DefenseEvent::EnemySpawned { .. } => spawned += 1,
            DefenseEvent::EnemyKilled { .. } => killed += 1,
            DefenseEvent::ProjectileFired { .. } => shots += 1,
            DefenseEvent::IntentRejected { .. } => rejected += 1,
            _ => {}
        }
    }

    println!("\n=== Event Summary ===");
    println!("Buildings placed: {placed}");
    println!("Upgrades: {upgraded}");
    println!("Buildings destroyed: {destroyed}");
    println!("Enemies spawned: {spawned}");
    println!("Enemies killed: {killed}");
    println!("Shots fired: {shots}");
    println!("Rejected intents: {rejected}");
}
