//! Integration tests for the simulation scheduler.
//!
//! Uses `tokio::time::pause()` (via `start_paused`) so the 1-second turn
//! cadence resolves instantly and deterministically.

use std::sync::Arc;
use std::time::Duration;

use skirmish_lobby::{CreateLobby, LobbyRegistry, MemoryDirectory};
use skirmish_protocol::{LobbyEvent, UserId};
use skirmish_sim::{SimConfig, SimError, SimulationScheduler};

// =========================================================================
// Helpers
// =========================================================================

/// Jitter-free config so event timings are exact under paused time.
fn test_config() -> SimConfig {
    SimConfig {
        turn_interval: Duration::from_secs(1),
        max_turns: 5,
        start_jitter: Duration::ZERO,
    }
}

async fn setup(
    lobby_name: &str,
) -> (Arc<LobbyRegistry<MemoryDirectory>>, SimulationScheduler<MemoryDirectory>) {
    let directory = MemoryDirectory::new();
    let host = UserId::random();
    directory.insert_user(host);

    let registry = Arc::new(LobbyRegistry::new(directory));
    registry
        .create(CreateLobby {
            name: lobby_name.to_string(),
            max_players: 4,
            max_spectators: 0,
            host_id: host,
            host_name: "alice".to_string(),
            selected_bot: None,
        })
        .await
        .unwrap();

    let scheduler = SimulationScheduler::with_config(Arc::clone(&registry), test_config());
    (registry, scheduler)
}

/// Drains a stream to completion, returning every observed frame.
async fn collect(mut stream: skirmish_lobby::EventStream) -> Vec<LobbyEvent> {
    let mut events = Vec::new();
    while let Some(event) = stream.recv().await {
        events.push(event);
    }
    events
}

// =========================================================================
// start()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_start_unknown_lobby_fails_and_registers_nothing() {
    let (_, scheduler) = setup("arena").await;

    let result = scheduler.start("missing");

    assert!(matches!(result, Err(SimError::NotFound(name)) if name == "missing"));
    assert!(!scheduler.is_running("missing"));
    assert_eq!(scheduler.running_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_start_publishes_started_and_registers_loop() {
    let (registry, scheduler) = setup("arena").await;
    let mut stream = registry.subscribe("arena").unwrap();

    scheduler.start("arena").unwrap();

    assert!(scheduler.is_running("arena"));
    assert!(matches!(stream.recv().await, Some(LobbyEvent::Waiting(_))));
    assert!(matches!(
        stream.recv().await,
        Some(LobbyEvent::SimulationStarted(_))
    ));
    // The lobby now carries a turn-0 state snapshot.
    let lobby = registry.get("arena").unwrap();
    assert_eq!(lobby.simulation.as_ref().unwrap().turn, 0);
}

#[tokio::test(start_paused = true)]
async fn test_start_is_case_insensitive_and_idempotent() {
    let (registry, scheduler) = setup("Arena").await;
    let stream = registry.subscribe("Arena").unwrap();

    scheduler.start("Arena").unwrap();
    scheduler.start("ARENA").unwrap();
    scheduler.start("arena").unwrap();

    assert_eq!(scheduler.running_count(), 1);

    // One loop only: the turn sequence has no duplicates.
    let turns: Vec<u32> = collect(stream)
        .await
        .iter()
        .filter_map(|e| match e {
            LobbyEvent::TurnUpdate(s) => Some(s.turn),
            _ => None,
        })
        .collect();
    assert_eq!(turns, vec![1, 2, 3, 4, 5]);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_starts_spawn_exactly_one_loop() {
    let (registry, scheduler) = setup("arena").await;
    let stream = registry.subscribe("arena").unwrap();
    let scheduler = Arc::new(scheduler);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let scheduler = Arc::clone(&scheduler);
        handles.push(tokio::spawn(async move { scheduler.start("arena") }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(scheduler.running_count(), 1);

    // Exactly one SIMULATION_STARTED and a clean turn sequence.
    let events = collect(stream).await;
    let started = events
        .iter()
        .filter(|e| matches!(e, LobbyEvent::SimulationStarted(_)))
        .count();
    assert_eq!(started, 1);
    let turns: Vec<u32> = events.iter().filter_map(|e| e.state().map(|s| s.turn)).collect();
    assert_eq!(turns, vec![1, 2, 3, 4, 5, 5], "five updates plus the final snapshot");
}

#[tokio::test(start_paused = true)]
async fn test_start_on_removed_lobby_publishes_nothing() {
    let (registry, scheduler) = setup("arena").await;
    // Hold the channel so the replay cell stays observable after removal.
    let channel = registry.channel_for("arena").unwrap();
    registry.remove("arena");

    let result = scheduler.start("arena");

    assert!(matches!(result, Err(SimError::NotFound(_))));
    assert!(!scheduler.is_running("arena"));
    // No SIMULATION_STARTED frame reached the channel.
    assert!(matches!(channel.last_event(), Some(LobbyEvent::Waiting(_))));
}

// =========================================================================
// Full run
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_full_run_publishes_ordered_sequence_and_tears_down() {
    let (registry, scheduler) = setup("arena").await;
    let stream = registry.subscribe("arena").unwrap();

    scheduler.start("arena").unwrap();
    let events = collect(stream).await;

    assert_eq!(events.len(), 8);
    assert!(matches!(&events[0], LobbyEvent::Waiting(_)));
    assert!(matches!(&events[1], LobbyEvent::SimulationStarted(_)));
    for (i, event) in events[2..7].iter().enumerate() {
        match event {
            LobbyEvent::TurnUpdate(state) => {
                assert_eq!(state.turn, i as u32 + 1);
                assert!(!state.finished);
            }
            other => panic!("expected TURN_UPDATE, got {other:?}"),
        }
    }
    match &events[7] {
        LobbyEvent::SimulationFinished(state) => {
            assert_eq!(state.turn, 5);
            assert!(state.finished);
        }
        other => panic!("expected SIMULATION_FINISHED, got {other:?}"),
    }

    // Lobby and loop are gone.
    assert!(registry.get("arena").is_none());
    assert!(!scheduler.is_running("arena"));
}

#[tokio::test(start_paused = true)]
async fn test_turn_cadence_follows_interval() {
    let (registry, scheduler) = setup("arena").await;
    let mut stream = registry.subscribe("arena").unwrap();

    scheduler.start("arena").unwrap();
    // Drain WAITING + SIMULATION_STARTED (both already published).
    stream.recv().await.unwrap();
    stream.recv().await.unwrap();

    // Nothing more is due before the first interval elapses.
    tokio::time::sleep(Duration::from_millis(900)).await;
    assert!(stream.try_next().is_none());

    tokio::time::sleep(Duration::from_millis(200)).await;
    match stream.try_next() {
        Some(LobbyEvent::TurnUpdate(state)) => assert_eq!(state.turn, 1),
        other => panic!("expected first TURN_UPDATE, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_late_subscriber_still_sees_final_event() {
    let (registry, scheduler) = setup("arena").await;
    let channel = registry.channel_for("arena").unwrap();

    scheduler.start("arena").unwrap();
    // Let the whole simulation run to completion.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(registry.get("arena").is_none());

    // A subscriber holding the channel Arc from before teardown can
    // still read the terminal frame.
    let mut stream = channel.subscribe();
    match stream.recv().await {
        Some(LobbyEvent::SimulationFinished(state)) => assert!(state.finished),
        other => panic!("expected final SIMULATION_FINISHED, got {other:?}"),
    }
    assert_eq!(stream.recv().await, None);
}

// =========================================================================
// Cancellation
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_ticking() {
    let (registry, scheduler) = setup("arena").await;
    let mut stream = registry.subscribe("arena").unwrap();

    scheduler.start("arena").unwrap();
    // Let two turns land.
    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert!(scheduler.cancel("arena"));
    assert!(!scheduler.is_running("arena"));

    // No further events arrive after cancellation.
    tokio::time::sleep(Duration::from_secs(5)).await;
    let mut turns = Vec::new();
    while let Some(event) = stream.try_next() {
        if let Some(state) = event.state() {
            turns.push(state.turn);
        }
    }
    assert_eq!(turns, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_twice_reports_single_deregistration() {
    let (_, scheduler) = setup("arena").await;
    scheduler.start("arena").unwrap();

    assert!(scheduler.cancel("arena"));
    assert!(!scheduler.cancel("arena"), "second cancel finds nothing");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_natural_completion_is_noop() {
    let (_, scheduler) = setup("arena").await;
    scheduler.start("arena").unwrap();

    // Run past the terminal turn; the loop deregisters itself.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!scheduler.is_running("arena"));

    assert!(!scheduler.cancel("arena"));
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_cancel_runs_fresh_loop() {
    let (registry, scheduler) = setup("arena").await;
    scheduler.start("arena").unwrap();
    tokio::time::sleep(Duration::from_millis(2100)).await;
    scheduler.cancel("arena");

    // The lobby still exists with an unfinished state; a new start
    // spawns a fresh loop from turn 0.
    scheduler.start("arena").unwrap();
    let mut stream = registry.subscribe("arena").unwrap();
    // Replay delivers the fresh SIMULATION_STARTED; skip to the next turn.
    stream.recv().await.unwrap();
    match stream.recv().await {
        Some(LobbyEvent::TurnUpdate(state)) => assert_eq!(state.turn, 1),
        other => panic!("expected restarted TURN_UPDATE, got {other:?}"),
    }
}

// =========================================================================
// External removal
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_loop_stops_when_lobby_removed_externally() {
    let (registry, scheduler) = setup("arena").await;
    let mut stream = registry.subscribe("arena").unwrap();

    scheduler.start("arena").unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    registry.remove("arena");

    // The loop notices on its next tick, disposes the channel, and exits.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!scheduler.is_running("arena"));

    let mut last = None;
    while let Some(event) = stream.recv().await {
        last = Some(event);
    }
    // The stream terminated; the last delivered frame is turn 1.
    match last {
        Some(LobbyEvent::TurnUpdate(state)) => assert_eq!(state.turn, 1),
        other => panic!("expected TURN_UPDATE(1) as last frame, got {other:?}"),
    }
}
