//! Multi-session behavior of the live stream over in-process transports.

use std::sync::Arc;
use std::time::Duration;

use flodvakt_core::{Scenario, ScenarioRegistry, SharedScenario};
use flodvakt_engine::generator::StopReason;
use flodvakt_engine::session::{run_session, ReceiveEnd, SessionContext};
use flodvakt_engine::transport::memory;
use flodvakt_telemetry::MetricsRecorder;
use tokio::time::{timeout, Instant};

fn context() -> SessionContext {
    SessionContext::new(
        ScenarioRegistry::default(),
        SharedScenario::default(),
        Arc::new(MetricsRecorder::new().unwrap()),
    )
}

async fn wait_for(state: &SharedScenario, scenario: Scenario) {
    for _ in 0..100 {
        if state.current() == scenario {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("scenario never became {scenario}");
}

#[tokio::test(start_paused = true)]
async fn command_from_one_viewer_reaches_every_viewer() {
    let ctx = context();
    let (a, a_sink, a_source) = memory::connect(64);
    let (mut b, b_sink, b_source) = memory::connect(64);
    let session_a = tokio::spawn(run_session(a_sink, a_source, ctx.clone()));
    let session_b = tokio::spawn(run_session(b_sink, b_source, ctx.clone()));

    let first = b.next_event().await.unwrap();
    assert_eq!(first.dst, "Router");

    assert!(a.set_mode("DDOS").await);
    wait_for(&ctx.scenario, Scenario::Ddos).await;
    let switched_at = Instant::now();

    let next = b.next_event().await.unwrap();
    assert_eq!(
        (next.src.as_str(), next.kind.as_str(), next.color.as_str()),
        ("Hacker", "UDP", "red")
    );
    assert!(switched_at.elapsed() <= Duration::from_millis(505));

    // B's cadence drops to the flood interval.
    let mut previous = Instant::now();
    for _ in 0..5 {
        let event = b.next_event().await.unwrap();
        assert_eq!(event.color, "red");
        let gap = previous.elapsed();
        assert!(
            gap >= Duration::from_millis(100) && gap <= Duration::from_millis(105),
            "gap {gap:?}"
        );
        previous = Instant::now();
    }

    a.hang_up().await;
    b.hang_up().await;
    session_a.await.unwrap();
    session_b.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn closing_one_session_leaves_the_other_running() {
    let ctx = context();
    let (mut a, a_sink, a_source) = memory::connect(64);
    let (mut b, b_sink, b_source) = memory::connect(64);
    let session_a = tokio::spawn(run_session(a_sink, a_source, ctx.clone()));
    let session_b = tokio::spawn(run_session(b_sink, b_source, ctx.clone()));

    assert!(b.set_mode("SCAN").await);
    wait_for(&ctx.scenario, Scenario::Scan).await;
    a.next_event().await.unwrap();

    a.hang_up().await;
    let report = timeout(Duration::from_millis(500), session_a)
        .await
        .expect("session A outlived one interval")
        .unwrap();
    assert_eq!(report.receive_end, ReceiveEnd::PeerClosed);
    assert_eq!(report.generator.unwrap().reason, StopReason::Cancelled);

    // A's generator is gone: once its queue drains, the stream ends.
    while a.next_event().await.is_some() {}

    for _ in 0..3 {
        let event = b.next_event().await.unwrap();
        assert_eq!(event.kind, "TCP (SYN)");
        assert_eq!(event.flags, "S");
    }
    assert_eq!(ctx.scenario.current(), Scenario::Scan);
    assert_eq!(ctx.metrics.active_sessions.get(), 1);

    b.hang_up().await;
    session_b.await.unwrap();
    assert_eq!(ctx.metrics.active_sessions.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn unknown_mode_changes_nothing_for_anyone() {
    let ctx = context();
    let (a, a_sink, a_source) = memory::connect(64);
    let (mut b, b_sink, b_source) = memory::connect(64);
    let session_a = tokio::spawn(run_session(a_sink, a_source, ctx.clone()));
    let session_b = tokio::spawn(run_session(b_sink, b_source, ctx.clone()));

    assert!(a.set_mode("FOO").await);
    for _ in 0..3 {
        let event = b.next_event().await.unwrap();
        assert!(event.kind == "TCP" || event.kind == "UDP");
    }
    assert_eq!(ctx.scenario.current(), Scenario::Normal);
    assert!(!session_a.is_finished());

    a.hang_up().await;
    b.hang_up().await;
    assert_eq!(session_a.await.unwrap().commands_rejected, 1);
    session_b.await.unwrap();
}
