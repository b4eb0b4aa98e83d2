//! Connection sessions.
//!
//! A session lives from connection accept to connection close. It spawns one
//! generation loop bound to the outbound half and runs the command receive
//! loop on the inbound half. Whichever of the two ends first ends the session:
//! a closed or faulted inbound half, or a generation loop that could not push.
//! Teardown (cancelling the generation loop and releasing the session gauge)
//! is tied to drop guards, so it also happens when the session future is
//! dropped early.

use std::sync::Arc;

use flodvakt_core::{ScenarioRegistry, SharedScenario};
use flodvakt_telemetry::{EventLogger, MetricsRecorder};
use opentelemetry::KeyValue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn, Instrument};
use uuid::Uuid;

use crate::generator::{GenerationLoop, GeneratorReport};
use crate::protocol::{self, CommandError};
use crate::transport::{CommandSource, EventSink, Inbound};

/// Everything a session needs from the process: the registry, the one shared
/// scenario cell, and metrics.
#[derive(Clone)]
pub struct SessionContext {
    pub registry: Arc<ScenarioRegistry>,
    pub scenario: SharedScenario,
    pub metrics: Arc<MetricsRecorder>,
}

impl SessionContext {
    pub fn new(
        registry: ScenarioRegistry,
        scenario: SharedScenario,
        metrics: Arc<MetricsRecorder>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            scenario,
            metrics,
        }
    }
}

/// Why the receive loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveEnd {
    PeerClosed,
    Faulted(String),
    /// The generation loop ended first, so the viewer gets no more events.
    OutboundClosed,
}

#[derive(Debug)]
pub struct SessionReport {
    pub id: Uuid,
    pub receive_end: ReceiveEnd,
    /// `None` if the generation task panicked.
    pub generator: Option<GeneratorReport>,
    pub commands_applied: u64,
    pub commands_rejected: u64,
}

#[derive(Default)]
struct CommandTally {
    applied: u64,
    rejected: u64,
}

/// Runs a session with a generator seeded from the OS.
pub async fn run_session<S, C>(sink: S, source: C, ctx: SessionContext) -> SessionReport
where
    S: EventSink + 'static,
    C: CommandSource,
{
    run_session_with_rng(sink, source, ctx, StdRng::from_os_rng()).await
}

/// Runs a session until the peer closes, the inbound half faults, or the
/// outbound half stops accepting events.
#[instrument(skip_all, fields(session = tracing::field::Empty))]
pub async fn run_session_with_rng<S, C, R>(
    sink: S,
    mut source: C,
    ctx: SessionContext,
    rng: R,
) -> SessionReport
where
    S: EventSink + 'static,
    C: CommandSource,
    R: Rng + Send + 'static,
{
    let id = Uuid::new_v4();
    tracing::Span::current().record("session", tracing::field::display(id));
    info!("Viewer connected");
    let _active = ActiveSession::enter(ctx.metrics.clone());

    let cancel = CancellationToken::new();
    // Fires if this future is dropped before reaching the explicit cancel.
    let _teardown = cancel.clone().drop_guard();

    let generation = GenerationLoop::new(
        ctx.registry.clone(),
        ctx.scenario.clone(),
        ctx.metrics.clone(),
        rng,
    );
    let mut generator = tokio::spawn(
        generation
            .run(sink, cancel.clone())
            .instrument(tracing::Span::current()),
    );

    let mut tally = CommandTally::default();
    let (receive_end, finished) = tokio::select! {
        end = receive_commands(&mut source, &ctx, &mut tally) => (end, None),
        joined = &mut generator => (ReceiveEnd::OutboundClosed, Some(joined)),
    };

    cancel.cancel();
    let joined = match finished {
        Some(joined) => joined,
        None => generator.await,
    };
    let generator = match joined {
        Ok(report) => Some(report),
        Err(e) => {
            error!("Generation task failed: {e}");
            None
        }
    };

    info!(
        ?receive_end,
        emitted = generator.map(|g| g.emitted),
        applied = tally.applied,
        rejected = tally.rejected,
        "Client disconnected"
    );

    SessionReport {
        id,
        receive_end,
        generator,
        commands_applied: tally.applied,
        commands_rejected: tally.rejected,
    }
}

/// Holds one slot of the `active_sessions` gauge for as long as it lives.
struct ActiveSession {
    metrics: Arc<MetricsRecorder>,
}

impl ActiveSession {
    fn enter(metrics: Arc<MetricsRecorder>) -> Self {
        metrics.active_sessions.inc();
        Self { metrics }
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.metrics.active_sessions.dec();
    }
}

async fn receive_commands<C: CommandSource>(
    source: &mut C,
    ctx: &SessionContext,
    tally: &mut CommandTally,
) -> ReceiveEnd {
    loop {
        match source.next_message().await {
            Ok(Inbound::Text(text)) => match protocol::handle_message(&text, &ctx.scenario) {
                Ok(applied) => {
                    tally.applied += 1;
                    ctx.metrics.commands_applied.inc();
                    if applied.changed() {
                        info!("Switched mode to: {}", applied.current);
                        EventLogger::log_event(
                            "mode_switch",
                            vec![
                                KeyValue::new("from", applied.previous.as_str()),
                                KeyValue::new("to", applied.current.as_str()),
                            ],
                        )
                        .await;
                    } else {
                        debug!("Mode already {}", applied.current);
                    }
                }
                Err(e) => reject(ctx, tally, &e),
            },
            Ok(Inbound::Undecodable) => {
                tally.rejected += 1;
                ctx.metrics.inc_commands_rejected("undecodable");
                warn!("Ignoring undecodable frame");
            }
            Ok(Inbound::Closed) => return ReceiveEnd::PeerClosed,
            Err(e) => {
                warn!("Receive failed: {e}");
                return ReceiveEnd::Faulted(e.to_string());
            }
        }
    }
}

fn reject(ctx: &SessionContext, tally: &mut CommandTally, error: &CommandError) {
    tally.rejected += 1;
    ctx.metrics.inc_commands_rejected(error.reason());
    warn!("Ignoring command: {error}");
}
