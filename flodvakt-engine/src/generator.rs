//! Per-session generation loop.
//!
//! `RUNNING -> STOPPED`, reached either by cancellation or by a failed push.
//! Each cycle re-reads the shared scenario to pick the sleep interval, sleeps,
//! reads the scenario once more for the event itself, synthesizes and pushes.
//! A failed push ends the loop; events are never buffered or retried.
//!
//! The push itself is awaited: a socket that is slow to drain delays only its
//! own loop, and the event is dropped only if the transport reports an error
//! or the session is cancelled while the push is pending.

use std::sync::Arc;

use flodvakt_core::{synthesize, ScenarioRegistry, SharedScenario};
use flodvakt_telemetry::MetricsRecorder;
use rand::Rng;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::transport::EventSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The owning session was torn down.
    Cancelled,
    /// The connection refused an event.
    SendFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorReport {
    pub reason: StopReason,
    pub emitted: u64,
}

pub struct GenerationLoop<R> {
    registry: Arc<ScenarioRegistry>,
    scenario: SharedScenario,
    metrics: Arc<MetricsRecorder>,
    rng: R,
}

impl<R: Rng + Send> GenerationLoop<R> {
    pub fn new(
        registry: Arc<ScenarioRegistry>,
        scenario: SharedScenario,
        metrics: Arc<MetricsRecorder>,
        rng: R,
    ) -> Self {
        Self {
            registry,
            scenario,
            metrics,
            rng,
        }
    }

    /// Runs until `cancel` fires or `sink` rejects an event.
    ///
    /// Cancellation is observed while sleeping and while a push is pending,
    /// never in the middle of synthesizing an event.
    pub async fn run<S: EventSink>(
        mut self,
        mut sink: S,
        cancel: CancellationToken,
    ) -> GeneratorReport {
        let mut emitted = 0u64;

        let reason = loop {
            let interval = self.registry.interval(self.scenario.current());
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break StopReason::Cancelled,
                _ = sleep(interval) => {}
            }

            let scenario = self.scenario.current();
            let event = synthesize(self.registry.profile(scenario), &mut self.rng);

            let pushed = tokio::select! {
                biased;
                _ = cancel.cancelled() => break StopReason::Cancelled,
                pushed = sink.push(&event) => pushed,
            };
            if let Err(e) = pushed {
                debug!("Dropping event {} and stopping: {e}", event.id);
                break StopReason::SendFailed;
            }

            emitted += 1;
            self.metrics.inc_events_emitted();
            trace!(%scenario, id = %event.id, len = event.len, "Event pushed");
        };

        debug!(?reason, emitted, "Generation loop stopped");
        GeneratorReport { reason, emitted }
    }
}
