//! ## flodvakt-telemetry::metrics
//! **Prometheus counters for the live stream**

use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub active_sessions: IntGauge,
    pub events_emitted: IntCounter,
    pub commands_applied: IntCounter,
    pub commands_rejected: IntCounterVec,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let active_sessions =
            IntGauge::new("flodvakt_active_sessions", "Currently connected viewers")?;
        let events_emitted =
            IntCounter::new("flodvakt_events_emitted_total", "Packet events pushed to viewers")?;
        let commands_applied = IntCounter::new(
            "flodvakt_commands_applied_total",
            "Mode commands that changed or confirmed the shared scenario",
        )?;
        let commands_rejected = IntCounterVec::new(
            Opts::new(
                "flodvakt_commands_rejected_total",
                "Inbound messages dropped by the command handler",
            ),
            &["reason"],
        )?;

        registry.register(Box::new(active_sessions.clone()))?;
        registry.register(Box::new(events_emitted.clone()))?;
        registry.register(Box::new(commands_applied.clone()))?;
        registry.register(Box::new(commands_rejected.clone()))?;

        Ok(Self {
            registry,
            active_sessions,
            events_emitted,
            commands_applied,
            commands_rejected,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn inc_events_emitted(&self) {
        self.events_emitted.inc();
    }

    pub fn inc_commands_rejected(&self, reason: &str) {
        self.commands_rejected.with_label_values(&[reason]).inc();
    }
}
