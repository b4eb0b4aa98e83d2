//! HTTP surface: the WebSocket stream endpoint and Prometheus metrics.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use flodvakt_config::{ConfigError, GeneratorConfig, ServerConfig};
use flodvakt_core::{ScenarioRegistry, SharedScenario};
use flodvakt_telemetry::MetricsRecorder;
use futures::StreamExt;
use tokio::net::TcpListener;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::error::EngineError;
use crate::session::{run_session, SessionContext};

impl SessionContext {
    /// Builds the process-wide context: one registry, one scenario cell
    /// starting at `NORMAL`, one metrics registry.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, EngineError> {
        let registry = ScenarioRegistry::new(config.registry_settings())?;
        let metrics = Arc::new(MetricsRecorder::new()?);
        Ok(Self::new(registry, SharedScenario::default(), metrics))
    }
}

/// Routes for the stream and metrics endpoints. `config` must have passed
/// validation; axum panics on overlapping routes.
fn router(config: &ServerConfig, ctx: SessionContext) -> Router {
    Router::new()
        .route(&config.ws_path, get(stream_handler))
        .route(&config.metrics_path, get(metrics_handler))
        .with_state(ctx)
}

async fn stream_handler(ws: WebSocketUpgrade, State(ctx): State<SessionContext>) -> Response {
    ws.on_upgrade(move |socket| async move {
        let (sink, source) = socket.split();
        let report = run_session(sink, source, ctx).await;
        debug!(session = %report.id, "Session released");
    })
}

async fn metrics_handler(State(ctx): State<SessionContext>) -> Response {
    match ctx.metrics.gather_metrics() {
        Ok(body) => body.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// A bound listener ready to serve viewers.
pub struct StreamServer {
    listener: TcpListener,
    router: Router,
    context: SessionContext,
}

impl StreamServer {
    #[instrument(skip_all, fields(addr = %config.bind_addr))]
    pub async fn bind(
        config: &ServerConfig,
        context: SessionContext,
    ) -> Result<Self, EngineError> {
        config.validate().map_err(ConfigError::from)?;
        let addr: SocketAddr = config
            .bind_addr
            .parse()
            .map_err(|_| EngineError::BindAddr(config.bind_addr.clone()))?;
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: router(config, context.clone()),
            context,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, EngineError> {
        Ok(self.listener.local_addr()?)
    }

    /// The context shared by every session this server accepts.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Serves until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), EngineError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Streaming on ws://{}", self.local_addr()?);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    fn test_config() -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".into(),
            ..Default::default()
        }
    }

    async fn http_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request =
            format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_metrics_and_shuts_down() {
        let ctx = SessionContext::from_config(&GeneratorConfig::default()).unwrap();
        let server = StreamServer::bind(&test_config(), ctx).await.unwrap();
        let addr = server.local_addr().unwrap();
        server.context().metrics.inc_events_emitted();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.run(async move {
            let _ = stop_rx.await;
        }));

        let response = http_get(addr, "/metrics").await;
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.contains("flodvakt_events_emitted_total 1"));

        let response = http_get(addr, "/nope").await;
        assert!(response.starts_with("HTTP/1.1 404"), "{response}");

        stop_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn stream_route_requires_upgrade() {
        let ctx = SessionContext::from_config(&GeneratorConfig::default()).unwrap();
        let server = StreamServer::bind(&test_config(), ctx).await.unwrap();
        let addr = server.local_addr().unwrap();
        let handle = tokio::spawn(server.run(std::future::pending()));

        let response = http_get(addr, "/ws").await;
        assert!(!response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(!response.starts_with("HTTP/1.1 404"), "{response}");

        handle.abort();
    }

    #[tokio::test]
    async fn rejects_unparseable_bind_addr() {
        let ctx = SessionContext::from_config(&GeneratorConfig::default()).unwrap();
        let config = ServerConfig {
            bind_addr: "localhost".into(),
            ..Default::default()
        };
        assert!(matches!(
            StreamServer::bind(&config, ctx).await,
            Err(EngineError::Config(ConfigError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn rejects_shared_stream_and_metrics_route() {
        let ctx = SessionContext::from_config(&GeneratorConfig::default()).unwrap();
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".into(),
            ws_path: "/feed".into(),
            metrics_path: "/feed".into(),
        };
        assert!(matches!(
            StreamServer::bind(&config, ctx).await,
            Err(EngineError::Config(ConfigError::Validation(_)))
        ));
    }
}
