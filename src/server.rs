//! Server runtime
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, entity
//! store, HTTP listener and graceful shutdown.

use std::net::SocketAddr;
use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::application::{EntityStore, SharedEntityStore};
use crate::config::AppConfig;
use crate::interfaces::http::{create_app, AppState};
use crate::support::shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Handle to a running API server
pub struct ServerHandle {
    pub store: SharedEntityStore,
    pub config: AppConfig,
    /// Address actually bound (port 0 resolves here)
    pub local_addr: SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Bind the listener and start serving in a background task.
    pub async fn start(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Starting charging infrastructure API...");

        let prometheus_handle = prometheus_handle();
        let store = EntityStore::shared(config.store_settings());
        let state = AppState::new(store.clone(), config.api.clone());
        let app = create_app(state, prometheus_handle);

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(config.address()).await?;
        let local_addr = listener.local_addr()?;
        info!(address = %local_addr, tenancy = ?config.tenancy.mode, "REST API listening");
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, axum::ServiceExt::into_make_service(app)).with_graceful_shutdown(
            async move {
                shutdown_signal.wait().await;
                info!("REST API server received shutdown signal");
            },
        );

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!(error = %e, "REST API server error");
            }
        });

        Ok(Self {
            store,
            config,
            local_addr,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Trigger shutdown and wait for in-flight requests, at most
    /// `server.shutdown_timeout` seconds.
    pub async fn shutdown(mut self) {
        info!("Shutting down charging infrastructure API...");
        self.shutdown.signal().trigger();

        let task = &mut self.api_task;
        let drained = self
            .shutdown
            .drain(async move {
                if let Err(e) = task.await {
                    error!(error = %e, "REST API server task panicked");
                }
            })
            .await;
        if !drained {
            self.api_task.abort();
        }

        info!(roaming_networks = self.store.total_networks(), "Shutdown complete");
    }
}

/// The global recorder can be installed once per process; later calls
/// reuse it. `None` when installation failed.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
                None
            }
        })
        .clone()
}

/// `RUST_LOG` overrides `logging.level`; `logging.format` picks `json` or
/// human-readable output.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn ephemeral() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config
    }

    #[tokio::test]
    async fn serves_health_and_shuts_down() {
        let handle = ServerHandle::start(ephemeral()).await.unwrap();
        assert_ne!(handle.local_addr.port(), 0);
        assert!(handle.is_running());

        let mut stream = tokio::net::TcpStream::connect(handle.local_addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("\"status\":\"ok\""));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn custom_verbs_reach_the_router() {
        let handle = ServerHandle::start(ephemeral()).await.unwrap();

        let mut stream = tokio::net::TcpStream::connect(handle.local_addr).await.unwrap();
        stream
            .write_all(b"COUNT /RNs HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("{\"count\":0}"));

        handle.shutdown().await;
    }
}
