//! Network module with deferred startup lifecycle.
//!
//! `new()` assembles shared state, `start()` binds the TCP listener, and
//! `serve()` starts accepting connections. Binding before serving lets the
//! caller learn an OS-assigned port (e.g., to hand a reverser's address to
//! a front door) before any traffic arrives.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use greeter_core::wire::REVERSE_PATH;
use greeter_core::Reverser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::{NetworkConfig, TlsConfig};
use super::handlers::{
    health_handler, hello_handler, liveness_handler, readiness_handler, reverse_handler,
    AppState,
};
use super::middleware::apply_http_layers;
use super::request_metrics::RequestMetricsLayer;
use super::shutdown::ShutdownController;
use crate::service::ServerConfig;

/// Manages the full HTTP server lifecycle.
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- builds `AppState` around the resolved Reverser
/// 2. `start()` -- binds the TCP listener to the configured address
/// 3. `serve()` -- accepts connections until shutdown is signalled, then drains
pub struct NetworkModule {
    state: AppState,
    listener: Option<TcpListener>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, server: ServerConfig, reverser: Arc<dyn Reverser>) -> Self {
        Self {
            state: AppState::new(config, server, reverser, Arc::new(ShutdownController::new())),
            listener: None,
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.state.shutdown)
    }

    /// Assembles the axum router for this process's role.
    ///
    /// Routes:
    /// - `GET /health`, `/health/live`, `/health/ready` -- always
    /// - `GET /hello` -- when the role serves the front door
    /// - `POST /internal/reverse` -- when the role hosts the Reverser
    pub fn build_router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the bound address; its port differs from the configured one
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.state.config.host, self.state.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let local = listener.local_addr()?;

        info!(%local, role = self.state.server.role.as_str(), "listener available");

        self.listener = Some(listener);
        Ok(local)
    }

    /// Serves connections until `shutdown` resolves, then drains in-flight
    /// requests.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first, if TLS material
    /// cannot be loaded, or on a fatal I/O error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let Some(listener) = self.listener else {
            anyhow::bail!("start() must be called before serve()");
        };
        let state = self.state;
        let router = build_router(state.clone());

        // Transition to Ready so readiness probes pass.
        state.shutdown.set_ready();

        let result = if let Some(tls) = state.config.tls.clone() {
            serve_tls(listener, router, &tls, shutdown).await
        } else {
            serve_plain(listener, router, shutdown).await
        };

        drain(&state).await;
        result
    }
}

fn build_router(state: AppState) -> Router {
    let role = state.server.role;
    let config = Arc::clone(&state.config);

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler));

    if role.serves_front_door() {
        router = router.route(
            "/hello",
            get(hello_handler).layer(RequestMetricsLayer::new("hello")),
        );
    }
    if role.serves_reverser() {
        router = router.route(
            REVERSE_PATH,
            post(reverse_handler).layer(RequestMetricsLayer::new("reverse")),
        );
    }

    apply_http_layers(router, &config).with_state(state)
}

/// Serves plain HTTP connections using axum's built-in server.
async fn serve_plain(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Serves TLS connections using `axum-server` with rustls.
///
/// Reuses the pre-bound TCP listener by converting it to a `std::net::TcpListener`.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls: &TlsConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_handle.graceful_shutdown(None);
    });

    info!("serving TLS connections");

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}

/// Moves to Draining and waits for in-flight requests to finish.
async fn drain(state: &AppState) {
    state.shutdown.trigger_shutdown();

    let in_flight = state.shutdown.in_flight_count();
    if in_flight > 0 {
        info!(in_flight, "draining in-flight requests");
    }

    if state.shutdown.wait_for_drain(state.config.drain_timeout).await {
        info!("all requests drained");
    } else {
        warn!("drain timeout expired with in-flight requests remaining");
    }
}
