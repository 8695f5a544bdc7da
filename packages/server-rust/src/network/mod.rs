//! Networking: configuration, HTTP middleware, handlers, listener lifecycle
//! and shutdown control.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod request_metrics;
pub mod shutdown;

pub use config::*;
pub use handlers::AppState;
pub use module::NetworkModule;
pub use request_metrics::RequestMetricsLayer;
pub use shutdown::*;
