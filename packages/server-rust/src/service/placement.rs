//! Startup-time resolution of the Reverser placement.
//!
//! The chosen adapter is registered as the `"reverser"` component and
//! returned as `Arc<dyn Reverser>`. Nothing downstream branches on placement.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use greeter_core::Reverser;

use super::config::{Placement, ServerConfig};
use super::domain::LocalReverser;
use super::registry::ServiceRegistry;
use super::remote::RemoteReverser;

/// Registers the Reverser adapter selected by `config.placement`.
///
/// # Errors
///
/// Returns an error if the remote adapter's HTTP client cannot be built.
pub fn resolve_reverser(
    config: &ServerConfig,
    registry: &ServiceRegistry,
) -> anyhow::Result<Arc<dyn Reverser>> {
    let reverser: Arc<dyn Reverser> = match &config.placement {
        Placement::Colocated => registry.register(LocalReverser::new()),
        Placement::Remote { endpoint } => {
            let remote = RemoteReverser::new(
                endpoint,
                Duration::from_millis(config.remote_connect_timeout_ms),
            )
            .with_context(|| format!("failed to build reverser client for {endpoint}"))?;
            registry.register(remote)
        }
    };
    Ok(reverser)
}

#[cfg(test)]
mod tests {
    use greeter_core::CallContext;
    use tokio::net::TcpListener;

    use super::*;
    use crate::service::domain::REVERSER_SERVICE;

    #[tokio::test]
    async fn colocated_registers_local_adapter() {
        let registry = ServiceRegistry::new();
        let reverser = resolve_reverser(&ServerConfig::default(), &registry).unwrap();

        assert!(registry.get_by_name(REVERSER_SERVICE).is_some());
        assert_eq!(registry.len(), 1);
        assert_eq!(
            reverser.reverse(&CallContext::default(), "abc").await.unwrap(),
            "cba"
        );
    }

    #[tokio::test]
    async fn remote_registers_network_adapter() {
        // Nothing listens on a released port, so only a network adapter fails.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let registry = ServiceRegistry::new();
        let config = ServerConfig {
            placement: Placement::Remote {
                endpoint: format!("http://{addr}"),
            },
            ..ServerConfig::default()
        };
        let reverser = resolve_reverser(&config, &registry).unwrap();

        assert!(registry.get_by_name(REVERSER_SERVICE).is_some());
        assert_eq!(registry.len(), 1);
        let err = reverser
            .reverse(&CallContext::default(), "abc")
            .await
            .unwrap_err();
        assert!(err.is_remote());
    }
}
