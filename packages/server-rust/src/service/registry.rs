use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::config::ServerConfig;

// ---------------------------------------------------------------------------
// ServiceContext
// ---------------------------------------------------------------------------

/// Context provided to components during initialization.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub config: Arc<ServerConfig>,
}

// ---------------------------------------------------------------------------
// ManagedService trait
// ---------------------------------------------------------------------------

/// Lifecycle-managed component trait. Both Reverser adapters implement this.
///
/// Components are registered with a `ServiceRegistry`, initialized in
/// registration order, and shut down in reverse registration order.
#[async_trait]
pub trait ManagedService: Send + Sync + 'static {
    /// Returns the unique name of this component (e.g., `"reverser"`).
    fn name(&self) -> &'static str;

    /// Initialize the component with the given context.
    async fn init(&self, ctx: &ServiceContext) -> anyhow::Result<()>;

    /// Shut down the component. If `terminate` is true, skip graceful cleanup.
    async fn shutdown(&self, terminate: bool) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// ServiceRegistry
// ---------------------------------------------------------------------------

/// Registry for lifecycle-managed components, keyed by `name()`.
///
/// Components are initialized in registration order and shut down in reverse order.
pub struct ServiceRegistry {
    by_name: DashMap<&'static str, Arc<dyn ManagedService>>,
    /// Registration order for deterministic init/shutdown sequencing.
    init_order: RwLock<Vec<&'static str>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            init_order: RwLock::new(Vec::new()),
        }
    }

    /// Register a component and return a typed handle to it.
    ///
    /// The component becomes accessible via `get_by_name()`. Registering a
    /// second component under an existing name replaces the first without
    /// duplicating its init/shutdown slot.
    pub fn register<T: ManagedService>(&self, service: T) -> Arc<T> {
        let name = service.name();
        let arc = Arc::new(service);
        let replaced = self.by_name.insert(name, arc.clone()).is_some();
        if !replaced {
            self.init_order.write().push(name);
        }
        arc
    }

    /// Retrieve a component by its name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn ManagedService>> {
        self.by_name.get(name).map(|entry| entry.value().clone())
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.init_order.read().len()
    }

    /// Whether no component has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Initialize all registered components in registration order.
    ///
    /// # Errors
    ///
    /// Returns an error if any component's `init()` call fails.
    pub async fn init_all(&self, ctx: &ServiceContext) -> anyhow::Result<()> {
        let order = self.init_order.read().clone();
        for name in &order {
            if let Some(service) = self.get_by_name(name) {
                service.init(ctx).await?;
            }
        }
        Ok(())
    }

    /// Shut down all registered components in reverse registration order.
    ///
    /// # Errors
    ///
    /// Returns an error if any component's `shutdown()` call fails.
    pub async fn shutdown_all(&self, terminate: bool) -> anyhow::Result<()> {
        let order = self.init_order.read().clone();
        for name in order.iter().rev() {
            if let Some(service) = self.get_by_name(name) {
                service.shutdown(terminate).await?;
            }
        }
        Ok(())
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
