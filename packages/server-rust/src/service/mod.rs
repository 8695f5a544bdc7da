//! Component layer: the Reverser adapters and the machinery around them.
//!
//! 1. **Configuration** (`config`): role, placement, and call budgets
//! 2. **Registry** (`registry`): lifecycle-managed components
//! 3. **Placement** (`placement`): picks the local or remote adapter once at startup
//! 4. **Adapters** (`domain`, `remote`): in-process and network Reverser
//! 5. **Middleware** (`middleware`): Tower layers every call passes through

pub mod config;
pub mod domain;
pub mod middleware;
pub mod operation;
pub mod placement;
pub mod registry;
pub mod remote;

// Re-export key types for convenient access.
pub use config::{ConfigError, Placement, Role, ServerConfig};
pub use domain::LocalReverser;
pub use middleware::{build_reverser_pipeline, ReverserPipeline};
pub use operation::{CallContextFactory, ReverseCall};
pub use placement::resolve_reverser;
pub use registry::{ManagedService, ServiceContext, ServiceRegistry};
pub use remote::RemoteReverser;
