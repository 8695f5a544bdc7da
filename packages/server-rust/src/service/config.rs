use greeter_core::DEFAULT_CALL_TIMEOUT_MS;

/// Which surfaces this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Front door plus a colocated Reverser.
    #[default]
    Monolith,
    /// Front door only; the Reverser lives in another process.
    FrontDoor,
    /// Internal reverse endpoint only.
    Reverser,
}

impl Role {
    /// Returns the lowercase wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monolith => "monolith",
            Self::FrontDoor => "front-door",
            Self::Reverser => "reverser",
        }
    }

    /// Whether `GET /hello` is routed in this role.
    #[must_use]
    pub fn serves_front_door(self) -> bool {
        matches!(self, Self::Monolith | Self::FrontDoor)
    }

    /// Whether `POST /internal/reverse` is routed in this role.
    #[must_use]
    pub fn serves_reverser(self) -> bool {
        matches!(self, Self::Reverser)
    }
}

/// Where the Reverser component runs relative to its callers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Placement {
    /// In-process adapter.
    #[default]
    Colocated,
    /// Network adapter calling another process's internal endpoint.
    Remote {
        /// Base URL of the reverser process, e.g. `http://10.0.0.7:9000`.
        endpoint: String,
    },
}

/// Rejected role/placement combinations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("role front-door requires a remote reverser endpoint")]
    FrontDoorWithoutRemote,
    #[error("role reverser must host the reverser in-process, got remote endpoint {endpoint}")]
    ReverserWithRemote { endpoint: String },
    #[error("remote reverser endpoint must start with http:// or https://, got {endpoint}")]
    InvalidEndpoint { endpoint: String },
    #[error("call timeout must be greater than zero")]
    ZeroCallTimeout,
}

/// Server-level configuration for the component layer.
///
/// Built once at startup and shared by reference; nothing here changes
/// while the process runs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Unique identifier for this process.
    pub node_id: String,
    /// Surfaces served by this process.
    pub role: Role,
    /// Placement of the Reverser component.
    pub placement: Placement,
    /// Default budget for a Reverser call in milliseconds.
    pub call_timeout_ms: u64,
    /// TCP connect timeout for the remote adapter in milliseconds.
    pub remote_connect_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            node_id: String::new(),
            role: Role::default(),
            placement: Placement::default(),
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
            remote_connect_timeout_ms: 1_000,
        }
    }
}

impl ServerConfig {
    /// Checks that the role and placement fit together.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first rule violated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.call_timeout_ms == 0 {
            return Err(ConfigError::ZeroCallTimeout);
        }
        match (&self.role, &self.placement) {
            (Role::FrontDoor, Placement::Colocated) => Err(ConfigError::FrontDoorWithoutRemote),
            (Role::Reverser, Placement::Remote { endpoint }) => {
                Err(ConfigError::ReverserWithRemote {
                    endpoint: endpoint.clone(),
                })
            }
            (_, Placement::Remote { endpoint })
                if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) =>
            {
                Err(ConfigError::InvalidEndpoint {
                    endpoint: endpoint.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}
