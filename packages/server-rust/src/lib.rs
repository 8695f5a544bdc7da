//! Greeter server: `GET /hello` front door, Reverser component placement,
//! and the internal reverse endpoint.

pub mod cli;
pub mod network;
pub mod service;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use network::{NetworkConfig, NetworkModule};
pub use service::{resolve_reverser, Role, ServerConfig, ServiceRegistry};
