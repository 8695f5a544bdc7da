//! Command-line and environment configuration.
//!
//! Every flag has a `GREETER_*` environment fallback. Parsed arguments are
//! converted once into [`NetworkConfig`] and [`ServerConfig`]; nothing
//! downstream reads the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use greeter_core::DEFAULT_CALL_TIMEOUT_MS;

use crate::network::{NetworkConfig, TlsConfig};
use crate::service::{Placement, Role, ServerConfig};

/// Process role as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Monolith,
    FrontDoor,
    Reverser,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Monolith => Self::Monolith,
            RoleArg::FrontDoor => Self::FrontDoor,
            RoleArg::Reverser => Self::Reverser,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Greeter server: `GET /hello` front door backed by a Reverser component.
#[derive(Debug, Parser)]
#[command(name = "greeter", version)]
pub struct Args {
    /// Bind address.
    #[arg(long, env = "GREETER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port. 0 picks a free port.
    #[arg(long, env = "GREETER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Surfaces this process serves.
    #[arg(long, env = "GREETER_ROLE", value_enum, default_value_t = RoleArg::Monolith)]
    pub role: RoleArg,

    /// Base URL of a remote reverser process. Unset means in-process.
    #[arg(long, env = "GREETER_REVERSER_URL")]
    pub reverser_url: Option<String>,

    /// Node identifier reported by `/health`. Defaults to a random UUID.
    #[arg(long, env = "GREETER_NODE_ID")]
    pub node_id: Option<String>,

    /// Per-call deadline budget for Reverser calls.
    #[arg(long, env = "GREETER_CALL_TIMEOUT_MS", default_value_t = DEFAULT_CALL_TIMEOUT_MS)]
    pub call_timeout_ms: u64,

    /// Connect timeout towards a remote reverser.
    #[arg(long, env = "GREETER_REMOTE_CONNECT_TIMEOUT_MS", default_value_t = 1_000)]
    pub remote_connect_timeout_ms: u64,

    /// Whole-request timeout enforced by the HTTP layer.
    #[arg(long, env = "GREETER_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Allowed CORS origins, comma separated.
    #[arg(long, env = "GREETER_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub cors_origins: Vec<String>,

    /// PEM certificate chain. Enables TLS together with `--tls-key`.
    #[arg(long, env = "GREETER_TLS_CERT", requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key.
    #[arg(long, env = "GREETER_TLS_KEY", requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,

    /// Log output format.
    #[arg(long, env = "GREETER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Address for the Prometheus scrape endpoint. Unset disables it.
    #[arg(long, env = "GREETER_METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,
}

impl Args {
    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        let tls = match (&self.tls_cert, &self.tls_key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path: cert_path.clone(),
                key_path: key_path.clone(),
            }),
            _ => None,
        };

        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            tls,
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..NetworkConfig::default()
        }
    }

    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        let placement = match &self.reverser_url {
            Some(endpoint) => Placement::Remote {
                endpoint: endpoint.clone(),
            },
            None => Placement::Colocated,
        };

        ServerConfig {
            node_id: self
                .node_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            role: self.role.into(),
            placement,
            call_timeout_ms: self.call_timeout_ms,
            remote_connect_timeout_ms: self.remote_connect_timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("greeter").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_describe_a_monolith() {
        let args = parse(&[]);
        assert_eq!(args.role, RoleArg::Monolith);
        assert_eq!(args.port, 8080);
        assert_eq!(args.log_format, LogFormat::Text);
        assert!(args.metrics_addr.is_none());

        let server = args.server_config();
        assert_eq!(server.role, Role::Monolith);
        assert_eq!(server.placement, Placement::Colocated);
        assert_eq!(server.call_timeout_ms, DEFAULT_CALL_TIMEOUT_MS);
        assert!(!server.node_id.is_empty());
        assert!(server.validate().is_ok());

        let network = args.network_config();
        assert!(network.tls.is_none());
        assert_eq!(network.cors_origins, vec!["*"]);
        assert_eq!(network.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn front_door_with_reverser_url() {
        let args = parse(&[
            "--role",
            "front-door",
            "--reverser-url",
            "http://10.0.0.7:9000",
            "--node-id",
            "edge-1",
        ]);
        let server = args.server_config();
        assert_eq!(server.role, Role::FrontDoor);
        assert_eq!(server.node_id, "edge-1");
        assert_eq!(
            server.placement,
            Placement::Remote {
                endpoint: "http://10.0.0.7:9000".to_string()
            }
        );
        assert!(server.validate().is_ok());
    }

    #[test]
    fn front_door_without_url_fails_validation() {
        let server = parse(&["--role", "front-door"]).server_config();
        assert!(server.validate().is_err());
    }

    #[test]
    fn cors_origins_split_on_commas() {
        let args = parse(&["--cors-origins", "http://a.test,http://b.test"]);
        assert_eq!(
            args.network_config().cors_origins,
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn tls_requires_both_files() {
        assert!(Args::try_parse_from(["greeter", "--tls-cert", "cert.pem"]).is_err());

        let args = parse(&["--tls-cert", "cert.pem", "--tls-key", "key.pem"]);
        let tls = args.network_config().tls.unwrap();
        assert_eq!(tls.cert_path, PathBuf::from("cert.pem"));
        assert_eq!(tls.key_path, PathBuf::from("key.pem"));
    }

    #[test]
    fn json_logs_and_metrics_addr() {
        let args = parse(&["--log-format", "json", "--metrics-addr", "127.0.0.1:9100"]);
        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(args.metrics_addr.unwrap().port(), 9100);
    }

    #[test]
    fn unknown_role_rejected() {
        assert!(Args::try_parse_from(["greeter", "--role", "sidecar"]).is_err());
    }
}
