//! Greeter server binary.

use std::sync::Arc;

use clap::Parser;
use greeter_server::cli::Args;
use greeter_server::network::os_shutdown_signal;
use greeter_server::service::ServiceContext;
use greeter_server::telemetry::{init_tracing, install_metrics_exporter};
use greeter_server::{resolve_reverser, NetworkModule, ServiceRegistry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format)?;
    if let Some(addr) = args.metrics_addr {
        install_metrics_exporter(addr)?;
    }

    let network = args.network_config();
    let server = args.server_config();
    server.validate()?;

    info!(
        node_id = %server.node_id,
        role = server.role.as_str(),
        "starting greeter"
    );

    let registry = ServiceRegistry::new();
    let reverser = resolve_reverser(&server, &registry)?;
    let ctx = ServiceContext {
        config: Arc::new(server.clone()),
    };
    registry.init_all(&ctx).await?;

    let mut module = NetworkModule::new(network, server, reverser);
    let addr = module.start().await?;
    info!(%addr, "greeter ready");

    let served = module.serve(os_shutdown_signal()).await;
    registry.shutdown_all(false).await?;
    served
}
