//! Demo web access server over an in-memory console.
//!
//! Configuration comes from `WEBACCESS_*` environment variables, log levels
//! from `RUST_LOG` (default `info`).

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vc_webaccess::{HostPorts, InMemoryConsole, WebAccessConfig, WebAccessService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = WebAccessConfig::from_env();

    let host = Arc::new(InMemoryConsole::demo());
    let mut service = WebAccessService::new(config, HostPorts::from_host(Arc::clone(&host)))?;
    host.attach_events(service.event_sink());

    let addr = service.start().await?;
    info!(addr = %addr, "Web access is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    service.stop().await?;
    Ok(())
}
