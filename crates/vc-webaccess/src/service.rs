//! Web access service - main entry point.
//!
//! Wires the renderer, dispatcher, push channel and network store around one
//! set of host ports and serves them over a single HTTP listener.

use crate::domain::config::WebAccessConfig;
use crate::domain::error::WebAccessError;
use crate::ports::HostPorts;
use crate::router::{build_router, AppState};
use crate::ws::{EventSink, PushChannel};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Web access service state
pub struct WebAccessService {
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<std::io::Result<()>>>,
}

impl WebAccessService {
    /// Create a new web access service
    pub fn new(config: WebAccessConfig, ports: HostPorts) -> Result<Self, WebAccessError> {
        config
            .validate()
            .map_err(|e| WebAccessError::Config(e.to_string()))?;

        Ok(Self {
            state: AppState::new(config, ports),
            shutdown_tx: None,
            server: None,
        })
    }

    /// Sink the host posts widget changes into
    pub fn event_sink(&self) -> EventSink {
        EventSink::new(
            Arc::clone(&self.state.registry),
            Arc::clone(&self.state.channel),
        )
    }

    pub fn channel(&self) -> Arc<PushChannel> {
        Arc::clone(&self.state.channel)
    }

    pub fn config(&self) -> &WebAccessConfig {
        &self.state.config
    }

    /// Router over this instance's state, for serving elsewhere or testing
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address and serve in the background.
    ///
    /// Returns the bound address (useful with port 0 in tests).
    pub async fn start(&mut self) -> Result<SocketAddr, WebAccessError> {
        if self.server.is_some() {
            return Err(WebAccessError::Config("service already started".into()));
        }
        info!("Starting web access...");

        let addr = self.state.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| WebAccessError::Bind(format!("{}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        let router = self.router();
        self.server = Some(tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        }));

        info!(
            addr = %local_addr,
            ws_path = %self.state.config.websocket.path,
            "Web access started"
        );
        Ok(local_addr)
    }

    /// Trigger graceful shutdown
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Shut down and wait for the server task to finish
    pub async fn stop(&mut self) -> Result<(), WebAccessError> {
        self.shutdown();
        let Some(server) = self.server.take() else {
            return Ok(());
        };

        let result = match server.await {
            Ok(result) => result.map_err(WebAccessError::from),
            Err(e) => Err(WebAccessError::Io(std::io::Error::other(e))),
        };
        if let Err(e) = &result {
            error!(error = %e, "Web access server error");
        }
        info!("Web access stopped");
        result
    }
}
