// src/serve.rs

//! Local preview server.
//!
//! Serves the rendered destination directory over HTTP while the watch
//! session runs. The server is deliberately not synchronized with
//! rebuilds: a build in progress may briefly serve stale output, which is
//! acceptable for a local preview. Bind or serve failures are logged and
//! never take the watch session down.

use axum::Router;
use tokio::sync::oneshot;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::Config;
use crate::errors::Result;

#[derive(Debug, Default)]
pub struct PreviewServer {
    shutdown: Option<oneshot::Sender<()>>,
}

impl PreviewServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start serving the destination directory at the configured address.
    /// No-op when already running.
    pub fn start(&mut self, config: &Config) -> Result<()> {
        if self.shutdown.is_some() {
            return Ok(());
        }

        let addr = format!("{}:{}", config.site().host, config.site().port);
        let root = config.root().join(config.destination());
        let baseurl = config.site().baseurl.trim_matches('/').to_string();
        let silent = config.silent();

        let (tx, rx) = oneshot::channel::<()>();
        self.shutdown = Some(tx);

        tokio::spawn(async move {
            let dir = ServeDir::new(&root);
            let app = if baseurl.is_empty() {
                Router::new().fallback_service(dir)
            } else {
                Router::new().nest_service(&format!("/{baseurl}"), dir)
            };

            let listener = match tokio::net::TcpListener::bind(&addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    error!("preview server failed to bind {addr}: {err}");
                    return;
                }
            };

            if !silent {
                info!("preview server serving {:?} on http://{addr}/", root);
            }

            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = rx.await;
            });
            if let Err(err) = serve.await {
                error!("preview server error: {err}");
            }
        });

        Ok(())
    }

    /// Request a graceful shutdown. No-op when not running.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_some()
    }
}
