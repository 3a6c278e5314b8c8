// src/runtime.rs

//! The watch-session event loop.
//!
//! One loop owns the [`Plugin`] and consumes watcher batches one at a
//! time. Every engine-handle access happens on this loop, so a reload can
//! never replace the handle underneath an in-flight dispatch.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::build::ChangeKind;
use crate::errors::Result;
use crate::plugin::Plugin;

/// Events flowing into the runtime from the watcher and signal handlers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A batch of in-scope paths changed in one way.
    PathsChanged {
        kind: ChangeKind,
        paths: Vec<String>,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub struct Runtime {
    plugin: Plugin,
    event_rx: mpsc::Receiver<RuntimeEvent>,
}

impl Runtime {
    pub fn new(plugin: Plugin, event_rx: mpsc::Receiver<RuntimeEvent>) -> Self {
        Self { plugin, event_rx }
    }

    /// Main event loop. Returns when the channel closes or shutdown is
    /// requested; propagates configuration errors, which end the session.
    pub async fn run(mut self) -> Result<()> {
        info!("sitewatch runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::PathsChanged { kind, paths } => match kind {
                    ChangeKind::Added => self.plugin.on_added(&paths).await?,
                    ChangeKind::Modified => self.plugin.on_modified(&paths).await?,
                    ChangeKind::Removed => self.plugin.on_removed(&paths).await?,
                },
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping");
                    self.plugin.stop();
                    break;
                }
            }
        }

        info!("runtime exiting");
        Ok(())
    }
}
