// src/plugin.rs

//! Watch-session lifecycle.
//!
//! [`Plugin`] receives the lifecycle calls a host watcher would make:
//! `start`/`stop` around the session, and one `on_added`/`on_modified`/
//! `on_removed` call per delivered batch. It owns the configuration
//! snapshot, the build orchestrator, and the preview server, and is the
//! only place where a reload is decided.

use std::sync::{Arc, RwLock};

use crate::build::Builder;
use crate::config::{Config, Options};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::serve::PreviewServer;
use crate::site::SiteEngine;
use crate::watch::patterns::WatchPattern;

pub struct Plugin {
    engine: Arc<dyn SiteEngine>,
    fs: Arc<dyn FileSystem>,
    config: Arc<Config>,
    builder: Builder,
    server: PreviewServer,
    /// Watch scope shared with the watcher, refreshed on reload so a
    /// changed source/destination layout narrows or widens what gets
    /// reported without restarting the watch.
    watch_scope: Option<Arc<RwLock<WatchPattern>>>,
}

impl Plugin {
    /// Resolve configuration and construct the orchestrator. A
    /// configuration failure here aborts startup.
    pub async fn new(
        engine: Arc<dyn SiteEngine>,
        fs: Arc<dyn FileSystem>,
        options: Options,
        root: std::path::PathBuf,
    ) -> Result<Self> {
        let config = Arc::new(Config::resolve(&*engine, options, root).await?);
        let builder = Builder::new(engine.clone(), config.clone())?;
        Ok(Self {
            engine,
            fs,
            config,
            builder,
            server: PreviewServer::new(),
            watch_scope: None,
        })
    }

    /// Hand over the shared watch scope the watcher filters against, so a
    /// reload can refresh it in place.
    pub fn attach_watch_scope(&mut self, scope: Arc<RwLock<WatchPattern>>) {
        self.watch_scope = Some(scope);
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Derive the watch scope for the current snapshot. Fatal when the
    /// source is nested inside the destination; the session must not
    /// register a watch in that case.
    pub fn watch_pattern(&self) -> Result<WatchPattern> {
        self.config.watch_pattern(&*self.fs)
    }

    /// Full build, then the preview server when enabled. A failing build
    /// is reported and the session carries on watching; the next change
    /// will try again.
    pub async fn start(&mut self) -> Result<()> {
        self.config.info("building site");
        if let Err(err) = self.builder.build().await {
            self.config.error(&format!("build failed: {err}"));
        }

        if self.config.serve() {
            self.server.start(&self.config)?;
        }

        self.config.info("watching");
        Ok(())
    }

    pub fn stop(&mut self) {
        self.server.stop();
    }

    /// Replace the configuration snapshot and everything derived from it,
    /// then run a fresh full build. Configuration errors abort the reload
    /// and propagate.
    pub async fn reload(&mut self) -> Result<()> {
        self.stop();
        self.config.info("reloading configuration");

        let config = Arc::new(self.config.reload(&*self.engine).await?);
        self.config = config.clone();
        self.builder.reload(config)?;

        // Every derived field is recomputed from the new snapshot,
        // including the scope the watcher is already filtering with.
        if let Some(scope) = &self.watch_scope {
            let pattern = self.config.watch_pattern(&*self.fs)?;
            match scope.write() {
                Ok(mut guard) => *guard = pattern,
                Err(_) => self.config.error("watch scope lock poisoned; keeping previous scope"),
            }
        }

        self.start().await
    }

    pub async fn on_added(&mut self, paths: &[String]) -> Result<()> {
        self.builder.added(paths).await;
        Ok(())
    }

    /// A modified config file means the generator's world changed:
    /// reload everything first, then let the classifier handle the
    /// remaining content paths against the new snapshot.
    pub async fn on_modified(&mut self, paths: &[String]) -> Result<()> {
        let (config_paths, content_paths): (Vec<_>, Vec<_>) = paths
            .iter()
            .cloned()
            .partition(|p| self.config.is_config_file(p));

        if !config_paths.is_empty() {
            self.reload().await?;
        }

        self.builder.modified(&content_paths).await;
        Ok(())
    }

    pub async fn on_removed(&mut self, paths: &[String]) -> Result<()> {
        self.builder.removed(paths).await;
        Ok(())
    }

    pub fn is_serving(&self) -> bool {
        self.server.is_running()
    }
}
