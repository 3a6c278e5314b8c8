// src/build/mod.rs

//! Build orchestration.
//!
//! [`Builder`] owns the engine and the site handle of the current
//! configuration generation, plus the three classifiers bound to that
//! handle. On reload the handle and the classifiers are replaced
//! together, so a classifier can never dispatch into a handle built from
//! a previous configuration.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::Result;
use crate::site::{SiteEngine, SiteHandle};

pub mod classifier;

pub use classifier::{ChangeKind, Classifier};

pub struct Builder {
    engine: Arc<dyn SiteEngine>,
    site: Arc<dyn SiteHandle>,
    adder: Classifier,
    modifier: Classifier,
    remover: Classifier,
}

impl Builder {
    pub fn new(engine: Arc<dyn SiteEngine>, config: Arc<Config>) -> Result<Self> {
        let site = engine.new_site(config.site())?;
        let (adder, modifier, remover) = make_classifiers(&config, &site);
        Ok(Self {
            engine,
            site,
            adder,
            modifier,
            remover,
        })
    }

    /// Swap in a fresh site handle for the new configuration snapshot and
    /// rebind the classifiers to it. Must run before the next `build`.
    pub fn reload(&mut self, config: Arc<Config>) -> Result<()> {
        let site = self.engine.new_site(config.site())?;
        let (adder, modifier, remover) = make_classifiers(&config, &site);
        self.site = site;
        self.adder = adder;
        self.modifier = modifier;
        self.remover = remover;
        Ok(())
    }

    /// Full site generation from scratch.
    pub async fn build(&self) -> Result<()> {
        self.site.build_all().await
    }

    pub async fn added(&self, paths: &[String]) {
        self.adder.update(paths).await;
    }

    pub async fn modified(&self, paths: &[String]) {
        self.modifier.update(paths).await;
    }

    pub async fn removed(&self, paths: &[String]) {
        self.remover.update(paths).await;
    }
}

fn make_classifiers(
    config: &Arc<Config>,
    site: &Arc<dyn SiteHandle>,
) -> (Classifier, Classifier, Classifier) {
    (
        Classifier::new(ChangeKind::Added, config.clone(), site.clone()),
        Classifier::new(ChangeKind::Modified, config.clone(), site.clone()),
        Classifier::new(ChangeKind::Removed, config.clone(), site.clone()),
    )
}
