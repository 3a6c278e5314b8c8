use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use sitewatch::config::Options;
use sitewatch::errors::{Result, SiteWatchError};
use sitewatch::site::{BoxFuture, SiteConfigMap, SiteEngine, SiteHandle};

/// One generator action as seen by a fake site handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteAction {
    BuildAll,
    Regenerate(String),
    RemoveOutput(String),
}

/// A fake site handle that records actions instead of generating output.
#[derive(Debug)]
pub struct FakeSite {
    actions: Mutex<Vec<SiteAction>>,
    fail_build: bool,
    fail_paths: HashSet<String>,
}

impl FakeSite {
    /// Actions recorded on this handle, in dispatch order.
    pub fn actions(&self) -> Vec<SiteAction> {
        self.actions.lock().unwrap().clone()
    }
}

impl SiteHandle for FakeSite {
    fn build_all(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if self.fail_build {
                return Err(SiteWatchError::Generation(
                    "stubbed build failure".to_string(),
                ));
            }
            self.actions.lock().unwrap().push(SiteAction::BuildAll);
            Ok(())
        })
    }

    fn regenerate<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if self.fail_paths.contains(path) {
                return Err(SiteWatchError::Generation(format!(
                    "stubbed failure for {path}"
                )));
            }
            self.actions
                .lock()
                .unwrap()
                .push(SiteAction::Regenerate(path.to_string()));
            Ok(())
        })
    }

    fn remove_output_for<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if self.fail_paths.contains(path) {
                return Err(SiteWatchError::Generation(format!(
                    "stubbed failure for {path}"
                )));
            }
            self.actions
                .lock()
                .unwrap()
                .push(SiteAction::RemoveOutput(path.to_string()));
            Ok(())
        })
    }
}

/// A fake engine that:
/// - serves a configurable configuration map (applying the drafts/future
///   overrides like a real engine would)
/// - hands out a fresh recording [`FakeSite`] per `new_site` call
/// - can be told to fail configuration loading, builds, or individual
///   paths.
#[derive(Debug, Default)]
pub struct FakeSiteEngine {
    map: Mutex<SiteConfigMap>,
    fail_configuration: AtomicBool,
    fail_build: AtomicBool,
    fail_paths: Mutex<HashSet<String>>,
    sites: Mutex<Vec<Arc<FakeSite>>>,
}

impl FakeSiteEngine {
    pub fn new(map: SiteConfigMap) -> Self {
        Self {
            map: Mutex::new(map),
            ..Self::default()
        }
    }

    /// Shorthand for an engine resolving to the given source/destination.
    pub fn with_dirs(source: &str, destination: &str) -> Self {
        Self::new(SiteConfigMap {
            source: source.to_string(),
            destination: destination.to_string(),
            ..SiteConfigMap::default()
        })
    }

    /// Replace the map served by `configuration`, e.g. between reloads.
    pub fn set_map(&self, map: SiteConfigMap) {
        *self.map.lock().unwrap() = map;
    }

    pub fn fail_configuration(&self) {
        self.fail_configuration.store(true, Ordering::SeqCst);
    }

    /// Sites created after this call fail `build_all`.
    pub fn fail_build(&self) {
        self.fail_build.store(true, Ordering::SeqCst);
    }

    /// Sites created after this call fail regenerate/remove for `path`.
    pub fn fail_path(&self, path: &str) {
        self.fail_paths.lock().unwrap().insert(path.to_string());
    }

    /// Every site handle created so far, in creation order.
    pub fn sites(&self) -> Vec<Arc<FakeSite>> {
        self.sites.lock().unwrap().clone()
    }

    pub fn last_site(&self) -> Arc<FakeSite> {
        self.sites
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no site created yet")
    }
}

impl SiteEngine for FakeSiteEngine {
    fn configuration<'a>(&'a self, options: &'a Options) -> BoxFuture<'a, Result<SiteConfigMap>> {
        Box::pin(async move {
            if self.fail_configuration.load(Ordering::SeqCst) {
                return Err(SiteWatchError::InvalidConfiguration(
                    "stubbed configuration failure".to_string(),
                ));
            }
            let mut map = self.map.lock().unwrap().clone();
            map.show_drafts = options.drafts;
            map.future = options.future;
            Ok(map)
        })
    }

    fn new_site(&self, _config: &SiteConfigMap) -> Result<Arc<dyn SiteHandle>> {
        let site = Arc::new(FakeSite {
            actions: Mutex::new(Vec::new()),
            fail_build: self.fail_build.load(Ordering::SeqCst),
            fail_paths: self.fail_paths.lock().unwrap().clone(),
        });
        self.sites.lock().unwrap().push(site.clone());
        Ok(site)
    }
}
