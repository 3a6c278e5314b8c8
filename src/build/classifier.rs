// src/build/classifier.rs

//! Change classification.
//!
//! One classifier per change kind, each bound to the configuration
//! snapshot and site handle of the current generation. A classifier is a
//! pure filter + dispatch layer: it holds no mutable state, and a path
//! that fails any check is dropped without comment.

use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::site::SiteHandle;

/// What happened to a path, as reported by the watcher batch it arrived
/// in. Never stored; consumed synchronously per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

pub struct Classifier {
    kind: ChangeKind,
    config: Arc<Config>,
    site: Arc<dyn SiteHandle>,
}

impl Classifier {
    pub fn new(kind: ChangeKind, config: Arc<Config>, site: Arc<dyn SiteHandle>) -> Self {
        Self { kind, config, site }
    }

    /// Process one batch of changed paths, in the order received.
    ///
    /// A generation failure on one path is reported and the batch
    /// continues; a single broken page must not stall the whole watch
    /// session.
    pub async fn update(&self, paths: &[String]) {
        for path in paths {
            if !self.accepts(path) {
                debug!(path, kind = ?self.kind, "ignoring out-of-scope change");
                continue;
            }

            let result = match self.kind {
                ChangeKind::Added | ChangeKind::Modified => {
                    self.config.info(&format!("regenerating {path}"));
                    self.site.regenerate(path).await
                }
                ChangeKind::Removed => {
                    self.config.info(&format!("removing output for {path}"));
                    self.site.remove_output_for(path).await
                }
            };

            if let Err(err) = result {
                self.config.error(&format!("failed to process {path}: {err}"));
            }
        }
    }

    fn accepts(&self, path: &str) -> bool {
        if !self.config.extension_matches(path) {
            return false;
        }
        if self.config.is_excluded(path) {
            return false;
        }
        // Config-file modifications are handled by the reload path before
        // batches reach us; regenerating them as content would be wrong.
        if matches!(self.kind, ChangeKind::Added | ChangeKind::Modified)
            && self.config.is_config_file(path)
        {
            return false;
        }
        true
    }
}
