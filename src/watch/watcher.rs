// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::build::ChangeKind;
use crate::runtime::RuntimeEvent;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::WatchPattern;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher observing `root` recursively.
///
/// Each notify event is classified as added/modified/removed, its paths
/// relativized against `root` and filtered through the shared watch
/// scope, and any survivors forwarded to the runtime as one batch. The
/// scope is shared rather than owned because a configuration reload
/// rederives it.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    scope: Arc<RwLock<WatchPattern>>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("sitewatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("sitewatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            let Some(kind) = change_kind(&event.kind) else {
                continue;
            };

            let paths: Vec<String> = {
                let pattern = match scope.read() {
                    Ok(guard) => guard,
                    Err(_) => {
                        warn!("watch scope lock poisoned; dropping event");
                        continue;
                    }
                };
                event
                    .paths
                    .iter()
                    .filter_map(|p| relative_str(&root, p))
                    .filter(|rel| pattern.matches(rel))
                    .collect()
            };

            if paths.is_empty() {
                continue;
            }

            debug!(?kind, ?paths, "reporting in-scope changes");
            if runtime_tx
                .send(RuntimeEvent::PathsChanged { kind, paths })
                .await
                .is_err()
            {
                // Runtime is gone; no point keeping the loop alive.
                return;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Map a notify event kind onto a change kind, or `None` for events that
/// carry no content change (metadata touches, access, catch-alls).
fn change_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Added),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}
