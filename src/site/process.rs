// src/site/process.rs

//! Production engine shim.
//!
//! Drives an external static-site generator through shell commands:
//!
//! - `config_cmd` dumps the generator's resolved configuration as JSON on
//!   stdout (e.g. `hugo config --format json`); without it, the `[site]`
//!   table from the options file stands in.
//! - `build_cmd` performs a full build.
//! - `regenerate_cmd` re-renders a single file, with `{path}` substituted;
//!   generators without an incremental mode fall back to a full build.
//!
//! Output-artifact removal is handled here directly: a generator has no
//! "unrender this file" command, but the artifact location is derivable
//! from the source path and the destination directory.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::options::{EngineSection, Options};
use crate::errors::{Result, SiteWatchError};
use crate::fs::FileSystem;
use crate::site::{BoxFuture, SiteConfigMap, SiteEngine, SiteHandle};

/// Source extensions that render to an `.html` artifact rather than being
/// copied through.
const PAGE_EXTS: &[&str] = &["md", "mkd", "mkdn", "markdown", "textile", "haml", "slim"];

#[derive(Debug, Clone)]
pub struct ProcessEngine {
    root: PathBuf,
    spec: EngineSection,
    silent: bool,
    fs: Arc<dyn FileSystem>,
}

impl ProcessEngine {
    pub fn new(root: PathBuf, spec: EngineSection, silent: bool, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root,
            spec,
            silent,
            fs,
        }
    }
}

impl SiteEngine for ProcessEngine {
    fn configuration<'a>(&'a self, options: &'a Options) -> BoxFuture<'a, Result<SiteConfigMap>> {
        Box::pin(async move {
            let mut map = match &self.spec.config_cmd {
                Some(cmd) => load_config_map(cmd, &self.root).await?,
                None => options.site.clone(),
            };

            // Plugin options win over whatever the generator resolved.
            map.show_drafts = options.drafts;
            map.future = options.future;
            Ok(map)
        })
    }

    fn new_site(&self, config: &SiteConfigMap) -> Result<Arc<dyn SiteHandle>> {
        let build_cmd = self.spec.build_cmd.clone().ok_or_else(|| {
            SiteWatchError::InvalidConfiguration(
                "engine.build_cmd must be set to drive the generator".to_string(),
            )
        })?;

        Ok(Arc::new(ProcessSite {
            root: self.root.clone(),
            // Changed paths arrive root-relative, so the source prefix to
            // strip must be root-relative too.
            source: crate::config::root_relative(&self.root, &config.source),
            destination: self.root.join(&config.destination),
            build_cmd,
            regenerate_cmd: self.spec.regenerate_cmd.clone(),
            silent: self.silent,
            fs: self.fs.clone(),
        }))
    }
}

/// Site handle bound to one configuration generation.
pub struct ProcessSite {
    root: PathBuf,
    source: String,
    destination: PathBuf,
    build_cmd: String,
    regenerate_cmd: Option<String>,
    silent: bool,
    fs: Arc<dyn FileSystem>,
}

impl SiteHandle for ProcessSite {
    fn build_all(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { run_command(&self.build_cmd, &self.root, self.silent).await })
    }

    fn regenerate<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            match &self.regenerate_cmd {
                Some(template) => {
                    let cmd = template.replace("{path}", path);
                    run_command(&cmd, &self.root, self.silent).await
                }
                // No incremental mode; a full build is the only way to
                // refresh this file's output.
                None => run_command(&self.build_cmd, &self.root, self.silent).await,
            }
        })
    }

    fn remove_output_for<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut removed = false;
            for candidate in self.artifact_candidates(path) {
                if self.fs.is_file(&candidate) {
                    self.fs
                        .remove_file(&candidate)
                        .map_err(|e| SiteWatchError::Generation(e.to_string()))?;
                    info!("removed output artifact {:?}", candidate);
                    removed = true;
                }
            }
            if !removed {
                debug!(path, "no output artifact to remove");
            }
            Ok(())
        })
    }
}

impl ProcessSite {
    /// Output paths a removed source file may have rendered to: the same
    /// relative path under the destination, plus its `.html` rendering for
    /// page sources.
    fn artifact_candidates(&self, path: &str) -> Vec<PathBuf> {
        let rel = if self.source == "." {
            path
        } else {
            path.strip_prefix(&format!("{}/", self.source))
                .unwrap_or(path)
        };

        let direct = self.destination.join(rel);
        let mut candidates = vec![direct.clone()];

        let is_page = direct
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                PAGE_EXTS.iter().any(|p| *p == ext)
            });
        if is_page {
            candidates.push(direct.with_extension("html"));
        }

        candidates
    }
}

/// Run a config-dump command and parse its stdout as a JSON map.
async fn load_config_map(cmd: &str, root: &PathBuf) -> Result<SiteConfigMap> {
    let output = shell_command(cmd)
        .current_dir(root)
        .output()
        .await
        .map_err(|e| SiteWatchError::InvalidConfiguration(format!("running '{cmd}': {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SiteWatchError::InvalidConfiguration(format!(
            "'{cmd}' exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    serde_json::from_slice(&output.stdout).map_err(|e| {
        SiteWatchError::InvalidConfiguration(format!("parsing output of '{cmd}': {e}"))
    })
}

/// Run a generator command to completion.
///
/// When silent, child output is captured and demoted to debug logs instead
/// of reaching the terminal.
async fn run_command(cmd: &str, root: &PathBuf, silent: bool) -> Result<()> {
    debug!(cmd, "running generator command");

    let mut command = shell_command(cmd);
    command.current_dir(root).kill_on_drop(true);

    let status = if silent {
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        let mut child = command
            .spawn()
            .map_err(|e| SiteWatchError::Generation(format!("spawning '{cmd}': {e}")))?;

        drain_to_debug(child.stdout.take());
        drain_to_debug(child.stderr.take());

        child
            .wait()
            .await
            .map_err(|e| SiteWatchError::Generation(format!("waiting for '{cmd}': {e}")))?
    } else {
        command
            .status()
            .await
            .map_err(|e| SiteWatchError::Generation(format!("running '{cmd}': {e}")))?
    };

    if status.success() {
        Ok(())
    } else {
        Err(SiteWatchError::Generation(format!(
            "'{cmd}' exited with {status}"
        )))
    }
}

fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

fn drain_to_debug<R>(stream: Option<R>)
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    if let Some(stream) = stream {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stream).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("generator: {line}");
            }
        });
    }
}
