// src/config/mod.rs

//! Resolved configuration.
//!
//! A [`Config`] is an immutable snapshot: the originally-supplied options,
//! the configuration map resolved by the engine, and every derived field
//! (root-relative directories, extension matcher, exclude globs). A reload
//! produces a whole new snapshot from the original options; nothing is
//! patched in place, so no derived state can survive a generator config
//! change.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::{Regex, RegexBuilder};
use tracing::{error, info};

use crate::errors::{Result, SiteWatchError};
use crate::fs::FileSystem;
use crate::site::{SiteConfigMap, SiteEngine};
use crate::watch::patterns::{WatchPattern, build_watch_pattern};

pub mod options;

pub use options::Options;

/// Extensions that always trigger regeneration, on top of any the user
/// supplies.
pub const EXTS: &[&str] = &[
    "md", "mkd", "mkdn", "markdown", "textile", "html", "haml", "slim", "xml", "yml", "sass",
    "scss",
];

/// Immutable-per-generation configuration snapshot.
#[derive(Debug)]
pub struct Config {
    options: Options,
    site: SiteConfigMap,
    root: PathBuf,
    source: String,
    destination: String,
    extensions: Regex,
    exclude: GlobSet,
}

impl Config {
    /// Resolve a snapshot: ask the engine for its configuration map and
    /// compute every derived field from scratch.
    ///
    /// An engine configuration failure is propagated untouched; it must
    /// abort startup or reload rather than be papered over.
    pub async fn resolve(
        engine: &dyn SiteEngine,
        options: Options,
        root: PathBuf,
    ) -> Result<Self> {
        let site = engine.configuration(&options).await?;

        let source = root_relative(&root, &site.source);
        let destination = root_relative(&root, &site.destination);
        let extensions = extension_matcher(&options.extensions)?;
        let exclude = build_exclude_set(&site.exclude)?;

        Ok(Self {
            options,
            site,
            root,
            source,
            destination,
            extensions,
            exclude,
        })
    }

    /// Re-run resolution from the originally-supplied options, returning a
    /// fresh snapshot for the caller to swap in atomically.
    pub async fn reload(&self, engine: &dyn SiteEngine) -> Result<Self> {
        Self::resolve(engine, self.options.clone(), self.root.clone()).await
    }

    /// Exact membership test against the configured config files.
    pub fn is_config_file(&self, path: &str) -> bool {
        self.options.config_files.iter().any(|f| f == path)
    }

    /// True if the path matches any of the generator's exclude globs.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.is_match(path)
    }

    /// Case-insensitive suffix test against the recognized extensions.
    pub fn extension_matches(&self, path: &str) -> bool {
        self.extensions.is_match(path)
    }

    /// Derive the watch scope for this snapshot.
    pub fn watch_pattern(&self, fs: &dyn FileSystem) -> Result<WatchPattern> {
        build_watch_pattern(
            fs,
            &self.root,
            &self.source,
            &self.destination,
            &self.options.config_files,
        )
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn site(&self) -> &SiteConfigMap {
        &self.site
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Source directory, root-relative; `.` denotes the project root.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Destination directory, root-relative.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn serve(&self) -> bool {
        self.options.serve
    }

    pub fn silent(&self) -> bool {
        self.options.silent
    }

    /// The compiled extension matcher, for diagnostics and equivalence
    /// checks.
    pub fn extensions_pattern(&self) -> &str {
        self.extensions.as_str()
    }

    /// User-facing informational message, suppressed when silent.
    pub fn info(&self, msg: &str) {
        if !self.silent() {
            info!("{}{}", self.options.msg_prefix, msg);
        }
    }

    /// User-facing error message. Never suppressed.
    pub fn error(&self, msg: &str) {
        error!("{}{}", self.options.msg_prefix, msg);
    }
}

/// Express a generator-supplied path relative to the project root, with
/// forward slashes and `.` for the root itself.
pub(crate) fn root_relative(root: &Path, path: &str) -> String {
    let p = Path::new(path);
    let rel = if p.is_absolute() {
        p.strip_prefix(root).unwrap_or(p)
    } else {
        p
    };

    let s = rel.to_string_lossy().replace('\\', "/");
    let s = s.trim_start_matches("./").trim_end_matches('/');
    if s.is_empty() {
        ".".to_string()
    } else {
        s.to_string()
    }
}

/// Compile the union of user-supplied and built-in extensions into a
/// case-insensitive suffix matcher, e.g. `\.(?:md|markdown|html)$`.
fn extension_matcher(user: &[String]) -> Result<Regex> {
    let mut seen = HashSet::new();
    let mut alts = Vec::new();

    for ext in user
        .iter()
        .map(|e| regex::escape(e.trim_start_matches('.')))
        .chain(EXTS.iter().map(|e| (*e).to_string()))
    {
        if !ext.is_empty() && seen.insert(ext.clone()) {
            alts.push(ext);
        }
    }

    Ok(RegexBuilder::new(&format!(r"\.(?:{})$", alts.join("|")))
        .case_insensitive(true)
        .build()?)
}

fn build_exclude_set(globs: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in globs {
        let glob = Glob::new(pat).map_err(|e| {
            SiteWatchError::InvalidConfiguration(format!("invalid exclude glob '{pat}': {e}"))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| SiteWatchError::InvalidConfiguration(format!("building exclude set: {e}")))
}
