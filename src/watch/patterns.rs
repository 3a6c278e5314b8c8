// src/watch/patterns.rs

//! Watch-scope computation.
//!
//! The watcher reports a change only when its path is worth reacting to:
//! inside the source tree but not inside the rendered output tree, or one
//! of the configured generator config files. [`build_watch_pattern`]
//! derives that matcher from the resolved source/destination directories,
//! including the nested-directory edge cases (destination inside source,
//! source inside destination, source at the project root).

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::errors::{Result, SiteWatchError};
use crate::fs::FileSystem;
use crate::watch::path_utils::lexical_normalize;

/// Compiled watch scope over forward-slash-separated root-relative paths.
///
/// A path is in scope when it is one of the config files (exact match,
/// regardless of where it lives), or when it matches the source-subtree
/// pattern and does not fall under the destination-exclude pattern.
#[derive(Debug, Clone)]
pub struct WatchPattern {
    include: Regex,
    exclude: Option<Regex>,
    config_files: Vec<String>,
}

impl WatchPattern {
    /// Returns true if the given root-relative path should be reported.
    pub fn matches(&self, path: &str) -> bool {
        if self.config_files.iter().any(|f| f == path) {
            return true;
        }
        if !self.include.is_match(path) {
            return false;
        }
        match &self.exclude {
            Some(exclude) => !exclude.is_match(path),
            None => true,
        }
    }

    /// The source-subtree pattern, for diagnostics.
    pub fn include_pattern(&self) -> &str {
        self.include.as_str()
    }

    /// The destination-exclude pattern, if the destination is nested
    /// inside the source.
    pub fn exclude_pattern(&self) -> Option<&str> {
        self.exclude.as_ref().map(|re| re.as_str())
    }

    pub fn config_files(&self) -> &[String] {
        &self.config_files
    }
}

/// Derive the watch scope for a site rooted at `root`.
///
/// `source` and `destination` are root-relative strings as resolved by the
/// configuration, with `.` denoting the root itself. The textual values
/// drive the patterns; only the nesting checks and the
/// destination-relative-to-source computation go through real paths, since
/// either directory may contain `.`/`..` segments or be a symlink.
///
/// Fails with [`SiteWatchError::SourceInsideDestination`] when the source
/// lies inside (or equals) the destination: such a site would consume its
/// own output, and no watch may be registered for it.
pub fn build_watch_pattern(
    fs: &dyn FileSystem,
    root: &Path,
    source: &str,
    destination: &str,
    config_files: &[String],
) -> Result<WatchPattern> {
    let src_real = resolve_dir(fs, root, source);
    let dst_real = resolve_dir(fs, root, destination);

    if src_real.starts_with(&dst_real) {
        return Err(SiteWatchError::SourceInsideDestination {
            source: source.to_string(),
            destination: destination.to_string(),
        });
    }

    let include = if source == "." {
        Regex::new("^.*$")?
    } else {
        Regex::new(&format!("^{}/.*$", regex::escape(source)))?
    };

    // Destination nested inside source (the common layout): everything
    // strictly under the destination is out of scope. The prefix comes
    // from real paths so `destination = "./_site"` or a symlinked output
    // directory still excludes the right subtree.
    let exclude = if dst_real.starts_with(&src_real) {
        let rel_dst = dst_real
            .strip_prefix(&src_real)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| destination.to_string());
        let prefix = if source == "." {
            rel_dst
        } else {
            format!("{source}/{rel_dst}")
        };
        Some(Regex::new(&format!("^{}/", regex::escape(&prefix)))?)
    } else {
        None
    };

    Ok(WatchPattern {
        include,
        exclude,
        config_files: config_files.to_vec(),
    })
}

/// Resolve a root-relative directory to a stable absolute path.
///
/// Prefers the real filesystem path; falls back to lexically normalizing
/// the joined path when the directory does not exist yet.
fn resolve_dir(fs: &dyn FileSystem, root: &Path, dir: &str) -> PathBuf {
    let joined = if dir == "." {
        root.to_path_buf()
    } else {
        root.join(dir)
    };
    fs.canonicalize(&joined)
        .unwrap_or_else(|_| lexical_normalize(&joined))
}
