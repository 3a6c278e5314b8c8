// src/site/mod.rs

//! The seam between this crate and the static-site generation engine.
//!
//! The engine is an external collaborator: we only ever ask it to resolve
//! its configuration, build everything, regenerate one file's output, or
//! delete one file's output artifact. [`process::ProcessEngine`] is the
//! production implementation driving a generator through shell commands;
//! tests substitute a recording fake.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::options::Options;
use crate::errors::Result;

pub mod process;

pub use process::ProcessEngine;

/// Boxed future used by the engine traits, so implementations stay object
/// safe without an async-trait dependency.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The resolved configuration map read back from the generator.
///
/// Paths may be absolute or project-relative as the generator likes; the
/// configuration layer normalizes them against the project root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteConfigMap {
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "default_destination")]
    pub destination: String,

    /// Generator exclude globs; excluded paths never trigger regeneration.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub baseurl: String,

    #[serde(default)]
    pub show_drafts: bool,

    #[serde(default)]
    pub future: bool,
}

fn default_source() -> String {
    ".".to_string()
}

fn default_destination() -> String {
    "_site".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

impl Default for SiteConfigMap {
    fn default() -> Self {
        Self {
            source: default_source(),
            destination: default_destination(),
            exclude: Vec::new(),
            host: default_host(),
            port: default_port(),
            baseurl: String::new(),
            show_drafts: false,
            future: false,
        }
    }
}

/// The generation engine.
///
/// `configuration` may fail when the generator cannot load its own config;
/// that failure is fatal and must reach the caller untouched.
pub trait SiteEngine: Send + Sync {
    /// Resolve the generator configuration, applying the plugin's
    /// drafts/future overrides onto the returned map.
    fn configuration<'a>(&'a self, options: &'a Options) -> BoxFuture<'a, Result<SiteConfigMap>>;

    /// Construct a fresh site handle for the given configuration map.
    ///
    /// The engine's internal caches are tied to the configuration a handle
    /// was created with, so callers must replace handles wholesale after a
    /// configuration reload rather than reuse an old one.
    fn new_site(&self, config: &SiteConfigMap) -> Result<Arc<dyn SiteHandle>>;
}

/// An engine handle bound to one configuration generation.
pub trait SiteHandle: Send + Sync {
    /// Generate the whole site from scratch.
    fn build_all(&self) -> BoxFuture<'_, Result<()>>;

    /// Re-render exactly one changed source file's output.
    fn regenerate<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Delete the output artifact corresponding to a removed source file.
    fn remove_output_for<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<()>>;
}
