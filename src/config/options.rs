// src/config/options.rs

//! The originally-supplied plugin options.
//!
//! Loaded from a TOML file (`SiteWatch.toml` by default) and overlaid with
//! CLI flags. These are kept verbatim on the resolved configuration so a
//! reload re-runs resolution from the same inputs, never from merged
//! derived state.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::cli::CliArgs;
use crate::errors::Result;
use crate::site::SiteConfigMap;

/// Options controlling what is watched and how rebuilds behave.
///
/// ```toml
/// extensions = ["liquid"]
/// config = ["_config.yml", "_config.dev.yml"]
/// serve = true
///
/// [engine]
/// build_cmd = "jekyll build"
/// regenerate_cmd = "jekyll build --incremental {path}"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Options {
    /// Extra file extensions (with or without a leading dot) that should
    /// trigger regeneration, on top of the built-in set.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Generator config files; a modification to any of these reloads the
    /// whole configuration instead of regenerating incrementally.
    #[serde(default = "default_config_files", rename = "config")]
    pub config_files: Vec<String>,

    #[serde(default)]
    pub serve: bool,

    #[serde(default)]
    pub drafts: bool,

    #[serde(default)]
    pub future: bool,

    #[serde(default)]
    pub silent: bool,

    /// Prefix for user-facing messages.
    #[serde(default = "default_msg_prefix")]
    pub msg_prefix: String,

    /// Fallback configuration map, used when the engine has no
    /// `config_cmd` to dump its own.
    #[serde(default)]
    pub site: SiteConfigMap,

    #[serde(default)]
    pub engine: EngineSection,
}

/// `[engine]` section: how to drive the external generator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSection {
    /// Command whose stdout is the generator's resolved configuration as
    /// JSON. When unset, the `[site]` table is used instead.
    #[serde(default)]
    pub config_cmd: Option<String>,

    /// Command performing a full site build. Required to construct a site
    /// handle.
    #[serde(default)]
    pub build_cmd: Option<String>,

    /// Command regenerating one file's output; `{path}` is replaced with
    /// the changed path. Falls back to a full build when unset.
    #[serde(default)]
    pub regenerate_cmd: Option<String>,
}

fn default_config_files() -> Vec<String> {
    vec!["_config.yml".to_string()]
}

fn default_msg_prefix() -> String {
    "site: ".to_string()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            config_files: default_config_files(),
            serve: false,
            drafts: false,
            future: false,
            silent: false,
            msg_prefix: default_msg_prefix(),
            site: SiteConfigMap::default(),
            engine: EngineSection::default(),
        }
    }
}

impl Options {
    /// Parse options from TOML text, applying defaults for absent keys.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Overlay CLI flags. Flags only ever switch behaviour on, so a
    /// `true` in the options file is never undone by an absent flag.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        self.serve |= args.serve;
        self.drafts |= args.drafts;
        self.future |= args.future;
        self.silent |= args.silent;
    }
}
