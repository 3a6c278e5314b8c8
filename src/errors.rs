// src/errors.rs

//! Crate-wide error types and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteWatchError {
    /// The generator's configuration could not be loaded or is unusable.
    /// Always fatal: startup and reload abort on this.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The source tree lives inside the rendered output tree, so every
    /// build would feed on its own output. Raised when the watch scope is
    /// computed, before any watch is registered.
    #[error("fatal: source directory '{source}' is inside destination directory '{destination}'")]
    // `r#source` (not `source`) so thiserror's derive does not treat this as
    // the error's `std::error::Error::source()` — it is a plain display field.
    // The raw identifier denotes the same field name `source` to all callers.
    SourceInsideDestination { r#source: String, destination: String },

    /// The engine failed to build, regenerate, or clean up output.
    #[error("site generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SiteWatchError>;
