// src/lib.rs

pub mod build;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod plugin;
pub mod runtime;
pub mod serve;
pub mod site;
pub mod watch;

use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use tokio::sync::mpsc;

use crate::cli::CliArgs;
use crate::config::Options;
use crate::fs::{FileSystem, RealFileSystem};
use crate::plugin::Plugin;
use crate::runtime::{Runtime, RuntimeEvent};
use crate::site::{ProcessEngine, SiteEngine};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - options loading
/// - engine shim and configuration resolution
/// - watch-scope computation
/// - file watcher and runtime event loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let root = std::env::current_dir()?;

    let mut options = Options::load(Path::new(&args.config))?;
    options.apply_cli(&args);

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let engine: Arc<dyn SiteEngine> = Arc::new(ProcessEngine::new(
        root.clone(),
        options.engine.clone(),
        options.silent,
        fs.clone(),
    ));

    let mut plugin = Plugin::new(engine, fs, options, root.clone()).await?;

    if args.dry_run {
        print_dry_run(&plugin)?;
        return Ok(());
    }

    if args.once {
        plugin.start().await?;
        plugin.stop();
        return Ok(());
    }

    // Compute the watch scope before anything else happens: a source
    // nested inside the destination must abort before a watch exists.
    let scope = Arc::new(RwLock::new(plugin.watch_pattern()?));
    plugin.attach_watch_scope(scope.clone());

    plugin.start().await?;

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let _watcher_handle = crate::watch::spawn_watcher(root, scope, rt_tx.clone())?;

    // Ctrl-C -> graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    Runtime::new(plugin, rt_rx).run().await?;
    Ok(())
}

/// Simple dry-run output: print the resolved layout and watch scope.
fn print_dry_run(plugin: &Plugin) -> Result<()> {
    let config = plugin.config();
    let pattern = plugin.watch_pattern()?;

    println!("sitewatch dry-run");
    println!("  source = {}", config.source());
    println!("  destination = {}", config.destination());
    println!("  extensions = {}", config.extensions_pattern());
    println!("  watch include = {}", pattern.include_pattern());
    if let Some(exclude) = pattern.exclude_pattern() {
        println!("  watch exclude = {exclude}");
    }
    for file in pattern.config_files() {
        println!("  config file = {file}");
    }
    if config.serve() {
        println!(
            "  serve = http://{}:{}/",
            config.site().host,
            config.site().port
        );
    }

    Ok(())
}
