//! Resolution and query behaviour of the configuration snapshot.

use std::path::PathBuf;

use sitewatch::config::{Config, Options};
use sitewatch::errors::SiteWatchError;
use sitewatch::fs::mock::MockFileSystem;
use sitewatch::site::SiteConfigMap;
use sitewatch_test_utils::builders::{options_with_config_files, options_with_extensions, site_map};
use sitewatch_test_utils::fake_engine::FakeSiteEngine;

fn root() -> PathBuf {
    PathBuf::from("/my/prj")
}

async fn resolve(engine: &FakeSiteEngine, options: Options) -> Config {
    Config::resolve(engine, options, root())
        .await
        .expect("configuration should resolve")
}

#[test]
fn default_options_match_plugin_defaults() {
    let options = Options::default();
    assert!(options.extensions.is_empty());
    assert_eq!(options.config_files, vec!["_config.yml".to_string()]);
    assert!(!options.serve);
    assert!(!options.drafts);
    assert!(!options.future);
    assert!(!options.silent);
}

#[tokio::test]
async fn extension_matcher_unions_user_and_builtin_extensions() {
    let engine = FakeSiteEngine::with_dirs("foo", "bar");
    let config = resolve(&engine, options_with_extensions(&["foo"])).await;

    assert_eq!(
        config.extensions_pattern(),
        r"\.(?:foo|md|mkd|mkdn|markdown|textile|html|haml|slim|xml|yml|sass|scss)$"
    );
    assert!(config.extension_matches("page.foo"));
    assert!(config.extension_matches("page.slim"));
}

#[tokio::test]
async fn extension_matcher_is_case_insensitive() {
    let engine = FakeSiteEngine::with_dirs("foo", "bar");
    let config = resolve(&engine, Options::default()).await;

    assert!(config.extension_matches("README.MD"));
    assert!(config.extension_matches("page.Html"));
    assert!(config.extension_matches("styles.SCSS"));
}

#[tokio::test]
async fn extension_matcher_accepts_leading_dots_in_user_extensions() {
    let engine = FakeSiteEngine::with_dirs("foo", "bar");
    let config = resolve(&engine, options_with_extensions(&[".liquid", "coffee"])).await;

    assert!(config.extension_matches("layout.liquid"));
    assert!(config.extension_matches("app.coffee"));
}

#[tokio::test]
async fn extension_matcher_anchors_to_the_suffix() {
    let engine = FakeSiteEngine::with_dirs("foo", "bar");
    let config = resolve(&engine, Options::default()).await;

    assert!(!config.extension_matches("notes.txt"));
    assert!(!config.extension_matches("md"));
    assert!(!config.extension_matches("page.mdx"));
}

#[tokio::test]
async fn excluded_paths_follow_generator_globs() {
    let engine = FakeSiteEngine::new(SiteConfigMap {
        exclude: vec!["f*".to_string(), "b*z".to_string()],
        ..site_map("foo", "bar")
    });
    let config = resolve(&engine, Options::default()).await;

    assert!(config.is_excluded("foo"));
    assert!(!config.is_excluded("bar"));
    assert!(config.is_excluded("baz"));
}

#[tokio::test]
async fn config_file_membership_is_exact() {
    let engine = FakeSiteEngine::with_dirs("foo", "bar");
    let config = resolve(
        &engine,
        options_with_config_files(&["_config.yml", "foobar/_config.yml"]),
    )
    .await;

    assert!(config.is_config_file("_config.yml"));
    assert!(config.is_config_file("foobar/_config.yml"));
    assert!(!config.is_config_file("config.yml"));
    assert!(!config.is_config_file("other/_config.yml"));
}

#[tokio::test]
async fn drafts_and_future_options_override_the_map() {
    let engine = FakeSiteEngine::with_dirs("foo", "bar");
    let options = Options {
        drafts: true,
        future: true,
        ..Options::default()
    };
    let config = resolve(&engine, options).await;

    assert!(config.site().show_drafts);
    assert!(config.site().future);
}

#[tokio::test]
async fn engine_configuration_failure_aborts_resolution() {
    let engine = FakeSiteEngine::with_dirs("foo", "bar");
    engine.fail_configuration();

    let err = Config::resolve(&engine, Options::default(), root())
        .await
        .unwrap_err();
    assert!(matches!(err, SiteWatchError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn reload_with_unchanged_options_is_idempotent() {
    let engine = FakeSiteEngine::with_dirs("src", "src/public");
    let config = resolve(&engine, options_with_extensions(&["liquid"])).await;
    let reloaded = config.reload(&engine).await.expect("reload should succeed");

    assert_eq!(config.source(), reloaded.source());
    assert_eq!(config.destination(), reloaded.destination());
    assert_eq!(config.extensions_pattern(), reloaded.extensions_pattern());
    assert_eq!(config.site(), reloaded.site());

    let fs = MockFileSystem::new();
    let before = config.watch_pattern(&fs).unwrap();
    let after = reloaded.watch_pattern(&fs).unwrap();
    assert_eq!(before.include_pattern(), after.include_pattern());
    assert_eq!(before.exclude_pattern(), after.exclude_pattern());
    assert_eq!(before.config_files(), after.config_files());
}

#[tokio::test]
async fn generator_paths_are_normalized_against_the_root() {
    let engine = FakeSiteEngine::new(site_map("/my/prj/content", "/my/prj/_site"));
    let config = resolve(&engine, Options::default()).await;

    assert_eq!(config.source(), "content");
    assert_eq!(config.destination(), "_site");
}

#[tokio::test]
async fn root_source_normalizes_to_a_dot() {
    let engine = FakeSiteEngine::new(site_map("/my/prj", "/my/prj/_site"));
    let config = resolve(&engine, Options::default()).await;

    assert_eq!(config.source(), ".");
}

#[tokio::test]
async fn trailing_slashes_are_stripped() {
    let engine = FakeSiteEngine::new(site_map("content/", "_site/"));
    let config = resolve(&engine, Options::default()).await;

    assert_eq!(config.source(), "content");
    assert_eq!(config.destination(), "_site");
}
