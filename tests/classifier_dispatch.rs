//! Filtering and dispatch behaviour of the change classifiers, driven
//! through the builder so they are bound exactly as in production.

use std::path::PathBuf;
use std::sync::Arc;

use sitewatch::build::Builder;
use sitewatch::config::{Config, Options};
use sitewatch::site::SiteConfigMap;
use sitewatch_test_utils::builders::site_map;
use sitewatch_test_utils::fake_engine::{FakeSiteEngine, SiteAction};

fn paths(items: &[&str]) -> Vec<String> {
    items.iter().map(|p| p.to_string()).collect()
}

async fn builder_for(engine: &Arc<FakeSiteEngine>, options: Options) -> Builder {
    let config = Config::resolve(&**engine, options, PathBuf::from("/my/prj"))
        .await
        .expect("configuration should resolve");
    Builder::new(engine.clone(), Arc::new(config)).expect("builder should construct")
}

#[tokio::test]
async fn modified_paths_are_filtered_and_dispatched_in_order() {
    let engine = Arc::new(FakeSiteEngine::new(SiteConfigMap {
        exclude: vec!["drafts/*".to_string()],
        ..site_map("foo", "bar")
    }));
    let builder = builder_for(&engine, Options::default()).await;

    builder
        .modified(&paths(&[
            "page.md",
            "notes.txt",
            "drafts/wip.md",
            "_config.yml",
            "sub/page.html",
        ]))
        .await;

    assert_eq!(
        engine.last_site().actions(),
        vec![
            SiteAction::Regenerate("page.md".to_string()),
            SiteAction::Regenerate("sub/page.html".to_string()),
        ]
    );
}

#[tokio::test]
async fn added_paths_use_the_same_pipeline() {
    let engine = Arc::new(FakeSiteEngine::with_dirs("foo", "bar"));
    let builder = builder_for(&engine, Options::default()).await;

    builder
        .added(&paths(&["new.markdown", "image.png", "_config.yml"]))
        .await;

    assert_eq!(
        engine.last_site().actions(),
        vec![SiteAction::Regenerate("new.markdown".to_string())]
    );
}

#[tokio::test]
async fn removed_paths_delete_output_artifacts() {
    let engine = Arc::new(FakeSiteEngine::with_dirs("foo", "bar"));
    let builder = builder_for(&engine, Options::default()).await;

    builder.removed(&paths(&["old.md", "style.scss"])).await;

    assert_eq!(
        engine.last_site().actions(),
        vec![
            SiteAction::RemoveOutput("old.md".to_string()),
            SiteAction::RemoveOutput("style.scss".to_string()),
        ]
    );
}

#[tokio::test]
async fn removed_config_files_are_not_special_cased() {
    // The config-file check only guards add/modify; deleting the output
    // artifact of a removed config file is harmless.
    let engine = Arc::new(FakeSiteEngine::with_dirs("foo", "bar"));
    let builder = builder_for(&engine, Options::default()).await;

    builder.removed(&paths(&["_config.yml"])).await;

    assert_eq!(
        engine.last_site().actions(),
        vec![SiteAction::RemoveOutput("_config.yml".to_string())]
    );
}

#[tokio::test]
async fn irrelevant_extensions_are_dropped_silently() {
    let engine = Arc::new(FakeSiteEngine::with_dirs("foo", "bar"));
    let builder = builder_for(&engine, Options::default()).await;

    builder
        .modified(&paths(&["image.png", "binary.dat", "notes.txt"]))
        .await;

    assert!(engine.last_site().actions().is_empty());
}

#[tokio::test]
async fn a_failing_path_does_not_abort_the_batch() {
    let engine = Arc::new(FakeSiteEngine::with_dirs("foo", "bar"));
    engine.fail_path("bad.md");
    let builder = builder_for(&engine, Options::default()).await;

    builder
        .modified(&paths(&["bad.md", "good.md", "also-good.html"]))
        .await;

    assert_eq!(
        engine.last_site().actions(),
        vec![
            SiteAction::Regenerate("good.md".to_string()),
            SiteAction::Regenerate("also-good.html".to_string()),
        ]
    );
}
