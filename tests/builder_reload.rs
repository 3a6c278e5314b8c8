//! Reload semantics: a fresh site handle per configuration generation,
//! with classifiers bound to the new handle only.

use std::path::PathBuf;
use std::sync::Arc;

use sitewatch::build::Builder;
use sitewatch::config::{Config, Options};
use sitewatch_test_utils::fake_engine::{FakeSiteEngine, SiteAction};

#[tokio::test]
async fn reload_replaces_the_site_handle() {
    let engine = Arc::new(FakeSiteEngine::with_dirs("src", "src/public"));
    let config = Arc::new(
        Config::resolve(&*engine, Options::default(), PathBuf::from("/my/prj"))
            .await
            .unwrap(),
    );

    let mut builder = Builder::new(engine.clone(), config.clone()).unwrap();
    assert_eq!(engine.sites().len(), 1);

    builder.build().await.unwrap();
    assert_eq!(engine.sites()[0].actions(), vec![SiteAction::BuildAll]);

    let reloaded = Arc::new(config.reload(&*engine).await.unwrap());
    builder.reload(reloaded).unwrap();
    assert_eq!(engine.sites().len(), 2);

    builder.modified(&["page.md".to_string()]).await;

    // The new handle serves the dispatch; the old one saw nothing since
    // the reload.
    assert_eq!(
        engine.sites()[1].actions(),
        vec![SiteAction::Regenerate("page.md".to_string())]
    );
    assert_eq!(engine.sites()[0].actions(), vec![SiteAction::BuildAll]);
}

#[tokio::test]
async fn build_after_reload_uses_the_new_handle() {
    let engine = Arc::new(FakeSiteEngine::with_dirs("src", "src/public"));
    let config = Arc::new(
        Config::resolve(&*engine, Options::default(), PathBuf::from("/my/prj"))
            .await
            .unwrap(),
    );

    let mut builder = Builder::new(engine.clone(), config.clone()).unwrap();
    let reloaded = Arc::new(config.reload(&*engine).await.unwrap());
    builder.reload(reloaded).unwrap();

    builder.build().await.unwrap();

    assert!(engine.sites()[0].actions().is_empty());
    assert_eq!(engine.sites()[1].actions(), vec![SiteAction::BuildAll]);
}
