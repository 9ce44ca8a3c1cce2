use std::path::Path;

use mockall::Sequence;

use docpub_core::contract::{MockCachePurge, MockStorageSync, SyncRequest};
use docpub_core::publish::{ExecutionMode, PublishError, Publisher};
use docpub_core::registry::{Document, Environment, Registry, Site, SitePair};
use docpub_core::template::DocConfig;

fn site(base_url: &str, storage_url: &str, cpcode: &str, profile: &str) -> Site {
    Site {
        base_url: base_url.to_string(),
        storage_url: storage_url.to_string(),
        cpcode: cpcode.to_string(),
        storage_profile: profile.to_string(),
    }
}

/// Registry with one single-template document and one fan-out document.
fn test_registry() -> Registry {
    let mut registry = Registry::new();
    registry.insert(
        "docs",
        Document {
            sites: SitePair {
                pre: site("https://docs.pre.example", "pre-storage", "9001", "docs-profile"),
                prod: site("https://docs.example", "prod-storage", "9002", "docs-profile"),
            },
            path_templates: vec!["versions/latest/dpcpp".to_string()],
        },
    );
    registry.insert(
        "oneapi-spec",
        Document {
            sites: SitePair {
                pre: site(
                    "https://spec.pre.example",
                    "s3://pre.example/spec",
                    "9003",
                    "spec-profile",
                ),
                prod: site(
                    "https://spec.example",
                    "s3://example/spec",
                    "9004",
                    "spec-profile",
                ),
            },
            path_templates: vec![
                "versions/latest".to_string(),
                "versions/$version".to_string(),
            ],
        },
    );
    registry
}

fn version_config() -> DocConfig {
    DocConfig::from([("version".to_string(), "2.1".to_string())])
}

#[tokio::test]
async fn publish_single_template_syncs_local_tree_once() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    storage
        .expect_sync()
        .times(1)
        .withf(|request: &SyncRequest| {
            request.source == "/build/html"
                && request.destination == "pre-storage/versions/latest/dpcpp"
                && request.profile == "docs-profile"
                && !request.tool_dry_run
        })
        .returning(|_| Ok(()));
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge()
        .times(1)
        .withf(|cpcode| cpcode == "9001")
        .returning(|_| Ok(()));

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::Live);
    let report = publisher
        .publish(
            "docs",
            Environment::Pre,
            Path::new("/build/html"),
            &DocConfig::new(),
        )
        .await
        .expect("publish should succeed");

    assert_eq!(report.destinations, vec!["pre-storage/versions/latest/dpcpp"]);
    assert_eq!(
        report.urls,
        vec!["https://docs.pre.example/versions/latest/dpcpp/index.html"]
    );
}

#[tokio::test]
async fn publish_fans_out_bucket_to_bucket_in_template_order() {
    let registry = test_registry();
    let mut sequence = Sequence::new();

    let mut storage = MockStorageSync::new();
    storage
        .expect_sync()
        .times(1)
        .in_sequence(&mut sequence)
        .withf(|request: &SyncRequest| {
            request.source == "/build/html"
                && request.destination == "s3://pre.example/spec/versions/latest"
        })
        .returning(|_| Ok(()));
    storage
        .expect_sync()
        .times(1)
        .in_sequence(&mut sequence)
        .withf(|request: &SyncRequest| {
            request.source == "s3://pre.example/spec/versions/latest"
                && request.destination == "s3://pre.example/spec/versions/2.1"
        })
        .returning(|_| Ok(()));
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge()
        .times(1)
        .withf(|cpcode| cpcode == "9003")
        .returning(|_| Ok(()));

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::Live);
    let report = publisher
        .publish(
            "oneapi-spec",
            Environment::Pre,
            Path::new("/build/html"),
            &version_config(),
        )
        .await
        .expect("publish should succeed");

    assert_eq!(
        report.urls,
        vec![
            "https://spec.pre.example/versions/latest/index.html",
            "https://spec.pre.example/versions/2.1/index.html",
        ]
    );
}

#[tokio::test]
async fn publish_to_prod_uses_the_production_site() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    storage
        .expect_sync()
        .times(1)
        .withf(|request: &SyncRequest| {
            request.destination == "prod-storage/versions/latest/dpcpp"
        })
        .returning(|_| Ok(()));
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge()
        .times(1)
        .withf(|cpcode| cpcode == "9002")
        .returning(|_| Ok(()));

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::Live);
    let report = publisher
        .publish(
            "docs",
            Environment::Prod,
            Path::new("/build/html"),
            &DocConfig::new(),
        )
        .await
        .expect("publish should succeed");

    assert_eq!(
        report.urls,
        vec!["https://docs.example/versions/latest/dpcpp/index.html"]
    );
}

#[tokio::test]
async fn sync_to_prod_syncs_each_template_and_purges_once() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    storage
        .expect_sync()
        .times(1)
        .withf(|request: &SyncRequest| {
            request.source == "s3://pre.example/spec/versions/latest"
                && request.destination == "s3://example/spec/versions/latest"
                && request.profile == "spec-profile"
        })
        .returning(|_| Ok(()));
    storage
        .expect_sync()
        .times(1)
        .withf(|request: &SyncRequest| {
            request.source == "s3://pre.example/spec/versions/2.1"
                && request.destination == "s3://example/spec/versions/2.1"
        })
        .returning(|_| Ok(()));
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge()
        .times(1)
        .withf(|cpcode| cpcode == "9004")
        .returning(|_| Ok(()));

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::Live);
    let report = publisher
        .sync_to_prod("oneapi-spec", &version_config())
        .await
        .expect("sync-to-prod should succeed");

    assert_eq!(
        report.destinations,
        vec![
            "s3://example/spec/versions/latest",
            "s3://example/spec/versions/2.1",
        ]
    );
    assert_eq!(
        report.urls,
        vec![
            "https://spec.example/versions/latest/index.html",
            "https://spec.example/versions/2.1/index.html",
        ]
    );
}

#[tokio::test]
async fn dry_run_publish_executes_no_collaborator_calls() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    storage.expect_sync().times(0);
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge().times(0);

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::DryRun);
    let report = publisher
        .publish(
            "oneapi-spec",
            Environment::Pre,
            Path::new("/build/html"),
            &version_config(),
        )
        .await
        .expect("dry-run publish should succeed");

    // The intended destinations and URLs are still reported in full.
    assert_eq!(report.destinations.len(), 2);
    assert_eq!(report.urls.len(), 2);
}

#[tokio::test]
async fn dry_run_sync_to_prod_executes_no_collaborator_calls() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    storage.expect_sync().times(0);
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge().times(0);

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::DryRun);
    let report = publisher
        .sync_to_prod("oneapi-spec", &version_config())
        .await
        .expect("dry-run sync-to-prod should succeed");

    assert_eq!(report.urls.len(), 2);
}

#[tokio::test]
async fn sync_failure_aborts_remaining_steps() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    // The first sync fails; the fan-out sync must never be attempted.
    storage
        .expect_sync()
        .times(1)
        .returning(|_| Err("sync blew up".into()));
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge().times(0);

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::Live);
    let err = publisher
        .publish(
            "oneapi-spec",
            Environment::Pre,
            Path::new("/build/html"),
            &version_config(),
        )
        .await
        .expect_err("publish should fail fast");

    assert!(
        matches!(
            err,
            PublishError::Collaborator {
                tool: "storage sync",
                ..
            }
        ),
        "expected a storage sync failure, got: {err:?}"
    );
}

#[tokio::test]
async fn purge_failure_fails_the_operation() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    storage.expect_sync().times(1).returning(|_| Ok(()));
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge()
        .times(1)
        .returning(|_| Err("purge rejected".into()));

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::Live);
    let err = publisher
        .publish(
            "docs",
            Environment::Pre,
            Path::new("/build/html"),
            &DocConfig::new(),
        )
        .await
        .expect_err("publish should fail on purge");

    assert!(
        matches!(
            err,
            PublishError::Collaborator {
                tool: "cache purge",
                ..
            }
        ),
        "expected a cache purge failure, got: {err:?}"
    );
}

#[tokio::test]
async fn unknown_document_fails_before_any_call() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    storage.expect_sync().times(0);
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge().times(0);

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::Live);
    let err = publisher
        .publish(
            "nope",
            Environment::Pre,
            Path::new("/build/html"),
            &DocConfig::new(),
        )
        .await
        .expect_err("unknown document should fail");

    assert!(
        matches!(err, PublishError::Configuration(_)),
        "expected a configuration error, got: {err:?}"
    );
}

#[tokio::test]
async fn missing_template_variable_fails_before_any_call() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    storage.expect_sync().times(0);
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge().times(0);

    let publisher = Publisher::new(&registry, storage, cdn, ExecutionMode::Live);
    let err = publisher
        .publish(
            "oneapi-spec",
            Environment::Pre,
            Path::new("/build/html"),
            &DocConfig::new(),
        )
        .await
        .expect_err("missing variable should fail");

    assert!(
        matches!(err, PublishError::Template(_)),
        "expected a template error, got: {err:?}"
    );
}

#[tokio::test]
async fn tool_dry_run_is_forwarded_to_the_storage_tool() {
    let registry = test_registry();

    let mut storage = MockStorageSync::new();
    storage
        .expect_sync()
        .times(1)
        .withf(|request: &SyncRequest| request.tool_dry_run)
        .returning(|_| Ok(()));
    let mut cdn = MockCachePurge::new();
    cdn.expect_purge().times(1).returning(|_| Ok(()));

    let publisher =
        Publisher::new(&registry, storage, cdn, ExecutionMode::Live).tool_dry_run(true);
    publisher
        .publish(
            "docs",
            Environment::Pre,
            Path::new("/build/html"),
            &DocConfig::new(),
        )
        .await
        .expect("publish should succeed");
}
