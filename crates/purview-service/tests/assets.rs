//! Asset purge loop.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Call, InMemoryCatalog, service};
use purview_core::error::ErrorKind;
use purview_service::{AssetPurger, PurgeStatus};
use tokio_util::sync::CancellationToken;

const HOUR: Duration = Duration::from_secs(3600);

fn purger(catalog: &Arc<InMemoryCatalog>) -> AssetPurger {
    AssetPurger::new(
        catalog.clone(),
        Arc::new(service(catalog, true)),
        "2022-03-01-preview",
        1000,
    )
}

fn catalog() -> Arc<InMemoryCatalog> {
    InMemoryCatalog::with_collections(&[("acct", "acct", None), ("abc123", "Sales", Some("acct"))])
}

#[tokio::test]
async fn test_purge_runs_three_cycles_for_2500_assets() {
    let catalog = catalog();
    catalog.add_assets("abc123", 2500);

    let report = purger(&catalog)
        .purge("Sales", false, HOUR, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.status, PurgeStatus::Completed);
    assert_eq!(report.cycles, 3);
    assert_eq!(report.assets_deleted, 2500);
    assert_eq!(catalog.asset_count("abc123"), 0);

    let work: Vec<_> = catalog
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Search(_) | Call::BulkDelete(_)))
        .collect();
    assert_eq!(
        work,
        vec![
            Call::Search("abc123".into()),
            Call::BulkDelete(1000),
            Call::Search("abc123".into()),
            Call::BulkDelete(1000),
            Call::Search("abc123".into()),
            Call::BulkDelete(500),
            Call::Search("abc123".into()),
        ]
    );
}

#[tokio::test]
async fn test_empty_collection_completes_immediately() {
    let catalog = catalog();
    let report = purger(&catalog)
        .purge("abc123", false, HOUR, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.status, PurgeStatus::Completed);
    assert_eq!(report.cycles, 0);
}

#[tokio::test]
async fn test_cancelled_token_stops_before_deleting() {
    let catalog = catalog();
    catalog.add_assets("abc123", 10);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = purger(&catalog)
        .purge("abc123", false, HOUR, cancel)
        .await
        .unwrap();
    assert_eq!(report.status, PurgeStatus::Cancelled);
    assert_eq!(catalog.asset_count("abc123"), 10);
}

#[tokio::test(start_paused = true)]
async fn test_slow_search_times_out() {
    let catalog = catalog();
    catalog.add_assets("abc123", 10);
    catalog.delay_search(Duration::from_secs(600));

    let report = purger(&catalog)
        .purge("abc123", false, Duration::from_secs(60), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.status, PurgeStatus::TimedOut);
    assert_eq!(report.cycles, 0);
    assert_eq!(catalog.asset_count("abc123"), 10);
}

#[tokio::test]
async fn test_forbidden_search_names_role() {
    let catalog = catalog();
    catalog.deny_search();

    let err = purger(&catalog)
        .purge("abc123", false, HOUR, CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PermissionDenied);
    assert!(err.message.contains("Data Curator"));
}

#[tokio::test]
async fn test_purge_all_visits_each_collection() {
    let catalog = InMemoryCatalog::with_collections(&[
        ("acct", "acct", None),
        ("one", "One", Some("acct")),
        ("two", "Two", Some("acct")),
    ]);
    catalog.add_assets("one", 5);
    catalog.add_assets("two", 1500);

    let reports = purger(&catalog)
        .purge_all(
            &["One".to_string(), "two".to_string()],
            false,
            HOUR,
            CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].cycles, 2);
    assert_eq!(catalog.asset_count("two"), 0);
}
