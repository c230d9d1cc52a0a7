//! Hierarchy creation against the in-memory catalog.

mod common;

use common::{Call, InMemoryCatalog, paths, record, service};
use purview_core::error::ErrorKind;
use purview_service::SegmentAction;

#[tokio::test]
async fn test_create_path_under_root_uses_literal_segments() {
    let catalog = InMemoryCatalog::with_collections(&[("acct", "acct", None)]);
    let svc = service(&catalog, true);

    let outcomes = svc
        .create_collections("acct", &paths(&["foo/bar/baz"]), false)
        .await
        .unwrap();

    assert_eq!(
        catalog.mutations(),
        vec![
            Call::Put {
                id: "foo".into(),
                parent: "acct".into(),
                friendly_name: "foo".into()
            },
            Call::Put {
                id: "bar".into(),
                parent: "foo".into(),
                friendly_name: "bar".into()
            },
            Call::Put {
                id: "baz".into(),
                parent: "bar".into(),
                friendly_name: "baz".into()
            },
        ]
    );
    assert_eq!(outcomes[0].created().collect::<Vec<_>>(), vec!["foo", "bar", "baz"]);
}

#[tokio::test]
async fn test_second_create_issues_no_writes() {
    let catalog = InMemoryCatalog::with_collections(&[("acct", "acct", None)]);
    let svc = service(&catalog, false);
    let request = paths(&["My Finance/Q1 2024/reports"]);

    svc.create_collections("acct", &request, false).await.unwrap();
    assert_eq!(catalog.mutations().len(), 3);
    catalog.clear_calls();

    let outcomes = svc.create_collections("acct", &request, false).await.unwrap();
    assert!(catalog.mutations().is_empty());
    assert!(
        outcomes[0]
            .segments
            .iter()
            .all(|s| s.action == SegmentAction::Reuse)
    );
}

#[tokio::test]
async fn test_invalid_names_keep_friendly_label() {
    let catalog = InMemoryCatalog::with_collections(&[("acct", "acct", None)]);
    let svc = service(&catalog, true);

    let outcomes = svc
        .create_collections("acct", &paths(&["My Finance"]), false)
        .await
        .unwrap();
    let segment = &outcomes[0].segments[0];
    assert_ne!(segment.id, "My Finance");
    let stored = catalog.get(&segment.id).unwrap();
    assert_eq!(stored.friendly_name, "My Finance");
    assert_eq!(stored.parent_id(), Some("acct"));
}

#[tokio::test]
async fn test_start_collection_by_friendly_name() {
    let catalog = InMemoryCatalog::with_collections(&[
        ("acct", "acct", None),
        ("k3j9xz", "Sales", Some("acct")),
    ]);
    let svc = service(&catalog, true);

    svc.create_collections("Sales", &paths(&["emea"]), false)
        .await
        .unwrap();
    assert_eq!(catalog.get("emea").unwrap().parent_id(), Some("k3j9xz"));
}

#[tokio::test]
async fn test_ambiguous_start_lists_candidates() {
    let catalog = InMemoryCatalog::with_collections(&[
        ("acct", "acct", None),
        ("a", "Team", Some("acct")),
        ("b", "Team", Some("acct")),
    ]);
    let svc = service(&catalog, true);

    let err = svc
        .create_collections("Team", &paths(&["x1y"]), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AmbiguousName);
    assert_eq!(err.candidates.len(), 2);
    assert!(catalog.mutations().is_empty());
}

#[tokio::test]
async fn test_multiple_paths_share_new_prefix() {
    let catalog = InMemoryCatalog::with_collections(&[("acct", "acct", None)]);
    let svc = service(&catalog, true);

    svc.create_collections("acct", &paths(&["My Team/alpha", "My Team/beta"]), false)
        .await
        .unwrap();

    let teams: Vec<_> = catalog
        .ids()
        .into_iter()
        .filter(|id| catalog.get(id).unwrap().friendly_name == "My Team")
        .collect();
    assert_eq!(teams.len(), 1);
    assert_eq!(catalog.get("alpha").unwrap().parent_id(), Some(teams[0].as_str()));
    assert_eq!(catalog.get("beta").unwrap().parent_id(), Some(teams[0].as_str()));
}

#[tokio::test]
async fn test_partial_failure_names_created_segments() {
    let catalog = InMemoryCatalog::with_collections(&[("acct", "acct", None)]);
    catalog.fail_put("baz");
    let svc = service(&catalog, true);

    let err = svc
        .create_collections("acct", &paths(&["foo/bar/baz"]), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(err.message.contains("stopped at segment 'baz'"));
    assert!(err.message.contains("'foo' (foo), 'bar' (bar)"));
    assert!(catalog.get("bar").is_some());
}

#[tokio::test]
async fn test_empty_segment_is_rejected_before_any_call() {
    let catalog = InMemoryCatalog::with_collections(&[("acct", "acct", None)]);
    let svc = service(&catalog, true);

    let err = svc
        .create_collections("acct", &paths(&["foo//bar"]), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn test_concurrent_create_under_other_parent_is_a_conflict() {
    let catalog = InMemoryCatalog::with_collections(&[
        ("acct", "acct", None),
        ("other", "other", Some("acct")),
    ]);
    // Listings: resolve start, plan, then the pre-write check.
    catalog.appear_on_list(3, record("foo", "foo", Some("other")));
    let svc = service(&catalog, true);

    let err = svc
        .create_collections("acct", &paths(&["foo"]), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(catalog.mutations().is_empty());
    assert_eq!(catalog.get("foo").unwrap().parent_id(), Some("other"));
}

#[tokio::test]
async fn test_concurrent_create_under_same_parent_is_skipped() {
    let catalog = InMemoryCatalog::with_collections(&[("acct", "acct", None)]);
    catalog.appear_on_list(3, record("foo", "foo", Some("acct")));
    let svc = service(&catalog, true);

    let outcomes = svc
        .create_collections("acct", &paths(&["foo/bar"]), false)
        .await
        .unwrap();
    assert_eq!(outcomes[0].segments[0].action, SegmentAction::Reuse);
    assert_eq!(
        catalog.mutations(),
        vec![Call::Put {
            id: "bar".into(),
            parent: "foo".into(),
            friendly_name: "bar".into()
        }]
    );
}

#[tokio::test]
async fn test_put_replays_exported_collection() {
    let catalog = InMemoryCatalog::with_collections(&[("acct", "acct", None)]);
    let svc = service(&catalog, true);

    let first = svc.create_or_update("abc123", "Finance", "acct").await.unwrap();
    let second = svc.create_or_update("abc123", "Finance", "acct").await.unwrap();
    assert_eq!(first, SegmentAction::Create);
    assert_eq!(second, SegmentAction::Reuse);
    assert_eq!(catalog.mutations().len(), 1);

    let err = svc.create_or_update("a b", "x", "acct").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    let err = svc.create_or_update("abc456", "x", "nope").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_resolution_helpers() {
    let catalog = InMemoryCatalog::with_collections(&[
        ("acct", "acct", None),
        ("abc123", "Finance", Some("acct")),
        ("def456", "Payroll", Some("abc123")),
    ]);
    let svc = service(&catalog, true);

    assert_eq!(svc.real_collection_name("Finance", false).await.unwrap(), "abc123");
    let children = svc.child_collection_names("Finance", false).await.unwrap();
    assert_eq!(children.count, 1);
    assert_eq!(children.value[0].name, "def456");
    assert!(
        svc.describe_collection_name("Payroll")
            .await
            .unwrap()
            .contains("def456")
    );
    assert_eq!(svc.list_collections().await.unwrap().len(), 3);
}
