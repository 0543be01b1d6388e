mod common;

use common::{item, repo};
use ghmenu::{
    Error, ItemKind, RepoAction,
    menu::dedup_options,
    resolve::{ItemKey, parse_item_label, resolve_action, resolve_item, resolve_repository},
};

#[test]
fn test_aggregated_label_format() {
    let pr = item(Some("acme/widgets"), 42, "Fix bug");
    assert_eq!(pr.label(), "acme/widgets - #42 (Fix bug)");
}

#[test]
fn test_repository_scoped_label_format() {
    let issue = item(None, 7, "Crash on start");
    assert_eq!(issue.label(), "#7 - Crash on start");
}

#[test]
fn test_multiline_title_renders_on_one_line() {
    let issue = item(None, 3, "  First line\r\nsecond line\n");
    assert_eq!(issue.label(), "#3 - First line second line");
}

#[test]
fn test_resolve_aggregated_selection() {
    let items = vec![
        item(Some("acme/gadgets"), 42, "Fix bug"),
        item(Some("acme/widgets"), 42, "Fix bug"),
        item(Some("acme/widgets"), 4, "Fix bug"),
    ];

    let resolved = resolve_item("acme/widgets - #42 (Fix bug)", &items).unwrap();

    assert_eq!(resolved, &items[1]);
}

#[test]
fn test_first_number_is_authoritative() {
    assert_eq!(
        parse_item_label("acme/widgets - #42 (Revert #41 - acme/other - #40)"),
        Some(ItemKey {
            repo: Some("acme/widgets".to_string()),
            number: 42,
        })
    );
    assert_eq!(
        parse_item_label("#8 - Follow-up to #7 - see #6"),
        Some(ItemKey {
            repo: None,
            number: 8,
        })
    );
}

#[test]
fn test_unparseable_labels() {
    assert_eq!(parse_item_label(""), None);
    assert_eq!(parse_item_label("acme/widgets"), None);
    assert_eq!(parse_item_label("acme widgets - #1 (two words)"), None);
    assert_eq!(parse_item_label("#99999999999999999999999 - overflow"), None);
}

#[test]
fn test_label_round_trip_for_every_item() {
    let items = vec![
        item(Some("acme/widgets"), 1, "Plain"),
        item(Some("acme/widgets"), 10, "Title with (parens) and - dashes"),
        item(Some("acme/gadgets"), 1, "Same number, other repo"),
        item(Some("octo-org/repo.name_x"), 12345, "#1 - looks like a label"),
        item(Some("acme/widgets"), 2, ""),
    ];
    for expected in &items {
        let resolved = resolve_item(&expected.label(), &items).unwrap();
        assert_eq!(resolved.key(), expected.key());
        assert_eq!(resolved, expected);
    }

    let scoped = vec![
        item(None, 1, "One"),
        item(None, 11, "Eleven"),
        item(None, 111, "#1 - nested"),
    ];
    for expected in &scoped {
        assert_eq!(resolve_item(&expected.label(), &scoped).unwrap(), expected);
    }
}

#[test]
fn test_repo_prefix_must_match_exactly() {
    let items = vec![item(Some("acme/widgets"), 42, "Fix bug")];

    let scoped_label = resolve_item("#42 - Fix bug", &items);
    assert!(matches!(scoped_label, Err(Error::NotFound(_))));

    let other_repo = resolve_item("acme/gadgets - #42 (Fix bug)", &items);
    assert!(matches!(other_repo, Err(Error::NotFound(_))));
}

#[test]
fn test_resolve_item_not_found() {
    let items = vec![item(None, 1, "One")];

    match resolve_item("#2 - Two", &items) {
        Err(Error::NotFound(selection)) => assert_eq!(selection, "#2 - Two"),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(matches!(
        resolve_item("garbage", &items),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_resolve_repository_by_exact_name() {
    let repos = vec![repo("acme/widgets"), repo("acme/widgets-legacy"), repo("dotfiles")];

    assert_eq!(
        resolve_repository("acme/widgets", &repos).unwrap(),
        &repos[0]
    );
    assert_eq!(resolve_repository("dotfiles", &repos).unwrap(), &repos[2]);
    assert!(matches!(
        resolve_repository("acme/widget", &repos),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_resolve_action() {
    assert_eq!(
        resolve_action("Open on GitHub").unwrap(),
        RepoAction::OpenOnGitHub
    );
    assert_eq!(
        resolve_action("Issues").unwrap(),
        RepoAction::Browse(ItemKind::Issues)
    );
    assert_eq!(
        resolve_action("Pull Requests").unwrap(),
        RepoAction::Browse(ItemKind::PullRequests)
    );
    assert!(matches!(resolve_action("pull requests"), Err(Error::NotFound(_))));
}

#[test]
fn test_dedup_preserves_first_occurrence_order() {
    let options: Vec<String> = ["b", "a", "b", "c", "a", "b"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    assert_eq!(dedup_options(&options), vec!["b", "a", "c"]);
}

#[test]
fn test_dedup_is_exact_string_equality() {
    let options: Vec<String> = ["Fix", "fix", "Fix ", "Fix"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    assert_eq!(dedup_options(&options), vec!["Fix", "fix", "Fix "]);
    assert!(dedup_options(&[]).is_empty());
}
