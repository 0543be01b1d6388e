use ghmenu::{
    CommandLine, ItemKind, Mode,
    cache::default_cache_path,
    cli::{DEFAULT_PICKER, DEFAULT_SECRET_COMMAND, normalize_search},
    parse_args,
};

#[test]
fn test_defaults_to_browse_mode() {
    let (mode, settings) = parse_args(["ghmenu"]).unwrap();

    assert_eq!(mode, Mode::Browse);
    assert_eq!(settings.picker, DEFAULT_PICKER.parse::<CommandLine>().unwrap());
    assert_eq!(
        settings.secret_command,
        DEFAULT_SECRET_COMMAND.parse::<CommandLine>().unwrap()
    );
    assert_eq!(settings.opener.program, "xdg-open");
    assert_eq!(settings.notifier.program, "notify-send");
    assert_eq!(settings.cache_path, Some(default_cache_path()));
    assert_eq!(settings.max_pages, 1);
    assert!(!settings.refresh);
    assert_eq!(settings.api_url, None);
}

#[test]
fn test_pulls_mode_searches_assigned_by_default() {
    let (mode, _) = parse_args(["ghmenu", "pulls"]).unwrap();

    assert_eq!(
        mode,
        Mode::Items {
            kind: ItemKind::PullRequests,
            search: Some("is:open is:pr assignee:@me archived:false".to_string()),
        }
    );
}

#[test]
fn test_issues_mode_with_custom_search() {
    let (mode, _) = parse_args(["ghmenu", "issues", "--search", "mentions:@me"]).unwrap();

    assert_eq!(
        mode,
        Mode::Items {
            kind: ItemKind::Issues,
            search: Some("mentions:@me is:issue is:open".to_string()),
        }
    );
}

#[test]
fn test_no_assigned_disables_search() {
    let (mode, _) = parse_args(["ghmenu", "issues", "--no-assigned"]).unwrap();

    assert_eq!(
        mode,
        Mode::Items {
            kind: ItemKind::Issues,
            search: None,
        }
    );
}

#[test]
fn test_search_conflicts_with_no_assigned() {
    let result = parse_args(["ghmenu", "pulls", "--search", "x", "--no-assigned"]);
    assert!(result.is_err());
}

#[test]
fn test_global_options_after_subcommand() {
    let (mode, settings) = parse_args([
        "ghmenu",
        "pulls",
        "--picker",
        "rofi -dmenu -i",
        "--pages",
        "3",
        "--cache",
        "/var/tmp/repos.json",
        "--api-url",
        "https://ghe.example.com/api",
    ])
    .unwrap();

    assert!(matches!(mode, Mode::Items { kind: ItemKind::PullRequests, .. }));
    assert_eq!(settings.picker.program, "rofi");
    assert_eq!(settings.picker.args, vec!["-dmenu", "-i"]);
    assert_eq!(settings.max_pages, 3);
    assert_eq!(
        settings.cache_path.as_deref(),
        Some(std::path::Path::new("/var/tmp/repos.json"))
    );
    assert_eq!(settings.api_url.as_deref(), Some("https://ghe.example.com/api"));
}

#[test]
fn test_refresh_and_no_cache() {
    let (_, settings) = parse_args(["ghmenu", "--refresh"]).unwrap();
    assert!(settings.refresh);
    assert!(settings.cache_path.is_some());

    let (_, settings) = parse_args(["ghmenu", "browse", "--no-cache"]).unwrap();
    assert_eq!(settings.cache_path, None);

    assert!(parse_args(["ghmenu", "--refresh", "--no-cache"]).is_err());
}

#[test]
fn test_pages_out_of_range() {
    assert!(parse_args(["ghmenu", "--pages", "0"]).is_err());
    assert!(parse_args(["ghmenu", "--pages", "21"]).is_err());
    assert!(parse_args(["ghmenu", "--pages", "20"]).is_ok());
}

#[test]
fn test_empty_picker_rejected() {
    assert!(parse_args(["ghmenu", "--picker", "  "]).is_err());
}

#[test]
fn test_help_is_clap_error() {
    let err = parse_args(["ghmenu", "--help"]).unwrap_err();
    let clap_err = err.downcast_ref::<clap::Error>().unwrap();
    assert_eq!(clap_err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn test_normalize_search() {
    assert_eq!(
        normalize_search("review-requested:@me", ItemKind::PullRequests),
        "review-requested:@me is:pr is:open"
    );
    assert_eq!(
        normalize_search("is:closed is:pr author:@me", ItemKind::PullRequests),
        "is:closed is:pr author:@me"
    );
    assert_eq!(
        normalize_search("  label:bug is:open ", ItemKind::Issues),
        "label:bug is:open is:issue"
    );
}

#[test]
fn test_normalize_search_compares_whole_qualifiers() {
    assert_eq!(
        normalize_search("is:private", ItemKind::PullRequests),
        "is:private is:pr is:open"
    );
    assert_eq!(
        normalize_search("is:issue-like is:opened", ItemKind::Issues),
        "is:issue-like is:opened is:issue is:open"
    );
}
