use serde::{Deserialize, Serialize};

use crate::resolve::item_label;

/// A repository the viewer owns or has contributed to.
///
/// `name` is `owner/name` when fetched from GitHub. A bare `name` (e.g. from
/// a hand-edited cache file) refers to a repository owned by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub url: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Splits `owner/name`; `None` for a bare name.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        self.name
            .split_once('/')
            .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
    }

    pub fn label(&self) -> &str {
        &self.name
    }
}

/// An issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLike {
    pub number: u64,
    /// `owner/name`, present when items were aggregated across repositories.
    pub repo: Option<String>,
    pub title: String,
    pub url: String,
}

impl IssueLike {
    pub fn label(&self) -> String {
        item_label(self)
    }

    /// The pair that identifies this item in a menu selection.
    pub fn key(&self) -> (Option<&str>, u64) {
        (self.repo.as_deref(), self.number)
    }
}

/// The issue-like resources GitHub exposes on a repository or the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Issues,
    PullRequests,
}

impl ItemKind {
    /// Connection field on `Repository` and `User`.
    pub fn connection_field(&self) -> &'static str {
        match self {
            ItemKind::Issues => "issues",
            ItemKind::PullRequests => "pullRequests",
        }
    }

    /// `__typename` of matching search result nodes.
    pub fn typename(&self) -> &'static str {
        match self {
            ItemKind::Issues => "Issue",
            ItemKind::PullRequests => "PullRequest",
        }
    }

    pub fn search_qualifier(&self) -> &'static str {
        match self {
            ItemKind::Issues => "is:issue",
            ItemKind::PullRequests => "is:pr",
        }
    }

    pub fn menu_label(&self) -> &'static str {
        match self {
            ItemKind::Issues => "Issues",
            ItemKind::PullRequests => "Pull Requests",
        }
    }

    /// Search query for open items assigned to the viewer.
    pub fn default_search(&self) -> String {
        format!(
            "is:open {} assignee:@me archived:false",
            self.search_qualifier()
        )
    }
}

/// What to do with a repository once it has been picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoAction {
    OpenOnGitHub,
    Browse(ItemKind),
}

impl RepoAction {
    pub fn all() -> [RepoAction; 3] {
        [
            RepoAction::OpenOnGitHub,
            RepoAction::Browse(ItemKind::Issues),
            RepoAction::Browse(ItemKind::PullRequests),
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RepoAction::OpenOnGitHub => "Open on GitHub",
            RepoAction::Browse(kind) => kind.menu_label(),
        }
    }
}

/// Where issue-like items are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Repository(Repository),
    /// Items the viewer authored, plus results of an optional search query
    /// (typically items assigned to the viewer).
    Viewer { search: Option<String> },
}

/// Top-level flow selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Pick a repository, then an action on it.
    Browse,
    /// Pick one of the viewer's items across all repositories.
    Items {
        kind: ItemKind,
        search: Option<String>,
    },
}
