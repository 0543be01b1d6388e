//! Mapping menu selections back to the items they were rendered from.
//!
//! Label grammar for issue-like items:
//!
//! ```text
//! aggregated:  {owner}/{repo} - #{number} ({title})
//! per-repo:    #{number} - {title}
//! ```
//!
//! Parsing is anchored at the start of the line, so the first `#{number}`
//! wins even when the title contains ` - #` or `#123` sequences of its own.
//! Repository names never contain whitespace or start with `#`, which keeps
//! the optional prefix unambiguous.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{Error, Result},
    types::{IssueLike, RepoAction, Repository},
};

static ITEM_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<repo>[^\s#]\S*) - )?#(?P<number>\d+)").expect("item label pattern is valid")
});

/// Identity of an issue-like item as recovered from its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKey {
    pub repo: Option<String>,
    pub number: u64,
}

pub fn item_label(item: &IssueLike) -> String {
    let title = single_line(&item.title);
    match &item.repo {
        Some(repo) => format!("{} - #{} ({})", repo, item.number, title),
        None => format!("#{} - {}", item.number, title),
    }
}

/// Collapses line breaks so a title renders as exactly one menu entry.
fn single_line(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn parse_item_label(text: &str) -> Option<ItemKey> {
    let captures = ITEM_LABEL.captures(text.trim())?;
    let number = captures["number"].parse().ok()?;
    Some(ItemKey {
        repo: captures.name("repo").map(|m| m.as_str().to_string()),
        number,
    })
}

pub fn resolve_item<'a>(selection: &str, items: &'a [IssueLike]) -> Result<&'a IssueLike> {
    let not_found = || Error::NotFound(selection.to_string());
    let key = parse_item_label(selection).ok_or_else(not_found)?;

    items
        .iter()
        .find(|item| item.key() == (key.repo.as_deref(), key.number))
        .ok_or_else(not_found)
}

pub fn resolve_repository<'a>(
    selection: &str,
    repos: &'a [Repository],
) -> Result<&'a Repository> {
    repos
        .iter()
        .find(|repo| repo.label() == selection)
        .ok_or_else(|| Error::NotFound(selection.to_string()))
}

pub fn resolve_action(selection: &str) -> Result<RepoAction> {
    RepoAction::all()
        .into_iter()
        .find(|action| action.as_str() == selection)
        .ok_or_else(|| Error::NotFound(selection.to_string()))
}
