use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    cache::RepoCache,
    error::Result,
    types::{IssueLike, ItemKind, Repository, Target},
};

/// Remote source of repositories and issue-like items.
#[async_trait]
pub trait Forge {
    /// Repositories the viewer owns, followed by those contributed to.
    async fn viewer_repositories(&self) -> Result<Vec<Repository>>;

    /// Open items of a single repository, without repository labels.
    async fn repository_items(&self, repo: &Repository, kind: ItemKind)
    -> Result<Vec<IssueLike>>;

    /// Open items authored by the viewer across all repositories.
    async fn viewer_items(&self, kind: ItemKind) -> Result<Vec<IssueLike>>;

    /// Open items matching a search query, restricted to `kind`.
    async fn search_items(&self, kind: ItemKind, query: &str) -> Result<Vec<IssueLike>>;
}

/// Lists repositories, serving from `cache` unless `refresh` is set.
///
/// Every remote fetch is written back to the cache.
pub async fn fetch_repositories<F>(
    forge: &F,
    cache: Option<&RepoCache>,
    refresh: bool,
) -> Result<Vec<Repository>>
where
    F: Forge + Sync + ?Sized,
{
    if let Some(cache) = cache.filter(|_| !refresh) {
        if let Some(repos) = cache.load().await {
            debug!(count = repos.len(), "serving repositories from cache");
            return Ok(repos);
        }
    }

    let repos = forge.viewer_repositories().await?;
    info!(count = repos.len(), refresh, "fetched repositories");

    if let Some(cache) = cache {
        cache.store(&repos).await;
    }

    Ok(repos)
}

pub async fn fetch_items<F>(forge: &F, kind: ItemKind, target: &Target) -> Result<Vec<IssueLike>>
where
    F: Forge + Sync + ?Sized,
{
    let items = match target {
        Target::Repository(repo) => forge.repository_items(repo, kind).await?,
        Target::Viewer { search: None } => forge.viewer_items(kind).await?,
        Target::Viewer {
            search: Some(query),
        } => {
            let (authored, searched) = futures::try_join!(
                forge.viewer_items(kind),
                forge.search_items(kind, query)
            )?;
            merge_items(authored, searched)
        }
    };

    info!(count = items.len(), kind = kind.menu_label(), "fetched items");
    Ok(items)
}

/// Concatenates `first` and `second`, dropping later duplicates of the same
/// repository and number.
pub fn merge_items(first: Vec<IssueLike>, second: Vec<IssueLike>) -> Vec<IssueLike> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|item| seen.insert((item.repo.clone(), item.number)))
        .collect()
}

/// Concatenates repository lists, keeping the first occurrence of each name.
pub fn merge_repositories(first: Vec<Repository>, second: Vec<Repository>) -> Vec<Repository> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|repo| seen.insert(repo.name.clone()))
        .collect()
}
