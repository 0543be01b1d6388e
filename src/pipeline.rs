//! One run of the launcher, driven as a small state machine:
//!
//! ```text
//! Idle -> Fetching -> Selecting -> Resolving -> Acting -> Done
//!                         |
//!                         +-> Declined          (any) -> Failed
//! ```

use tracing::{debug, error, info};

use crate::{
    cache::RepoCache,
    error::{Error, Result},
    fetch::{Forge, fetch_items, fetch_repositories},
    launcher::Launcher,
    menu::{Picker, select},
    resolve::{resolve_action, resolve_item, resolve_repository},
    types::{IssueLike, ItemKind, Mode, RepoAction, Repository, Target},
};

/// Extra entry in the repository menu that refetches the list.
pub const REFRESH_OPTION: &str = "Refresh Repository List";

pub const FAILURE_TITLE: &str = "ghmenu error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Selecting,
    Resolving,
    Acting,
}

/// How a run ended.
#[derive(Debug)]
pub enum Termination {
    /// The URL was handed to the opener.
    Done(String),
    /// The user dismissed a menu.
    Declined,
    /// The run failed and the user was notified.
    Failed(Error),
}

impl Termination {
    pub fn is_failure(&self) -> bool {
        matches!(self, Termination::Failed(_))
    }
}

/// Result of a selecting step: either a value or a dismissed menu.
enum Step<T> {
    Chosen(T),
    Declined,
}

pub struct Pipeline<'a, F: ?Sized, P: ?Sized, L: ?Sized> {
    pub forge: &'a F,
    pub picker: &'a P,
    pub launcher: &'a L,
    pub cache: Option<&'a RepoCache>,
    /// Bypass the cache for the first repository fetch.
    pub refresh: bool,
}

impl<F, P, L> Pipeline<'_, F, P, L>
where
    F: Forge + Sync + ?Sized,
    P: Picker + Sync + ?Sized,
    L: Launcher + Sync + ?Sized,
{
    /// Runs `mode` to completion. Failures are reported through the
    /// launcher's notifier before being returned.
    pub async fn execute(&self, mode: &Mode) -> Termination {
        match self.run(mode).await {
            Ok(Some(url)) => {
                info!(%url, "opened");
                Termination::Done(url)
            }
            Ok(None) => {
                info!("declined");
                Termination::Declined
            }
            Err(e) => {
                error!(error = %e, "run failed");
                self.launcher.notify(FAILURE_TITLE, &e.to_string()).await;
                Termination::Failed(e)
            }
        }
    }

    /// `Ok(Some(url))` once a URL was opened, `Ok(None)` when declined.
    pub async fn run(&self, mode: &Mode) -> Result<Option<String>> {
        enter(Stage::Idle);
        let step = match mode {
            Mode::Browse => self.browse().await?,
            Mode::Items { kind, search } => {
                let target = Target::Viewer {
                    search: search.clone(),
                };
                self.pick_item(*kind, &target).await?
            }
        };

        let Step::Chosen(url) = step else {
            return Ok(None);
        };

        enter(Stage::Acting);
        self.launcher.open(&url).await?;
        Ok(Some(url))
    }

    async fn browse(&self) -> Result<Step<String>> {
        let Step::Chosen(repo) = self.pick_repository().await? else {
            return Ok(Step::Declined);
        };

        enter(Stage::Selecting);
        let actions: Vec<String> = RepoAction::all()
            .iter()
            .map(|a| a.as_str().to_string())
            .collect();
        let Some(selection) = select(self.picker, &actions).await? else {
            return Ok(Step::Declined);
        };

        enter(Stage::Resolving);
        match resolve_action(&selection)? {
            RepoAction::OpenOnGitHub => Ok(Step::Chosen(repo.url)),
            RepoAction::Browse(kind) => {
                self.pick_item(kind, &Target::Repository(repo)).await
            }
        }
    }

    /// Prompts for a repository until one is chosen or the menu is
    /// dismissed. Choosing the refresh entry refetches and prompts again.
    async fn pick_repository(&self) -> Result<Step<Repository>> {
        let mut refresh = self.refresh;
        loop {
            enter(Stage::Fetching);
            let repos = fetch_repositories(self.forge, self.cache, refresh).await?;

            enter(Stage::Selecting);
            let mut options: Vec<String> = repos.iter().map(|r| r.label().to_string()).collect();
            options.push(REFRESH_OPTION.to_string());

            let Some(selection) = select(self.picker, &options).await? else {
                return Ok(Step::Declined);
            };
            if selection == REFRESH_OPTION {
                info!("refreshing repository list");
                refresh = true;
                continue;
            }

            enter(Stage::Resolving);
            return resolve_repository(&selection, &repos)
                .cloned()
                .map(Step::Chosen);
        }
    }

    async fn pick_item(&self, kind: ItemKind, target: &Target) -> Result<Step<String>> {
        enter(Stage::Fetching);
        let items = fetch_items(self.forge, kind, target).await?;

        enter(Stage::Selecting);
        let labels: Vec<String> = items.iter().map(IssueLike::label).collect();
        let Some(selection) = select(self.picker, &labels).await? else {
            return Ok(Step::Declined);
        };

        enter(Stage::Resolving);
        let item = resolve_item(&selection, &items)?;
        Ok(Step::Chosen(item.url.clone()))
    }
}

fn enter(stage: Stage) {
    debug!(?stage, "entering stage");
}
