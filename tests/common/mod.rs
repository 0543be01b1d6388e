#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use ghmenu::{Error, Forge, IssueLike, ItemKind, Launcher, Picker, Repository, Result};

pub fn repo(name: &str) -> Repository {
    Repository::new(name, format!("https://github.com/{name}"))
}

pub fn item(repo: Option<&str>, number: u64, title: &str) -> IssueLike {
    let url = match repo {
        Some(repo) => format!("https://github.com/{repo}/pull/{number}"),
        None => format!("https://github.com/acme/widgets/issues/{number}"),
    };
    IssueLike {
        number,
        repo: repo.map(str::to_string),
        title: title.to_string(),
        url,
    }
}

/// Forge serving canned data and counting every call.
#[derive(Default)]
pub struct MockForge {
    pub repositories: Vec<Repository>,
    pub repository_items: Vec<IssueLike>,
    pub viewer_items: Vec<IssueLike>,
    pub search_items: Vec<IssueLike>,
    pub failure: Option<String>,
    pub calls: AtomicUsize,
    pub searches: Mutex<Vec<String>>,
}

impl MockForge {
    pub fn with_repositories(repositories: Vec<Repository>) -> Self {
        Self {
            repositories,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T: Clone>(&self, data: &[T]) -> Result<Vec<T>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(Error::Upstream(message.clone())),
            None => Ok(data.to_vec()),
        }
    }
}

#[async_trait]
impl Forge for MockForge {
    async fn viewer_repositories(&self) -> Result<Vec<Repository>> {
        self.respond(&self.repositories)
    }

    async fn repository_items(
        &self,
        _repo: &Repository,
        _kind: ItemKind,
    ) -> Result<Vec<IssueLike>> {
        self.respond(&self.repository_items)
    }

    async fn viewer_items(&self, _kind: ItemKind) -> Result<Vec<IssueLike>> {
        self.respond(&self.viewer_items)
    }

    async fn search_items(&self, _kind: ItemKind, query: &str) -> Result<Vec<IssueLike>> {
        self.searches.lock().unwrap().push(query.to_string());
        self.respond(&self.search_items)
    }
}

/// Picker answering from a script; an exhausted script behaves like a
/// dismissed menu.
#[derive(Default)]
pub struct ScriptedPicker {
    answers: Mutex<VecDeque<Option<String>>>,
    pub prompts: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPicker {
    pub fn new(answers: &[Option<&str>]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.map(str::to_string)).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn choosing(answers: &[&str]) -> Self {
        let answers: Vec<Option<&str>> = answers.iter().copied().map(Some).collect();
        Self::new(&answers)
    }

    pub fn prompts(&self) -> Vec<Vec<String>> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Picker for ScriptedPicker {
    async fn pick(&self, options: &[String]) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(options.to_vec());
        Ok(self.answers.lock().unwrap().pop_front().flatten())
    }
}

/// Launcher recording what would have been opened or notified.
#[derive(Default)]
pub struct RecordingLauncher {
    pub opened: Mutex<Vec<String>>,
    pub notifications: Mutex<Vec<(String, String)>>,
}

impl RecordingLauncher {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<(String, String)> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn open(&self, url: &str) -> Result<()> {
        ghmenu::launcher::validate_url(url)?;
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn notify(&self, title: &str, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}
