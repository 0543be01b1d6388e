//! ghmenu: pick a GitHub repository, issue or pull request from a menu and
//! open it in the browser.
//!
//! A run fetches candidates from the GitHub GraphQL API (repositories through
//! an on-disk cache), shows their labels in an external picker such as
//! dmenu, resolves the chosen line back to the item it was rendered from and
//! hands its URL to an opener. Failures are surfaced as desktop
//! notifications; dismissing the menu ends the run quietly.

pub mod cache;
pub mod cli;
pub mod command;
pub mod error;
pub mod fetch;
pub mod github;
pub mod graphql;
pub mod launcher;
pub mod menu;
pub mod pipeline;
pub mod resolve;
pub mod types;

pub use cache::RepoCache;
pub use cli::{Settings, parse_args};
pub use command::CommandLine;
pub use error::{Error, Result};
pub use fetch::{Forge, fetch_items, fetch_repositories};
pub use github::{GitHub, TokenSource};
pub use launcher::{Launcher, SystemLauncher};
pub use menu::{CommandPicker, Picker, select};
pub use pipeline::{Pipeline, Termination};
pub use types::{IssueLike, ItemKind, Mode, RepoAction, Repository, Target};
