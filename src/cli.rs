use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::{
    cache::default_cache_path,
    command::CommandLine,
    types::{ItemKind, Mode},
};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

pub const DEFAULT_PICKER: &str = "dmenu -i";
pub const DEFAULT_OPENER: &str = "xdg-open";
pub const DEFAULT_NOTIFIER: &str = "notify-send";
pub const DEFAULT_SECRET_COMMAND: &str = "pass show tokens/github/repo";
pub const MAX_PAGES: usize = 20;

#[derive(Subcommand, Debug, Clone)]
enum ModeArg {
    /// Pick a repository, then open it or one of its issues or pull requests (default)
    Browse,
    /// Pick one of your open pull requests across all repositories
    Pulls(ItemArgs),
    /// Pick one of your open issues across all repositories
    Issues(ItemArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct ItemArgs {
    /// Search query for additional items (defaults to items assigned to you)
    #[arg(long, value_name = "SEARCH-QUERY", conflicts_with = "no_assigned")]
    search: Option<String>,

    /// Only list items you authored
    #[arg(long = "no-assigned")]
    no_assigned: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "ghmenu",
    about = "Pick a GitHub repository, issue or pull request from a menu and open it in the browser"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    #[command(subcommand)]
    mode: Option<ModeArg>,

    /// Ignore the cached repository list and fetch it again
    #[arg(long, global = true)]
    refresh: bool,

    /// Never read or write the repository cache
    #[arg(long = "no-cache", global = true, conflicts_with = "refresh")]
    no_cache: bool,

    /// Repository cache file
    #[arg(long, global = true, env = "GHMENU_CACHE", value_name = "PATH")]
    cache: Option<PathBuf>,

    /// Menu program reading options on stdin
    #[arg(long, global = true, env = "GHMENU_PICKER", value_name = "COMMAND", default_value = DEFAULT_PICKER)]
    picker: CommandLine,

    /// Program that opens a URL
    #[arg(long, global = true, env = "GHMENU_OPENER", value_name = "COMMAND", default_value = DEFAULT_OPENER)]
    opener: CommandLine,

    /// Program that shows a desktop notification on failure
    #[arg(long, global = true, env = "GHMENU_NOTIFIER", value_name = "COMMAND", default_value = DEFAULT_NOTIFIER)]
    notifier: CommandLine,

    /// Command printing the GitHub token (GITHUB_TOKEN or GH_TOKEN take precedence)
    #[arg(
        long = "secret-command",
        global = true,
        env = "GHMENU_SECRET_COMMAND",
        value_name = "COMMAND",
        default_value = DEFAULT_SECRET_COMMAND
    )]
    secret_command: CommandLine,

    /// Pages of 100 results to request per list
    #[arg(
        long,
        global = true,
        value_name = "NUM",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..=MAX_PAGES as u64)
    )]
    pages: u64,

    /// GitHub API root, e.g. for GitHub Enterprise
    #[arg(long = "api-url", global = true, env = "GHMENU_API_URL", value_name = "URL")]
    api_url: Option<String>,
}

/// Runtime configuration shared by all modes.
#[derive(Debug, Clone)]
pub struct Settings {
    pub picker: CommandLine,
    pub opener: CommandLine,
    pub notifier: CommandLine,
    pub secret_command: CommandLine,
    /// `None` disables the repository cache.
    pub cache_path: Option<PathBuf>,
    pub refresh: bool,
    pub max_pages: usize,
    pub api_url: Option<String>,
}

/// Ensures a user query only matches open items of `kind`.
pub fn normalize_search(query: &str, kind: ItemKind) -> String {
    // Qualifiers are compared as whole terms: `is:private` is not `is:pr`.
    let mut terms: Vec<&str> = query.split_whitespace().collect();

    let qualifier = kind.search_qualifier();
    if !terms.contains(&qualifier) {
        terms.push(qualifier);
    }

    if !terms.contains(&"is:open") && !terms.contains(&"is:closed") {
        terms.push("is:open");
    }

    terms.join(" ")
}

fn item_mode(kind: ItemKind, args: ItemArgs) -> Mode {
    let search = if args.no_assigned {
        None
    } else {
        Some(match args.search {
            Some(query) => normalize_search(&query, kind),
            None => kind.default_search(),
        })
    };
    Mode::Items { kind, search }
}

fn build_settings(cli: &CliArgs) -> Settings {
    let cache_path = if cli.no_cache {
        None
    } else {
        Some(cli.cache.clone().unwrap_or_else(default_cache_path))
    };

    Settings {
        picker: cli.picker.clone(),
        opener: cli.opener.clone(),
        notifier: cli.notifier.clone(),
        secret_command: cli.secret_command.clone(),
        cache_path,
        refresh: cli.refresh,
        max_pages: cli.pages as usize,
        api_url: cli.api_url.clone(),
    }
}

/// Parses command-line arguments into the selected mode and its settings.
///
/// Environment variables (`GHMENU_*`) fill in options not given on the
/// command line.
pub fn parse_args<I, T>(args: I) -> Result<(Mode, Settings)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    let settings = build_settings(&cli);

    let mode = match cli.mode {
        None | Some(ModeArg::Browse) => Mode::Browse,
        Some(ModeArg::Pulls(args)) => item_mode(ItemKind::PullRequests, args),
        Some(ModeArg::Issues(args)) => item_mode(ItemKind::Issues, args),
    };

    Ok((mode, settings))
}
