use std::process::Stdio;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::{
    command::CommandLine,
    error::{Error, Result},
};

/// Side effects at the end of a run.
#[async_trait]
pub trait Launcher {
    /// Opens `url` in the browser. Does not wait for the browser.
    async fn open(&self, url: &str) -> Result<()>;

    /// Surfaces a failure outside the terminal. Never fails itself.
    async fn notify(&self, title: &str, message: &str);
}

/// Only web URLs are handed to the opener.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::Upstream(format!("invalid URL '{url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::Upstream(format!(
            "refusing to open '{url}': unsupported scheme '{scheme}'"
        ))),
    }
}

/// Runs an opener such as `xdg-open` and a notifier such as `notify-send`.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    opener: CommandLine,
    notifier: CommandLine,
}

impl SystemLauncher {
    pub fn new(opener: CommandLine, notifier: CommandLine) -> Self {
        Self { opener, notifier }
    }
}

#[async_trait]
impl Launcher for SystemLauncher {
    async fn open(&self, url: &str) -> Result<()> {
        let url = validate_url(url)?;
        debug!(%url, opener = %self.opener, "opening");

        self.opener
            .to_command()
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| Error::command(&self.opener.program, e))?;
        Ok(())
    }

    async fn notify(&self, title: &str, message: &str) {
        let status = self
            .notifier
            .to_command()
            .args([title, message])
            .stdin(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(notifier = %self.notifier, %status, "notifier failed"),
            Err(e) => warn!(notifier = %self.notifier, error = %e, "failed to run notifier"),
        }
    }
}
