use std::fmt::Display;

/// Failures that end a run.
///
/// A cancelled menu is not represented here: the selector reports it as
/// `None` and the pipeline terminates as declined.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("GitHub token unavailable: {0}")]
    Auth(String),

    #[error("GitHub request failed: {0}")]
    Upstream(String),

    #[error("Failed to match selection: '{0}'")]
    NotFound(String),

    #[error("Failed to run '{program}': {source}")]
    Command {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn upstream(msg: impl Display) -> Self {
        Error::Upstream(msg.to_string())
    }

    pub fn command(program: &str, source: std::io::Error) -> Self {
        Error::Command {
            program: program.to_string(),
            source,
        }
    }
}

/// octocrab's `Display` appends the captured backtrace for transport and
/// decoding failures, and this text ends up in a desktop notification. Only
/// the API message or the underlying cause is kept.
impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        let message = match &err {
            octocrab::Error::GitHub { source, .. } => source.message.clone(),
            other => match std::error::Error::source(other) {
                Some(cause) => cause.to_string(),
                None => other.to_string().lines().next().unwrap_or_default().to_string(),
            },
        };
        Error::Upstream(message)
    }
}
