use std::{collections::HashSet, io::ErrorKind, process::Stdio};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::{
    command::CommandLine,
    error::{Error, Result},
};

/// An interactive menu that returns the chosen line.
#[async_trait]
pub trait Picker {
    /// `None` when the user dismissed the menu without choosing.
    async fn pick(&self, options: &[String]) -> Result<Option<String>>;
}

/// Removes repeated options, keeping the first occurrence of each.
pub fn dedup_options(options: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    options
        .iter()
        .filter(|option| seen.insert(option.as_str()))
        .cloned()
        .collect()
}

/// Shows `options` (deduplicated) and returns the raw selection.
pub async fn select<P>(picker: &P, options: &[String]) -> Result<Option<String>>
where
    P: Picker + Sync + ?Sized,
{
    let options = dedup_options(options);
    debug!(count = options.len(), "prompting");
    picker.pick(&options).await
}

/// A dmenu-style program: options on stdin, choice on stdout, non-zero exit
/// on cancel.
#[derive(Debug, Clone)]
pub struct CommandPicker {
    command: CommandLine,
}

impl CommandPicker {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Picker for CommandPicker {
    async fn pick(&self, options: &[String]) -> Result<Option<String>> {
        let program = &self.command.program;
        let mut child = self
            .command
            .to_command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| Error::command(program, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut input = options.join("\n");
            input.push('\n');
            // A picker may exit before reading everything, e.g. on Escape.
            match stdin.write_all(input.as_bytes()).await {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(Error::command(program, e));
                }
                _ => {}
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::command(program, e))?;

        if !output.status.success() {
            info!(status = %output.status, "menu dismissed");
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let selection = stdout.lines().next().unwrap_or_default().trim();
        if selection.is_empty() {
            info!("menu returned no selection");
            return Ok(None);
        }

        Ok(Some(selection.to_string()))
    }
}
