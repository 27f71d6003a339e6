//! System clipboard delivery target.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::app::deliver::DeliveryTarget;
use crate::domain::errors::TargetError;
use crate::domain::model::RenderedText;

/// Delivers rendered text to the system clipboard, with shell-utility
/// fallbacks for headless environments.
pub struct ClipboardTarget {
    primary: Option<arboard::Clipboard>,
}

impl ClipboardTarget {
    /// Attempt to initialize the system clipboard. When unavailable the
    /// fallback executables are used instead.
    pub fn new() -> Self {
        let primary = arboard::Clipboard::new().ok();
        Self { primary }
    }

    fn copy(&mut self, text: &str) -> Result<()> {
        if let Some(primary) = self.primary.as_mut()
            && primary.set_text(text.to_owned()).is_ok()
        {
            return Ok(());
        }

        self.primary = None;
        debug!("system clipboard unavailable, trying fallback utilities");
        fallback_copy(text)
    }
}

impl Default for ClipboardTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliveryTarget for ClipboardTarget {
    fn name(&self) -> &str {
        "clipboard"
    }

    fn write(&mut self, rendered: &RenderedText) -> Result<(), TargetError> {
        self.copy(rendered.as_str())?;
        Ok(())
    }
}

fn fallback_copy(text: &str) -> Result<()> {
    for command in fallback_commands() {
        if try_command_copy(command, text).is_ok() {
            return Ok(());
        }
    }

    Err(anyhow!(
        "failed to copy text to clipboard using available backends"
    ))
}

fn try_command_copy(command: &[&str], text: &str) -> Result<()> {
    let (program, args) = command
        .split_first()
        .context("clipboard command missing program")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn clipboard command: {program}"))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(text.as_bytes())
            .context("failed to write clipboard contents")?;
    }

    let status = child
        .wait()
        .with_context(|| format!("clipboard command did not exit cleanly: {program}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("clipboard command exited with status {status}"))
    }
}

#[cfg(target_os = "macos")]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["pbcopy"]]
}

#[cfg(all(unix, not(target_os = "macos")))]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["xclip", "-selection", "clipboard"], &["wl-copy"]]
}

#[cfg(target_os = "windows")]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["powershell.exe", "-NoProfile", "-Command", "Set-Clipboard"]]
}

#[cfg(not(any(unix, target_os = "windows")))]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    Vec::new()
}
