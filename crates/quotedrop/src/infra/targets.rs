//! Filesystem, stream, and in-process delivery targets.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::app::deliver::DeliveryTarget;
use crate::domain::errors::TargetError;
use crate::domain::model::RenderedText;

/// Writes rendered text to a file, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeliveryTarget for FileTarget {
    fn name(&self) -> &str {
        "file"
    }

    fn write(&mut self, rendered: &RenderedText) -> Result<(), TargetError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create delivery directory: {}", parent.display())
            })?;
        }
        fs::write(&self.path, rendered.as_str())
            .with_context(|| format!("failed to write delivery to {}", self.path.display()))?;
        Ok(())
    }
}

/// Writes rendered text to stdout for piping into other tools.
#[derive(Debug, Default)]
pub struct StdoutTarget;

impl StdoutTarget {
    pub fn new() -> Self {
        Self
    }
}

impl DeliveryTarget for StdoutTarget {
    fn name(&self) -> &str {
        "stdout"
    }

    fn write(&mut self, rendered: &RenderedText) -> Result<(), TargetError> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(rendered.as_str().as_bytes())
            .context("failed to write rendering to stdout")?;
        stdout.flush().context("failed to flush stdout")?;
        Ok(())
    }
}

/// In-process sink that records every delivery. Used by embedders and tests.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    writes: Vec<String>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// All payloads written so far, in delivery order.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// The most recent payload, if any delivery happened.
    pub fn last(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }
}

impl DeliveryTarget for MemoryTarget {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&mut self, rendered: &RenderedText) -> Result<(), TargetError> {
        self.writes.push(rendered.as_str().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_target_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/quote.txt");

        let mut target = FileTarget::new(&path);
        target
            .write(&RenderedText::new("> quoted"))
            .expect("write succeeds");

        assert_eq!(fs::read_to_string(path).unwrap(), "> quoted");
    }

    #[test]
    fn memory_target_records_in_order() {
        let mut target = MemoryTarget::new();
        target.write(&RenderedText::new("first")).unwrap();
        target.write(&RenderedText::new("second")).unwrap();

        assert_eq!(target.writes(), ["first", "second"]);
        assert_eq!(target.last(), Some("second"));
    }
}
