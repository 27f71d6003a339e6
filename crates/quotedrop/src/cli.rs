//! Command line shell around the delivery pipeline.
//!
//! The library core stays free of any CLI surface; this module is the
//! surrounding application that captures text, picks a deliverer variant, and
//! drives a single delivery.

use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;

use crate::app::code::CodeBlockDeliverer;
use crate::app::deliver::{
    Deliverer, DeliveryOutcome, DeliveryReport, DeliveryTarget, PlainDeliverer,
};
use crate::app::quote::{QuoteDeliverer, QuoteStyle};
use crate::domain::model::Selection;
use crate::infra::clipboard::ClipboardTarget;
use crate::infra::config::Config;
use crate::infra::targets::{FileTarget, StdoutTarget};

/// Supported render styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum StyleKind {
    /// Deliver the selection text verbatim.
    Plain,
    /// Marker-prefixed quotation with optional attribution.
    Quote,
    /// Fenced code block.
    Code,
}

impl FromStr for StyleKind {
    type Err = StyleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" | "identity" | "text" => Ok(StyleKind::Plain),
            "quote" | "quoted" => Ok(StyleKind::Quote),
            "code" | "fence" | "codeblock" => Ok(StyleKind::Code),
            other => Err(StyleParseError::UnknownStyle(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`StyleKind`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StyleParseError {
    #[error("unknown render style '{0}'")]
    UnknownStyle(String),
}

/// Supported delivery targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum TargetKind {
    Clipboard,
    Stdout,
    File,
}

impl FromStr for TargetKind {
    type Err = TargetParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clipboard" | "clip" => Ok(TargetKind::Clipboard),
            "stdout" | "-" => Ok(TargetKind::Stdout),
            "file" => Ok(TargetKind::File),
            other => Err(TargetParseError::UnknownTarget(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`TargetKind`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("unknown delivery target '{0}'")]
    UnknownTarget(String),
}

#[derive(Debug, Parser)]
#[command(
    name = "quotedrop",
    version,
    about = "Render a captured text selection and deliver it to a target"
)]
pub struct Cli {
    /// Text to deliver. Read from stdin when omitted.
    text: Option<String>,

    /// Render style.
    #[arg(long, value_enum)]
    style: Option<StyleKind>,

    /// Delivery target.
    #[arg(long = "to", value_enum)]
    target: Option<TargetKind>,

    /// Output path; implies `--to file`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Source label used for attribution.
    #[arg(long)]
    source: Option<String>,

    /// Quote marker override.
    #[arg(long)]
    marker: Option<String>,

    /// Print a JSON delivery report to stdout.
    #[arg(long)]
    json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    run_with(cli, &config)
}

fn run_with(cli: Cli, config: &Config) -> Result<()> {
    let text = match cli.text {
        Some(text) => text,
        None => read_stdin()?,
    };

    let selection = match cli.source {
        Some(source) => Selection::with_source(text, source),
        None => Selection::new(text),
    }
    .context("invalid selection")?;

    let style = resolve_style(cli.style, config);
    let target_kind = resolve_target(cli.target, cli.out.is_some(), config);

    let mut quote_style = QuoteStyle::from_config(config);
    if let Some(marker) = cli.marker {
        quote_style.marker = marker;
    }

    let mut target: Box<dyn DeliveryTarget> = match target_kind {
        TargetKind::Clipboard => Box::new(ClipboardTarget::new()),
        TargetKind::Stdout => Box::new(StdoutTarget::new()),
        TargetKind::File => {
            let path = cli
                .out
                .clone()
                .ok_or_else(|| anyhow!("file delivery requires --out <PATH>"))?;
            Box::new(FileTarget::new(path))
        }
    };

    let report = match style {
        StyleKind::Plain => PlainDeliverer::new(selection).deliver(target.as_mut()),
        StyleKind::Quote => {
            QuoteDeliverer::with_style(selection, quote_style).deliver(target.as_mut())
        }
        StyleKind::Code => {
            CodeBlockDeliverer::with_fence(selection, config.code.fence()).deliver(target.as_mut())
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&ReportJson::from(&report))?);
    } else if report.is_delivered() {
        info!(
            sink = %report.target,
            lines = report.rendered.as_str().lines().count(),
            chars = report.rendered.char_count(),
            "delivered"
        );
    }

    match report.outcome {
        DeliveryOutcome::Delivered => Ok(()),
        DeliveryOutcome::Failed(err) => Err(err.into()),
    }
}

fn resolve_style(flag: Option<StyleKind>, config: &Config) -> StyleKind {
    flag.or_else(|| config.defaults.style.parse().ok())
        .unwrap_or(StyleKind::Quote)
}

fn resolve_target(flag: Option<TargetKind>, has_out: bool, config: &Config) -> TargetKind {
    if has_out {
        return TargetKind::File;
    }
    flag.or_else(|| config.defaults.target.parse().ok())
        .unwrap_or(TargetKind::Clipboard)
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read selection text from stdin")?;
    Ok(buffer)
}

#[derive(Serialize)]
struct ReportJson<'a> {
    target: &'a str,
    delivered: bool,
    lines: usize,
    characters: usize,
    source: Option<&'a str>,
    error: Option<String>,
}

impl<'a> From<&'a DeliveryReport> for ReportJson<'a> {
    fn from(report: &'a DeliveryReport) -> Self {
        Self {
            target: &report.target,
            delivered: report.is_delivered(),
            lines: report.rendered.as_str().lines().count(),
            characters: report.rendered.char_count(),
            source: report.selection.source_label(),
            error: report.error().map(|err| err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_aliases_parse() {
        assert_eq!("quoted".parse::<StyleKind>().unwrap(), StyleKind::Quote);
        assert_eq!("fence".parse::<StyleKind>().unwrap(), StyleKind::Code);
        assert_eq!("identity".parse::<StyleKind>().unwrap(), StyleKind::Plain);
        assert!("fancy".parse::<StyleKind>().is_err());
    }

    #[test]
    fn out_flag_forces_file_target() {
        let config = Config::default();
        assert_eq!(
            resolve_target(Some(TargetKind::Clipboard), true, &config),
            TargetKind::File
        );
        assert_eq!(
            resolve_target(None, false, &config),
            TargetKind::Clipboard
        );
    }
}
