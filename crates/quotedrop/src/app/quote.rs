//! Quoted rendering of a selection.
//!
//! Every line of the captured text is prefixed with a marker, preserving line
//! boundaries and content exactly. When the selection carries a source label
//! an attribution line is rendered from a minijinja template and placed above
//! or below the quoted body.

use std::str::FromStr;

use minijinja::{Environment, context};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

use crate::app::deliver::Deliverer;
use crate::domain::model::{RenderedText, Selection};
use crate::infra::config::Config;

/// Where the attribution line goes relative to the quoted body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributionPlacement {
    Above,
    #[default]
    Below,
    Off,
}

impl FromStr for AttributionPlacement {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "above" | "top" => Ok(Self::Above),
            "below" | "bottom" => Ok(Self::Below),
            "off" | "none" => Ok(Self::Off),
            _ => Err(()),
        }
    }
}

/// Line-ending policy for the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Keep whatever the selection used, byte for byte.
    #[default]
    Preserve,
    /// Normalize every line break to `\n`.
    Lf,
    /// Normalize every line break to `\r\n`.
    CrLf,
}

impl LineEnding {
    fn separator(self) -> &'static str {
        match self {
            LineEnding::Preserve | LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl FromStr for LineEnding {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "lf" | "unix" => Ok(Self::Lf),
            "crlf" | "windows" => Ok(Self::CrLf),
            _ => Err(()),
        }
    }
}

/// Configurable quoting format. The shape of the quoted form lives here, not
/// in the deliverer, so sibling tooling can reuse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteStyle {
    /// Prefix applied to every quoted line.
    pub marker: String,
    pub attribution: AttributionPlacement,
    /// minijinja template for the attribution line. Context: `source`, and
    /// `timestamp` (RFC 3339) when [`QuoteStyle::timestamp`] is set.
    pub attribution_template: String,
    /// Include a capture timestamp in the attribution template context.
    pub timestamp: bool,
    pub line_ending: LineEnding,
}

impl Default for QuoteStyle {
    fn default() -> Self {
        Self {
            marker: "> ".to_string(),
            attribution: AttributionPlacement::default(),
            attribution_template: "— {{ source }}".to_string(),
            timestamp: false,
            line_ending: LineEnding::default(),
        }
    }
}

impl QuoteStyle {
    /// Build a style from layered configuration, falling back to defaults for
    /// values that fail to parse.
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            marker: config.quote.marker(),
            attribution: config
                .quote
                .attribution()
                .parse()
                .unwrap_or(defaults.attribution),
            attribution_template: config.quote.attribution_template(),
            timestamp: config.quote.timestamp(),
            line_ending: config
                .quote
                .line_ending()
                .parse()
                .unwrap_or(defaults.line_ending),
        }
    }
}

/// Renders a quoted form of the selection suitable for reply and citation
/// use. Purely a string transformation; no I/O happens during rendering.
#[derive(Debug)]
pub struct QuoteDeliverer {
    selection: Selection,
    style: QuoteStyle,
}

impl QuoteDeliverer {
    /// Quote with the default style (`"> "` marker, attribution below).
    pub fn new(selection: Selection) -> Self {
        Self::with_style(selection, QuoteStyle::default())
    }

    pub fn with_style(selection: Selection, style: QuoteStyle) -> Self {
        Self { selection, style }
    }

    pub fn style(&self) -> &QuoteStyle {
        &self.style
    }
}

impl Deliverer for QuoteDeliverer {
    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn into_selection(self) -> Selection {
        self.selection
    }

    fn render(&self) -> RenderedText {
        let body = quote_body(self.selection.text(), &self.style.marker, self.style.line_ending);
        let attribution = match self.style.attribution {
            AttributionPlacement::Off => None,
            _ => self
                .selection
                .source_label()
                .map(|label| render_attribution(label, &self.style)),
        };

        let sep = self.style.line_ending.separator();
        let rendered = match attribution {
            None => body,
            Some(attribution) if body.is_empty() => attribution,
            Some(attribution) => match self.style.attribution {
                AttributionPlacement::Above => format!("{attribution}{sep}{body}"),
                _ => format!("{body}{sep}{attribution}"),
            },
        };

        RenderedText::new(rendered)
    }
}

/// Prefix every line of `text` with `marker`.
///
/// Empty input renders an empty body with zero quoted lines. A trailing
/// newline is kept as a trailing newline, not an extra quoted line. Splitting
/// happens on `'\n'` characters, so multi-byte sequences are never cut.
fn quote_body(text: &str, marker: &str, ending: LineEnding) -> String {
    if text.is_empty() {
        return String::new();
    }

    let (body, trailing_newline) = match text.strip_suffix('\n') {
        Some(rest) => (rest, true),
        None => (text, false),
    };

    let quoted: Vec<String> = body
        .split('\n')
        .map(|line| {
            let line = match ending {
                LineEnding::Preserve => line,
                LineEnding::Lf | LineEnding::CrLf => line.strip_suffix('\r').unwrap_or(line),
            };
            format!("{marker}{line}")
        })
        .collect();

    let mut out = quoted.join(ending.separator());
    if trailing_newline {
        match ending {
            // The '\r' of a trailing CRLF is still attached to the last line.
            LineEnding::Preserve | LineEnding::Lf => out.push('\n'),
            LineEnding::CrLf => out.push_str("\r\n"),
        }
    }
    out
}

fn render_attribution(label: &str, style: &QuoteStyle) -> String {
    let mut env = Environment::new();
    if let Err(err) = env.add_template("attribution", &style.attribution_template) {
        warn!(error = %err, "invalid attribution template, using plain attribution");
        return plain_attribution(label);
    }

    let rendered = match attribution_timestamp(style) {
        Some(timestamp) => env
            .get_template("attribution")
            .and_then(|template| template.render(context! { source => label, timestamp => timestamp })),
        None => env
            .get_template("attribution")
            .and_then(|template| template.render(context! { source => label })),
    };

    match rendered {
        Ok(line) => line,
        Err(err) => {
            warn!(error = %err, "attribution template failed to render, using plain attribution");
            plain_attribution(label)
        }
    }
}

fn attribution_timestamp(style: &QuoteStyle) -> Option<String> {
    if !style.timestamp {
        return None;
    }
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}

fn plain_attribution(label: &str) -> String {
    format!("— {label}")
}
