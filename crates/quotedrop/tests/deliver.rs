use std::fs;

use quotedrop::app::code::CodeBlockDeliverer;
use quotedrop::app::deliver::{Deliverer, DeliveryTarget, PlainDeliverer};
use quotedrop::app::quote::{QuoteDeliverer, QuoteStyle};
use quotedrop::domain::errors::TargetError;
use quotedrop::domain::model::{RenderedText, Selection};
use quotedrop::infra::targets::{FileTarget, MemoryTarget};

struct AlwaysFailingTarget;

impl DeliveryTarget for AlwaysFailingTarget {
    fn name(&self) -> &str {
        "broken"
    }

    fn write(&mut self, _rendered: &RenderedText) -> Result<(), TargetError> {
        Err(TargetError::msg("sink is offline"))
    }
}

#[test]
fn quote_delivery_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotes/reply.txt");

    let selection = Selection::with_source("first line\nsecond line", "meeting notes").unwrap();
    let mut target = FileTarget::new(&path);
    let report = QuoteDeliverer::new(selection).deliver(&mut target);

    assert!(report.is_delivered());
    let written = fs::read_to_string(path).unwrap();
    assert_eq!(written, "> first line\n> second line\n— meeting notes");
}

#[test]
fn failing_target_reports_error_and_returns_selection() {
    let selection = Selection::with_source("keep me", "editor").unwrap();
    let mut target = AlwaysFailingTarget;

    let report = QuoteDeliverer::new(selection).deliver(&mut target);

    assert!(!report.is_delivered());
    let err = report.error().expect("delivery error present");
    assert_eq!(err.target, "broken");
    assert!(err.to_string().contains("sink is offline"));

    // The selection comes back untouched even though nothing arrived.
    assert_eq!(report.selection.text(), "keep me");
    assert_eq!(report.selection.source_label(), Some("editor"));
    assert_eq!(report.rendered.as_str(), "> keep me\n— editor");
}

#[test]
fn styled_quote_delivery_to_memory() {
    let style = QuoteStyle {
        marker: ">> ".into(),
        ..QuoteStyle::default()
    };
    let selection = Selection::new("alpha\nbeta").unwrap();

    let mut target = MemoryTarget::new();
    let report = QuoteDeliverer::with_style(selection, style).deliver(&mut target);

    assert!(report.is_delivered());
    assert_eq!(target.last(), Some(">> alpha\n>> beta"));
}

#[test]
fn plain_and_code_variants_share_the_lifecycle() {
    let mut target = MemoryTarget::new();

    let report = PlainDeliverer::new(Selection::new("verbatim").unwrap()).deliver(&mut target);
    assert!(report.is_delivered());

    let selection = Selection::with_source("let x = 1;", "rust").unwrap();
    let report = CodeBlockDeliverer::new(selection).deliver(&mut target);
    assert!(report.is_delivered());

    assert_eq!(target.writes(), ["verbatim", "```rust\nlet x = 1;\n```"]);
}
