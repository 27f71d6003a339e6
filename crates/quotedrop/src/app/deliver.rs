//! The deliverer contract and its single-shot lifecycle.
//!
//! A deliverer owns one [`Selection`], transforms it through an overridable
//! [`render`](Deliverer::render) step, and hands the result to a
//! [`DeliveryTarget`]. Delivery consumes the deliverer, so each instance
//! performs at most one delivery; the untouched selection travels back to the
//! caller inside the [`DeliveryReport`].

use tracing::debug;

use crate::domain::errors::{DeliveryError, TargetError};
use crate::domain::model::{RenderedText, Selection};

/// A sink that accepts rendered text: clipboard, file, stdout, or an
/// in-process buffer. Implementations are responsible for their own thread
/// safety; the pipeline never shares one target between deliveries.
pub trait DeliveryTarget {
    /// Stable name used in reports and logs.
    fn name(&self) -> &str;

    /// Accept the rendered payload. Failures are opaque to the pipeline and
    /// never retried here.
    fn write(&mut self, rendered: &RenderedText) -> Result<(), TargetError>;
}

/// A single-use delivery operation bound to one selection.
///
/// Variants specialize only the transformation step; the lifecycle is fixed
/// by the provided [`deliver`](Deliverer::deliver) implementation.
pub trait Deliverer {
    /// The selection this deliverer was constructed with.
    fn selection(&self) -> &Selection;

    /// Give the selection back when the deliverer is consumed.
    fn into_selection(self) -> Selection
    where
        Self: Sized;

    /// Transformation step. Side-effect free and a pure function of the
    /// selection; the default is the identity rendering.
    fn render(&self) -> RenderedText {
        RenderedText::new(self.selection().text())
    }

    /// Render exactly once and forward the result to `target`.
    ///
    /// Target-side failures are captured in the report, never thrown, and the
    /// original selection is returned unchanged either way.
    fn deliver(self, target: &mut dyn DeliveryTarget) -> DeliveryReport
    where
        Self: Sized,
    {
        let rendered = self.render();
        let outcome = match target.write(&rendered) {
            Ok(()) => {
                debug!(
                    sink = target.name(),
                    chars = rendered.char_count(),
                    "rendered text delivered"
                );
                DeliveryOutcome::Delivered
            }
            Err(source) => DeliveryOutcome::Failed(DeliveryError {
                target: target.name().to_string(),
                source,
            }),
        };

        DeliveryReport {
            target: target.name().to_string(),
            selection: self.into_selection(),
            rendered,
            outcome,
        }
    }
}

/// Terminal state of a delivery.
#[derive(Debug)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(DeliveryError),
}

/// Everything a caller needs after a delivery: the selection handed back
/// unchanged, what was rendered, where it went, and whether it arrived.
#[derive(Debug)]
pub struct DeliveryReport {
    pub selection: Selection,
    pub rendered: RenderedText,
    pub target: String,
    pub outcome: DeliveryOutcome,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered)
    }

    /// The failure, if the target rejected the payload.
    pub fn error(&self) -> Option<&DeliveryError> {
        match &self.outcome {
            DeliveryOutcome::Delivered => None,
            DeliveryOutcome::Failed(err) => Some(err),
        }
    }
}

/// The identity variant: delivers the selection text verbatim.
#[derive(Debug)]
pub struct PlainDeliverer {
    selection: Selection,
}

impl PlainDeliverer {
    pub fn new(selection: Selection) -> Self {
        Self { selection }
    }
}

impl Deliverer for PlainDeliverer {
    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn into_selection(self) -> Selection {
        self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingTarget {
        writes: Vec<String>,
    }

    impl RecordingTarget {
        fn new() -> Self {
            Self { writes: Vec::new() }
        }
    }

    impl DeliveryTarget for RecordingTarget {
        fn name(&self) -> &str {
            "recording"
        }

        fn write(&mut self, rendered: &RenderedText) -> Result<(), TargetError> {
            self.writes.push(rendered.as_str().to_string());
            Ok(())
        }
    }

    struct RejectingTarget;

    impl DeliveryTarget for RejectingTarget {
        fn name(&self) -> &str {
            "rejecting"
        }

        fn write(&mut self, _rendered: &RenderedText) -> Result<(), TargetError> {
            Err(TargetError::msg("target unavailable"))
        }
    }

    #[test]
    fn plain_render_is_identity() {
        let selection = Selection::new("as captured\nexactly").unwrap();
        let deliverer = PlainDeliverer::new(selection);
        assert_eq!(deliverer.render().as_str(), "as captured\nexactly");
    }

    #[test]
    fn deliver_writes_rendering_once() {
        let selection = Selection::new("payload").unwrap();
        let mut target = RecordingTarget::new();

        let report = PlainDeliverer::new(selection).deliver(&mut target);

        assert!(report.is_delivered());
        assert_eq!(target.writes, vec!["payload".to_string()]);
        assert_eq!(report.target, "recording");
    }

    #[test]
    fn failed_delivery_keeps_selection_inspectable() {
        let selection = Selection::with_source("payload", "editor").unwrap();
        let mut target = RejectingTarget;

        let report = PlainDeliverer::new(selection).deliver(&mut target);

        assert!(!report.is_delivered());
        let err = report.error().expect("failure recorded");
        assert_eq!(err.target, "rejecting");
        assert_eq!(report.selection.text(), "payload");
        assert_eq!(report.selection.source_label(), Some("editor"));
        assert_eq!(report.rendered.as_str(), "payload");
    }
}
