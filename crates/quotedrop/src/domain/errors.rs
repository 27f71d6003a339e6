//! Domain-specific errors.

use thiserror::Error;

/// Construction-time validation failure for a [`Selection`].
///
/// Reported synchronously; a failed construction produces no instance and the
/// caller must re-acquire a valid selection.
///
/// [`Selection`]: crate::domain::model::Selection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection text contains an embedded NUL byte")]
    EmbeddedNul,
    #[error("selection source label is not valid text")]
    InvalidSourceLabel,
}

/// Opaque failure reason reported by a delivery target.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TargetError(#[from] anyhow::Error);

impl TargetError {
    /// Wrap a plain message as a target failure.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(anyhow::anyhow!(message.into()))
    }
}

/// A delivery target rejected or failed to accept rendered text.
///
/// Carried inside the delivery report rather than thrown, so callers can
/// distinguish "nothing was rendered" from "rendered but not delivered".
#[derive(Debug, Error)]
#[error("delivery to {target} failed: {source}")]
pub struct DeliveryError {
    /// Name of the target that refused the payload.
    pub target: String,
    #[source]
    pub source: TargetError,
}
