//! Errors raised while resolving and executing transitions.

use thiserror::Error;

/// Failure raised by a transform function.
///
/// The machine never surfaces this directly; it becomes the source of a
/// [`MachineError::InvalidStateTransition`].
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TransformError(#[from] Box<dyn std::error::Error + Send + Sync + 'static>);

impl TransformError {
    /// Wrap any error.
    pub fn new(error: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self(error.into())
    }

    /// Failure described by a message only.
    pub fn msg(message: impl std::fmt::Display) -> Self {
        Self(message.to_string().into())
    }

    /// Attempt to view the wrapped failure as a concrete error type.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

/// Errors from a machine's `perform_transition`.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unable to transition state from {from} to {to}.")]
    InvalidStateTransition {
        from: String,
        to: String,
        #[source]
        source: Option<TransformError>,
    },
}

impl MachineError {
    pub(crate) fn missing_object() -> Self {
        MachineError::InvalidArgument("domain object not supplied".to_string())
    }

    /// The attempted `(from, to)` state names, for transition failures.
    pub fn attempted(&self) -> Option<(&str, &str)> {
        match self {
            MachineError::InvalidStateTransition { from, to, .. } => {
                Some((from.as_str(), to.as_str()))
            }
            MachineError::InvalidArgument(_) => None,
        }
    }

    /// The transform failure that caused this error, if one did.
    pub fn transform_error(&self) -> Option<&TransformError> {
        match self {
            MachineError::InvalidStateTransition { source, .. } => source.as_ref(),
            MachineError::InvalidArgument(_) => None,
        }
    }
}
