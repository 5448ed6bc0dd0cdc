//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::machine::{TransformError, TransformFn, Transition, TransitionContext};
use std::sync::Arc;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<T, S: State, P = ()> {
    from: Option<S>,
    to: Option<S>,
    name: Option<String>,
    transform: Option<TransformFn<T, S, P>>,
}

impl<T, S: State, P> TransitionBuilder<T, S, P> {
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            name: None,
            transform: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Label the transition kind (optional).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the transform (required).
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&T, &mut TransitionContext<'_, S, P>) -> Result<T, TransformError>
            + Send
            + Sync
            + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Use a transform that returns a copy of the object unchanged.
    pub fn identity(self) -> Self
    where
        T: Clone,
    {
        self.transform(|object: &T, _| Ok(object.clone()))
    }

    pub fn build(self) -> Result<Transition<T, S, P>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let transform = self.transform.ok_or(BuildError::MissingTransform)?;

        Ok(Transition::from_parts(from, to, self.name, transform))
    }
}

impl<T, S: State, P> Default for TransitionBuilder<T, S, P> {
    fn default() -> Self {
        Self::new()
    }
}
