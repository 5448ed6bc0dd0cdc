//! Declared transitions and the context handed to their transforms.

use crate::core::State;
use crate::hierarchy::{Target, TransitionRequest};
use crate::machine::error::TransformError;
use std::fmt;
use std::sync::Arc;

/// Type alias for transform functions.
///
/// A transform receives the current domain object and produces its next
/// value. Failures are reported through [`TransformError`].
pub type TransformFn<T, S, P> =
    Arc<dyn Fn(&T, &mut TransitionContext<'_, S, P>) -> Result<T, TransformError> + Send + Sync>;

/// What a transform can see and do while it runs.
pub struct TransitionContext<'a, S: State, P> {
    from: &'a S,
    target: &'a S,
    payload: Option<&'a P>,
    requests: Vec<TransitionRequest>,
}

impl<'a, S: State, P> TransitionContext<'a, S, P> {
    pub(crate) fn new(from: &'a S, target: &'a S, payload: Option<&'a P>) -> Self {
        Self {
            from,
            target,
            payload,
            requests: Vec::new(),
        }
    }

    /// State the machine is leaving.
    pub fn from(&self) -> &S {
        self.from
    }

    /// State the machine is moving to.
    pub fn target(&self) -> &S {
        self.target
    }

    /// Payload passed with the request, if any.
    pub fn payload(&self) -> Option<&P> {
        self.payload
    }

    /// Ask for a transition on another machine.
    ///
    /// Requests are only released if this transform succeeds. They are then
    /// applied through the target machine's own resolution, see
    /// [`crate::hierarchy::Hierarchy::perform`].
    pub fn request<R: State + 'static>(&mut self, target: Target, state: R) {
        self.requests.push(TransitionRequest::new(target, state));
    }

    /// Queue a fully built request, e.g. one carrying a payload.
    pub fn push_request(&mut self, request: TransitionRequest) {
        self.requests.push(request);
    }

    pub(crate) fn into_requests(self) -> Vec<TransitionRequest> {
        self.requests
    }
}

/// A directed rule from one named state to another.
///
/// The start and end states are fixed at construction; only the transform
/// decides what happens to the domain object.
///
/// # Example
///
/// ```rust
/// use statute::machine::Transition;
/// use statute::core::NamedState;
///
/// let expand: Transition<u32, NamedState> = Transition::new(
///     NamedState::new("Collapsed"),
///     NamedState::new("Expanded"),
///     |height: &u32, _ctx| Ok(height * 2),
/// )
/// .named("Expand");
///
/// assert!(expand.matches(&NamedState::new("Collapsed"), &NamedState::new("Expanded")));
/// ```
pub struct Transition<T, S: State, P = ()> {
    from: S,
    to: S,
    name: Option<String>,
    transform: TransformFn<T, S, P>,
}

impl<T, S: State, P> Transition<T, S, P> {
    /// Create an unnamed transition from `from` to `to`.
    pub fn new<F>(from: S, to: S, transform: F) -> Self
    where
        F: Fn(&T, &mut TransitionContext<'_, S, P>) -> Result<T, TransformError>
            + Send
            + Sync
            + 'static,
    {
        Self::from_parts(from, to, None, Arc::new(transform))
    }

    pub(crate) fn from_parts(
        from: S,
        to: S,
        name: Option<String>,
        transform: TransformFn<T, S, P>,
    ) -> Self {
        Self {
            from,
            to,
            name,
            transform,
        }
    }

    /// Label this transition kind, e.g. `"Expand"`.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Get start state
    pub fn from_state(&self) -> &S {
        &self.from
    }

    /// Get end state
    pub fn to_state(&self) -> &S {
        &self.to
    }

    /// Label given with [`Transition::named`].
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check whether this transition covers `current -> target`, by name.
    pub fn matches(&self, current: &S, target: &S) -> bool {
        self.from.same_as(current) && self.to.same_as(target)
    }

    /// Run the transform. No matching is done here.
    pub fn execute(
        &self,
        object: &T,
        context: &mut TransitionContext<'_, S, P>,
    ) -> Result<T, TransformError> {
        (self.transform)(object, context)
    }
}

impl<T, S: State, P> Clone for Transition<T, S, P> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            name: self.name.clone(),
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<T, S: State, P> fmt::Debug for Transition<T, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("from", &self.from.name())
            .field("to", &self.to.name())
            .finish_non_exhaustive()
    }
}
