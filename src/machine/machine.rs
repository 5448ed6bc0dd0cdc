//! State machine that resolves and executes declared transitions.

use crate::builder::MachineBuilder;
use crate::core::{HistoryPolicy, State, TransitionLog};
use crate::hierarchy::TransitionRequest;
use crate::machine::error::{MachineError, TransformError};
use crate::machine::hooks::{SubscriptionId, TransitionHooks};
use crate::machine::transition::{Transition, TransitionContext};
use std::fmt;

/// Runtime unit holding a current state and the transitions governing it.
///
/// `T` is the domain object type, `S` the state type and `P` the payload
/// type accepted by this machine's transforms.
///
/// # Example
///
/// ```rust
/// use statute::machine::{Machine, Transition};
/// use statute::state_enum;
///
/// state_enum! {
///     enum Panel {
///         Collapsed,
///         Expanded,
///     }
/// }
///
/// let mut machine: Machine<u32, Panel> = Machine::new(
///     Panel::Collapsed,
///     vec![
///         Transition::new(Panel::Collapsed, Panel::Expanded, |h: &u32, _| Ok(h * 2)),
///         Transition::new(Panel::Expanded, Panel::Collapsed, |h: &u32, _| Ok(h / 2)),
///     ],
/// );
///
/// let height = machine.perform_transition(40, Panel::Expanded).unwrap();
/// assert_eq!(height, 80);
/// assert_eq!(machine.current_state(), &Panel::Expanded);
/// ```
pub struct Machine<T, S: State, P = ()> {
    label: Option<String>,
    start: S,
    current: S,
    transitions: Vec<Transition<T, S, P>>,
    hooks: TransitionHooks<S>,
    history: TransitionLog<S>,
    outbox: Vec<TransitionRequest>,
}

impl<T, S: State, P> Machine<T, S, P> {
    /// Create a machine in `start` with an ordered transition list.
    ///
    /// Declaration order matters: the first transition matching a request wins.
    pub fn new(start: S, transitions: Vec<Transition<T, S, P>>) -> Self {
        Self::from_parts(None, start, transitions, HistoryPolicy::default())
    }

    /// Start a [`MachineBuilder`].
    pub fn builder() -> MachineBuilder<T, S, P> {
        MachineBuilder::new()
    }

    pub(crate) fn from_parts(
        label: Option<String>,
        start: S,
        transitions: Vec<Transition<T, S, P>>,
        history: HistoryPolicy,
    ) -> Self {
        Self {
            label,
            current: start.clone(),
            start,
            transitions,
            hooks: TransitionHooks::default(),
            history: TransitionLog::new(history),
            outbox: Vec::new(),
        }
    }

    /// Name used in log events, if one was given.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Get current state
    pub fn current_state(&self) -> &S {
        &self.current
    }

    /// State the machine was created in.
    pub fn start_state(&self) -> &S {
        &self.start
    }

    /// Declared transitions in declaration order.
    pub fn transitions(&self) -> &[Transition<T, S, P>] {
        &self.transitions
    }

    /// Audit log of executed transitions; empty unless history is enabled.
    pub fn history(&self) -> &TransitionLog<S> {
        &self.history
    }

    /// Register an observer fired before every transition request,
    /// including no-op ones.
    pub fn on_before_transition<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.hooks.subscribe_before(Box::new(observer))
    }

    /// Register an observer fired after every successful transition request.
    pub fn on_after_transition<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.hooks.subscribe_after(Box::new(observer))
    }

    /// Drop an observer. Returns `false` if `id` was not subscribed here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.hooks.unsubscribe(id)
    }

    /// Requests on other machines emitted by transitions performed directly
    /// on this machine and not yet taken.
    ///
    /// Requests accumulate until [`Machine::take_requests`] drains them.
    /// Transitions applied by a [`crate::hierarchy::Hierarchy`] never land
    /// here; the hierarchy dispatches them itself.
    pub fn pending_requests(&self) -> &[TransitionRequest] {
        &self.outbox
    }

    /// Drain pending requests, e.g. to hand them to
    /// [`crate::hierarchy::Hierarchy::dispatch`].
    pub fn take_requests(&mut self) -> Vec<TransitionRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Move `object` to `target` without a payload.
    pub fn perform_transition(&mut self, object: T, target: S) -> Result<T, MachineError> {
        self.perform(object, target, None)
    }

    /// Move `object` to `target`, handing `payload` to the transform.
    pub fn perform_transition_with(
        &mut self,
        object: T,
        target: S,
        payload: P,
    ) -> Result<T, MachineError> {
        self.perform(object, target, Some(payload))
    }

    /// Variant for hosts whose domain object may be absent.
    ///
    /// A missing object fails with [`MachineError::InvalidArgument`] before
    /// any observer is notified.
    pub fn try_perform_transition(
        &mut self,
        object: Option<T>,
        target: S,
        payload: Option<P>,
    ) -> Result<T, MachineError> {
        let object = object.ok_or_else(MachineError::missing_object)?;
        self.perform(object, target, payload)
    }

    fn perform(&mut self, object: T, target: S, payload: Option<P>) -> Result<T, MachineError> {
        match self.resolve(&object, target, payload)? {
            Some((next, requests)) => {
                self.outbox.extend(requests);
                Ok(next)
            }
            None => Ok(object),
        }
    }

    /// Resolve and execute one request against a borrowed object.
    ///
    /// Returns `Ok(None)` for the no-op short-circuit, and otherwise the next
    /// object together with the requests this transform emitted. Those
    /// requests are handed to the caller, not queued in the outbox. The
    /// machine state is untouched on error.
    pub(crate) fn resolve(
        &mut self,
        object: &T,
        target: S,
        payload: Option<P>,
    ) -> Result<Option<(T, Vec<TransitionRequest>)>, MachineError> {
        self.hooks.fire_before(&self.current);

        if self.current.same_as(&target) {
            tracing::debug!(
                machine = self.label.as_deref().unwrap_or("-"),
                state = self.current.name(),
                "already in target state, skipping transition"
            );
            self.hooks.fire_after(&self.current);
            return Ok(None);
        }

        let Some(index) = self
            .transitions
            .iter()
            .position(|t| t.matches(&self.current, &target))
        else {
            tracing::warn!(
                machine = self.label.as_deref().unwrap_or("-"),
                from = self.current.name(),
                to = target.name(),
                "no transition declared"
            );
            return Err(self.invalid(&target, None));
        };

        let transition = &self.transitions[index];
        let mut context = TransitionContext::new(&self.current, &target, payload.as_ref());
        let next = match transition.execute(object, &mut context) {
            Ok(next) => next,
            Err(error) => {
                tracing::warn!(
                    machine = self.label.as_deref().unwrap_or("-"),
                    from = self.current.name(),
                    to = target.name(),
                    error = %error,
                    "transform failed"
                );
                return Err(self.invalid(&target, Some(error)));
            }
        };
        let requests = context.into_requests();
        let name = transition.name().map(str::to_owned);

        tracing::debug!(
            machine = self.label.as_deref().unwrap_or("-"),
            transition = name.as_deref().unwrap_or("-"),
            from = self.current.name(),
            to = target.name(),
            requests = requests.len(),
            "transition applied"
        );

        let from = std::mem::replace(&mut self.current, target);
        if self.history.is_enabled() {
            self.history.record(from, self.current.clone(), name);
        }
        self.hooks.fire_after(&self.current);

        Ok(Some((next, requests)))
    }

    fn invalid(&self, target: &S, source: Option<TransformError>) -> MachineError {
        MachineError::InvalidStateTransition {
            from: self.current.name().to_string(),
            to: target.name().to_string(),
            source,
        }
    }
}

impl<T, S: State, P> fmt::Debug for Machine<T, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("label", &self.label)
            .field("start", &self.start)
            .field("current", &self.current)
            .field("transitions", &self.transitions)
            .field("observers", &self.hooks.len())
            .field("pending_requests", &self.outbox.len())
            .finish()
    }
}
