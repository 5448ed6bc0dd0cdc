//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{HistoryPolicy, State};
use crate::machine::{Machine, Transition};

/// Builder for constructing machines with a fluent API.
///
/// The transition list is taken as declared; nothing checks it for
/// reachability or overlapping transitions.
pub struct MachineBuilder<T, S: State, P = ()> {
    initial: Option<S>,
    label: Option<String>,
    transitions: Vec<Transition<T, S, P>>,
    history: HistoryPolicy,
}

impl<T, S: State, P> MachineBuilder<T, S, P> {
    pub fn new() -> Self {
        Self {
            initial: None,
            label: None,
            transitions: Vec::new(),
            history: HistoryPolicy::default(),
        }
    }

    /// Set the start state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Name used in log events.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<T, S, P>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<T, S, P>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once, keeping their order.
    pub fn transitions(mut self, transitions: Vec<Transition<T, S, P>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Choose how much transition history to keep. Disabled by default.
    pub fn history(mut self, policy: HistoryPolicy) -> Self {
        self.history = policy;
        self
    }

    pub fn build(self) -> Result<Machine<T, S, P>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        Ok(Machine::from_parts(
            self.label,
            initial,
            self.transitions,
            self.history,
        ))
    }
}

impl<T, S: State, P> Default for MachineBuilder<T, S, P> {
    fn default() -> Self {
        Self::new()
    }
}
