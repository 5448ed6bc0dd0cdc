//! Type-erased machines stored in a hierarchy.

use crate::core::State;
use crate::hierarchy::error::HierarchyError;
use crate::hierarchy::request::TransitionRequest;
use crate::machine::{Machine, MachineError};
use std::any::Any;

/// A machine together with the domain object it governs.
pub struct MachineNode<T, S: State, P = ()> {
    pub(crate) machine: Machine<T, S, P>,
    pub(crate) object: Option<T>,
}

impl<T, S: State, P> MachineNode<T, S, P> {
    pub fn new(machine: Machine<T, S, P>, object: Option<T>) -> Self {
        Self { machine, object }
    }

    pub fn machine(&self) -> &Machine<T, S, P> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine<T, S, P> {
        &mut self.machine
    }

    pub fn object(&self) -> Option<&T> {
        self.object.as_ref()
    }

    /// Bind a domain object, returning the previously bound one.
    pub fn set_object(&mut self, object: T) -> Option<T> {
        self.object.replace(object)
    }

    pub fn take_object(&mut self) -> Option<T> {
        self.object.take()
    }

    /// Run a typed transition against the bound object.
    ///
    /// The object is only replaced when a transform produced a new value;
    /// on failure the previous value stays bound.
    /// Returns only the requests emitted by this transition.
    pub(crate) fn transition(
        &mut self,
        target: S,
        payload: Option<P>,
    ) -> Result<Vec<TransitionRequest>, MachineError> {
        let object = self.object.as_ref().ok_or_else(MachineError::missing_object)?;
        match self.machine.resolve(object, target, payload)? {
            Some((next, requests)) => {
                self.object = Some(next);
                Ok(requests)
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Object-safe view of a [`MachineNode`] used by the dispatcher.
pub(crate) trait ManagedMachine: Send {
    fn current_state_name(&self) -> &str;

    /// Apply a type-erased request and hand back what the transform emitted.
    fn apply(
        &mut self,
        name: &str,
        request: TransitionRequest,
    ) -> Result<Vec<TransitionRequest>, HierarchyError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T, S, P> ManagedMachine for MachineNode<T, S, P>
where
    T: Send + 'static,
    S: State + 'static,
    P: Send + 'static,
{
    fn current_state_name(&self) -> &str {
        self.machine.current_state().name()
    }

    fn apply(
        &mut self,
        name: &str,
        request: TransitionRequest,
    ) -> Result<Vec<TransitionRequest>, HierarchyError> {
        let (state_name, state, payload) = request.into_parts();

        let target = state
            .downcast::<S>()
            .map_err(|_| HierarchyError::StateTypeMismatch {
                machine: name.to_string(),
                state: state_name.clone(),
            })?;
        let payload = payload
            .map(|p| p.downcast::<P>())
            .transpose()
            .map_err(|_| HierarchyError::PayloadTypeMismatch {
                machine: name.to_string(),
                state: state_name,
            })?;

        self.transition(*target, payload.map(|p| *p))
            .map_err(|source| HierarchyError::Machine {
                machine: name.to_string(),
                source,
            })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
