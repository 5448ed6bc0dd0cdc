//! Requests for transitions on other machines.

use crate::core::State;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use uuid::Uuid;

/// Identity of a machine registered in a [`super::Hierarchy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MachineId(Uuid);

impl MachineId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which machine a request is addressed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A specific machine.
    Id(MachineId),
    /// Any machine registered under this name.
    Named(String),
    /// A machine with this name sharing a parent with the requester.
    Sibling(String),
}

impl Target {
    pub fn named(name: impl Into<String>) -> Self {
        Target::Named(name.into())
    }

    pub fn sibling(name: impl Into<String>) -> Self {
        Target::Sibling(name.into())
    }
}

impl From<MachineId> for Target {
    fn from(id: MachineId) -> Self {
        Target::Id(id)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Id(id) => write!(f, "{id}"),
            Target::Named(name) => write!(f, "{name}"),
            Target::Sibling(name) => write!(f, "sibling {name}"),
        }
    }
}

/// A transition asked of another machine.
///
/// The target state (and payload, if any) are type-erased; the receiving
/// machine checks that they match its own state and payload types.
pub struct TransitionRequest {
    target: Target,
    state_name: String,
    state: Box<dyn Any + Send>,
    payload: Option<Box<dyn Any + Send>>,
}

impl TransitionRequest {
    pub fn new<S: State + 'static>(target: Target, state: S) -> Self {
        Self {
            target,
            state_name: state.name().to_string(),
            state: Box::new(state),
            payload: None,
        }
    }

    pub fn with_payload<P: Send + 'static>(mut self, payload: P) -> Self {
        self.payload = Some(Box::new(payload));
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Name of the requested state.
    pub fn state_name(&self) -> &str {
        &self.state_name
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    pub(crate) fn into_parts(self) -> (String, Box<dyn Any + Send>, Option<Box<dyn Any + Send>>) {
        (self.state_name, self.state, self.payload)
    }
}

impl fmt::Debug for TransitionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRequest")
            .field("target", &self.target)
            .field("state", &self.state_name)
            .field("payload", &self.payload.is_some())
            .finish()
    }
}
