//! Hierarchy and dispatch errors.

use crate::hierarchy::request::{MachineId, Target};
use crate::machine::MachineError;
use thiserror::Error;

/// Errors from registering machines or dispatching transitions across them.
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("machine not found: {id}")]
    UnknownMachine { id: MachineId },

    #[error("machine name already registered: {name}")]
    DuplicateName { name: String },

    #[error("no machine matches target '{target}'")]
    UnknownTarget { target: Target },

    #[error("machine '{name}' is not a sibling of the requesting machine")]
    NotASibling { name: String },

    #[error("machine '{machine}' cannot accept state '{state}': state type mismatch")]
    StateTypeMismatch { machine: String, state: String },

    #[error("machine '{machine}' cannot accept the payload sent with '{state}': payload type mismatch")]
    PayloadTypeMismatch { machine: String, state: String },

    #[error("adopting '{child}' under '{parent}' would create a cycle")]
    Cycle { parent: String, child: String },

    #[error("dispatch exceeded {limit} cascaded transitions")]
    CascadeLimit { limit: usize },

    #[error("transition on '{machine}' failed")]
    Machine {
        machine: String,
        #[source]
        source: MachineError,
    },
}

impl HierarchyError {
    /// The underlying machine failure, when the dispatch failed inside one.
    pub fn machine_error(&self) -> Option<&MachineError> {
        match self {
            HierarchyError::Machine { source, .. } => Some(source),
            _ => None,
        }
    }
}
