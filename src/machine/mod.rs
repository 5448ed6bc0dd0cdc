//! Transition resolution and execution.
//!
//! A [`Machine`] owns an ordered list of [`Transition`]s and a current state.
//! Each request is resolved against that list by state name, executed, and
//! reported to the machine's observers.
//!
//! # Resolution
//!
//! - Requests for the current state are no-ops: no transform runs
//! - Otherwise the first declared transition matching `(current, target)` runs
//! - No match, or a failing transform, yields `MachineError::InvalidStateTransition`
//!   and leaves the machine where it was

#[allow(clippy::module_inception)]
mod machine;
mod error;
mod hooks;
mod transition;

pub use error::{MachineError, TransformError};
pub use hooks::{Observer, SubscriptionId};
pub use machine::Machine;
pub use transition::{TransformFn, Transition, TransitionContext};
