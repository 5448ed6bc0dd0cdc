//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders and macros for declaring machines
//! with minimal boilerplate while keeping states and payloads typed.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::State;
use crate::machine::{TransformError, Transition, TransitionContext};

/// Create a named transition from a transform.
///
/// # Example
///
/// ```
/// use statute::builder::transition;
/// use statute::machine::Transition;
/// use statute::state_enum;
///
/// state_enum! {
///     enum Panel {
///         Collapsed,
///         Expanded,
///     }
/// }
///
/// let expand: Transition<u32, Panel> =
///     transition("Expand", Panel::Collapsed, Panel::Expanded, |h: &u32, _| Ok(h * 2));
/// assert_eq!(expand.name(), Some("Expand"));
/// ```
pub fn transition<T, S, P, F>(name: &str, from: S, to: S, transform: F) -> Transition<T, S, P>
where
    S: State,
    F: Fn(&T, &mut TransitionContext<'_, S, P>) -> Result<T, TransformError>
        + Send
        + Sync
        + 'static,
{
    Transition::new(from, to, transform).named(name)
}

/// Create a transition that only moves the state, leaving the object as is.
///
/// # Example
///
/// ```
/// use statute::builder::identity_transition;
/// use statute::state_enum;
///
/// state_enum! {
///     enum Tab {
///         Visible,
///         Hidden,
///     }
/// }
///
/// let hide = identity_transition::<String, Tab, ()>(Tab::Visible, Tab::Hidden);
/// assert!(hide.matches(&Tab::Visible, &Tab::Hidden));
/// ```
pub fn identity_transition<T, S, P>(from: S, to: S) -> Transition<T, S, P>
where
    T: Clone,
    S: State,
{
    Transition::new(from, to, |object: &T, _| Ok(object.clone()))
}
