//! Core state machine value types.
//!
//! This module contains the pure building blocks of the runtime:
//! - State definitions via the `State` trait and the free-form `NamedState`
//! - The optional transition audit log
//!
//! Nothing in this module executes transitions; see [`crate::machine`].

mod history;
mod state;

pub use history::{HistoryPolicy, TransitionLog, TransitionRecord};
pub use state::{NamedState, State};
