//! Statute: a typed state machine runtime.
//!
//! A machine only changes state through transitions declared up front. Each
//! transition pairs a start state with an end state and carries a transform
//! that produces the next value of the domain object the machine governs.
//!
//! # Core Concepts
//!
//! - **State**: Named marker values, compared by name ([`core::State`])
//! - **Transition**: A directed rule plus its transform ([`machine::Transition`])
//! - **Machine**: Resolves requests against its transitions in declaration
//!   order and notifies observers ([`machine::Machine`])
//! - **Hierarchy**: Owns machines in parent/child relations and routes
//!   cross-machine requests through each machine's own resolution
//!   ([`hierarchy::Hierarchy`])
//!
//! # Example
//!
//! ```rust
//! use statute::machine::{Machine, MachineError, Transition};
//! use statute::state_enum;
//!
//! state_enum! {
//!     enum SavedSearch {
//!         Collapsed,
//!         Expanded,
//!         Hidden,
//!     }
//! }
//!
//! let mut machine: Machine<Vec<String>, SavedSearch> = Machine::new(
//!     SavedSearch::Collapsed,
//!     vec![
//!         Transition::new(SavedSearch::Collapsed, SavedSearch::Expanded, |rows: &Vec<String>, _| {
//!             let mut rows = rows.clone();
//!             rows.push("details".to_string());
//!             Ok(rows)
//!         }),
//!     ],
//! );
//!
//! let rows = machine.perform_transition(vec![], SavedSearch::Expanded).unwrap();
//! assert_eq!(rows, vec!["details".to_string()]);
//!
//! let error = machine.perform_transition(rows, SavedSearch::Hidden).unwrap_err();
//! assert!(matches!(error, MachineError::InvalidStateTransition { .. }));
//! assert_eq!(error.to_string(), "Unable to transition state from Expanded to Hidden.");
//! ```

pub mod builder;
pub mod core;
pub mod hierarchy;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder, TransitionBuilder};
pub use crate::core::{HistoryPolicy, NamedState, State};
pub use crate::hierarchy::{Hierarchy, HierarchyError, MachineId, Target};
pub use crate::machine::{Machine, MachineError, TransformError, Transition, TransitionContext};
