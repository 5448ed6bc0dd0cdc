//! Core State trait for state machine states.
//!
//! States are immutable marker values. The runtime identifies a state by its
//! name alone: two states are the same state iff their names are equal.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Debug};

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: States are copied into history records and dispatch requests
/// - `PartialEq`: Hosts compare states in their own code
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `DeserializeOwned`: History records can be exported
///
/// Transition resolution never uses `PartialEq`; it compares [`State::name`].
///
/// # Example
///
/// ```rust
/// use statute::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum PanelState {
///     Collapsed,
///     Expanded,
/// }
///
/// impl State for PanelState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Collapsed => "Collapsed",
///             Self::Expanded => "Expanded",
///         }
///     }
/// }
///
/// assert!(PanelState::Collapsed.same_as(&PanelState::Collapsed));
/// assert!(!PanelState::Collapsed.same_as(&PanelState::Expanded));
/// ```
pub trait State: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// The state's identity key.
    fn name(&self) -> &str;

    /// Name-based identity check used by the runtime.
    fn same_as(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

/// Free-form state identified by name, with an optional discriminant tag.
///
/// Equality looks at the name only, so the same logical state can be
/// re-declared independently (with different tags) and still match.
///
/// ```rust
/// use statute::core::{NamedState, State};
///
/// let a = NamedState::new("Hidden");
/// let b = NamedState::tagged("Hidden", "SearchTabState");
///
/// assert_eq!(a, b);
/// assert!(a.same_as(&b));
/// assert_eq!(b.tag(), Some("SearchTabState"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedState {
    name: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<Cow<'static, str>>,
}

impl NamedState {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            tag: None,
        }
    }

    pub fn tagged(name: impl Into<Cow<'static, str>>, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            tag: Some(tag.into()),
        }
    }

    /// The discriminant tag naming the concrete state variant, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl PartialEq for NamedState {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for NamedState {}

impl fmt::Display for NamedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl State for NamedState {
    fn name(&self) -> &str {
        &self.name
    }
}
