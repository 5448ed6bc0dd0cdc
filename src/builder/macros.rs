//! Macros for declaring state sets.

/// Declare a closed enum of states and implement `State` for it.
///
/// Each variant's name is its identifier, so state names are unique within
/// the enum by construction.
///
/// # Example
///
/// ```
/// use statute::state_enum;
/// use statute::core::State;
///
/// state_enum! {
///     pub enum SavedSearchState {
///         Collapsed,
///         Expanded,
///     }
/// }
///
/// assert_eq!(SavedSearchState::Expanded.name(), "Expanded");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}
