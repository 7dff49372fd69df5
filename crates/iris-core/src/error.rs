#![forbid(unsafe_code)]

//! Error taxonomy for the application shell and its collaborators.
//!
//! Every error here is synchronous and surfaced directly to the caller of
//! the offending operation; nothing retries internally.
//!
//! | Error | Meaning | Recoverable? |
//! |-------|---------|--------------|
//! | [`ConfigurationError`] | Duplicate or conflicting setup | No — programmer error |
//! | [`NotFoundError`] | Unregistered store slice | No — programmer error |
//! | [`RouteNotFoundError`] | Unmatched path, no fallback | Yes — shell may render a not-found view |
//! | [`LifecycleError`] | Operation in an invalid lifecycle state | No — programmer error |

use crate::lifecycle::Lifecycle;
use crate::view_id::ViewId;

/// Duplicate or conflicting setup detected during construction or
/// initialization. These surface during development, not at steady state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A store slice was registered twice under the same name.
    DuplicateSlice { name: String },
    /// A view factory was registered twice under the same id.
    DuplicateView { view_id: ViewId },
    /// A route pattern could not be parsed.
    InvalidRoutePattern { pattern: String, reason: String },
    /// The imaging engine was re-initialized with a different configuration.
    ConflictingEngineConfig { active: String, requested: String },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSlice { name } => {
                write!(f, "store slice '{name}' is already registered")
            }
            Self::DuplicateView { view_id } => {
                write!(f, "view '{view_id}' is already registered")
            }
            Self::InvalidRoutePattern { pattern, reason } => {
                write!(f, "invalid route pattern '{pattern}': {reason}")
            }
            Self::ConflictingEngineConfig { active, requested } => {
                write!(
                    f,
                    "imaging engine already initialized with {active}, refusing {requested}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// A store read named a slice that does not exist (or exists at a
/// different type than the caller asked for).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    /// No slice registered under this name.
    UnknownSlice { name: String },
    /// A slice exists under this name but holds a different value type.
    SliceTypeMismatch { name: String },
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSlice { name } => write!(f, "no store slice named '{name}'"),
            Self::SliceTypeMismatch { name } => {
                write!(f, "store slice '{name}' holds a different value type")
            }
        }
    }
}

impl std::error::Error for NotFoundError {}

/// Navigation targeted a path no route entry matches and no fallback
/// route is registered. Recoverable at the shell's discretion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteNotFoundError {
    /// The path that failed to resolve, post-normalization.
    pub path: String,
}

impl std::fmt::Display for RouteNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no route matches '{}' and no fallback is registered", self.path)
    }
}

impl std::error::Error for RouteNotFoundError {}

/// An operation was invoked while the application instance was in a
/// lifecycle state that does not permit it (e.g. a second `start`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleError {
    /// The operation that was refused.
    pub op: &'static str,
    /// The lifecycle state the instance was actually in.
    pub state: Lifecycle,
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot {} while {}", self.op, self.state)
    }
}

impl std::error::Error for LifecycleError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_messages() {
        let e = ConfigurationError::DuplicateSlice {
            name: "session".into(),
        };
        assert_eq!(e.to_string(), "store slice 'session' is already registered");

        let e = NotFoundError::UnknownSlice {
            name: "tool".into(),
        };
        assert_eq!(e.to_string(), "no store slice named 'tool'");

        let e = RouteNotFoundError {
            path: "/missing".into(),
        };
        assert_eq!(
            e.to_string(),
            "no route matches '/missing' and no fallback is registered"
        );

        let e = LifecycleError {
            op: "start",
            state: Lifecycle::Mounted,
        };
        assert_eq!(e.to_string(), "cannot start while mounted");
    }

    #[test]
    fn errors_are_std_errors() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<ConfigurationError>();
        assert_error::<NotFoundError>();
        assert_error::<RouteNotFoundError>();
        assert_error::<LifecycleError>();
    }
}
