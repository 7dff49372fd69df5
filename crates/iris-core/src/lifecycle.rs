#![forbid(unsafe_code)]

//! Application instance lifecycle states.

/// Lifecycle state of the application instance.
///
/// Transitions are strictly forward: `Unmounted → Mounted → Destroyed`.
/// The shell owns the instance and is the only component that transitions
/// it; everyone else may only observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Constructed but not yet mounted to a host surface.
    #[default]
    Unmounted,
    /// Mounted and rendering into a host surface.
    Mounted,
    /// Torn down; terminal state.
    Destroyed,
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Unmounted => "unmounted",
            Self::Mounted => "mounted",
            Self::Destroyed => "destroyed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unmounted() {
        assert_eq!(Lifecycle::default(), Lifecycle::Unmounted);
    }

    #[test]
    fn display() {
        assert_eq!(Lifecycle::Unmounted.to_string(), "unmounted");
        assert_eq!(Lifecycle::Mounted.to_string(), "mounted");
        assert_eq!(Lifecycle::Destroyed.to_string(), "destroyed");
    }
}
