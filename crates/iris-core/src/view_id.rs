#![forbid(unsafe_code)]

//! View identifiers.

/// Identifies a view: route entries resolve to a `ViewId`, and the shell's
/// view registry maps each `ViewId` to a view factory.
///
/// Ids are opaque to the router and the shell; `"home"` and `"viewer"` are
/// as good as anything. Equality and hashing are on the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(String);

impl ViewId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ViewId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ViewId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_and_display() {
        let id = ViewId::from("viewer");
        assert_eq!(id.as_str(), "viewer");
        assert_eq!(id.to_string(), "viewer");
        assert_eq!(id, ViewId::new(String::from("viewer")));
    }
}
