#![forbid(unsafe_code)]

//! Path patterns and parameter schemas.
//!
//! A pattern is a `/`-separated sequence of segments. A literal segment
//! matches itself exactly; a `:name` segment captures whatever single
//! segment the path has at that position. Matching requires equal segment
//! counts — no prefix matching, no globs.
//!
//! Paths are normalized before matching: trailing slashes are stripped and
//! the empty path is the root `/`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Empty segment | `"/x//y"` | `ConfigurationError::InvalidRoutePattern` |
//! | Bare `:` | `"/x/:"` | `ConfigurationError::InvalidRoutePattern` |
//! | Duplicate param | `"/x/:id/:id"` | `ConfigurationError::InvalidRoutePattern` |
//! | Missing leading `/` | `"x/y"` | `ConfigurationError::InvalidRoutePattern` |

use std::collections::HashMap;

use iris_core::ConfigurationError;

/// One parsed pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// Captures one path segment under this parameter name.
    Param(String),
}

/// A parsed, validated route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse and validate a pattern string.
    pub fn parse(pattern: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidRoutePattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if !pattern.starts_with('/') {
            return Err(invalid("pattern must start with '/'"));
        }
        let trimmed = pattern.trim_end_matches('/');
        let mut segments = Vec::new();
        let mut seen_params: Vec<&str> = Vec::new();
        // Root pattern "/" has zero segments.
        if !trimmed.is_empty() {
            for part in trimmed[1..].split('/') {
                if part.is_empty() {
                    return Err(invalid("empty segment"));
                }
                if let Some(name) = part.strip_prefix(':') {
                    if name.is_empty() {
                        return Err(invalid("parameter segment needs a name"));
                    }
                    if seen_params.contains(&name) {
                        return Err(invalid("duplicate parameter name"));
                    }
                    seen_params.push(name);
                    segments.push(Segment::Param(name.to_string()));
                } else {
                    segments.push(Segment::Literal(part.to_string()));
                }
            }
        }
        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parameter names in positional order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Try to match a normalized path, capturing parameters positionally.
    ///
    /// Returns `None` on any mismatch: wrong segment count, literal
    /// mismatch, or — when a schema is supplied — a captured value that
    /// fails its type check.
    #[must_use]
    pub fn matches(
        &self,
        path: &str,
        schema: Option<&ParamSchema>,
    ) -> Option<HashMap<String, String>> {
        let path = normalize(path);
        let parts: Vec<&str> = if path == "/" {
            Vec::new()
        } else {
            path[1..].split('/').collect()
        };
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(text) => {
                    if text != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if let Some(schema) = schema
                        && let Some(kind) = schema.get(name)
                        && !kind.accepts(part)
                    {
                        return None;
                    }
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Normalize a path: ensure a leading slash, strip trailing slashes,
/// treat empty as root.
#[must_use]
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Expected type of a captured parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Any non-empty segment.
    Text,
    /// A base-10 integer (optional leading `-`).
    Integer,
}

impl ParamKind {
    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Text => !value.is_empty(),
            Self::Integer => value.parse::<i64>().is_ok(),
        }
    }
}

/// Optional per-parameter type constraints for one route entry.
///
/// A captured value failing its constraint makes the whole entry a
/// non-match; matching then continues down the route table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSchema {
    kinds: HashMap<String, ParamKind>,
}

impl ParamSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain one parameter. Builder-style.
    #[must_use]
    pub fn require(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ParamKind> {
        self.kinds.get(name).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
