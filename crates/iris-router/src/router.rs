#![forbid(unsafe_code)]

//! Route table and navigation.
//!
//! Entries are registered once on a [`RouterBuilder`] and frozen by
//! `build()`. [`Router::navigate`] tests entries in registration order and
//! publishes the first match as the new [`ActiveRoute`]; readers observe
//! the route through [`Router::active`] or reactively through
//! [`Router::watch_active`], always as one atomic value.

use std::collections::HashMap;

use iris_core::{ConfigurationError, RouteNotFoundError, ViewId};
use iris_store::{Signal, WatchGuard};
use tracing::{debug, info};

use crate::pattern::{ParamSchema, RoutePattern, normalize};

/// One static route table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pattern: RoutePattern,
    view_id: ViewId,
    schema: Option<ParamSchema>,
}

impl RouteEntry {
    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    #[must_use]
    pub fn view_id(&self) -> &ViewId {
        &self.view_id
    }
}

/// The currently resolved route: view id plus bound parameters plus the
/// path that produced it. Replaced as one value on every navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRoute {
    pub view_id: ViewId,
    pub params: HashMap<String, String>,
    /// Normalized path this resolution came from.
    pub path: String,
}

/// Builds the static route table. Registration happens here, once, before
/// the router is handed to the shell.
#[derive(Debug, Default)]
pub struct RouterBuilder {
    entries: Vec<RouteEntry>,
    fallback: Option<ViewId>,
}

impl RouterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Order matters: earlier entries win ties.
    pub fn route(
        self,
        pattern: &str,
        view_id: impl Into<ViewId>,
    ) -> Result<Self, ConfigurationError> {
        self.route_inner(pattern, view_id.into(), None)
    }

    /// Register a route with per-parameter type constraints.
    pub fn route_with_schema(
        self,
        pattern: &str,
        view_id: impl Into<ViewId>,
        schema: ParamSchema,
    ) -> Result<Self, ConfigurationError> {
        self.route_inner(pattern, view_id.into(), Some(schema))
    }

    fn route_inner(
        mut self,
        pattern: &str,
        view_id: ViewId,
        schema: Option<ParamSchema>,
    ) -> Result<Self, ConfigurationError> {
        let pattern = RoutePattern::parse(pattern)?;
        self.entries.push(RouteEntry {
            pattern,
            view_id,
            schema,
        });
        Ok(self)
    }

    /// Designate the fallback view for unmatched paths. Without one,
    /// navigation to an unmatched path fails.
    #[must_use]
    pub fn not_found(mut self, view_id: impl Into<ViewId>) -> Self {
        self.fallback = Some(view_id.into());
        self
    }

    /// Freeze the table.
    #[must_use]
    pub fn build(self) -> Router {
        debug!(
            routes = self.entries.len(),
            fallback = self.fallback.is_some(),
            "route table frozen"
        );
        Router {
            entries: self.entries,
            fallback: self.fallback,
            active: Signal::labeled("active_route", None),
        }
    }
}

/// The router: immutable route table plus the reactive active route.
///
/// Shared by handle (`Rc<Router>`); navigation is the only mutation path
/// and completes synchronously.
#[derive(Debug)]
pub struct Router {
    entries: Vec<RouteEntry>,
    fallback: Option<ViewId>,
    active: Signal<Option<ActiveRoute>>,
}

impl Router {
    /// Resolve `path` and publish the result as the new active route.
    ///
    /// Entries are tested in registration order; the first whose pattern
    /// (and schema, if any) matches wins. An unmatched path resolves to
    /// the fallback view with empty parameters when one is registered,
    /// and fails with [`RouteNotFoundError`] otherwise — in which case
    /// the active route is left untouched.
    pub fn navigate(&self, path: &str) -> Result<ActiveRoute, RouteNotFoundError> {
        let route = self.resolve(path)?;
        info!(path = %route.path, view = %route.view_id, "navigated");
        // One atomic commit: view id and params move together.
        self.active.set(Some(route.clone()));
        Ok(route)
    }

    /// Resolve `path` with the same matching rules as [`Self::navigate`],
    /// without publishing anything.
    ///
    /// The shell resolves first, confirms it can actually activate the
    /// resulting view, and only then navigates — so the published route
    /// never names a view that failed to come up. The table is immutable,
    /// so resolving the same path twice gives the same answer.
    pub fn resolve(&self, path: &str) -> Result<ActiveRoute, RouteNotFoundError> {
        let normalized = normalize(path);
        self.lookup(&normalized)
            .ok_or(RouteNotFoundError { path: normalized })
    }

    fn lookup(&self, normalized: &str) -> Option<ActiveRoute> {
        for entry in &self.entries {
            if let Some(params) = entry.pattern.matches(normalized, entry.schema.as_ref()) {
                return Some(ActiveRoute {
                    view_id: entry.view_id.clone(),
                    params,
                    path: normalized.to_string(),
                });
            }
        }
        self.fallback.as_ref().map(|view_id| {
            debug!(path = %normalized, fallback = %view_id, "no route matched, using fallback");
            ActiveRoute {
                view_id: view_id.clone(),
                params: HashMap::new(),
                path: normalized.to_string(),
            }
        })
    }

    /// The most recent completed navigation, if any.
    #[must_use]
    pub fn active(&self) -> Option<ActiveRoute> {
        self.active.get()
    }

    /// Reactive read of the active route. The callback sees each newly
    /// published route as one value.
    pub fn watch_active(&self, callback: impl Fn(&Option<ActiveRoute>) + 'static) -> WatchGuard {
        self.active.watch(callback)
    }

    /// Registered entries, in registration order.
    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// The designated fallback view, if any.
    #[must_use]
    pub fn fallback(&self) -> Option<&ViewId> {
        self.fallback.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
