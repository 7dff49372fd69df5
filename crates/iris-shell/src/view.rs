#![forbid(unsafe_code)]

//! The view seam.
//!
//! Views are out of scope for the shell except at this interface: they
//! consume store state and route parameters through a [`ViewContext`] and
//! emit user intents by mutating store slices or asking the shell to
//! navigate. Markup and presentation are entirely theirs.

use std::collections::HashMap;
use std::rc::Rc;

use iris_core::{ConfigurationError, ViewId};
use iris_engine::EngineAdapter;
use iris_router::{ActiveRoute, Router};
use iris_store::Store;

/// Everything a view gets handed at activation. No ambient globals: the
/// store, router, and engine adapter arrive here by handle.
#[derive(Clone)]
pub struct ViewContext {
    pub store: Rc<Store>,
    pub router: Rc<Router>,
    pub engine: Rc<EngineAdapter>,
    /// The resolution that activated this view.
    pub route: ActiveRoute,
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext")
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

/// A view as the shell sees it.
pub trait View {
    /// The route resolved to this view; read state, subscribe, render.
    fn mount(&mut self, ctx: &ViewContext);

    /// Navigating away; drop subscriptions and release the surface.
    fn unmount(&mut self) {}
}

type ViewFactory = Box<dyn Fn() -> Box<dyn View>>;

/// Maps view ids to factories. One registration per id, before `start`.
#[derive(Default)]
pub struct ViewRegistry {
    factories: HashMap<ViewId, ViewFactory>,
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&ViewId> = self.factories.keys().collect();
        ids.sort();
        f.debug_struct("ViewRegistry").field("views", &ids).finish()
    }
}

impl ViewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view factory. Duplicate ids fail.
    pub fn register(
        &mut self,
        view_id: impl Into<ViewId>,
        factory: impl Fn() -> Box<dyn View> + 'static,
    ) -> Result<(), ConfigurationError> {
        let view_id = view_id.into();
        if self.factories.contains_key(&view_id) {
            return Err(ConfigurationError::DuplicateView { view_id });
        }
        self.factories.insert(view_id, Box::new(factory));
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, view_id: &ViewId) -> bool {
        self.factories.contains_key(view_id)
    }

    /// Build a fresh instance of the view, if registered.
    #[must_use]
    pub(crate) fn instantiate(&self, view_id: &ViewId) -> Option<Box<dyn View>> {
        self.factories.get(view_id).map(|f| f())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
