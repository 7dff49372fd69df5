#![forbid(unsafe_code)]

//! Demo views.
//!
//! Stand-ins for a real view layer: each one logs its activation and
//! exercises the context it is handed (store slices, route params, the
//! engine handle) the way production views would.

use iris_core::ConfigurationError;
use iris_shell::{View, ViewContext, ViewRegistry};
use tracing::{info, warn};

/// Slice names the demo registers at bootstrap.
pub mod slices {
    /// `Option<String>` — the study currently loaded, if any.
    pub const IMAGE_SESSION: &str = "image_session";
    /// `String` — the interaction tool the user has active.
    pub const ACTIVE_TOOL: &str = "active_tool";
    /// `UserPrefs` — cross-view user preferences.
    pub const USER_PREFS: &str = "user_prefs";
}

/// Cross-view user preferences held in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPrefs {
    pub smooth_scrolling: bool,
    pub invert_grayscale: bool,
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            smooth_scrolling: true,
            invert_grayscale: false,
        }
    }
}

struct HomeView;

impl View for HomeView {
    fn mount(&mut self, ctx: &ViewContext) {
        let tool = ctx
            .store
            .slice::<String>(slices::ACTIVE_TOOL)
            .map(|s| s.get())
            .unwrap_or_default();
        info!(tool, "home view mounted");
    }

    fn unmount(&mut self) {
        info!("home view unmounted");
    }
}

struct ViewerView;

impl View for ViewerView {
    fn mount(&mut self, ctx: &ViewContext) {
        let study_id = ctx.route.params.get("studyId").cloned().unwrap_or_default();
        info!(study_id, "viewer view mounted");

        if let Ok(session) = ctx.store.slice::<Option<String>>(slices::IMAGE_SESSION) {
            session.set(Some(study_id));
        }
        match ctx.engine.handle() {
            Some(handle) => {
                info!(mode = ?handle.default_render_mode(), "imagery would load here");
            }
            None => warn!("engine not initialized; viewer cannot load imagery"),
        }
    }

    fn unmount(&mut self) {
        info!("viewer view unmounted");
    }
}

struct NotFoundView;

impl View for NotFoundView {
    fn mount(&mut self, ctx: &ViewContext) {
        warn!(path = %ctx.route.path, "not-found view mounted");
    }
}

/// Register the demo's three views.
pub fn register_all(registry: &mut ViewRegistry) -> Result<(), ConfigurationError> {
    registry.register("home", || Box::new(HomeView))?;
    registry.register("viewer", || Box::new(ViewerView))?;
    registry.register("not-found", || Box::new(NotFoundView))?;
    Ok(())
}
