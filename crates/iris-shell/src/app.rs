#![forbid(unsafe_code)]

//! The application instance and its one-time mount.
//!
//! [`AppShell::start`] performs, in order: lifecycle check (the instance
//! must still be `Unmounted`), host surface check (fatal if the selector
//! resolves to nothing), initial route resolution, view activation, and
//! the `Unmounted → Mounted` transition. By the time `start` returns the
//! instance is mounted and the initial view (or the configured error
//! view) is attached.
//!
//! # Invariants
//!
//! 1. `start` succeeds at most once; a second call fails with
//!    [`LifecycleError`] and leaves the instance `Mounted`, uncorrupted.
//! 2. Mount failure is fatal: no retry, no partial state — the instance
//!    stays `Unmounted` and the caller is expected to halt.
//! 3. A failed navigation never becomes the active route; the router's
//!    published route always reflects the last *completed* navigation.
//!
//! # Failure Modes
//!
//! | Failure | When | Behavior |
//! |---------|------|----------|
//! | [`MountError::SurfaceMissing`] | `start`, selector unresolvable | Fatal |
//! | [`MountError::InitialRouteUnresolved`] | `start`, no match, no error view | Fatal |
//! | [`MountError::UnknownView`] | `start`, view id not registered | Fatal |
//! | [`NavigationError::RouteNotFound`] | post-mount, no error view | Recoverable; prior route stays |
//! | [`LifecycleError`] | any op in the wrong state | Refused, state unchanged |

use std::rc::Rc;

use iris_core::{HostSurface, Lifecycle, LifecycleError, RouteNotFoundError, ViewId};
use iris_engine::EngineAdapter;
use iris_router::{ActiveRoute, Router};
use iris_store::Store;
use tracing::{debug, info, warn};

use crate::view::{View, ViewContext, ViewRegistry};

/// The explicitly constructed process-wide context: store, router, and
/// engine adapter, each a single instance shared by handle.
#[derive(Clone)]
pub struct AppContext {
    pub store: Rc<Store>,
    pub router: Rc<Router>,
    pub engine: Rc<EngineAdapter>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// Fatal mount failures. No recovery path is defined for any of these;
/// the caller halts and reports upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// The host surface selector resolved to nothing.
    SurfaceMissing { selector: String },
    /// The initial route resolved to a view id nothing is registered for.
    UnknownView { view_id: ViewId },
    /// The initial path matched no route and no error view is configured.
    InitialRouteUnresolved { path: String },
}

impl std::fmt::Display for MountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SurfaceMissing { selector } => {
                write!(f, "host surface '{selector}' does not exist")
            }
            Self::UnknownView { view_id } => {
                write!(f, "no view registered for '{view_id}'")
            }
            Self::InitialRouteUnresolved { path } => {
                write!(f, "initial path '{path}' matched no route")
            }
        }
    }
}

impl std::error::Error for MountError {}

/// Everything `start` can fail with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    Lifecycle(LifecycleError),
    Mount(MountError),
}

impl std::fmt::Display for StartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lifecycle(e) => e.fmt(f),
            Self::Mount(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for StartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lifecycle(e) => Some(e),
            Self::Mount(e) => Some(e),
        }
    }
}

impl From<LifecycleError> for StartError {
    fn from(e: LifecycleError) -> Self {
        Self::Lifecycle(e)
    }
}

impl From<MountError> for StartError {
    fn from(e: MountError) -> Self {
        Self::Mount(e)
    }
}

/// Everything post-mount navigation can fail with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Navigation attempted while not mounted.
    Lifecycle(LifecycleError),
    /// Path matched nothing and no error view is configured; the prior
    /// route remains current.
    RouteNotFound(RouteNotFoundError),
    /// The resolved view id is not registered; the prior view stays up.
    UnknownView { view_id: ViewId },
}

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lifecycle(e) => e.fmt(f),
            Self::RouteNotFound(e) => e.fmt(f),
            Self::UnknownView { view_id } => {
                write!(f, "no view registered for '{view_id}'")
            }
        }
    }
}

impl std::error::Error for NavigationError {}

/// The application shell: owns the application instance, composes the
/// context with the view registry, and drives mount, navigation, and
/// teardown.
pub struct AppShell {
    ctx: AppContext,
    views: ViewRegistry,
    /// Rendered when navigation fails to resolve; optional policy.
    error_view: Option<ViewId>,
    lifecycle: Lifecycle,
    surface: Option<Box<dyn HostSurface>>,
    selector: Option<String>,
    current: Option<(ViewId, Box<dyn View>)>,
}

impl std::fmt::Debug for AppShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell")
            .field("lifecycle", &self.lifecycle)
            .field("selector", &self.selector)
            .field("views", &self.views)
            .finish_non_exhaustive()
    }
}

impl AppShell {
    /// Compose a shell from an already-built context and view registry.
    ///
    /// The router's route table must be complete at this point; it cannot
    /// be extended after `build()`.
    #[must_use]
    pub fn new(ctx: AppContext, views: ViewRegistry) -> Self {
        Self {
            ctx,
            views,
            error_view: None,
            lifecycle: Lifecycle::Unmounted,
            surface: None,
            selector: None,
            current: None,
        }
    }

    /// Configure the view rendered when navigation fails to resolve.
    #[must_use]
    pub fn on_route_error(mut self, view_id: impl Into<ViewId>) -> Self {
        self.error_view = Some(view_id.into());
        self
    }

    /// Current lifecycle state of the application instance.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The shared context the shell was composed from.
    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Id of the currently activated view, if any.
    #[must_use]
    pub fn current_view(&self) -> Option<&ViewId> {
        self.current.as_ref().map(|(id, _)| id)
    }

    /// Mount the application: resolve `initial_path`, activate the
    /// resulting view, attach it under `selector`, and transition to
    /// `Mounted`. Synchronous; at most once per instance.
    pub fn start(
        &mut self,
        surface: impl HostSurface + 'static,
        selector: &str,
        initial_path: &str,
    ) -> Result<(), StartError> {
        if self.lifecycle != Lifecycle::Unmounted {
            return Err(LifecycleError {
                op: "start",
                state: self.lifecycle,
            }
            .into());
        }
        if !surface.exists(selector) {
            return Err(MountError::SurfaceMissing {
                selector: selector.to_string(),
            }
            .into());
        }

        let resolved = self.ctx.router.resolve(initial_path);
        let route = match &resolved {
            Ok(route) => route.clone(),
            Err(e) => match &self.error_view {
                Some(view_id) => {
                    warn!(path = %e.path, error_view = %view_id, "initial route unresolved");
                    ActiveRoute {
                        view_id: view_id.clone(),
                        params: std::collections::HashMap::new(),
                        path: e.path.clone(),
                    }
                }
                None => {
                    return Err(MountError::InitialRouteUnresolved {
                        path: e.path.clone(),
                    }
                    .into());
                }
            },
        };

        let mut view = self
            .views
            .instantiate(&route.view_id)
            .ok_or(MountError::UnknownView {
                view_id: route.view_id.clone(),
            })?;

        // Publish only now that the view exists; a fatal mount never
        // leaves a published route behind. The table is immutable, so
        // this re-resolves to the route above.
        if resolved.is_ok() {
            self.ctx
                .router
                .navigate(initial_path)
                .map_err(|e| MountError::InitialRouteUnresolved { path: e.path })?;
        }

        let mut surface = Box::new(surface) as Box<dyn HostSurface>;
        view.mount(&self.view_context(route.clone()));
        surface.attach(selector, &route.view_id);

        self.current = Some((route.view_id.clone(), view));
        self.surface = Some(surface);
        self.selector = Some(selector.to_string());
        self.lifecycle = Lifecycle::Mounted;
        info!(selector, view = %route.view_id, path = %route.path, "application mounted");
        Ok(())
    }

    /// Navigate after mount: resolve, unmount the prior view, activate
    /// the new one.
    ///
    /// An unresolvable path degrades to the configured error view (the
    /// router's active route is left untouched — the failed path never
    /// becomes current); without one, the prior view stays up and the
    /// error is returned.
    pub fn navigate(&mut self, path: &str) -> Result<ActiveRoute, NavigationError> {
        if self.lifecycle != Lifecycle::Mounted {
            return Err(NavigationError::Lifecycle(LifecycleError {
                op: "navigate",
                state: self.lifecycle,
            }));
        }

        let resolved = self.ctx.router.resolve(path);
        let route = match &resolved {
            Ok(route) => route.clone(),
            Err(e) => match &self.error_view {
                Some(view_id) if self.views.contains(view_id) => {
                    warn!(path = %e.path, error_view = %view_id, "route unresolved, degrading");
                    ActiveRoute {
                        view_id: view_id.clone(),
                        params: std::collections::HashMap::new(),
                        path: e.path.clone(),
                    }
                }
                _ => return Err(NavigationError::RouteNotFound(e.clone())),
            },
        };

        let next = self
            .views
            .instantiate(&route.view_id)
            .ok_or(NavigationError::UnknownView {
                view_id: route.view_id.clone(),
            })?;

        // Publish only now that the view exists: the active route
        // reflects completed navigations only.
        if resolved.is_ok() {
            self.ctx
                .router
                .navigate(path)
                .map_err(NavigationError::RouteNotFound)?;
        }

        self.commit(route.clone(), next);
        Ok(route)
    }

    /// Tear the application down: unmount the current view, detach from
    /// the surface, transition to `Destroyed`. Terminal.
    pub fn destroy(&mut self) -> Result<(), LifecycleError> {
        if self.lifecycle != Lifecycle::Mounted {
            return Err(LifecycleError {
                op: "destroy",
                state: self.lifecycle,
            });
        }
        if let Some((view_id, mut view)) = self.current.take() {
            debug!(view = %view_id, "unmounting on destroy");
            view.unmount();
        }
        if let (Some(surface), Some(selector)) = (self.surface.as_mut(), self.selector.as_deref())
        {
            surface.detach(selector);
        }
        self.lifecycle = Lifecycle::Destroyed;
        info!("application destroyed");
        Ok(())
    }

    /// Swap the current view for an already-instantiated one. Infallible:
    /// every check happened before anything was published or unmounted.
    fn commit(&mut self, route: ActiveRoute, mut next: Box<dyn View>) {
        if let Some((prev_id, mut prev)) = self.current.take() {
            debug!(from = %prev_id, to = %route.view_id, "view swap");
            prev.unmount();
        }
        next.mount(&self.view_context(route.clone()));
        if let (Some(surface), Some(selector)) = (self.surface.as_mut(), self.selector.as_deref())
        {
            surface.attach(selector, &route.view_id);
        }
        self.current = Some((route.view_id, next));
    }

    fn view_context(&self, route: ActiveRoute) -> ViewContext {
        ViewContext {
            store: Rc::clone(&self.ctx.store),
            router: Rc::clone(&self.ctx.router),
            engine: Rc::clone(&self.ctx.engine),
            route,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use iris_core::StaticSurface;
    use iris_router::RouterBuilder;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// View that logs mount/unmount into a shared journal.
    struct Recording {
        name: &'static str,
        journal: Rc<RefCell<Vec<String>>>,
    }

    impl View for Recording {
        fn mount(&mut self, ctx: &ViewContext) {
            self.journal
                .borrow_mut()
                .push(format!("mount:{}@{}", self.name, ctx.route.path));
        }

        fn unmount(&mut self) {
            self.journal.borrow_mut().push(format!("unmount:{}", self.name));
        }
    }

    struct Fixture {
        shell: AppShell,
        journal: Rc<RefCell<Vec<String>>>,
        surface: Rc<RefCell<StaticSurface>>,
    }

    fn fixture(error_view: bool) -> Fixture {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut views = ViewRegistry::new();
        for name in ["home", "viewer", "oops"] {
            let journal = Rc::clone(&journal);
            views
                .register(name, move || {
                    Box::new(Recording {
                        name,
                        journal: Rc::clone(&journal),
                    })
                })
                .unwrap();
        }

        let router = RouterBuilder::new()
            .route("/", "home")
            .unwrap()
            .route("/view/:studyId", "viewer")
            .unwrap()
            .route("/ghost", "ghost") // Registered route, unregistered view.
            .unwrap()
            .build();

        let ctx = AppContext {
            store: Rc::new(Store::new()),
            router: Rc::new(router),
            engine: Rc::new(EngineAdapter::with_null_engine()),
        };

        let mut shell = AppShell::new(ctx, views);
        if error_view {
            shell = shell.on_route_error("oops");
        }
        Fixture {
            shell,
            journal,
            surface: Rc::new(RefCell::new(StaticSurface::with_selectors(["#app"]))),
        }
    }

    #[test]
    fn start_mounts_and_resolves_initial_route() {
        let mut fx = fixture(false);
        fx.shell
            .start(Rc::clone(&fx.surface), "#app", "/view/42")
            .unwrap();

        assert_eq!(fx.shell.lifecycle(), Lifecycle::Mounted);
        assert_eq!(fx.shell.current_view(), Some(&ViewId::from("viewer")));
        assert_eq!(
            fx.surface.borrow().attached("#app"),
            Some(&ViewId::from("viewer"))
        );
        assert_eq!(*fx.journal.borrow(), vec!["mount:viewer@/view/42"]);

        let active = fx.shell.context().router.active().unwrap();
        assert_eq!(active.params["studyId"], "42");
    }

    #[test]
    fn second_start_fails_and_state_stays_mounted() {
        let mut fx = fixture(false);
        fx.shell.start(Rc::clone(&fx.surface), "#app", "/").unwrap();

        let err = fx
            .shell
            .start(Rc::clone(&fx.surface), "#app", "/")
            .unwrap_err();
        assert_eq!(
            err,
            StartError::Lifecycle(LifecycleError {
                op: "start",
                state: Lifecycle::Mounted,
            })
        );
        assert_eq!(fx.shell.lifecycle(), Lifecycle::Mounted);
        assert_eq!(fx.shell.current_view(), Some(&ViewId::from("home")));
    }

    #[test]
    fn missing_surface_is_fatal() {
        let mut fx = fixture(false);
        let err = fx
            .shell
            .start(Rc::clone(&fx.surface), "#missing", "/")
            .unwrap_err();
        assert_eq!(
            err,
            StartError::Mount(MountError::SurfaceMissing {
                selector: "#missing".into()
            })
        );
        assert_eq!(fx.shell.lifecycle(), Lifecycle::Unmounted);
    }

    #[test]
    fn unresolved_initial_path_without_error_view_is_fatal() {
        let mut fx = fixture(false);
        let err = fx
            .shell
            .start(Rc::clone(&fx.surface), "#app", "/nowhere")
            .unwrap_err();
        assert_eq!(
            err,
            StartError::Mount(MountError::InitialRouteUnresolved {
                path: "/nowhere".into()
            })
        );
        assert_eq!(fx.shell.lifecycle(), Lifecycle::Unmounted);
    }

    #[test]
    fn unresolved_initial_path_with_error_view_mounts_it() {
        let mut fx = fixture(true);
        fx.shell
            .start(Rc::clone(&fx.surface), "#app", "/nowhere")
            .unwrap();
        assert_eq!(fx.shell.lifecycle(), Lifecycle::Mounted);
        assert_eq!(fx.shell.current_view(), Some(&ViewId::from("oops")));
    }

    #[test]
    fn unknown_view_at_start_is_fatal_and_publishes_nothing() {
        let mut fx = fixture(false);
        let err = fx
            .shell
            .start(Rc::clone(&fx.surface), "#app", "/ghost")
            .unwrap_err();
        assert_eq!(
            err,
            StartError::Mount(MountError::UnknownView {
                view_id: ViewId::from("ghost")
            })
        );
        // The failed mount never became the active route.
        assert_eq!(fx.shell.context().router.active(), None);
    }

    #[test]
    fn unknown_view_navigation_keeps_published_route() {
        let mut fx = fixture(false);
        fx.shell.start(Rc::clone(&fx.surface), "#app", "/").unwrap();

        // "/ghost" resolves, but no view is registered for it: the prior
        // view stays mounted and the published route stays on it too.
        let err = fx.shell.navigate("/ghost").unwrap_err();
        assert_eq!(
            err,
            NavigationError::UnknownView {
                view_id: ViewId::from("ghost")
            }
        );
        assert_eq!(fx.shell.current_view(), Some(&ViewId::from("home")));
        assert_eq!(
            fx.shell.context().router.active().unwrap().view_id,
            ViewId::from("home")
        );
        // The prior view was never unmounted.
        assert_eq!(*fx.journal.borrow(), vec!["mount:home@/"]);
    }

    #[test]
    fn navigation_swaps_views_in_order() {
        let mut fx = fixture(false);
        fx.shell.start(Rc::clone(&fx.surface), "#app", "/").unwrap();
        fx.shell.navigate("/view/7").unwrap();

        assert_eq!(
            *fx.journal.borrow(),
            vec!["mount:home@/", "unmount:home", "mount:viewer@/view/7"]
        );
        assert_eq!(
            fx.surface.borrow().attached("#app"),
            Some(&ViewId::from("viewer"))
        );
    }

    #[test]
    fn failed_navigation_keeps_prior_route_and_view() {
        let mut fx = fixture(false);
        fx.shell.start(Rc::clone(&fx.surface), "#app", "/").unwrap();

        let err = fx.shell.navigate("/nowhere").unwrap_err();
        assert!(matches!(err, NavigationError::RouteNotFound(_)));
        assert_eq!(fx.shell.current_view(), Some(&ViewId::from("home")));
        assert_eq!(
            fx.shell.context().router.active().unwrap().view_id,
            ViewId::from("home")
        );
    }

    #[test]
    fn failed_navigation_degrades_to_error_view() {
        let mut fx = fixture(true);
        fx.shell.start(Rc::clone(&fx.surface), "#app", "/").unwrap();

        let route = fx.shell.navigate("/nowhere").unwrap();
        assert_eq!(route.view_id, ViewId::from("oops"));
        assert_eq!(fx.shell.current_view(), Some(&ViewId::from("oops")));
        // The failed path never becomes the published active route.
        assert_eq!(
            fx.shell.context().router.active().unwrap().view_id,
            ViewId::from("home")
        );
    }

    #[test]
    fn navigate_before_start_is_a_lifecycle_error() {
        let mut fx = fixture(false);
        let err = fx.shell.navigate("/").unwrap_err();
        assert!(matches!(err, NavigationError::Lifecycle(_)));
    }

    #[test]
    fn destroy_is_terminal() {
        let mut fx = fixture(false);
        fx.shell.start(Rc::clone(&fx.surface), "#app", "/").unwrap();
        fx.shell.destroy().unwrap();

        assert_eq!(fx.shell.lifecycle(), Lifecycle::Destroyed);
        assert_eq!(fx.surface.borrow().attached("#app"), None);
        assert_eq!(fx.shell.current_view(), None);
        assert!(fx.journal.borrow().contains(&"unmount:home".to_string()));

        // Nothing works after destroy.
        assert!(fx.shell.destroy().is_err());
        assert!(fx.shell.navigate("/").is_err());
        let err = fx
            .shell
            .start(Rc::clone(&fx.surface), "#app", "/")
            .unwrap_err();
        assert_eq!(
            err,
            StartError::Lifecycle(LifecycleError {
                op: "start",
                state: Lifecycle::Destroyed,
            })
        );
    }
}
