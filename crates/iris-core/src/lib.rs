#![forbid(unsafe_code)]

//! Shared vocabulary for the IrisView application shell.
//!
//! This crate carries the types every other IrisView crate speaks:
//!
//! - [`error`] — the error taxonomy (`ConfigurationError`, `NotFoundError`,
//!   `RouteNotFoundError`, `LifecycleError`).
//! - [`ViewId`] — identifies a view in the registry and in route entries.
//! - [`Lifecycle`] — the application instance's lifecycle state.
//! - [`HostSurface`] — the mount-target boundary between the shell and
//!   whatever actually hosts the rendered application.
//!
//! It has no dependencies and no behavior beyond these definitions; the
//! store, router, engine adapter, and shell crates build on it.

pub mod error;
pub mod lifecycle;
pub mod surface;
pub mod view_id;

pub use error::{ConfigurationError, LifecycleError, NotFoundError, RouteNotFoundError};
pub use lifecycle::Lifecycle;
pub use surface::{HostSurface, StaticSurface};
pub use view_id::ViewId;
