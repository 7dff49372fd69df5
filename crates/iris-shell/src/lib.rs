#![forbid(unsafe_code)]

//! Application shell for IrisView.
//!
//! The shell composes the store, the router, and the engine adapter into
//! one application instance and performs the one-time mount:
//!
//! - [`View`] / [`ViewRegistry`]: the seam between the shell and the view
//!   layer. Views are instantiated per activation, read shared state
//!   through a [`ViewContext`], and emit intents by calling store
//!   mutation entry points or shell navigation.
//! - [`AppShell`]: owns the application instance lifecycle
//!   (`Unmounted → Mounted → Destroyed`), resolves the initial route at
//!   `start`, and applies the navigation policy for unresolvable paths.
//!
//! Construction order is leaves-first: build the store, the router (with
//! its route table), and the adapter; hand them to the shell as an
//! [`AppContext`]; then call [`AppShell::start`] exactly once.

pub mod app;
pub mod view;

pub use app::{AppContext, AppShell, MountError, NavigationError, StartError};
pub use view::{View, ViewContext, ViewRegistry};
