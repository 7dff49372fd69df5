#![forbid(unsafe_code)]

//! Host surface boundary.
//!
//! The shell renders into a *host surface*: whatever the embedding
//! environment offers as a mount target, addressed by a selector string
//! (e.g. `"#app"`). The shell only needs three things from it — existence
//! checks, attach, detach — so that is the whole trait. Real hosts adapt
//! their document model behind it; tests and the demo use
//! [`StaticSurface`], a deterministic in-memory host.
//!
//! # Invariants
//!
//! 1. `attach` to a selector that already holds a view replaces it; the
//!    surface never holds two views under one selector.
//! 2. `detach` on an empty selector is a no-op.
//! 3. Selector resolution is the host's business; the shell treats
//!    selectors as opaque strings.

use std::collections::HashMap;

use crate::view_id::ViewId;

/// The mount target the shell renders into.
pub trait HostSurface {
    /// Does the selector resolve to a mount point right now?
    fn exists(&self, selector: &str) -> bool;

    /// Place the view identified by `view_id` under `selector`, replacing
    /// whatever was there.
    fn attach(&mut self, selector: &str, view_id: &ViewId);

    /// Remove whatever is mounted under `selector`, if anything.
    fn detach(&mut self, selector: &str);
}

// Shared-handle hosts: the shell can own one handle while the embedder
// keeps another for inspection.
impl<S: HostSurface> HostSurface for std::rc::Rc<std::cell::RefCell<S>> {
    fn exists(&self, selector: &str) -> bool {
        self.borrow().exists(selector)
    }

    fn attach(&mut self, selector: &str, view_id: &ViewId) {
        self.borrow_mut().attach(selector, view_id);
    }

    fn detach(&mut self, selector: &str) {
        self.borrow_mut().detach(selector);
    }
}

/// In-memory host surface with a fixed set of known selectors.
///
/// Deterministic stand-in for a real host: the demo binary and the shell
/// tests drive the application against it.
#[derive(Debug, Default)]
pub struct StaticSurface {
    selectors: Vec<String>,
    mounted: HashMap<String, ViewId>,
}

impl StaticSurface {
    /// Create a surface that knows the given selectors.
    #[must_use]
    pub fn with_selectors(selectors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
            mounted: HashMap::new(),
        }
    }

    /// The view currently attached under `selector`, if any.
    #[must_use]
    pub fn attached(&self, selector: &str) -> Option<&ViewId> {
        self.mounted.get(selector)
    }
}

impl HostSurface for StaticSurface {
    fn exists(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s == selector)
    }

    fn attach(&mut self, selector: &str, view_id: &ViewId) {
        self.mounted.insert(selector.to_string(), view_id.clone());
    }

    fn detach(&mut self, selector: &str) {
        self.mounted.remove(selector);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
