#![forbid(unsafe_code)]

//! Named state slices over [`Signal`].
//!
//! A [`Store`] maps unique slice names to independently reactive values.
//! Registration hands back a typed [`SliceHandle`]; the handle's `set` and
//! `update` are the slice's only mutation entry points, and its `watch`
//! is the reactive read. Views share one store for cross-view state (the
//! loaded image session, the active tool, user preferences) and never
//! reach around the handle.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Duplicate registration | Name already taken | `ConfigurationError::DuplicateSlice` |
//! | Unknown slice | Name never registered | `NotFoundError::UnknownSlice` |
//! | Wrong type | Registered at another `T` | `NotFoundError::SliceTypeMismatch` |

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use iris_core::{ConfigurationError, NotFoundError};
use tracing::debug;

use crate::signal::{Signal, WatchGuard};

/// Reactive state container keyed by slice name.
///
/// Single instance per application; constructed once, shared by handle
/// (`Rc<Store>`) for the application's whole lifetime.
#[derive(Default)]
pub struct Store {
    slices: RefCell<HashMap<String, Rc<dyn Any>>>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.slices.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("Store").field("slices", &names).finish()
    }
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slice under a unique name with its initial value.
    ///
    /// Returns the typed handle that owns the slice's mutation entry
    /// points. Registering a name twice fails with
    /// [`ConfigurationError::DuplicateSlice`] regardless of value type.
    pub fn register<T: Clone + PartialEq + 'static>(
        &self,
        name: &str,
        initial: T,
    ) -> Result<SliceHandle<T>, ConfigurationError> {
        let mut slices = self.slices.borrow_mut();
        if slices.contains_key(name) {
            return Err(ConfigurationError::DuplicateSlice {
                name: name.to_string(),
            });
        }
        let signal = Signal::labeled(name, initial);
        slices.insert(name.to_string(), Rc::new(signal.clone()));
        debug!(slice = name, "slice registered");
        Ok(SliceHandle {
            name: Rc::from(name),
            signal,
        })
    }

    /// Fetch the handle for a registered slice.
    ///
    /// The requested type must match the registered type exactly.
    pub fn slice<T: Clone + PartialEq + 'static>(
        &self,
        name: &str,
    ) -> Result<SliceHandle<T>, NotFoundError> {
        let slices = self.slices.borrow();
        let slot = slices.get(name).ok_or_else(|| NotFoundError::UnknownSlice {
            name: name.to_string(),
        })?;
        let signal = slot
            .downcast_ref::<Signal<T>>()
            .ok_or_else(|| NotFoundError::SliceTypeMismatch {
                name: name.to_string(),
            })?;
        Ok(SliceHandle {
            name: Rc::from(name),
            signal: signal.clone(),
        })
    }

    /// Is a slice registered under this name (at any type)?
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.slices.borrow().contains_key(name)
    }

    /// Number of registered slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.borrow().is_empty()
    }
}

/// Typed handle to one store slice: the slice's sole read and mutation
/// path.
///
/// Cloning the handle clones the *handle*; all clones address the same
/// slice. Handles stay valid for the store's whole lifetime (slices are
/// never unregistered).
#[derive(Clone)]
pub struct SliceHandle<T> {
    name: Rc<str>,
    signal: Signal<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for SliceHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliceHandle")
            .field("name", &self.name)
            .field("signal", &self.signal)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> SliceHandle<T> {
    /// Slice name as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Read the current value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.signal.with(f)
    }

    /// Mutation entry point: commit a new value.
    ///
    /// The underlying signal is labeled with the slice name, so each
    /// commit is traced under it.
    pub fn set(&self, value: T) {
        self.signal.set(value);
    }

    /// Mutation entry point: mutate in place.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.signal.update(f);
    }

    /// Reactive read: invoke `callback` on every committed change.
    pub fn watch(&self, callback: impl Fn(&T) + 'static) -> WatchGuard {
        self.signal.watch(callback)
    }

    /// Commit counter for this slice.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.signal.version()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
