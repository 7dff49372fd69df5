#![forbid(unsafe_code)]

//! Reactive state store for IrisView.
//!
//! Two layers:
//!
//! - [`Signal`]: a shared, version-tracked value with change notification.
//!   Watchers are notified in registration order; a [`WatchGuard`]
//!   unsubscribes on drop.
//! - [`Store`]: named state slices built on signals. Slices are registered
//!   once, then read and mutated only through their typed [`SliceHandle`].
//!
//! # Architecture
//!
//! Everything here is single-threaded: `Rc<RefCell<..>>` sharing, no
//! `Send`/`Sync` bounds. The hosting event loop drives all reactivity; the
//! store itself never suspends and completes every operation within one
//! call.
//!
//! # Invariants
//!
//! 1. A read observes the most recently committed mutation.
//! 2. Mutations apply in issue order; a watcher observes a
//!    prefix-consistent sequence of values, never a reordering.
//! 3. Writing a value equal to the current one commits as a no-op: no
//!    version bump, no notification.
//! 4. Slice names are unique; the typed handle is the only mutation path.

pub mod signal;
pub mod store;

pub use signal::{Signal, WatchGuard};
pub use store::{SliceHandle, Store};
