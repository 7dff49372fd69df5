#![forbid(unsafe_code)]

//! Shared, version-tracked value with change notification.
//!
//! [`Signal<T>`] holds a value in reference-counted shared storage.
//! Committing a different value (by `PartialEq`) bumps a version counter
//! and notifies every registered watcher in registration order. Each
//! watcher is keyed by an id minted at registration; the [`WatchGuard`]
//! returned by [`Signal::watch`] removes that entry when dropped, so
//! unsubscription takes effect immediately and [`Signal::watcher_count`]
//! is always exact.
//!
//! Signals carry a label (the store uses the slice name) so commit traces
//! can be attributed without the caller threading context through.
//!
//! # Failure Modes
//!
//! - **Re-entrant commit**: a watcher that commits back into the same
//!   signal recurses. The nested commit notifies with the nested value
//!   before the outer notification resumes over its own snapshot, so
//!   watchers can observe values out of commit order. Keep watcher graphs
//!   acyclic; a watcher that unconditionally commits will not terminate.
//! - **Guard hoarding**: a `WatchGuard` stored forever keeps its callback
//!   registered forever. Drop the guard to unsubscribe.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

struct Watcher<T> {
    id: u64,
    callback: Rc<dyn Fn(&T)>,
}

struct SignalInner<T> {
    label: Rc<str>,
    value: T,
    version: u64,
    next_watcher: u64,
    /// Registration order is notification order.
    watchers: Vec<Watcher<T>>,
}

/// A shared reactive value.
///
/// Cloning a `Signal` clones the *handle*: both handles see the same value,
/// the same version, and the same watchers.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 per value-changing commit.
/// 2. Committing a value equal to the current one is a no-op.
/// 3. Watchers run in registration order, outside the value borrow.
pub struct Signal<T> {
    inner: Rc<RefCell<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Signal")
            .field("label", &inner.label)
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("watchers", &inner.watchers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    /// New unlabeled signal at version 0 with no watchers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::labeled("anonymous", value)
    }

    /// New signal carrying a label for trace attribution.
    #[must_use]
    pub fn labeled(label: impl Into<Rc<str>>, value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                label: label.into(),
                value,
                version: 0,
                next_watcher: 0,
                watchers: Vec::new(),
            })),
        }
    }

    /// The label this signal was created with.
    #[must_use]
    pub fn label(&self) -> Rc<str> {
        Rc::clone(&self.inner.borrow().label)
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Read the current value by reference, without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Commit a new value. Notifies watchers if it differs from the
    /// current one.
    pub fn set(&self, value: T) {
        self.commit(|current| (*current != value).then_some(value));
    }

    /// Mutate a copy of the value in place. Commits (and notifies) only
    /// if the closure actually changed it.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.commit(|current| {
            let mut next = current.clone();
            f(&mut next);
            (next != *current).then_some(next)
        });
    }

    /// Watch for changes. The callback receives each newly committed value.
    ///
    /// Dropping the returned [`WatchGuard`] removes the watcher
    /// immediately; the callback is never invoked after the drop.
    pub fn watch(&self, callback: impl Fn(&T) + 'static) -> WatchGuard {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_watcher;
            inner.next_watcher += 1;
            inner.watchers.push(Watcher {
                id,
                callback: Rc::new(callback),
            });
            id
        };
        let slot: Weak<RefCell<SignalInner<T>>> = Rc::downgrade(&self.inner);
        WatchGuard {
            detach: Some(Box::new(move || {
                if let Some(inner) = slot.upgrade() {
                    inner.borrow_mut().watchers.retain(|w| w.id != id);
                }
            })),
        }
    }

    /// Version counter: +1 per value-changing commit. Handy for
    /// dirty-checking without subscribing.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Currently registered watchers.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.inner.borrow().watchers.len()
    }

    /// Single mutation path: the closure sees the current value and
    /// returns the replacement, or `None` to leave it alone.
    fn commit(&self, f: impl FnOnce(&T) -> Option<T>) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            match f(&inner.value) {
                Some(next) => {
                    inner.value = next;
                    inner.version += 1;
                    trace!(signal = %inner.label, version = inner.version, "value committed");
                    true
                }
                None => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    fn notify(&self) {
        // Snapshot callbacks and value in one borrow, then call with the
        // borrow released so callbacks may read (or commit) freely.
        let (callbacks, value) = {
            let inner = self.inner.borrow();
            let callbacks: Vec<Rc<dyn Fn(&T)>> = inner
                .watchers
                .iter()
                .map(|w| Rc::clone(&w.callback))
                .collect();
            (callbacks, inner.value.clone())
        };
        for callback in &callbacks {
            callback(&value);
        }
    }
}

/// RAII unsubscribe guard returned by [`Signal::watch`].
///
/// Dropping the guard removes the watcher entry from the signal. If the
/// signal itself is already gone the drop is a no-op.
pub struct WatchGuard {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchGuard").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn get_set() {
        let sig = Signal::new(1);
        assert_eq!(sig.get(), 1);
        assert_eq!(sig.version(), 0);

        sig.set(2);
        assert_eq!(sig.get(), 2);
        assert_eq!(sig.version(), 1);
    }

    #[test]
    fn equal_value_is_noop() {
        let sig = Signal::new("a".to_string());
        sig.set("a".to_string());
        assert_eq!(sig.version(), 0);
    }

    #[test]
    fn labels_are_carried() {
        let sig = Signal::labeled("user_prefs", 0);
        assert_eq!(&*sig.label(), "user_prefs");
        assert_eq!(&*Signal::new(0).label(), "anonymous");
    }

    #[test]
    fn with_reads_by_reference() {
        let sig = Signal::new(vec![1, 2, 3]);
        assert_eq!(sig.with(|v| v.len()), 3);
    }

    #[test]
    fn update_commits_only_on_change() {
        let sig = Signal::new(10);
        sig.update(|v| *v += 1);
        assert_eq!(sig.version(), 1);
        sig.update(|_| {});
        assert_eq!(sig.version(), 1);
    }

    #[test]
    fn watcher_sees_each_commit() {
        let sig = Signal::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _guard = sig.watch(move |v| sink.borrow_mut().push(*v));

        sig.set(1);
        sig.set(2);
        sig.set(2); // No-op.
        sig.set(3);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn guard_drop_unsubscribes_immediately() {
        let sig = Signal::new(0);
        let hits = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&hits);
        let guard = sig.watch(move |_| sink.set(sink.get() + 1));
        assert_eq!(sig.watcher_count(), 1);

        sig.set(1);
        assert_eq!(hits.get(), 1);

        drop(guard);
        assert_eq!(sig.watcher_count(), 0);
        sig.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn guard_outliving_signal_is_harmless() {
        let sig = Signal::new(0);
        let guard = sig.watch(|_| {});
        drop(sig);
        drop(guard);
    }

    #[test]
    fn watchers_run_in_registration_order() {
        let sig = Signal::new(0);
        let order = Rc::new(RefCell::new(String::new()));

        let o1 = Rc::clone(&order);
        let _g1 = sig.watch(move |_| o1.borrow_mut().push('a'));
        let o2 = Rc::clone(&order);
        let _g2 = sig.watch(move |_| o2.borrow_mut().push('b'));
        let o3 = Rc::clone(&order);
        let _g3 = sig.watch(move |_| o3.borrow_mut().push('c'));

        sig.set(1);
        assert_eq!(*order.borrow(), "abc");
    }

    #[test]
    fn clone_shares_state_and_watchers() {
        let a = Signal::new(0);
        let b = a.clone();
        let hits = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&hits);
        let _guard = a.watch(move |_| sink.set(sink.get() + 1));

        b.set(5);
        assert_eq!(a.get(), 5);
        assert_eq!(a.version(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn reentrant_commit_from_watcher_recurses() {
        let sig = Signal::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let echo = sig.clone();
        let sink = Rc::clone(&seen);
        let _guard = sig.watch(move |v| {
            sink.borrow_mut().push(*v);
            if *v == 1 {
                echo.set(2);
            }
        });

        sig.set(1);
        // The nested commit notified before the outer call returned.
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(sig.get(), 2);
        assert_eq!(sig.version(), 2);
    }

    #[test]
    fn guard_dropped_during_notification_stops_future_calls() {
        let sig = Signal::new(0);
        let hits = Rc::new(Cell::new(0u32));
        let slot: Rc<RefCell<Option<WatchGuard>>> = Rc::new(RefCell::new(None));

        let sink = Rc::clone(&hits);
        let own = Rc::clone(&slot);
        let guard = sig.watch(move |_| {
            sink.set(sink.get() + 1);
            own.borrow_mut().take(); // Unsubscribe from inside the callback.
        });
        *slot.borrow_mut() = Some(guard);

        sig.set(1);
        sig.set(2);
        assert_eq!(hits.get(), 1);
        assert_eq!(sig.watcher_count(), 0);
    }

    #[test]
    fn prefix_consistent_observation() {
        // A watcher registered from the start sees exactly the committed
        // sequence, in order, with no skips.
        let sig = Signal::new(0u32);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _guard = sig.watch(move |v| sink.borrow_mut().push(*v));

        for i in 1..=50 {
            sig.set(i);
        }
        let expected: Vec<u32> = (1..=50).collect();
        assert_eq!(*seen.borrow(), expected);
        assert_eq!(sig.version(), 50);
    }
}
