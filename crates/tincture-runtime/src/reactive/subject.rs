#![forbid(unsafe_code)]

//! Value container with synchronous change notification.
//!
//! # Design
//!
//! [`Subject<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Every [`Subject::publish`] replaces the value
//! and notifies all subscribers in registration order. Unlike a
//! change-detecting observable there is no equality gate: publishing a value
//! equal to the current one still notifies.
//!
//! # Performance
//!
//! | Operation     | Complexity                  |
//! |---------------|-----------------------------|
//! | `get()`       | O(clone of T)               |
//! | `publish()`   | O(S) where S = subscribers  |
//! | `subscribe()` | O(1) amortized              |
//! | unsubscribe   | O(S)                        |
//!
//! # Failure Modes
//!
//! - **Re-entrant publish**: calling `publish()` from within a subscriber is
//!   allowed. The nested publish notifies its own snapshot to completion
//!   before the outer loop resumes, so later subscribers of the outer loop
//!   see the nested value first and the outer value second.
//! - **Unsubscribe inside `with()`**: the closure passed to [`Subject::with`]
//!   holds a borrow; dropping a [`Subscription`] from inside it panics.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug_span;
use web_time::Instant;

type Callback<T> = Rc<dyn Fn(&T)>;

struct SubjectInner<T> {
    value: T,
    version: u64,
    next_id: u64,
    /// Registration order. Ids are unique, so the same closure may appear twice.
    subscribers: Vec<(u64, Callback<T>)>,
}

/// A shared value container with ordered, synchronous subscribers.
///
/// Cloning a `Subject` creates a new handle to the **same** container; use
/// [`Subject::ptr_eq`] to compare container identity.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each `publish`.
/// 2. Subscribers are notified in registration order.
/// 3. The set of callbacks invoked by a publish is snapshotted when the
///    publish starts: subscribers added during it are not called, and
///    subscribers removed during it are still called for that publish only.
/// 4. After [`Subscription::unsubscribe`] returns (outside a publish), the
///    callback is never invoked again.
pub struct Subject<T> {
    inner: Rc<RefCell<SubjectInner<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Subject")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T> Subject<T> {
    /// Whether two handles refer to the same container.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of live registrations.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Number of publishes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }
}

impl<T: Clone + 'static> Subject<T> {
    /// Create a container seeded with `value`. Version 0, no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SubjectInner {
                value,
                version: 0,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// A clone of the latest published value (or the seed).
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Replace the current value and notify every subscriber registered at
    /// this moment, in registration order.
    pub fn publish(&self, value: T) {
        let (callbacks, version) = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
            let snapshot: Vec<Callback<T>> = inner
                .subscribers
                .iter()
                .map(|(_, cb)| Rc::clone(cb))
                .collect();
            (snapshot, inner.version)
        };

        if callbacks.is_empty() {
            return;
        }

        let value = self.get();
        let started = Instant::now();
        let span = debug_span!(
            "ambient.publish",
            version,
            subscribers = callbacks.len() as u64,
            duration_us = tracing::field::Empty
        );
        let _entered = span.enter();

        for cb in &callbacks {
            cb(&value);
        }

        span.record("duration_us", started.elapsed().as_micros() as u64);
    }

    /// Register `callback` for every subsequent publish.
    ///
    /// Returns a [`Subscription`] that removes exactly this registration
    /// when [`Subscription::unsubscribe`] is called or when it is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::new(callback)));
            id
        };
        let weak: Weak<RefCell<SubjectInner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }
}

/// Single-use removal capability for one [`Subject`] registration.
///
/// Dropping the `Subscription` unsubscribes. Calling
/// [`unsubscribe`](Self::unsubscribe) more than once is a no-op.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the registration. Subsequent calls do nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Whether [`unsubscribe`](Self::unsubscribe) has not run yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
