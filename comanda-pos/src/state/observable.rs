//! Observable state
//!
//! A value plus listeners. `set` stores the value and then calls every live
//! listener outside the locks, so a listener may read the observable or
//! drop its own subscription. A new subscriber is called immediately with
//! the current value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    next_id: AtomicU64,
}

pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.read())
            .field("listeners", &self.inner.listeners.lock().len())
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Borrow the current value without cloning
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    /// Store a value and notify listeners
    pub fn set(&self, value: T) {
        *self.inner.value.write() = value.clone();
        self.notify(&value);
    }

    /// Mutate in place and notify listeners
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let value = {
            let mut guard = self.inner.value.write();
            f(&mut guard);
            guard.clone()
        };
        self.notify(&value);
    }

    /// Store a value and return the previous one in a single step
    pub fn replace(&self, value: T) -> T {
        let previous = std::mem::replace(&mut *self.inner.value.write(), value.clone());
        self.notify(&value);
        previous
    }

    fn notify(&self, value: &T) {
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(value);
        }
    }

    /// Register a listener; it is called right away with the current value
    ///
    /// The listener stays registered until the returned `Subscription` is
    /// dropped or unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener<T> = Arc::new(listener);
        self.inner.listeners.lock().push((id, Arc::clone(&listener)));

        let current = self.get();
        listener(&current);

        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.listeners.lock().retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

/// Handle returned by [`Observable::subscribe`]
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the listener registered for the observable's whole lifetime
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_set_notifies_every_subscriber() {
        let obs = Observable::new(0);
        let seen_a = Arc::new(Mutex::new(Vec::new()));
        let seen_b = Arc::new(Mutex::new(Vec::new()));

        let a = seen_a.clone();
        let _sub_a = obs.subscribe(move |v| a.lock().push(*v));
        let b = seen_b.clone();
        let _sub_b = obs.subscribe(move |v| b.lock().push(*v));

        obs.set(1);
        obs.set(2);
        assert_eq!(*seen_a.lock(), vec![0, 1, 2]);
        assert_eq!(*seen_b.lock(), vec![0, 1, 2]);
        assert_eq!(obs.get(), 2);
    }

    #[test]
    fn test_dropped_subscription_is_not_called() {
        let obs = Observable::new(String::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        let sub = obs.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        obs.set("a".into());
        drop(sub);
        obs.set("b".into());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(obs.listener_count(), 0);
    }

    #[test]
    fn test_explicit_unsubscribe_and_detach() {
        let obs = Observable::new(0u32);
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        obs.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .unsubscribe();
        obs.set(5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let c = calls.clone();
        obs.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .detach();
        obs.set(6);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(obs.listener_count(), 1);
    }

    #[test]
    fn test_listener_can_read_observable() {
        let obs = Observable::new(1);
        let reader = obs.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let _sub = obs.subscribe(move |v| s.lock().push((*v, reader.get())));
        obs.update(|v| *v += 1);
        assert_eq!(*seen.lock(), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_replace_hands_out_previous_once() {
        let obs = Observable::new(false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let _sub = obs.subscribe(move |v| s.lock().push(*v));

        assert!(!obs.replace(true));
        assert!(obs.replace(true));
        assert!(obs.get());
        assert_eq!(*seen.lock(), vec![false, true, true]);
    }
}
