//! Ordered observer registration with per-observer handles
//!
//! Each registration returns an [`ObserverId`] so an observer can be removed
//! independently of the decoder's lifetime. Callbacks carry no payload;
//! they are expected to pull the current snapshot themselves.

use std::sync::Mutex;

use tracing::debug;

/// Handle identifying one registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn Fn() + Send>;

/// Ordered set of notification callbacks.
///
/// Invocation order is registration order. Registering the same callback
/// twice yields two invocations per notification. Callbacks must not
/// register or unregister observers from within a notification; the set is
/// locked for the duration of `notify_all`.
pub(crate) struct ObserverSet {
    inner: Mutex<Inner>,
}

struct Inner {
    next_id: u64,
    entries: Vec<(ObserverId, Callback)>,
}

impl ObserverSet {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Append a callback; returns its removal handle
    pub(crate) fn register(&self, callback: Callback) -> ObserverId {
        let mut inner = self.inner.lock().unwrap();
        let id = ObserverId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push((id, callback));
        debug!(id = id.0, count = inner.entries.len(), "observer registered");
        id
    }

    /// Remove the observer registered under `id`; returns whether it existed
    pub(crate) fn unregister(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.entries.len();
        inner.entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = inner.entries.len() != before;
        if removed {
            debug!(id = id.0, count = inner.entries.len(), "observer unregistered");
        }
        removed
    }

    /// Number of registered observers
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    /// Invoke every callback, in registration order
    pub(crate) fn notify_all(&self) {
        let inner = self.inner.lock().unwrap();
        for (_, callback) in &inner.entries {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_in_registration_order() {
        let set = ObserverSet::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..3 {
            let log = Arc::clone(&log);
            set.register(Box::new(move || log.lock().unwrap().push(tag)));
        }

        set.notify_all();
        set.notify_all();
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_unregister() {
        let set = ObserverSet::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_cb = Arc::clone(&hits);
        let id = set.register(Box::new(move || {
            hits_cb.fetch_add(1, Ordering::Relaxed);
        }));
        assert_eq!(set.len(), 1);

        set.notify_all();
        assert!(set.unregister(id));
        assert!(!set.unregister(id));
        set.notify_all();

        assert_eq!(hits.load(Ordering::Relaxed), 1);
        assert_eq!(set.len(), 0);
    }
}
