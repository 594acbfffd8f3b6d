use crate::error::Error;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Snapshot callback: receives the full record set on every change
pub type SnapshotFn<T> = Box<dyn Fn(&[T]) + Send + Sync>;

/// Error callback for failures raised on the subscription itself
pub type ErrorFn = Box<dyn Fn(&Error) + Send + Sync>;

struct Handler<T> {
    on_snapshot: SnapshotFn<T>,
    on_error: ErrorFn,
}

type HandlerMap<T> = Mutex<HashMap<u64, Arc<Handler<T>>>>;

/// Event emitter delivering whole snapshots to long-lived subscribers
///
/// Consumers replace their entire view on each delivery; there is no
/// incremental patching and no ordering guarantee beyond "last snapshot
/// wins". The emitter is decoupled from any specific transport.
pub struct Publisher<T> {
    handlers: Arc<HandlerMap<T>>,
    next_id: AtomicU64,
}

impl<T: 'static> Publisher<T> {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a subscriber; dropping the returned guard unsubscribes
    pub fn subscribe(&self, on_snapshot: SnapshotFn<T>, on_error: ErrorFn) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.lock().unwrap().insert(
            id,
            Arc::new(Handler {
                on_snapshot,
                on_error,
            }),
        );

        let handlers: Weak<HandlerMap<T>> = Arc::downgrade(&self.handlers);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(handlers) = handlers.upgrade() {
                    handlers.lock().unwrap().remove(&id);
                }
            })),
        }
    }

    /// Deliver a snapshot to every subscriber
    ///
    /// Handlers are cloned out before invocation so a callback may call back
    /// into the publishing store without deadlocking.
    pub fn publish(&self, snapshot: &[T]) {
        let handlers: Vec<Arc<Handler<T>>> =
            self.handlers.lock().unwrap().values().cloned().collect();
        for handler in handlers {
            (handler.on_snapshot)(snapshot);
        }
    }

    /// Raise an error on every subscriber
    pub fn publish_error(&self, error: &Error) {
        let handlers: Vec<Arc<Handler<T>>> =
            self.handlers.lock().unwrap().values().cloned().collect();
        for handler in handlers {
            (handler.on_error)(error);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }
}

impl<T: 'static> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for an active subscription; unsubscribes when dropped
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Explicitly cancel the subscription (equivalent to dropping it)
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
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

    fn counting_subscriber(
        publisher: &Publisher<u32>,
        seen: Arc<Mutex<Vec<Vec<u32>>>>,
    ) -> Subscription {
        publisher.subscribe(
            Box::new(move |snapshot| seen.lock().unwrap().push(snapshot.to_vec())),
            Box::new(|_| {}),
        )
    }

    #[test]
    fn test_subscribers_receive_full_snapshots() {
        let publisher: Publisher<u32> = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = counting_subscriber(&publisher, Arc::clone(&seen));

        publisher.publish(&[1, 2]);
        publisher.publish(&[1, 2, 3]);

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![vec![1, 2], vec![1, 2, 3]]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let publisher: Publisher<u32> = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let _sub = counting_subscriber(&publisher, Arc::clone(&seen));
            assert_eq!(publisher.subscriber_count(), 1);
        }
        assert_eq!(publisher.subscriber_count(), 0);

        publisher.publish(&[9]);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_errors_reach_error_handler() {
        let publisher: Publisher<u32> = Publisher::new();
        let errors = Arc::new(AtomicUsize::new(0));
        let errors_inner = Arc::clone(&errors);

        let _sub = publisher.subscribe(
            Box::new(|_| {}),
            Box::new(move |_| {
                errors_inner.fetch_add(1, Ordering::SeqCst);
            }),
        );

        publisher.publish_error(&Error::persistence("write rejected"));
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }
}
