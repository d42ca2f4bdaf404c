//! Callback and channel based change notification shared by the state holders.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;
use tokio::sync::broadcast;

/// Handle returned by [`Notifier::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub struct Notifier<T> {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Listener<T>)>>,
    event_tx: broadcast::Sender<T>,
    /// Values notified from inside a callback, per dispatching thread.
    deferred: Mutex<HashMap<ThreadId, VecDeque<T>>>,
}

impl<T: Clone + Send + 'static> Notifier<T> {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
            event_tx,
            deferred: Mutex::new(HashMap::new()),
        }
    }

    /// Register a callback invoked synchronously on every notification.
    pub fn subscribe<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(f)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Channel view for async consumers. Lagging receivers lose old values.
    pub fn stream(&self) -> broadcast::Receiver<T> {
        self.event_tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver `value` to every callback, then to stream receivers.
    ///
    /// A `notify` issued from inside a callback on the same thread is queued
    /// and delivered after the current value has reached everyone, so all
    /// observers see values in the order they were notified.
    pub fn notify(&self, value: &T) {
        let thread = std::thread::current().id();
        {
            let mut deferred = self.deferred.lock();
            if let Some(queue) = deferred.get_mut(&thread) {
                queue.push_back(value.clone());
                return;
            }
            deferred.insert(thread, VecDeque::new());
        }

        let _dispatching = Dispatching {
            deferred: &self.deferred,
            thread,
        };
        self.deliver(value);
        loop {
            let next = self
                .deferred
                .lock()
                .get_mut(&thread)
                .and_then(VecDeque::pop_front);
            match next {
                Some(value) => self.deliver(&value),
                None => break,
            }
        }
    }

    fn deliver(&self, value: &T) {
        // Listeners may re-enter the owning state holder, so call them unlocked.
        let listeners: Vec<Listener<T>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(value);
        }

        let _ = self.event_tx.send(value.clone());
    }
}

/// Ends a dispatch round even if a callback panics.
struct Dispatching<'a, T> {
    deferred: &'a Mutex<HashMap<ThreadId, VecDeque<T>>>,
    thread: ThreadId,
}

impl<T> Drop for Dispatching<'_, T> {
    fn drop(&mut self) {
        self.deferred.lock().remove(&self.thread);
    }
}

impl<T: Clone + Send + 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callbacks_run_in_subscription_order() {
        let notifier = Notifier::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let a = Arc::clone(&seen);
        notifier.subscribe(move |v| a.lock().push(format!("a{v}")));
        let b = Arc::clone(&seen);
        notifier.subscribe(move |v| b.lock().push(format!("b{v}")));

        notifier.notify(&1);
        notifier.notify(&2);

        assert_eq!(*seen.lock(), vec!["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let notifier = Notifier::<u32>::new();
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let id = notifier.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        notifier.notify(&1);
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(&2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_subscribe_reentrantly() {
        let notifier = Arc::new(Notifier::<u32>::new());
        let inner = Arc::clone(&notifier);
        notifier.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        notifier.notify(&1);
        assert_eq!(notifier.listener_count(), 2);
    }

    #[tokio::test]
    async fn test_nested_notify_keeps_delivery_order() {
        let notifier = Arc::new(Notifier::<u32>::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut rx = notifier.stream();

        let inner = Arc::clone(&notifier);
        let a = Arc::clone(&seen);
        notifier.subscribe(move |v| {
            a.lock().push(format!("a{v}"));
            if *v == 1 {
                inner.notify(&2);
            }
        });
        let b = Arc::clone(&seen);
        notifier.subscribe(move |v| b.lock().push(format!("b{v}")));

        notifier.notify(&1);

        assert_eq!(*seen.lock(), vec!["a1", "b1", "a2", "b2"]);
        assert_eq!(rx.recv().await.unwrap(), 1);
        assert_eq!(rx.recv().await.unwrap(), 2);

        notifier.notify(&3);
        assert_eq!(seen.lock().len(), 6);
    }

    #[tokio::test]
    async fn test_stream_receives_notifications() {
        let notifier = Notifier::<&'static str>::new();
        let mut rx = notifier.stream();
        notifier.notify(&"hello");
        assert_eq!(rx.recv().await.unwrap(), "hello");
    }
}
