use std::sync::Arc;

use dashmap::DashMap;

/// Marker trait for anything broadcast through an [`EventEmitter`].
///
/// Implementors must be cloneable through a trait object (`box_clone`) and
/// support downcasting on the receiving end (`as_any`), since subscribers
/// only see `&Box<dyn Event>` and narrow it themselves.
pub trait Event: std::fmt::Debug + Send + Sync {
    fn box_clone(&self) -> Box<dyn Event>;
    fn as_any(&self) -> &dyn std::any::Any;
}

impl Clone for Box<dyn Event> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

type Callback = Arc<dyn Fn(&Box<dyn Event>) + Send + Sync>;

/// Simple named pub/sub bus. Callbacks run synchronously on the emitting
/// task, in subscription order.
#[derive(Clone)]
pub struct EventEmitter {
    subscribers: Arc<DashMap<String, Vec<Callback>>>,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(DashMap::new()),
        }
    }

    pub fn subscribe<F>(&self, event_name: &str, callback: F)
    where
        F: Fn(&Box<dyn Event>) + Send + Sync + 'static,
    {
        self.subscribers
            .entry(event_name.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    pub fn emit(&self, event_name: &str, event: Box<dyn Event>) {
        if let Some(callbacks) = self.subscribers.get(event_name) {
            for callback in callbacks.iter() {
                callback(&event);
            }
        }
    }

    pub fn unsubscribe_all(&self, event_name: &str) {
        self.subscribers.remove(event_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Debug, Clone)]
    struct Tick(u64);

    impl Event for Tick {
        fn box_clone(&self) -> Box<dyn Event> {
            Box::new(self.clone())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn delivers_to_subscribers_by_name() {
        let emitter = EventEmitter::new();
        let seen = Arc::new(AtomicU64::new(0));

        let seen_clone = seen.clone();
        emitter.subscribe("tick", move |event| {
            if let Some(tick) = event.as_any().downcast_ref::<Tick>() {
                seen_clone.store(tick.0, Ordering::SeqCst);
            }
        });

        emitter.emit("tick", Box::new(Tick(42)));
        assert_eq!(seen.load(Ordering::SeqCst), 42);

        // different topic, no subscriber, must not panic
        emitter.emit("other", Box::new(Tick(7)));
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn unsubscribe_all_clears_topic() {
        let emitter = EventEmitter::new();
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = seen.clone();
        emitter.subscribe("tick", move |event| {
            if let Some(tick) = event.as_any().downcast_ref::<Tick>() {
                seen_clone.store(tick.0, Ordering::SeqCst);
            }
        });
        emitter.unsubscribe_all("tick");
        emitter.emit("tick", Box::new(Tick(99)));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }
}
