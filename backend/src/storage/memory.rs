//! In-memory implementation of [`RealtimeStore`].
//!
//! Holds the whole path-addressed tree as one JSON object behind a mutex
//! and fans writes out to registered listeners. Used by the test suites
//! and by embedders that want a working backend without a live store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::debug;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::traits::{RealtimeStore, StoreError, Subscription, WatchCallback};

struct Listener {
    path: String,
    callback: WatchCallback,
}

struct Inner {
    root: Mutex<Value>,
    listeners: Mutex<HashMap<u64, Arc<Listener>>>,
    next_listener_id: AtomicU64,
}

/// Thread-safe in-memory realtime store.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                root: Mutex::new(Value::Object(Map::new())),
                listeners: Mutex::new(HashMap::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    fn segments(path: &str) -> Vec<&str> {
        path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Two paths are related when one is the other (or an ancestor of the
    /// other) at a segment boundary. A write anywhere in a subtree must
    /// re-fire listeners both above and below the written path.
    fn paths_related(a: &str, b: &str) -> bool {
        let a = Self::segments(a);
        let b = Self::segments(b);
        let shorter = a.len().min(b.len());
        a[..shorter] == b[..shorter]
    }

    fn value_at<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
        let mut current = root;
        for segment in Self::segments(path) {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    fn apply_write(root: &mut Value, path: &str, value: Option<Value>) {
        let segments = Self::segments(path);
        if segments.is_empty() {
            *root = value.unwrap_or(Value::Object(Map::new()));
            return;
        }

        let mut current = root;
        for segment in &segments[..segments.len() - 1] {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            let map = current.as_object_mut().expect("just ensured object");
            current = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let map = current.as_object_mut().expect("just ensured object");
        let leaf = segments[segments.len() - 1];
        match value {
            Some(value) => {
                map.insert(leaf.to_string(), value);
            }
            None => {
                map.remove(leaf);
            }
        }
    }

    /// Snapshot every listener affected by a write at `path`, together with
    /// the value now visible at its subscribed path.
    fn affected_listeners(&self, path: &str) -> Vec<(Arc<Listener>, Option<Value>)> {
        let root = self.inner.root.lock().expect("store mutex poisoned");
        let listeners = self.inner.listeners.lock().expect("store mutex poisoned");
        listeners
            .values()
            .filter(|listener| Self::paths_related(&listener.path, path))
            .map(|listener| {
                let value = Self::value_at(&root, &listener.path).cloned();
                (listener.clone(), value)
            })
            .collect()
    }
}

impl RealtimeStore for MemoryStore {
    fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let root = self.inner.root.lock().expect("store mutex poisoned");
        Ok(Self::value_at(&root, path).cloned())
    }

    fn write(&self, path: &str, value: Option<Value>) -> Result<(), StoreError> {
        {
            let mut root = self.inner.root.lock().expect("store mutex poisoned");
            Self::apply_write(&mut root, path, value);
        }

        // Callbacks run outside both locks so a listener may call back
        // into the store without deadlocking.
        for (listener, value) in self.affected_listeners(path) {
            (listener.callback)(value);
        }
        Ok(())
    }

    fn subscribe(&self, path: &str, callback: WatchCallback) -> Result<Subscription, StoreError> {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let listener = Arc::new(Listener {
            path: path.to_string(),
            callback,
        });

        self.inner
            .listeners
            .lock()
            .expect("store mutex poisoned")
            .insert(id, listener.clone());
        debug!("Registered listener {} at '{}'", id, path);

        let initial = {
            let root = self.inner.root.lock().expect("store mutex poisoned");
            Self::value_at(&root, path).cloned()
        };

        // First fire happens synchronously with the current value.
        (listener.callback)(initial);

        let inner = self.inner.clone();
        Ok(Subscription::new(move || {
            inner
                .listeners
                .lock()
                .expect("store mutex poisoned")
                .remove(&id);
            debug!("Removed listener {}", id);
        }))
    }

    fn generate_child_key(&self, parent_path: &str) -> String {
        let key = Uuid::new_v4().simple().to_string();
        debug!("Generated child key '{}' under '{}'", key, parent_path);
        key
    }
}
