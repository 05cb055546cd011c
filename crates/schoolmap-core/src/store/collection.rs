// ── Generic keyed entity collection ──
//
// Ordered storage with O(1) lookups and push-based change notification.
// Load order is preserved in the snapshot because the visibility filter
// emits markers in store order.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A concurrent collection for a single entity type.
///
/// `DashMap` gives O(1) lookups by key; the `watch` channel holds an
/// ordered snapshot that subscribers receive on every replacement.
pub(crate) struct EntityCollection<T: Send + Sync + 'static> {
    by_key: DashMap<String, Arc<T>>,

    /// Full snapshot in insertion order.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_key: DashMap::new(),
            snapshot,
        }
    }

    /// Replace the whole contents with `entities`, keyed by `key_of`.
    ///
    /// A later entity with an already-seen key replaces the earlier one in
    /// the index but keeps the earlier slot in the snapshot order. Returns
    /// the number of distinct keys.
    pub(crate) fn replace_all<F>(&self, entities: Vec<T>, key_of: F) -> usize
    where
        F: Fn(&T) -> String,
    {
        self.by_key.clear();
        let mut slots: HashMap<String, usize> = HashMap::with_capacity(entities.len());
        let mut values: Vec<Arc<T>> = Vec::with_capacity(entities.len());
        for entity in entities {
            let key = key_of(&entity);
            let entity = Arc::new(entity);
            if let Some(&slot) = slots.get(&key) {
                values[slot] = Arc::clone(&entity);
            } else {
                slots.insert(key.clone(), values.len());
                values.push(Arc::clone(&entity));
            }
            self.by_key.insert(key, entity);
        }

        let len = values.len();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        len
    }

    /// Look up an entity by its key.
    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot replacements.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
