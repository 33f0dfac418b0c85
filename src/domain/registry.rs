//! Insertion-ordered, uniquely keyed child registry
//!
//! Every parent → children link of the entity tree (scope → roaming
//! networks, network → operators, operator → pools, ...) is one of these.
//! A single `RwLock` per registry keeps readers parallel and gives them a
//! consistent snapshot in creation order.
//!
//! Removing a child detaches its whole subtree while the parent's write
//! lock is held: every registry below is closed, so a creation racing with
//! the removal either lands before it (and is removed with the subtree) or
//! is refused.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use crate::support::errors::DomainError;

struct Inner<K, V> {
    next_seq: u64,
    closed: bool,
    by_key: HashMap<K, u64>,
    ordered: BTreeMap<u64, (K, Arc<V>)>,
}

/// Why `insert_new` refused a child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// The key is already taken
    Taken,
    /// The owner of this registry was removed
    Detached,
}

impl Refusal {
    pub fn into_error(self, taken: &str, detached: &str) -> DomainError {
        match self {
            Self::Taken => DomainError::conflict(taken),
            Self::Detached => DomainError::not_found(detached),
        }
    }
}

/// Entities owning registries of their own
pub trait Detach {
    /// Close every registry below `self`, recursively.
    fn detach(&self);
}

pub struct OrderedRegistry<K, V> {
    inner: RwLock<Inner<K, V>>,
}

impl<K, V> OrderedRegistry<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_seq: 0,
                closed: false,
                by_key: HashMap::new(),
                ordered: BTreeMap::new(),
            }),
        }
    }

    /// Link a new child under `key`. `build` is not called when the key is
    /// taken or the registry is closed.
    pub fn insert_new(&self, key: K, build: impl FnOnce() -> V) -> Result<Arc<V>, Refusal> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.closed {
            return Err(Refusal::Detached);
        }
        if inner.by_key.contains_key(&key) {
            return Err(Refusal::Taken);
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let value = Arc::new(build());
        inner.by_key.insert(key.clone(), seq);
        inner.ordered.insert(seq, (key, Arc::clone(&value)));
        Ok(value)
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let seq = inner.by_key.get(key)?;
        inner.ordered.get(seq).map(|(_, v)| Arc::clone(v))
    }

    /// Unlink the child under `key`, detaching its subtree first.
    pub fn remove(&self, key: &K) -> Option<Arc<V>>
    where
        V: Detach,
    {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let seq = *inner.by_key.get(key)?;
        if let Some((_, child)) = inner.ordered.get(&seq) {
            child.detach();
        }
        inner.by_key.remove(key);
        inner.ordered.remove(&seq).map(|(_, v)| v)
    }

    /// Refuse all further insertions. Returns the children at closing time.
    pub fn close(&self) -> Vec<Arc<V>> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.closed = true;
        inner.ordered.values().map(|(_, v)| Arc::clone(v)).collect()
    }

    /// Close this registry and detach every child.
    pub fn detach_all(&self)
    where
        V: Detach,
    {
        for child in self.close() {
            child.detach();
        }
    }

    /// All children in creation order
    pub fn values(&self) -> Vec<Arc<V>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ordered
            .values()
            .map(|(_, v)| Arc::clone(v))
            .collect()
    }

    /// Children whose key matches `predicate`, in creation order
    pub fn values_where(&self, predicate: impl Fn(&K) -> bool) -> Vec<Arc<V>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ordered
            .values()
            .filter(|(k, _)| predicate(k))
            .map(|(_, v)| Arc::clone(v))
            .collect()
    }

    pub fn keys(&self) -> Vec<K> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ordered
            .values()
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).by_key.len()
    }
}

impl<K: Eq + Hash + Clone, V> Default for OrderedRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for OrderedRegistry<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.inner.read().unwrap_or_else(PoisonError::into_inner).by_key.len();
        f.debug_struct("OrderedRegistry").field("len", &len).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Default)]
    struct Node {
        detached: AtomicBool,
        children: OrderedRegistry<u32, Node>,
    }

    impl Detach for Node {
        fn detach(&self) {
            self.detached.store(true, Ordering::SeqCst);
            self.children.detach_all();
        }
    }

    impl Detach for String {
        fn detach(&self) {}
    }

    impl Detach for i32 {
        fn detach(&self) {}
    }

    #[test]
    fn keeps_creation_order() {
        let registry = OrderedRegistry::new();
        for key in ["c", "a", "b"] {
            registry.insert_new(key, || key.to_uppercase()).unwrap();
        }
        let values: Vec<String> = registry.values().iter().map(|v| v.to_string()).collect();
        assert_eq!(values, vec!["C", "A", "B"]);
    }

    #[test]
    fn duplicate_key_is_refused_without_building() {
        let registry = OrderedRegistry::new();
        registry.insert_new(1, || "first".to_string()).unwrap();
        let second = registry.insert_new(1, || panic!("must not build"));
        assert_eq!(second.unwrap_err(), Refusal::Taken);
        assert_eq!(*registry.get(&1).unwrap(), "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_then_reinsert_moves_to_end() {
        let registry = OrderedRegistry::new();
        registry.insert_new("a", || 1).unwrap();
        registry.insert_new("b", || 2).unwrap();
        assert_eq!(registry.remove(&"a").map(|v| *v), Some(1));
        registry.insert_new("a", || 3).unwrap();
        assert_eq!(registry.keys(), vec!["b", "a"]);
    }

    #[test]
    fn removing_a_child_closes_its_subtree() {
        let root: OrderedRegistry<u32, Node> = OrderedRegistry::new();
        let child = root.insert_new(1, Node::default).unwrap();
        let grandchild = child.children.insert_new(10, Node::default).unwrap();

        let removed = root.remove(&1).unwrap();
        assert!(removed.detached.load(Ordering::SeqCst));
        assert!(grandchild.detached.load(Ordering::SeqCst));

        // Handles taken before the removal can no longer link anything
        assert_eq!(child.children.insert_new(11, Node::default).unwrap_err(), Refusal::Detached);
        assert_eq!(
            grandchild.children.insert_new(100, Node::default).unwrap_err(),
            Refusal::Detached
        );
        assert_eq!(root.len(), 0);
    }

    #[test]
    fn refusal_maps_to_domain_errors() {
        assert!(matches!(
            Refusal::Taken.into_error("taken", "gone"),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            Refusal::Detached.into_error("taken", "gone"),
            DomainError::NotFound(_)
        ));
    }
}
