//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use tcommon::{Registry, RunId};
//!
//! let run = RunId::new("run-1");
//! let mut registry = Registry::new();
//! registry.insert("add".to_string(), 2_u32);
//!
//! assert_eq!(run.as_str(), "run-1");
//! assert_eq!(registry.get("add"), Some(&2));
//! ```

pub mod context {
    //! Cross-crate identifier newtypes.
    //!
    //! ```rust
    //! use tcommon::RunId;
    //!
    //! let first = RunId::next();
    //! let second = RunId::next();
    //! assert_ne!(first, second);
    //! assert!(first.as_str().starts_with("run-"));
    //! ```

    use std::fmt::{Display, Formatter};
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_RUN: AtomicU64 = AtomicU64::new(1);

    /// Correlates every hook callback and log event emitted by one orchestrator run.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct RunId(String);

    impl RunId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        /// Allocates a process-unique id of the form `run-{n}`.
        pub fn next() -> Self {
            let value = NEXT_RUN.fetch_add(1, Ordering::Relaxed);
            Self(format!("run-{value}"))
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for RunId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for RunId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for RunId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod registry {
    //! Insertion-ordered registry map used by runtime registries.
    //!
    //! Re-inserting an existing key replaces the value but keeps the key's
    //! original position, so listings stay stable across overwrites.
    //!
    //! ```rust
    //! use tcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("beta".to_string(), 1_u32);
    //! registry.insert("alpha".to_string(), 2_u32);
    //! registry.insert("beta".to_string(), 3_u32);
    //!
    //! let keys: Vec<&String> = registry.keys().collect();
    //! assert_eq!(keys, ["beta", "alpha"]);
    //! assert_eq!(registry.get("beta"), Some(&3));
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        order: Vec<K>,
        items: HashMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                order: Vec::new(),
                items: HashMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash + Clone,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            if !self.items.contains_key(&key) {
                self.order.push(key.clone());
            }

            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.get(key)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            let removed = self.items.remove(key)?;
            self.order
                .retain(|existing| <K as Borrow<Q>>::borrow(existing) != key);
            Some(removed)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.order.iter()
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.order.iter().filter_map(|key| self.items.get(key))
        }

        pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
            self.order
                .iter()
                .filter_map(|key| self.items.get(key).map(|value| (key, value)))
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub use context::RunId;
pub use registry::Registry;
