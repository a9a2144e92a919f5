//! The node registry: a per-process catalog of node types, constructed once
//! at startup. No global state — callers own their `NodeRegistry` and pass
//! it through explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use flux_core::Key;

use crate::descriptor::NodeDescriptor;
use crate::error::NodeError;
use crate::node::{Node, NodeFactory};

#[derive(Default)]
pub struct NodeRegistry {
    factories: HashMap<Key, Arc<dyn NodeFactory>>,
}

impl NodeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node type. Replaces any existing factory for the same
    /// key, mirroring how a process reloading its node catalog would
    /// behave.
    pub fn register(&mut self, factory: Arc<dyn NodeFactory>) {
        let key = factory.descriptor().type_key.clone();
        self.factories.insert(key, factory);
    }

    #[must_use]
    pub fn descriptor(&self, type_key: &str) -> Option<&NodeDescriptor> {
        self.factories.get_key(type_key).map(|factory| factory.descriptor())
    }

    /// Instantiates a fresh node for `type_key`.
    pub fn create(&self, type_key: &str) -> Result<Arc<dyn Node>, NodeError> {
        self.factories
            .get_key(type_key)
            .map(|factory| factory.create())
            .ok_or_else(|| NodeError::UnknownType {
                type_key: type_key.to_string(),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Looking a `Key`-keyed map up by `&str` without allocating a `Key` (and
/// without re-running its validation) just to do a lookup.
trait KeyMapExt<V> {
    fn get_key(&self, type_key: &str) -> Option<&V>;
}

impl<V> KeyMapExt<V> for HashMap<Key, V> {
    fn get_key(&self, type_key: &str) -> Option<&V> {
        self.iter()
            .find(|(key, _)| key.as_str() == type_key)
            .map(|(_, value)| value)
    }
}
