use std::collections::HashMap;

use tracing::trace;

use crate::value::Value;

/// The variables of one session. There is a single, flat scope.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    store: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            store: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.store.get(name)
    }

    /// Bind or rebind `name`, returning the previous value if there was one.
    pub fn set(&mut self, name: String, value: Value) -> Option<Value> {
        trace!(%name, %value, "binding variable");
        self.store.insert(name, value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// All bindings, sorted by name.
    pub fn bindings(&self) -> Vec<(&str, &Value)> {
        let mut bindings: Vec<(&str, &Value)> = self
            .store
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        bindings.sort_by(|(a, _), (b, _)| a.cmp(b));
        bindings
    }
}
