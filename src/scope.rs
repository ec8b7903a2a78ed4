//! the environment record: name bindings, passed around explicitly

use std::collections::HashMap;

use crate::value::Value;

#[derive(PartialEq, Debug, Clone, Default)]
pub struct Namespace {
    bindings: HashMap<String, Value>,
}

impl Namespace {
    pub fn new() -> Namespace {
        Namespace::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Copy every binding of `other` in, key by key; on a shared key
    /// `other`'s value wins (last-write-wins overwrite, not a merge).
    pub fn absorb(&mut self, other: &Namespace) {
        for (name, value) in &other.bindings {
            self.bindings.insert(name.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.bindings.iter()
    }
}

impl FromIterator<(String, Value)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Namespace {
        Namespace {
            bindings: iter.into_iter().collect(),
        }
    }
}
