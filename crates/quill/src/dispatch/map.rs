//! Map type
use super::*;
use std::collections::HashMap;

/// Map from command roots to the output-side handlers of one backend.
///
/// This is distinct from the parse-time [command map](crate::command::Map):
///     each backend builds its own dispatch map containing the commands it supports.
pub struct Map<S> {
    handlers: HashMap<String, Handler<S>>,
}

impl<S> Default for Map<S> {
    fn default() -> Self {
        Map {
            handlers: HashMap::new(),
        }
    }
}

impl<S> Map<S> {
    pub fn new() -> Map<S> {
        Default::default()
    }

    /// Adds a handler, replacing any previous handler for the root.
    pub fn insert<T: Into<String>, H: Into<Handler<S>>>(&mut self, root: T, handler: H) {
        self.handlers.insert(root.into(), handler.into());
    }

    #[inline]
    pub fn get(&self, root: &str) -> Option<&Handler<S>> {
        self.handlers.get(root)
    }

    pub fn contains(&self, root: &str) -> bool {
        self.handlers.contains_key(root)
    }

    /// Returns the roots in the map, sorted.
    pub fn roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        roots.sort();
        roots
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<S> From<HashMap<&str, Handler<S>>> for Map<S> {
    fn from(handlers: HashMap<&str, Handler<S>>) -> Self {
        Map {
            handlers: handlers
                .into_iter()
                .map(|(root, handler)| (root.to_string(), handler))
                .collect(),
        }
    }
}

impl<S> FromIterator<(&'static str, Handler<S>)> for Map<S> {
    fn from_iter<I: IntoIterator<Item = (&'static str, Handler<S>)>>(iter: I) -> Self {
        Map {
            handlers: iter
                .into_iter()
                .map(|(root, handler)| (root.to_string(), handler))
                .collect(),
        }
    }
}
