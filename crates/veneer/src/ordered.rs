//! Insertion-ordered style maps with deep-merge semantics.
//!
//! CSS declaration order is significant, so style definitions are held in
//! a map that remembers first-insertion order. Setting a key whose value
//! is a nested mapping merges it into the existing nested value instead of
//! replacing it — this is how several style objects applied to the same
//! selector compose their `:hover` (and similar) blocks.

use std::collections::HashMap;

use crate::value::StyleValue;

/// An insertion-ordered mapping from style key to [`StyleValue`].
///
/// Iteration always follows key order, never hash order. A key stays at
/// its first-insertion position unless a `set` call explicitly asks for
/// reordering, which moves it to the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedMap {
    elements: HashMap<String, StyleValue>,
    key_order: Vec<String>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.key_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_order.is_empty()
    }

    /// Sets `key` to `value`.
    ///
    /// New keys append to the key order. If `reorder` is true an existing
    /// key moves to the end, otherwise it keeps its position. Mapping
    /// values deep-merge into the existing nested mapping at `key`
    /// (creating one if absent) with the same `reorder` flag; any other
    /// value replaces what was there.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>, reorder: bool) {
        let key = key.into();
        let value = value.into();

        if !self.elements.contains_key(&key) {
            self.key_order.push(key.clone());
        } else if reorder {
            if let Some(index) = self.key_order.iter().position(|k| *k == key) {
                self.key_order.remove(index);
            }
            self.key_order.push(key.clone());
        }

        match value {
            StyleValue::Mapping(incoming) => {
                // Recurse so nested blocks merge instead of clobbering.
                let mut nested = match self.elements.remove(&key) {
                    Some(StyleValue::Mapping(existing)) => existing,
                    _ => OrderedMap::new(),
                };
                for (nested_key, nested_value) in incoming {
                    nested.set(nested_key, nested_value, reorder);
                }
                self.elements.insert(key, StyleValue::Mapping(nested));
            }
            other => {
                self.elements.insert(key, other);
            }
        }
    }

    /// Stores `value` at `key` verbatim, without merge semantics. New
    /// keys append; existing keys keep their position.
    pub fn replace(&mut self, key: impl Into<String>, value: StyleValue) {
        let key = key.into();
        if !self.elements.contains_key(&key) {
            self.key_order.push(key.clone());
        }
        self.elements.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.elements.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.elements.contains_key(key)
    }

    /// Merges a whole style object into this one. Every entry is set
    /// with reordering, so later-specified properties win position-wise.
    pub fn merge_style(&mut self, style: &OrderedMap) {
        for (key, value) in style.iter() {
            self.set(key, value.clone(), true);
        }
    }

    /// Visits entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.key_order
            .iter()
            .filter_map(|k| self.elements.get(k).map(|v| (k.as_str(), v)))
    }

    /// Keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.key_order.iter().map(String::as_str)
    }
}

pub struct IntoIter {
    order: std::vec::IntoIter<String>,
    elements: HashMap<String, StyleValue>,
}

impl Iterator for IntoIter {
    type Item = (String, StyleValue);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let key = self.order.next()?;
            if let Some(value) = self.elements.remove(&key) {
                return Some((key, value));
            }
        }
    }
}

impl IntoIterator for OrderedMap {
    type Item = (String, StyleValue);
    type IntoIter = IntoIter;

    fn into_iter(self) -> IntoIter {
        IntoIter {
            order: self.key_order.into_iter(),
            elements: self.elements,
        }
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.set(k, v, false);
        }
        map
    }
}
