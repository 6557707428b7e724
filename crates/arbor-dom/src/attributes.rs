//! Element Attributes
//!
//! Ordered attribute storage with a name index.

use std::collections::HashMap;

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Attribute collection, iterated in insertion order
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    attributes: Vec<Attr>,
    by_name: HashMap<String, usize>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get attribute by index
    pub fn item(&self, index: usize) -> Option<&Attr> {
        self.attributes.get(index)
    }

    /// Get attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .and_then(|&i| self.attributes.get(i))
            .map(|a| a.value.as_str())
    }

    /// Set attribute, returning the previous value
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(&index) = self.by_name.get(name) {
            let old = std::mem::replace(&mut self.attributes[index].value, value.to_string());
            Some(old)
        } else {
            self.by_name.insert(name.to_string(), self.attributes.len());
            self.attributes.push(Attr::new(name, value));
            None
        }
    }

    /// Remove attribute by name
    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        let index = self.by_name.remove(name)?;
        // Shift indices for items after the removed one
        for idx in self.by_name.values_mut() {
            if *idx > index {
                *idx -= 1;
            }
        }
        Some(self.attributes.remove(index))
    }

    /// Check if attribute exists
    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Attribute names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = AttributeMap::new();
        attrs.set("class", "btn");
        attrs.set("id", "submit");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("class"), Some("btn"));
        assert_eq!(attrs.get("id"), Some("submit"));
        assert_eq!(attrs.get("title"), None);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut attrs = AttributeMap::new();
        attrs.set("a", "1");
        attrs.set("b", "2");
        assert_eq!(attrs.set("a", "3"), Some("1".to_string()));

        assert_eq!(attrs.names(), vec!["a", "b"]);
        assert_eq!(attrs.get("a"), Some("3"));
    }

    #[test]
    fn test_remove_attribute() {
        let mut attrs = AttributeMap::new();
        attrs.set("foo", "bar");
        attrs.set("baz", "qux");

        assert!(attrs.has("foo"));
        assert_eq!(attrs.remove("foo").map(|a| a.value), Some("bar".to_string()));
        assert!(!attrs.has("foo"));
        assert_eq!(attrs.get("baz"), Some("qux"));
        assert_eq!(attrs.item(0).map(|a| a.name.as_str()), Some("baz"));
    }
}
