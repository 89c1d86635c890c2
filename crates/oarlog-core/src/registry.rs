//! Insertion-ordered entity tables keyed by id.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::models::{Boat, Destination, Person};

/// Anything stored in a [`Registry`]
pub trait Entity {
    fn id(&self) -> &str;
    fn is_placeholder(&self) -> bool;
}

impl Entity for Boat {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }
}

impl Entity for Person {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }
}

impl Entity for Destination {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }
}

/// Entities in insertion order with an id index.
///
/// Re-inserting an existing id replaces the entity in place and remembers
/// the id as a duplicate.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            duplicates: Vec::new(),
        }
    }
}

impl<T: Entity> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, returning the one it replaced
    pub fn insert(&mut self, item: T) -> Option<T> {
        match self.index.get(item.id()) {
            Some(&pos) => {
                self.duplicates.push(item.id().to_string());
                Some(std::mem::replace(&mut self.items[pos], item))
            }
            None => {
                self.index.insert(item.id().to_string(), self.items.len());
                self.items.push(item);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_placeholder()).count()
    }

    /// Ids that were inserted more than once, in order of the repeat
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

impl<T: Entity> FromIterator<T> for Registry<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for item in iter {
            registry.insert(item);
        }
        registry
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Serializes as a plain list in insertion order
impl<T: Serialize> Serialize for Registry<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

/// The three reference tables every log entry points into
#[derive(Debug, Clone, Default)]
pub struct Registries {
    pub boats: Registry<Boat>,
    pub persons: Registry<Person>,
    pub destinations: Registry<Destination>,
}

impl Registries {
    /// Whether any of the three tables holds this id
    pub fn contains_id(&self, id: &str) -> bool {
        self.boats.contains(id) || self.persons.contains(id) || self.destinations.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(id: &str, name: &str) -> Destination {
        Destination {
            id: id.to_string(),
            name: name.to_string(),
            distance_km: None,
            is_open_water: None,
            is_placeholder: false,
        }
    }

    #[test]
    fn test_insert_preserves_order() {
        let registry: Registry<Destination> =
            vec![dest("b", "Wehr"), dest("a", "Insel"), dest("c", "Brücke")]
                .into_iter()
                .collect();
        let ids: Vec<&str> = registry.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!(registry.duplicates().is_empty());
    }

    #[test]
    fn test_duplicate_replaces_in_place() {
        let mut registry = Registry::new();
        registry.insert(dest("a", "Insel"));
        registry.insert(dest("b", "Wehr"));
        let old = registry.insert(dest("a", "Neue Insel"));

        assert_eq!(old.map(|d| d.name), Some("Insel".to_string()));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.iter().next().unwrap().name, "Neue Insel");
        assert_eq!(registry.duplicates(), &["a".to_string()]);
    }

    #[test]
    fn test_serializes_as_list() {
        let registry: Registry<Destination> = vec![dest("a", "Insel")].into_iter().collect();
        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"[{"id":"a","name":"Insel","fmr":false}]"#);
    }

    #[test]
    fn test_placeholder_count() {
        let mut registry = Registry::new();
        registry.insert(dest("a", "Insel"));
        registry.insert(Destination::placeholder("former-000001", "Irgendwo"));
        assert_eq!(registry.placeholder_count(), 1);
        assert!(registry.contains("former-000001"));
        assert!(registry.get("zzz").is_none());
    }

    #[test]
    fn test_contains_id_spans_all_tables() {
        let mut regs = Registries::default();
        regs.destinations.insert(dest("d1", "Wehr"));
        assert!(regs.contains_id("d1"));
        assert!(!regs.contains_id("p1"));
    }
}
