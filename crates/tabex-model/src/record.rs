//! Flat extraction records.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One extracted row: an ordered mapping from output key to cleaned value.
///
/// Keys keep their insertion order so that serialized output is stable
/// across runs. A `None` value serializes as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Sets a field. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Returns the value of a field, `None` if the key is absent or null.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Returns true if the key is present (even when its value is null).
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(existing, _)| existing == key)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order() {
        let mut record = Record::new();
        record.insert("Name", Some("Asha Devi".to_string()));
        record.insert("assembly", Some("Rosera".to_string()));
        record.insert("Name", Some("Asha".to_string()));

        let keys: Vec<&str> = record.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["Name", "assembly"]);
        assert_eq!(record.get("Name"), Some("Asha"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_null_values() {
        let mut record = Record::with_capacity(1);
        record.insert("Admin", None);
        assert!(record.contains_key("Admin"));
        assert_eq!(record.get("Admin"), None);
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let mut record = Record::new();
        record.insert("Name", Some("Asha Devi".to_string()));
        record.insert("Mobile Number", Some("9876543210".to_string()));
        record.insert("Admin", None);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"Name":"Asha Devi","Mobile Number":"9876543210","Admin":null}"#
        );
    }
}
