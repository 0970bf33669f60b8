use serde::Serialize;
use serde_json::{Map, Value};

/// Flat key/value bundle handed to a template.
///
/// Keys keep their insertion order so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewData(Map<String, Value>);

impl ViewData {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow merge; keys from `other` win.
    pub fn merge(&mut self, other: ViewData) {
        self.0.extend(other.0);
    }

    /// Shallow merge of a JSON object. Anything else is ignored.
    pub fn merge_value(&mut self, value: &Value) {
        if let Value::Object(map) = value {
            for (key, item) in map {
                self.0.insert(key.clone(), item.clone());
            }
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ViewData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_overwrites_shallowly() {
        let mut data = ViewData::new();
        data.insert("title", "Home");
        data.insert("nested", json!({ "a": 1, "b": 2 }));

        let mut other = ViewData::new();
        other.insert("nested", json!({ "a": 3 }));
        other.insert("extra", true);
        data.merge(other);

        assert_eq!(
            data.into_value(),
            json!({ "title": "Home", "nested": { "a": 3 }, "extra": true })
        );
    }

    #[test]
    fn test_merge_value_ignores_non_objects() {
        let mut data = ViewData::new();
        data.insert("title", "Home");

        data.merge_value(&json!([1, 2, 3]));
        data.merge_value(&json!("text"));
        data.merge_value(&Value::Null);
        assert_eq!(data.len(), 1);

        data.merge_value(&json!({ "title": "Other", "page": 2 }));
        assert_eq!(data.get("title").unwrap(), "Other");
        assert_eq!(data.get("page").unwrap(), 2);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut data = ViewData::new();
        data.insert("z", 1);
        data.insert("a", 2);
        assert_eq!(serde_json::to_string(&data).unwrap(), r#"{"z":1,"a":2}"#);
    }
}
