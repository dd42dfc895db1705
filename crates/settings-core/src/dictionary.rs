//! In-memory typed key/value store
//!
//! A [`SettingsDictionary`] maps `(type name, key)` pairs to values. The same
//! key may be stored once per type without collision. Entries are partitioned
//! into primitive, string and complex buckets, each an ordered map, so the
//! serialized text is deterministic and identical content always yields an
//! identical fingerprint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::{SettingType, SettingValue, ValueBucket};
use crate::{Error, Result};

/// Identity of a stored entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub type_name: String,
    pub name: String,
}

impl EntryKey {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Key for the entry named `name` holding a `T`.
    pub fn of<T: SettingType>(name: &str) -> Self {
        Self::new(T::type_name(), name)
    }
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.type_name)
    }
}

/// Typed key/value store backing a settings repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDictionary {
    primitives: BTreeMap<EntryKey, SettingValue>,
    strings: BTreeMap<EntryKey, String>,
    complex: BTreeMap<EntryKey, Value>,
}

/// On-disk layout of a dictionary.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DictionaryFile {
    #[serde(default)]
    primitives: Vec<EntryRecord>,
    #[serde(default)]
    strings: Vec<EntryRecord>,
    #[serde(default)]
    complex: Vec<EntryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    #[serde(rename = "type")]
    type_name: String,
    key: String,
    value: Value,
}

impl EntryRecord {
    fn new(key: &EntryKey, value: Value) -> Self {
        Self {
            type_name: key.type_name.clone(),
            key: key.name.clone(),
            value,
        }
    }
}

impl SettingsDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `(T, name)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if `value` cannot be represented;
    /// the store is left untouched in that case.
    pub fn set<T: SettingType>(&mut self, name: &str, value: T) -> Result<()> {
        let value = value.into_value()?;
        self.set_value(EntryKey::of::<T>(name), value);
        Ok(())
    }

    /// The value stored for `(T, name)`, or `fallback` if it is absent or
    /// cannot be decoded as `T`.
    pub fn get<T: SettingType>(&self, name: &str, fallback: T) -> T {
        self.try_get(name).unwrap_or(fallback)
    }

    pub fn try_get<T: SettingType>(&self, name: &str) -> Option<T> {
        self.get_value(&EntryKey::of::<T>(name))
            .and_then(|value| T::from_value(&value))
    }

    /// Whether an entry exists for `(T, name)`, decodable or not.
    pub fn contains_key<T: SettingType>(&self, name: &str) -> bool {
        self.contains(&EntryKey::of::<T>(name))
    }

    /// Remove the entry for `(T, name)`. Returns whether one was removed.
    pub fn remove<T: SettingType>(&mut self, name: &str) -> bool {
        self.remove_entry(&EntryKey::of::<T>(name))
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// Non-finite floats have no JSON form; they are skipped with a warning
    /// and the previous entry is kept.
    pub fn set_value(&mut self, key: EntryKey, value: SettingValue) {
        if !value.is_storable() {
            tracing::warn!(key = %key, "Refusing to store non-finite float {:?}", value);
            return;
        }
        // A key lives in exactly one bucket
        self.remove_entry(&key);
        match value {
            SettingValue::Str(s) => {
                self.strings.insert(key, s);
            }
            SettingValue::Json(v) => {
                self.complex.insert(key, v);
            }
            primitive => {
                self.primitives.insert(key, primitive);
            }
        }
    }

    pub fn get_value(&self, key: &EntryKey) -> Option<SettingValue> {
        if let Some(value) = self.primitives.get(key) {
            return Some(value.clone());
        }
        if let Some(s) = self.strings.get(key) {
            return Some(SettingValue::Str(s.clone()));
        }
        self.complex.get(key).cloned().map(SettingValue::Json)
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.primitives.contains_key(key)
            || self.strings.contains_key(key)
            || self.complex.contains_key(key)
    }

    pub fn remove_entry(&mut self, key: &EntryKey) -> bool {
        let removed_primitive = self.primitives.remove(key).is_some();
        let removed_string = self.strings.remove(key).is_some();
        let removed_complex = self.complex.remove(key).is_some();
        removed_primitive || removed_string || removed_complex
    }

    pub fn len(&self) -> usize {
        self.primitives.len() + self.strings.len() + self.complex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, bucket by bucket, each bucket in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&EntryKey, SettingValue)> + '_ {
        let primitives = self.primitives.iter().map(|(k, v)| (k, v.clone()));
        let strings = self
            .strings
            .iter()
            .map(|(k, s)| (k, SettingValue::Str(s.clone())));
        let complex = self
            .complex
            .iter()
            .map(|(k, v)| (k, SettingValue::Json(v.clone())));
        primitives.chain(strings).chain(complex)
    }

    /// Serialize to pretty-printed JSON with a trailing newline.
    pub fn to_json_string(&self) -> Result<String> {
        let file = DictionaryFile {
            primitives: self
                .primitives
                .iter()
                .map(|(k, v)| EntryRecord::new(k, v.to_json()))
                .collect(),
            strings: self
                .strings
                .iter()
                .map(|(k, s)| EntryRecord::new(k, Value::String(s.clone())))
                .collect(),
            complex: self
                .complex
                .iter()
                .map(|(k, v)| EntryRecord::new(k, v.clone()))
                .collect(),
        };

        let mut text = serde_json::to_string_pretty(&file)?;
        text.push('\n');
        Ok(text)
    }

    /// Parse a dictionary from settings file text.
    ///
    /// Blank text is an empty dictionary. Entries whose value does not fit
    /// their bucket are skipped with a warning; the rest still load.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not a settings document at all.
    pub fn from_json_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: DictionaryFile = serde_json::from_str(text).map_err(|e| Error::Malformed {
            message: e.to_string(),
        })?;

        let mut dictionary = Self::default();
        let buckets = [
            (ValueBucket::Primitive, file.primitives),
            (ValueBucket::String, file.strings),
            (ValueBucket::Complex, file.complex),
        ];
        for (bucket, records) in buckets {
            for record in records {
                let key = EntryKey::new(record.type_name, record.key);
                match SettingValue::from_bucket_json(bucket, record.value) {
                    Some(value) => dictionary.set_value(key, value),
                    None => tracing::warn!(
                        key = %key.name,
                        type_name = %key.type_name,
                        "Skipping settings entry whose value does not match its {:?} bucket",
                        bucket
                    ),
                }
            }
        }

        Ok(dictionary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Json;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_name_different_types_do_not_collide() {
        let mut store = SettingsDictionary::new();
        store.set("size", 12i32).unwrap();
        store.set("size", "large".to_string()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("size", 0i32), 12);
        assert_eq!(store.get("size", String::new()), "large");
    }

    #[test]
    fn wrong_type_lookup_returns_fallback() {
        let mut store = SettingsDictionary::new();
        store.set("x", 1i32).unwrap();

        assert_eq!(store.get("x", "fallback".to_string()), "fallback");
        assert_eq!(store.get("x", 0i64), 0, "i64 is a different type than i32");
    }

    #[test]
    fn non_finite_float_is_not_stored() {
        let mut store = SettingsDictionary::new();
        let key = EntryKey::new("f64", "ratio");
        store.set_value(key.clone(), SettingValue::Float(0.5));

        store.set_value(key.clone(), SettingValue::Float(f64::NAN));
        store.set_value(key.clone(), SettingValue::Float(f64::INFINITY));

        assert_eq!(store.get_value(&key), Some(SettingValue::Float(0.5)));
        assert!(!store.to_json_string().unwrap().contains("null"));
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut store = SettingsDictionary::new();
        store.set("volume", 0.5f32).unwrap();
        store.set("volume", 0.8f32).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("volume", 1.0f32), 0.8);
    }

    #[test]
    fn failed_set_leaves_store_unchanged() {
        let mut store = SettingsDictionary::new();
        store.set("ratio", 0.5f64).unwrap();

        assert!(store.set("ratio", f64::NAN).is_err());
        assert_eq!(store.get("ratio", 0.0f64), 0.5);
    }

    #[test]
    fn contains_key_ignores_decodability() {
        let mut store = SettingsDictionary::new();
        store.set_value(EntryKey::new("i32", "big"), SettingValue::Int(i64::MAX));

        assert!(store.contains_key::<i32>("big"));
        assert_eq!(store.get("big", -1i32), -1);
    }

    #[test]
    fn removing_absent_key_is_a_no_op() {
        let mut store = SettingsDictionary::new();
        store.set("kept", true).unwrap();
        let before = store.clone();

        assert!(!store.remove::<bool>("missing"));
        assert!(!store.remove::<String>("kept"));
        assert_eq!(store, before);
    }

    #[test]
    fn remove_deletes_only_the_typed_entry() {
        let mut store = SettingsDictionary::new();
        store.set("flag", true).unwrap();
        store.set("flag", "yes".to_string()).unwrap();

        assert!(store.remove::<bool>("flag"));
        assert!(!store.contains_key::<bool>("flag"));
        assert!(store.contains_key::<String>("flag"));
    }

    #[test]
    fn changing_bucket_for_same_key_keeps_one_entry() {
        let mut store = SettingsDictionary::new();
        let key = EntryKey::new("custom", "k");
        store.set_value(key.clone(), SettingValue::Str("a".into()));
        store.set_value(key.clone(), SettingValue::Json(serde_json::json!({"a": 1})));

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_value(&key),
            Some(SettingValue::Json(serde_json::json!({"a": 1})))
        );
    }

    #[test]
    fn serialized_layout_is_bucketed_and_sorted() {
        let mut store = SettingsDictionary::new();
        store.set("volume", 0.8f32).unwrap();
        store.set("enabled", true).unwrap();
        store.set("title", "Main".to_string()).unwrap();
        store.set("tags", Json(vec!["a", "b"].into_iter().map(String::from).collect::<Vec<_>>()))
            .unwrap();

        let text = store.to_json_string().unwrap();
        let expected = r#"{
  "primitives": [
    {
      "type": "bool",
      "key": "enabled",
      "value": true
    },
    {
      "type": "f32",
      "key": "volume",
      "value": 0.8
    }
  ],
  "strings": [
    {
      "type": "String",
      "key": "title",
      "value": "Main"
    }
  ],
  "complex": [
    {
      "type": "alloc::vec::Vec<alloc::string::String>",
      "key": "tags",
      "value": [
        "a",
        "b"
      ]
    }
  ]
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn serialization_is_deterministic_regardless_of_insert_order() {
        let mut a = SettingsDictionary::new();
        a.set("one", 1i32).unwrap();
        a.set("two", 2i32).unwrap();

        let mut b = SettingsDictionary::new();
        b.set("two", 2i32).unwrap();
        b.set("one", 1i32).unwrap();

        assert_eq!(a.to_json_string().unwrap(), b.to_json_string().unwrap());
    }

    #[test]
    fn parse_round_trips() {
        let mut store = SettingsDictionary::new();
        store.set("count", 3u32).unwrap();
        store.set("offset", -7i64).unwrap();
        store.set("name", "Player".to_string()).unwrap();
        store.set("layout", Json(serde_json::json!({"panels": [1, 2]}))).unwrap();

        let parsed = SettingsDictionary::from_json_str(&store.to_json_string().unwrap()).unwrap();
        assert_eq!(parsed, store);
    }

    #[test]
    fn blank_text_is_an_empty_dictionary() {
        assert!(SettingsDictionary::from_json_str("  \n").unwrap().is_empty());
        assert!(SettingsDictionary::from_json_str("{}").unwrap().is_empty());
    }

    #[test]
    fn garbage_text_is_malformed() {
        let err = SettingsDictionary::from_json_str("not json").unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn entries_that_do_not_fit_their_bucket_are_skipped() {
        let text = r#"{
            "primitives": [
                { "type": "i32", "key": "ok", "value": 5 },
                { "type": "i32", "key": "bad", "value": "five" }
            ],
            "strings": [
                { "type": "String", "key": "also_bad", "value": 5 }
            ]
        }"#;

        let store = SettingsDictionary::from_json_str(text).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("ok", 0i32), 5);
        assert!(!store.contains_key::<i32>("bad"));
        assert!(!store.contains_key::<String>("also_bad"));
    }

    #[test]
    fn entries_iterate_bucket_by_bucket() {
        let mut store = SettingsDictionary::new();
        store.set("b", "text".to_string()).unwrap();
        store.set("a", 1i32).unwrap();

        let names: Vec<_> = store.entries().map(|(k, _)| k.name.clone()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
