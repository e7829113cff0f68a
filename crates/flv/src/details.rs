//! Human readable tag details.
//!
//! Each decoded tag carries a [`TagDetails`] map from field name to value. The
//! field names (`"Format"`, `"Sample Rate"`, `"Frame Type"`, ...) are stable and
//! meant to be displayed or matched on by consumers.

use std::fmt;

use amf0::Amf0Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single detail value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum DetailValue {
    String(String),
    Number(f64),
    Bool(bool),
    Map(TagDetails),
    List(Vec<DetailValue>),
}

impl DetailValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DetailValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DetailValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DetailValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TagDetails> {
        match self {
            DetailValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        DetailValue::String(value.to_owned())
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        DetailValue::String(value)
    }
}

impl From<f64> for DetailValue {
    fn from(value: f64) -> Self {
        DetailValue::Number(value)
    }
}

impl From<bool> for DetailValue {
    fn from(value: bool) -> Self {
        DetailValue::Bool(value)
    }
}

impl From<TagDetails> for DetailValue {
    fn from(value: TagDetails) -> Self {
        DetailValue::Map(value)
    }
}

impl From<&Amf0Value<'_>> for DetailValue {
    fn from(value: &Amf0Value<'_>) -> Self {
        match value {
            Amf0Value::Number(n) => DetailValue::Number(*n),
            Amf0Value::Boolean(b) => DetailValue::Bool(*b),
            Amf0Value::String(s) => DetailValue::String(s.to_string()),
            Amf0Value::Object(props) | Amf0Value::EcmaArray(props) => {
                let mut map = TagDetails::new();
                for (key, value) in props {
                    map.insert(key.to_string(), DetailValue::from(value));
                }
                DetailValue::Map(map)
            }
            Amf0Value::StrictArray(values) => {
                DetailValue::List(values.iter().map(DetailValue::from).collect())
            }
            Amf0Value::Unsupported(marker) => {
                DetailValue::String(format!("Unsupported AMF Type: {marker}"))
            }
        }
    }
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::String(s) => f.write_str(s),
            DetailValue::Number(n) => write!(f, "{n}"),
            DetailValue::Bool(b) => write!(f, "{b}"),
            DetailValue::Map(map) => write!(f, "{map}"),
            DetailValue::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Ordered field name to value mapping.
///
/// Inserting a key that already exists replaces its value but keeps its
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDetails {
    entries: Vec<(String, DetailValue)>,
}

impl TagDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DetailValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Shorthand for string valued fields.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DetailValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DetailValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for TagDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for TagDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
