//! # Property Values
//!
//! Values stored in an element's property map. A value is a scalar, an
//! array, a nested object, or an embedded element record. Nested objects are
//! addressable with dot paths (`"border.color"`).

use crate::serializer::ElementRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// Embedded element, tagged `_type: "pattern"` when serialized
    Element(Box<ElementRecord>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn object() -> Self {
        Value::Object(BTreeMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a nested value by dot path. An empty path is the value itself.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        split_path(path).try_fold(self, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Replace the nested value at `path`, creating intermediate objects.
    ///
    /// A non-object value met along the path is replaced by an object.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = split_path(path).collect();
        let Some((last, parents)) = segments.split_last() else {
            *self = value;
            return;
        };

        let mut current = self;
        for segment in parents {
            current = current.ensure_object().entry(segment.to_string()).or_insert(Value::Null);
        }
        current.ensure_object().insert(last.to_string(), value);
    }

    /// Remove the nested value at `path` and return it. Parents along the path
    /// are left in place, even when the removal empties them.
    pub fn remove_path(&mut self, path: &str) -> Option<Value> {
        let segments: Vec<&str> = split_path(path).collect();
        let (last, parents) = segments.split_last()?;

        let mut current = self;
        for segment in parents {
            current = match current {
                Value::Object(map) => map.get_mut(*segment)?,
                _ => return None,
            };
        }
        match current {
            Value::Object(map) => map.remove(*last),
            _ => None,
        }
    }

    fn ensure_object(&mut self) -> &mut BTreeMap<String, Value> {
        match self {
            Value::Object(map) => map,
            other => {
                *other = Value::object();
                other.ensure_object()
            }
        }
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(json)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|segment| !segment.is_empty())
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
