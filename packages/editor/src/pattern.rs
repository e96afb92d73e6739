//! # Pattern Library
//!
//! Patterns are externally supplied schemas describing a component's
//! properties and slots. The document model never analyzes component source;
//! it only asks the library to resolve schemas and to coerce raw,
//! designer-entered values into canonical typed values.
//!
//! Coercion is asynchronous because some property kinds touch the disk
//! (assets are checked for existence before being accepted).

use crate::value::Value;
use futures::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Slot used when a caller does not name one
pub const DEFAULT_SLOT: &str = "children";

/// Schema oracle consumed by the document model
pub trait PatternLibrary: Send + Sync {
    /// Look up a pattern by id
    fn pattern(&self, id: &str) -> Option<Arc<Pattern>>;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("Expected {expected}, got {found}")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("Unknown enum option: {0}")]
    UnknownOption(String),

    #[error("Asset {path} is not readable: {reason}")]
    MissingAsset { path: String, reason: String },
}

/// Component schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PatternProperty>,
    #[serde(default)]
    pub slots: Vec<PatternSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSlot {
    pub id: String,
    pub name: String,
    /// Receives children when no slot is named
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternProperty {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: PropertyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumOption {
    pub id: String,
    pub name: String,
}

/// Canonical type of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PropertyKind {
    String,
    Number,
    Boolean,
    Enum { options: Vec<EnumOption> },
    Asset,
    Object { fields: Vec<PatternProperty> },
    Array { items: Box<PropertyKind> },
    Element,
}

impl Pattern {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PatternProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_slot(mut self, id: impl Into<String>, default: bool) -> Self {
        let id = id.into();
        self.slots.push(PatternSlot {
            name: id.clone(),
            id,
            default,
        });
        self
    }

    /// Resolve a property schema, descending into object fields along `path`
    pub fn property(&self, id: &str, path: Option<&str>) -> Option<&PatternProperty> {
        let root = self.properties.iter().find(|p| p.id == id)?;
        let segments = path.into_iter().flat_map(|p| p.split('.')).filter(|s| !s.is_empty());

        segments.fold(Some(root), |current, segment| match &current?.kind {
            PropertyKind::Object { fields } => fields.iter().find(|f| f.id == segment),
            _ => None,
        })
    }

    /// Slot children land in when none is named
    pub fn default_slot(&self) -> &str {
        self.slots
            .iter()
            .find(|s| s.default)
            .or_else(|| self.slots.first())
            .map(|s| s.id.as_str())
            .unwrap_or(DEFAULT_SLOT)
    }

    /// Initial property values for a freshly created element
    pub fn default_properties(&self) -> BTreeMap<String, Value> {
        self.properties
            .iter()
            .map(|p| (p.id.clone(), p.default_value()))
            .filter(|(_, v)| !v.is_null())
            .collect()
    }
}

impl PatternProperty {
    pub fn new(id: impl Into<String>, kind: PropertyKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn default_value(&self) -> Value {
        if let Some(value) = &self.default_value {
            return value.clone();
        }

        match &self.kind {
            PropertyKind::Object { fields } => Value::Object(
                fields
                    .iter()
                    .map(|f| (f.id.clone(), f.default_value()))
                    .filter(|(_, v)| !v.is_null())
                    .collect(),
            ),
            PropertyKind::Array { .. } => Value::Array(Vec::new()),
            _ => Value::Null,
        }
    }

    /// Convert a raw value into this property's canonical type
    pub fn coerce_value(&self, raw: Value) -> BoxFuture<'static, Result<Value, CoercionError>> {
        self.kind.coerce(raw)
    }
}

impl PropertyKind {
    pub fn coerce(&self, raw: Value) -> BoxFuture<'static, Result<Value, CoercionError>> {
        if raw.is_null() {
            return future::ready(Ok(Value::Null)).boxed();
        }

        match self {
            PropertyKind::String => future::ready(coerce_string(raw)).boxed(),
            PropertyKind::Number => future::ready(coerce_number(raw)).boxed(),
            PropertyKind::Boolean => future::ready(coerce_boolean(raw)).boxed(),
            PropertyKind::Enum { options } => future::ready(coerce_enum(options, raw)).boxed(),
            PropertyKind::Asset => coerce_asset(raw).boxed(),
            PropertyKind::Element => future::ready(match raw {
                Value::Element(_) => Ok(raw),
                other => Err(mismatch("element", &other)),
            })
            .boxed(),
            PropertyKind::Object { fields } => {
                let fields = fields.clone();
                async move {
                    let mut map = match raw {
                        Value::Object(map) => map,
                        other => return Err(mismatch("object", &other)),
                    };

                    let mut coerced = BTreeMap::new();
                    for field in fields {
                        if let Some(value) = map.remove(&field.id) {
                            coerced.insert(field.id.clone(), field.coerce_value(value).await?);
                        }
                    }
                    Ok(Value::Object(coerced))
                }
                .boxed()
            }
            PropertyKind::Array { items } => {
                let items = items.clone();
                async move {
                    let values = match raw {
                        Value::Array(values) => values,
                        other => return Err(mismatch("array", &other)),
                    };

                    let mut coerced = Vec::with_capacity(values.len());
                    for value in values {
                        coerced.push(items.coerce(value).await?);
                    }
                    Ok(Value::Array(coerced))
                }
                .boxed()
            }
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> CoercionError {
    CoercionError::TypeMismatch {
        expected,
        found: found.to_json().to_string(),
    }
}

fn coerce_string(raw: Value) -> Result<Value, CoercionError> {
    match raw {
        Value::String(_) => Ok(raw),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(mismatch("string", &other)),
    }
}

fn coerce_number(raw: Value) -> Result<Value, CoercionError> {
    match raw {
        Value::Number(_) => Ok(raw),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) => Ok(Value::Number(n)),
            Err(_) => Err(mismatch("number", &Value::String(s))),
        },
        other => Err(mismatch("number", &other)),
    }
}

fn coerce_boolean(raw: Value) -> Result<Value, CoercionError> {
    match raw {
        Value::Bool(_) => Ok(raw),
        Value::String(s) => match s.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(mismatch("boolean", &Value::String(s))),
        },
        other => Err(mismatch("boolean", &other)),
    }
}

fn coerce_enum(options: &[EnumOption], raw: Value) -> Result<Value, CoercionError> {
    let s = match raw {
        Value::String(s) => s,
        other => return Err(mismatch("enum option", &other)),
    };

    options
        .iter()
        .find(|o| o.id == s || o.name == s)
        .map(|o| Value::String(o.id.clone()))
        .ok_or(CoercionError::UnknownOption(s))
}

async fn coerce_asset(raw: Value) -> Result<Value, CoercionError> {
    let path = match raw {
        Value::String(path) => path,
        other => return Err(mismatch("asset path", &other)),
    };

    if ["http://", "https://", "data:"].iter().any(|p| path.starts_with(p)) {
        return Ok(Value::String(path));
    }

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Ok(Value::String(path)),
        Ok(_) => Err(CoercionError::MissingAsset {
            path,
            reason: "not a file".to_string(),
        }),
        Err(e) => Err(CoercionError::MissingAsset {
            reason: e.to_string(),
            path,
        }),
    }
}

/// Pattern library backed by a fixed set of schemas
#[derive(Debug, Default, Clone)]
pub struct StaticPatternLibrary {
    patterns: HashMap<String, Arc<Pattern>>,
}

impl StaticPatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.insert(pattern);
        self
    }

    pub fn insert(&mut self, pattern: Pattern) {
        self.patterns.insert(pattern.id.clone(), Arc::new(pattern));
    }

    /// Build from a JSON array of pattern schemas
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        let patterns: Vec<Pattern> = serde_json::from_str(source)?;
        Ok(patterns.into_iter().fold(Self::new(), Self::with_pattern))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl PatternLibrary for StaticPatternLibrary {
    fn pattern(&self, id: &str) -> Option<Arc<Pattern>> {
        self.patterns.get(id).cloned()
    }
}
