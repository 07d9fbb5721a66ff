//! Persistent configuration tree.
//!
//! [`ConfigNode`] is the untyped form of an environment configuration.
//! Children sit behind [`Arc`], so cloning a tree is cheap and an update only
//! copies the nodes on the path to the edited field. Every other subtree stays
//! shared with the tree it was derived from.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{EnvError, Result};
use crate::path::FieldPath;

/// A node of a configuration tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigNode {
    /// Absent or disabled.
    #[default]
    Null,
    /// Boolean leaf.
    Bool(bool),
    /// Integer leaf.
    Int(i64),
    /// Floating-point leaf.
    Float(f64),
    /// String leaf.
    Str(String),
    /// Ordered children.
    List(Arc<Vec<ConfigNode>>),
    /// Named children, sorted by key.
    Map(Arc<BTreeMap<String, ConfigNode>>),
}

impl ConfigNode {
    /// Kind name used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Check if the node is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build a map node.
    #[must_use]
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigNode)>,
        K: Into<String>,
    {
        Self::Map(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Convert a typed value into a tree.
    pub fn from_typed<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)
            .map_err(|e| EnvError::schema(std::any::type_name::<T>(), e))?;
        Ok(Self::from(json))
    }

    /// Convert the tree into a typed value.
    pub fn into_typed<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.to_json())
            .map_err(|e| EnvError::schema(std::any::type_name::<T>(), e))
    }

    /// The tree as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Str(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Deterministic JSON text: keys sorted, no whitespace.
    ///
    /// Equal trees always produce identical bytes.
    pub fn to_canonical_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| EnvError::schema("canonical JSON", e))
    }

    /// Look up the node at `path`.
    ///
    /// Returns `None` if the path is malformed or leads through a missing
    /// field, a leaf or a null node.
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&ConfigNode> {
        let segments = path.segments().ok()?;
        segments
            .into_iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Direct child by key (maps) or index (lists).
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&ConfigNode> {
        match self {
            Self::Map(fields) => fields.get(segment),
            Self::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Check whether the subtree at `path` is the same allocation in both
    /// trees.
    #[must_use]
    pub fn shares_subtree(&self, other: &Self, path: &FieldPath) -> bool {
        match (self.get(path), other.get(path)) {
            (Some(Self::Map(a)), Some(Self::Map(b))) => Arc::ptr_eq(a, b),
            (Some(Self::List(a)), Some(Self::List(b))) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Leaf paths whose values differ between `self` and `other`.
    ///
    /// A subtree present on one side and null or of another kind on the
    /// other is reported once, at its root. Paths are sorted.
    #[must_use]
    pub fn diff(&self, other: &Self) -> Vec<FieldPath> {
        let mut out = Vec::new();
        diff_into(&FieldPath::new(""), self, other, &mut out);
        out
    }

    /// Mutable node at `segments`, copying shared nodes on the way down.
    pub(crate) fn get_mut_cow(&mut self, path: &FieldPath, segments: &[&str]) -> Result<&mut Self> {
        let mut node = self;
        let mut walked = FieldPath::new("");
        for segment in segments {
            walked = walked.child(segment);
            node = match node {
                Self::Map(fields) => Arc::make_mut(fields).get_mut(*segment).ok_or_else(|| {
                    EnvError::invalid_path(path.as_str(), format!("no field '{walked}'"))
                })?,
                Self::List(items) => {
                    let index = segment.parse::<usize>().map_err(|_| {
                        EnvError::invalid_path(
                            path.as_str(),
                            format!("'{walked}' indexes a list with a non-numeric segment"),
                        )
                    })?;
                    Arc::make_mut(items).get_mut(index).ok_or_else(|| {
                        EnvError::invalid_path(path.as_str(), format!("'{walked}' is out of range"))
                    })?
                }
                Self::Null => {
                    return Err(EnvError::invalid_path(
                        path.as_str(),
                        format!("'{walked}' lies under a null node"),
                    ));
                }
                leaf => {
                    return Err(EnvError::invalid_path(
                        path.as_str(),
                        format!("'{walked}' lies under a {} leaf", leaf.kind()),
                    ));
                }
            };
        }
        Ok(node)
    }
}

fn same_leaf(a: &ConfigNode, b: &ConfigNode) -> bool {
    match (a, b) {
        (ConfigNode::Float(x), ConfigNode::Float(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}

fn diff_into(at: &FieldPath, a: &ConfigNode, b: &ConfigNode, out: &mut Vec<FieldPath>) {
    match (a, b) {
        (ConfigNode::Map(x), ConfigNode::Map(y)) => {
            if Arc::ptr_eq(x, y) {
                return;
            }
            let mut keys: Vec<&String> = x.keys().chain(y.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let child = at.child(key);
                match (x.get(key), y.get(key)) {
                    (Some(l), Some(r)) => diff_into(&child, l, r, out),
                    _ => out.push(child),
                }
            }
        }
        (ConfigNode::List(x), ConfigNode::List(y)) if x.len() == y.len() => {
            if Arc::ptr_eq(x, y) {
                return;
            }
            for (i, (l, r)) in x.iter().zip(y.iter()).enumerate() {
                diff_into(&at.child(&i.to_string()), l, r, out);
            }
        }
        _ => {
            if !same_leaf(a, b) {
                out.push(at.clone());
            }
        }
    }
}

impl From<Value> for ConfigNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Str(s),
            Value::Array(items) => {
                Self::List(Arc::new(items.into_iter().map(Self::from).collect()))
            }
            Value::Object(fields) => Self::Map(Arc::new(
                fields.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            )),
        }
    }
}

impl From<bool> for ConfigNode {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigNode {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u32> for ConfigNode {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for ConfigNode {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for ConfigNode {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ConfigNode {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// A `(min, max)` range.
impl From<[f64; 2]> for ConfigNode {
    fn from(range: [f64; 2]) -> Self {
        Self::List(Arc::new(range.iter().copied().map(Self::Float).collect()))
    }
}

impl From<Vec<ConfigNode>> for ConfigNode {
    fn from(items: Vec<ConfigNode>) -> Self {
        Self::List(Arc::new(items))
    }
}

impl Serialize for ConfigNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Str(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
