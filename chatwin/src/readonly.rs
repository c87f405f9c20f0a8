//! Read-only views over JSON object graphs.
//!
//! [`Frozen`] exposes every readable field of a value but rejects every
//! write with [`ReadonlyError::Immutable`]. Nested objects and arrays are
//! wrapped on first read and the wrapper is memoized, so reading the same
//! field twice hands back the same view and deep graphs are never walked
//! eagerly.
//!
//! All views created from one value share its root through an [`Arc`];
//! each view only stores the JSON pointer of the node it represents.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

static NULL: Value = Value::Null;

/// Errors from [`Frozen`].
#[derive(Debug, thiserror::Error)]
pub enum ReadonlyError {
    /// A write was attempted through a read-only view.
    #[error("cannot write to read-only value at '{path}'")]
    Immutable {
        /// JSON pointer of the field the write targeted.
        path: String,
    },

    /// The value could not be converted to JSON before freezing.
    #[error("cannot freeze value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A field read through a [`Frozen`] view.
#[derive(Debug, Clone)]
pub enum Field {
    /// Null, boolean, number or string, returned by value.
    Scalar(Value),
    /// An object or array, returned as a read-only view.
    Nested(Frozen),
}

impl Field {
    /// The scalar value, if this field is one.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Nested(_) => None,
        }
    }

    /// The nested view, if this field is one.
    #[must_use]
    pub const fn as_nested(&self) -> Option<&Frozen> {
        match self {
            Self::Nested(view) => Some(view),
            Self::Scalar(_) => None,
        }
    }

    /// The field as a plain JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Nested(view) => view.to_value(),
        }
    }
}

struct Node {
    root: Arc<Value>,
    pointer: String,
    children: Mutex<HashMap<String, Frozen>>,
}

/// Read-only view of one node in a JSON value.
///
/// Cloning is cheap and yields a view of the same node.
#[derive(Clone)]
pub struct Frozen(Arc<Node>);

impl Frozen {
    fn root(value: Arc<Value>) -> Self {
        Self::at(value, String::new())
    }

    fn at(root: Arc<Value>, pointer: String) -> Self {
        Self(Arc::new(Node {
            root,
            pointer,
            children: Mutex::new(HashMap::new()),
        }))
    }

    /// Freezes any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`ReadonlyError::Serialize`] if `value` cannot be
    /// represented as JSON.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, ReadonlyError> {
        Ok(Self::root(Arc::new(serde_json::to_value(value)?)))
    }

    /// JSON pointer of this node relative to the frozen root; empty for
    /// the root itself.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.0.pointer
    }

    fn value(&self) -> &Value {
        self.0.root.pointer(&self.0.pointer).unwrap_or(&NULL)
    }

    fn child_pointer(&self, key: &str) -> String {
        let escaped = key.replace('~', "~0").replace('/', "~1");
        format!("{}/{escaped}", self.0.pointer)
    }

    fn field(&self, key: &str, value: &Value) -> Field {
        match value {
            Value::Object(_) | Value::Array(_) => {
                let mut children = self.0.children.lock();
                let child = children.entry(key.to_owned()).or_insert_with(|| {
                    Self::at(Arc::clone(&self.0.root), self.child_pointer(key))
                });
                Field::Nested(child.clone())
            }
            scalar => Field::Scalar(scalar.clone()),
        }
    }

    /// Reads an object property. `None` if the key is missing or this node
    /// is not an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Field> {
        let value = self.value().as_object()?.get(key)?;
        Some(self.field(key, value))
    }

    /// Reads an array element. `None` if out of range or this node is not
    /// an array.
    #[must_use]
    pub fn index(&self, index: usize) -> Option<Field> {
        let value = self.value().as_array()?.get(index)?;
        Some(self.field(&index.to_string(), value))
    }

    /// Object keys in order, or empty for non-objects.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.value()
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of properties or elements; zero for scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.value() {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    /// Whether [`len`](Self::len) is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A detached copy of the underlying value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.value().clone()
    }

    /// Whether two views are the same node of the same frozen value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn reject<T>(&self, path: String) -> Result<T, ReadonlyError> {
        tracing::debug!(path = %path, "rejected write to read-only value");
        Err(ReadonlyError::Immutable { path })
    }

    /// Always fails; the value is left unchanged.
    ///
    /// # Errors
    ///
    /// Always [`ReadonlyError::Immutable`].
    pub fn set(&self, key: &str, _value: impl Into<Value>) -> Result<(), ReadonlyError> {
        self.reject(self.child_pointer(key))
    }

    /// Always fails; the value is left unchanged.
    ///
    /// # Errors
    ///
    /// Always [`ReadonlyError::Immutable`].
    pub fn remove(&self, key: &str) -> Result<Value, ReadonlyError> {
        self.reject(self.child_pointer(key))
    }

    /// Always fails; the value is left unchanged.
    ///
    /// # Errors
    ///
    /// Always [`ReadonlyError::Immutable`].
    pub fn push(&self, _value: impl Into<Value>) -> Result<(), ReadonlyError> {
        self.reject(self.0.pointer.clone())
    }
}

impl fmt::Debug for Frozen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frozen")
            .field("path", &self.0.pointer)
            .field("value", self.value())
            .finish()
    }
}

impl PartialEq for Frozen {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Serialize for Frozen {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Values that can be turned into a [`Frozen`] view.
pub trait Freeze {
    /// Produces the read-only view.
    fn freeze(self) -> Frozen;
}

impl Freeze for Value {
    fn freeze(self) -> Frozen {
        Frozen::root(Arc::new(self))
    }
}

impl Freeze for Arc<Value> {
    fn freeze(self) -> Frozen {
        Frozen::root(self)
    }
}

impl Freeze for Frozen {
    fn freeze(self) -> Frozen {
        self
    }
}

/// Wraps `value` in a read-only view. Absent input stays absent, and an
/// already frozen value is returned as is.
pub fn deep_readonly<T: Freeze>(value: Option<T>) -> Option<Frozen> {
    value.map(Freeze::freeze)
}
