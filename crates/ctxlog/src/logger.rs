//! Structured logger handles.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, btree_map};
use std::fmt;
use std::sync::Arc;
use tracing::Level;

/// An ordered set of structured log fields.
///
/// Displays as a JSON object, which is how the fields are attached to
/// emitted events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    /// Create an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any existing value under the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a field is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Merge `other` into this set; keys in `other` win.
    pub fn merge(&mut self, other: Fields) {
        self.0.extend(other.0);
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Capability to derive a logger carrying additional fields.
///
/// Anything that can hand out a [`Logger`] snapshot can be bound to a
/// [`Context`](crate::Context).
pub trait FieldLogger {
    /// Derive a logger with `fields` added.
    fn with_fields(&self, fields: Fields) -> Logger;

    /// Derive a logger with a single field added.
    fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Logger
    where
        Self: Sized,
    {
        self.with_fields(Fields::new().with(key, value))
    }
}

/// A logger handle with accumulated structured fields.
///
/// `with_field` and `with_fields` never modify the receiver. The in-place
/// setters on an owned handle are copy-on-write, so they never affect any
/// other handle that shares the same fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Logger {
    fields: Arc<Fields>,
}

macro_rules! emit {
    ($level:expr, $fields:ident, $message:ident) => {
        if $fields.is_empty() {
            tracing::event!(target: "ctxlog", $level, "{}", $message)
        } else {
            tracing::event!(target: "ctxlog", $level, fields = %$fields, "{}", $message)
        }
    };
}

impl Logger {
    /// Create a logger with no fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated fields.
    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Derive a logger with a single field added.
    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_fields(Fields::new().with(key, value))
    }

    /// Derive a logger with `fields` added. An empty set yields a copy.
    #[must_use]
    pub fn with_fields(&self, fields: Fields) -> Self {
        let mut merged = Fields::clone(&self.fields);
        merged.merge(fields);
        Self {
            fields: Arc::new(merged),
        }
    }

    /// Set a field on this handle in place.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        Arc::make_mut(&mut self.fields).insert(key, value);
    }

    /// Merge `fields` into this handle in place.
    pub fn set_fields(&mut self, fields: Fields) {
        Arc::make_mut(&mut self.fields).merge(fields);
    }

    /// Emit an event at `level` carrying this logger's fields.
    pub fn log(&self, level: Level, message: impl fmt::Display) {
        let fields = self.fields.as_ref();
        match level {
            Level::TRACE => emit!(Level::TRACE, fields, message),
            Level::DEBUG => emit!(Level::DEBUG, fields, message),
            Level::INFO => emit!(Level::INFO, fields, message),
            Level::WARN => emit!(Level::WARN, fields, message),
            _ => emit!(Level::ERROR, fields, message),
        }
    }

    /// Emit a trace event.
    pub fn trace(&self, message: impl fmt::Display) {
        self.log(Level::TRACE, message);
    }

    /// Emit a debug event.
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::DEBUG, message);
    }

    /// Emit an info event.
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::INFO, message);
    }

    /// Emit a warning event.
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::WARN, message);
    }

    /// Emit an error event.
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::ERROR, message);
    }
}

impl FieldLogger for Logger {
    fn with_fields(&self, fields: Fields) -> Logger {
        Logger::with_fields(self, fields)
    }
}

impl From<Fields> for Logger {
    fn from(fields: Fields) -> Self {
        Self {
            fields: Arc::new(fields),
        }
    }
}
