//! Parameter snapshots passed to strategies and actions.
//!
//! A [`Parameters`] value is never edited in place once it has been handed to
//! a strategy. Additions such as the test stage or OS deployment data are made
//! with [`Parameters::with`] / [`Parameters::merged`], which return a new
//! snapshot and leave the original untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Namespace used when an action does not declare one.
pub const DEFAULT_NAMESPACE: &str = "common";

/// Key holding an action's namespace.
pub const NAMESPACE_KEY: &str = "namespace";

/// Key holding the namespace whose connection a test action shares.
pub const CONNECTION_NAMESPACE_KEY: &str = "connection-namespace";

/// An ordered string-keyed mapping of JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a string value; non-string values yield `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Look up a nested mapping and return it as its own snapshot.
    pub fn get_params(&self, key: &str) -> Option<Parameters> {
        match self.0.get(key) {
            Some(Value::Object(map)) => Some(Self(map.clone())),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The action's namespace, [`DEFAULT_NAMESPACE`] when unset.
    pub fn namespace(&self) -> &str {
        self.get_str(NAMESPACE_KEY).unwrap_or(DEFAULT_NAMESPACE)
    }

    /// The connection namespace, falling back to [`namespace`](Self::namespace).
    pub fn connection_namespace(&self) -> &str {
        self.get_str(CONNECTION_NAMESPACE_KEY)
            .unwrap_or_else(|| self.namespace())
    }

    /// Return a new snapshot with `key` set to `value`.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = self.0.clone();
        map.insert(key.into(), value.into());
        Self(map)
    }

    /// Return a new snapshot with every entry of `other` layered on top.
    #[must_use]
    pub fn merged(&self, other: &Parameters) -> Self {
        let mut map = self.0.clone();
        for (key, value) in &other.0 {
            map.insert(key.clone(), value.clone());
        }
        Self(map)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Parameters> for Value {
    fn from(params: Parameters) -> Self {
        Value::Object(params.0)
    }
}
