//! VDF value types.
//!
//! A VDF document is a tree whose leaves are opaque strings. [`Value`] is
//! either such a string or a nested [`Map`].
use alloc::{collections::BTreeMap, string::String};

/// A VDF block: keys mapped to strings or nested blocks, in key order.
pub type Map = BTreeMap<String, Value>;

/// A VDF value: a string leaf or a nested block.
///
/// # Examples
///
/// ```
/// use vdfmodem::{Map, Value};
///
/// let mut inner = Map::new();
/// inner.insert("name".to_string(), Value::from("Example"));
/// let v = Value::Object(inner);
/// assert_eq!(v.get("name").and_then(Value::as_str), Some("Example"));
/// ```
// Serde support for tests and for downstream crates enabling `serde`. The
// untagged representation serializes a document as plain nested objects.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(test, feature = "serde"), serde(untagged))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    String(String),
    Object(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Object(Map::new())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is a [`String`](Value::String).
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is an [`Object`](Value::Object).
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Object(_) => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            Self::String(_) => None,
        }
    }

    /// Mutable access to the block, for editing a parsed document.
    ///
    /// ```
    /// use vdfmodem::Value;
    ///
    /// let mut root = Value::Object(vdfmodem::from_str(r#""k" "1""#).unwrap());
    /// root.as_object_mut().unwrap().insert("j".into(), Value::from("2"));
    /// assert_eq!(root.get("j").and_then(Value::as_str), Some("2"));
    /// assert!(Value::from("leaf").as_object_mut().is_none());
    /// ```
    #[must_use]
    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Object(m) => Some(m),
            Self::String(_) => None,
        }
    }

    /// Look up `key` if this value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Follow `path` through nested objects.
    ///
    /// ```
    /// let map = vdfmodem::from_str(r#"a { b { c "d" } }"#).unwrap();
    /// let root = vdfmodem::Value::Object(map);
    /// assert_eq!(root.pointer(&["a", "b", "c"]).and_then(|v| v.as_str()), Some("d"));
    /// assert!(root.pointer(&["a", "x"]).is_none());
    /// ```
    #[must_use]
    pub fn pointer<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        path.iter()
            .try_fold(self, |current, segment| current.get(segment.as_ref()))
    }
}
