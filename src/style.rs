//! Style records
//!
//! A [`Style`] is an open key-value map of JSON values. Compiled styles are
//! frozen in strict mode: every mutator then fails with
//! [`StyleError::Frozen`], and nested values are only reachable through
//! shared references.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::StyleError;
use crate::matrix::Matrix4;

/// Key holding the list of transform operations
pub const TRANSFORM_KEY: &str = "transform";
/// Key holding the compiled 16-element matrix
pub const TRANSFORM_MATRIX_KEY: &str = "transformMatrix";

/// An open key-value style record.
#[derive(Debug, Clone, Default)]
pub struct Style {
    props: Map<String, Value>,
    frozen: bool,
}

impl Style {
    /// Create an empty, mutable style
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Iterate properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.props.iter()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.props
    }

    /// Consume the style, returning its properties.
    ///
    /// The returned map is always mutable, even if the style was frozen.
    pub fn into_map(self) -> Map<String, Value> {
        self.props
    }

    /// Set a property, returning the previous value
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, StyleError> {
        let key = key.into();
        self.ensure_mutable(&key)?;
        Ok(self.props.insert(key, value))
    }

    /// Remove a property, returning its value
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, StyleError> {
        self.ensure_mutable(key)?;
        Ok(self.props.remove(key))
    }

    /// Mutable access to a property's value, including nested content
    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut Value>, StyleError> {
        self.ensure_mutable(key)?;
        Ok(self.props.get_mut(key))
    }

    /// Freeze the style against further mutation
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Decode `transformMatrix` if present and made of 16 numbers
    pub fn transform_matrix(&self) -> Option<Matrix4> {
        let values = self.get(TRANSFORM_MATRIX_KEY)?.as_array()?;
        let numbers: Option<Vec<f64>> = values.iter().map(Value::as_f64).collect();
        Matrix4::from_slice(&numbers?)
    }

    fn ensure_mutable(&self, key: &str) -> Result<(), StyleError> {
        if self.frozen {
            return Err(StyleError::Frozen { key: key.to_string() });
        }
        Ok(())
    }
}

/// Styles compare by content; the frozen flag is ignored.
impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        self.props == other.props
    }
}

impl From<Map<String, Value>> for Style {
    fn from(props: Map<String, Value>) -> Self {
        Self { props, frozen: false }
    }
}

impl FromIterator<(String, Value)> for Style {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Map<String, Value>>())
    }
}

impl Serialize for Style {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.props.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Style::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Style {
        serde_json::from_value(json!({"opacity": 0.5, "shadow": {"radius": 2}})).unwrap()
    }

    #[test]
    fn test_deserialize_object() {
        let style = sample();
        assert_eq!(style.len(), 2);
        assert_eq!(style.get("opacity"), Some(&json!(0.5)));
        assert!(!style.is_frozen());
    }

    #[test]
    fn test_deserialize_rejects_non_object() {
        assert!(serde_json::from_value::<Style>(json!([1, 2])).is_err());
    }

    #[test]
    fn test_mutation_when_unfrozen() {
        let mut style = sample();
        assert_eq!(style.insert("opacity", json!(1)).unwrap(), Some(json!(0.5)));
        assert_eq!(style.remove("shadow").unwrap(), Some(json!({"radius": 2})));
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn test_frozen_rejects_insert_and_remove() {
        let mut style = sample();
        style.freeze();

        let err = style.insert("opacity", json!(1)).unwrap_err();
        assert_eq!(err, StyleError::Frozen { key: "opacity".to_string() });
        assert!(style.remove("opacity").is_err());
        assert_eq!(style.get("opacity"), Some(&json!(0.5)));
    }

    #[test]
    fn test_frozen_rejects_nested_mutation() {
        let mut style = sample();
        style.freeze();
        assert!(matches!(style.get_mut("shadow"), Err(StyleError::Frozen { .. })));
    }

    #[test]
    fn test_equality_ignores_frozen_flag() {
        let mut frozen = sample();
        frozen.freeze();
        assert_eq!(frozen, sample());
    }

    #[test]
    fn test_transform_matrix_decoding() {
        let mut style = Style::new();
        assert!(style.transform_matrix().is_none());

        let identity: Vec<Value> = Matrix4::IDENTITY.data.iter().map(|v| json!(v)).collect();
        style.insert(TRANSFORM_MATRIX_KEY, Value::Array(identity)).unwrap();
        assert_eq!(style.transform_matrix(), Some(Matrix4::IDENTITY));

        style.insert(TRANSFORM_MATRIX_KEY, json!([1, 2, 3])).unwrap();
        assert!(style.transform_matrix().is_none());
    }

    #[test]
    fn test_serialize_preserves_key_order() {
        let style: Style = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        assert_eq!(serde_json::to_string(&style).unwrap(), r#"{"b":1,"a":2}"#);
    }
}
