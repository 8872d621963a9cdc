//! Typed attribute storage for figures.
//!
//! Every figure kind declares the keys it understands together with their
//! value type. Reads and writes on undeclared keys, and writes of a value
//! of the wrong type, fail without touching the stored values.

use crate::error::AttributeError;
use crate::labels::SingleSelectLabelList;
use serde_json::Value;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use strum_macros::Display;

/// The type a declared attribute key accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AttributeType {
    #[strum(serialize = "text")]
    Text,
    #[strum(serialize = "number")]
    Number,
    #[strum(serialize = "flag")]
    Flag,
    #[strum(serialize = "single select label list")]
    SingleSelect,
}

/// A stored attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Flag(bool),
    SingleSelect(SingleSelectLabelList),
}

impl AttributeValue {
    pub fn value_type(&self) -> AttributeType {
        match self {
            AttributeValue::Text(_) => AttributeType::Text,
            AttributeValue::Number(_) => AttributeType::Number,
            AttributeValue::Flag(_) => AttributeType::Flag,
            AttributeValue::SingleSelect(_) => AttributeType::SingleSelect,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            AttributeValue::Text(text) => Value::String(text.clone()),
            AttributeValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AttributeValue::Flag(flag) => Value::Bool(*flag),
            AttributeValue::SingleSelect(list) => {
                serde_json::to_value(list).unwrap_or(Value::Null)
            }
        }
    }
}

impl AttributeType {
    /// Decode a JSON value as this type.
    pub fn decode(&self, key: &str, value: Value) -> Result<AttributeValue, AttributeError> {
        let found = json_type_name(&value);
        let mismatch = |reason: String| AttributeError::InvalidValue {
            key: key.to_string(),
            reason,
        };
        match (self, value) {
            (AttributeType::Text, Value::String(text)) => Ok(AttributeValue::Text(text)),
            (AttributeType::Number, Value::Number(n)) => n
                .as_f64()
                .map(AttributeValue::Number)
                .ok_or_else(|| mismatch(format!("{n} is not representable"))),
            (AttributeType::Flag, Value::Bool(flag)) => Ok(AttributeValue::Flag(flag)),
            (AttributeType::SingleSelect, value @ Value::Object(_)) => {
                serde_json::from_value(value)
                    .map(AttributeValue::SingleSelect)
                    .map_err(|err| mismatch(err.to_string()))
            }
            (expected, _) => Err(mismatch(format!("expected {expected}, found {found}"))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Rust types that can live in an attribute bag.
pub trait AttributeData: Sized {
    const TYPE: AttributeType;

    fn into_value(self) -> AttributeValue;
    fn from_value(value: &AttributeValue) -> Option<Self>;
}

impl AttributeData for String {
    const TYPE: AttributeType = AttributeType::Text;

    fn into_value(self) -> AttributeValue {
        AttributeValue::Text(self)
    }

    fn from_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Text(text) => Some(text.clone()),
            _ => None,
        }
    }
}

impl AttributeData for f64 {
    const TYPE: AttributeType = AttributeType::Number;

    fn into_value(self) -> AttributeValue {
        AttributeValue::Number(self)
    }

    fn from_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl AttributeData for bool {
    const TYPE: AttributeType = AttributeType::Flag;

    fn into_value(self) -> AttributeValue {
        AttributeValue::Flag(self)
    }

    fn from_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl AttributeData for SingleSelectLabelList {
    const TYPE: AttributeType = AttributeType::SingleSelect;

    fn into_value(self) -> AttributeValue {
        AttributeValue::SingleSelect(self)
    }

    fn from_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::SingleSelect(list) => Some(list.clone()),
            _ => None,
        }
    }
}

/// A statically typed attribute key.
///
/// Built-in figure kinds expose their keys as constants so callers get
/// compile-time checked access instead of matching on [`AttributeValue`].
#[derive(Debug)]
pub struct AttributeKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for AttributeKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AttributeKey<T> {}

impl<T: AttributeData> AttributeKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value_type(&self) -> AttributeType {
        T::TYPE
    }
}

/// Keyed attribute store with per-key declared types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    declared: BTreeMap<String, AttributeType>,
    values: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `key` with type `ty`. Redeclaring replaces the type and drops any stored value.
    pub fn declare(&mut self, key: impl Into<String>, ty: AttributeType) {
        let key = key.into();
        if self.declared.insert(key.clone(), ty) != Some(ty) {
            self.values.remove(&key);
        }
    }

    /// Declare `key` with the type of `value` and store `value` as its initial content.
    pub fn declare_with(&mut self, key: impl Into<String>, value: AttributeValue) {
        let key = key.into();
        self.declared.insert(key.clone(), value.value_type());
        self.values.insert(key, value);
    }

    pub fn declare_typed<T: AttributeData>(&mut self, key: AttributeKey<T>, initial: T) {
        self.declare_with(key.name, initial.into_value());
    }

    pub fn declared_type(&self, key: &str) -> Option<AttributeType> {
        self.declared.get(key).copied()
    }

    pub fn is_declared(&self, key: &str) -> bool {
        self.declared.contains_key(key)
    }

    /// Stored values in key order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Result<Option<&AttributeValue>, AttributeError> {
        self.check_declared(key)?;
        Ok(self.values.get(key))
    }

    /// Validate that `value` may be stored under `key`.
    pub fn check(&self, key: &str, value: &AttributeValue) -> Result<(), AttributeError> {
        let expected = self.check_declared(key)?;
        let found = value.value_type();
        if expected != found {
            return Err(AttributeError::TypeMismatch {
                key: key.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn set(
        &mut self,
        key: &str,
        value: AttributeValue,
    ) -> Result<Option<AttributeValue>, AttributeError> {
        self.check(key, &value)?;
        Ok(self.values.insert(key.to_string(), value))
    }

    /// Remove the stored value of `key`, returning it.
    pub fn unset(&mut self, key: &str) -> Result<Option<AttributeValue>, AttributeError> {
        self.check_declared(key)?;
        Ok(self.values.remove(key))
    }

    pub fn get_typed<T: AttributeData>(&self, key: AttributeKey<T>) -> Option<T> {
        self.values.get(key.name).and_then(T::from_value)
    }

    pub fn set_typed<T: AttributeData>(
        &mut self,
        key: AttributeKey<T>,
        value: T,
    ) -> Result<Option<AttributeValue>, AttributeError> {
        self.set(key.name, value.into_value())
    }

    fn check_declared(&self, key: &str) -> Result<AttributeType, AttributeError> {
        self.declared
            .get(key)
            .copied()
            .ok_or_else(|| AttributeError::UndeclaredKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: AttributeKey<String> = AttributeKey::new("label");
    const INDEX: AttributeKey<f64> = AttributeKey::new("index");

    fn bag() -> Attributes {
        let mut attributes = Attributes::new();
        attributes.declare("label", AttributeType::Text);
        attributes.declare("index", AttributeType::Number);
        attributes
    }

    #[test]
    fn test_retrieve_value() {
        let mut attributes = bag();
        attributes
            .set("label", AttributeValue::Text("testlabel".into()))
            .unwrap();
        attributes.set_typed(INDEX, 1.0).unwrap();

        assert_eq!(attributes.get_typed(LABEL), Some("testlabel".to_string()));
        assert_eq!(attributes.get("index").unwrap(), Some(&AttributeValue::Number(1.0)));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let mut attributes = bag();
        let err = attributes
            .set("label", AttributeValue::Number(0.0))
            .unwrap_err();
        assert_eq!(
            err,
            AttributeError::TypeMismatch {
                key: "label".into(),
                expected: AttributeType::Text,
                found: AttributeType::Number,
            }
        );
        assert!(attributes
            .set("index", AttributeValue::Text("a text".into()))
            .is_err());
        assert_eq!(attributes.get("label").unwrap(), None);
    }

    #[test]
    fn test_undeclared_key_is_rejected() {
        let mut attributes = bag();
        assert_eq!(
            attributes.get("color"),
            Err(AttributeError::UndeclaredKey("color".into()))
        );
        assert!(attributes
            .set("color", AttributeValue::Text("red".into()))
            .is_err());
        assert!(attributes.unset("color").is_err());
    }

    #[test]
    fn test_set_returns_previous_value() {
        let mut attributes = bag();
        assert_eq!(attributes.set_typed(LABEL, "a".into()).unwrap(), None);
        assert_eq!(
            attributes.set_typed(LABEL, "b".into()).unwrap(),
            Some(AttributeValue::Text("a".into()))
        );
        assert_eq!(
            attributes.unset("label").unwrap(),
            Some(AttributeValue::Text("b".into()))
        );
    }

    #[test]
    fn test_decode_checks_json_type() {
        let value = AttributeType::Text.decode("label", Value::from("ok")).unwrap();
        assert_eq!(value, AttributeValue::Text("ok".into()));
        assert!(AttributeType::Text.decode("label", Value::from(3)).is_err());
        assert!(AttributeType::SingleSelect
            .decode(
                "radioButtons",
                serde_json::json!({"labels": ["a"], "selectedIndex": 4})
            )
            .is_err());
    }
}
