use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;

use crate::entity::Entity;

/// Insertion-ordered field map. Used for properties and for every derived view.
pub type Map = IndexMap<SmolStr, Value>;

// ─── Number ─────────────────────────────────────────────────────────────────

/// A JSON number.
///
/// Integers are held as `Int` whenever they fit in an `i64`; `UInt` only
/// carries values above `i64::MAX`. Every constructor in this crate keeps to
/// that, and equality also matches `Int`/`UInt` by integer value, so one
/// integer always compares equal to itself. Integers and floats never compare
/// equal (`Int(1) != Float(1.0)`).
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    /// Normalizing constructor for unsigned input.
    pub fn from_u64(n: u64) -> Self {
        i64::try_from(n).map_or(Number::UInt(n), Number::Int)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::UInt(a), Number::UInt(b)) => a == b,
            (Number::Int(i), Number::UInt(u)) | (Number::UInt(u), Number::Int(i)) => {
                u64::try_from(i) == Ok(u)
            }
            (Number::Float(a), Number::Float(b)) => a == b,
            _ => false,
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::Int(i) => serializer.serialize_i64(i),
            Number::UInt(u) => serializer.serialize_u64(u),
            Number::Float(f) => serializer.serialize_f64(f),
        }
    }
}

impl From<Number> for serde_json::Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => i.into(),
            Number::UInt(u) => u.into(),
            Number::Float(f) => f.into(),
        }
    }
}

// ─── Value ──────────────────────────────────────────────────────────────────

/// A schema-less field value.
///
/// Equality is strict and drives dirty tracking: nothing is coerced across
/// variants, integers never equal floats, and objects are equal only with the
/// same entries in the same order.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Str(SmolStr),
    Array(Vec<Value>),
    Object(Map),
    Entity(Box<Entity>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => same_entries(a, b),
            (Value::Entity(a), Value::Entity(b)) => a == b,
            _ => false,
        }
    }
}

/// Ordered map equality. `IndexMap`'s own `==` ignores order.
pub(crate) fn same_entries(a: &Map, b: &Map) -> bool {
    a.len() == b.len() && a.iter().eq(b.iter())
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(Number::Int(i)) => Some(*i as f64),
            Value::Number(Number::UInt(u)) => Some(*u as f64),
            Value::Number(Number::Float(f)) => Some(*f),
            _ => None,
        }
    }

    /// Integer content; floats are not truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(Number::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Value::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Replace every nested entity with its resolved property map.
    ///
    /// Walks arrays and objects, so the result holds no `Value::Entity` at any
    /// depth. Cyclic application data is the caller's problem; owned values
    /// cannot form cycles on their own.
    pub fn into_plain(self) -> Value {
        match self {
            Value::Entity(entity) => Value::Object(entity.to_array()),
            Value::Array(arr) => Value::Array(arr.into_iter().map(Value::into_plain).collect()),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_plain()))
                    .collect(),
            ),
            other => other,
        }
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::Str(s) => serializer.serialize_str(s.as_str()),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
            Value::Entity(entity) => entity.serialize(serializer),
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::Float(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::Int(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::Int(i64::from(n)))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(Number::from_u64(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for Value {
    fn from(s: SmolStr) -> Self {
        Value::Str(s)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        Value::Entity(Box::new(entity))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

// ─── From/Into serde_json::Value ────────────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                let n = match (n.as_i64(), n.as_u64()) {
                    (Some(i), _) => Number::Int(i),
                    (None, Some(u)) => Number::UInt(u),
                    (None, None) => Number::Float(n.as_f64().unwrap_or(0.0)),
                };
                Value::Number(n)
            }
            serde_json::Value::String(s) => Value::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(val: Value) -> Self {
        match val {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => n.into(),
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(|v| v.into()).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
            Value::Entity(entity) => Value::Object(entity.to_array()).into(),
        }
    }
}

/// Build a [`Map`] from `key => value` pairs, nesting with braces.
///
/// ```
/// use entity_record::entity_map;
///
/// let props = entity_map!({ "id" => 1, "profile" => { "bio" => "Developer" } });
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! entity_map {
    ({ $($key:expr => $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::value::Map::default();
        $(
            map.insert(
                $crate::SmolStr::new($key),
                $crate::value::Value::from($crate::entity_map!(@value $val)),
            );
        )*
        map
    }};

    (@value { $($inner:tt)* }) => {
        $crate::entity_map!({ $($inner)* })
    };

    (@value $val:expr) => {
        $val
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    #[test]
    fn test_strict_number_equality() {
        assert_ne!(Value::from(1i64), Value::from(1.0f64));
        assert_ne!(Value::from("1"), Value::from(1i64));
        assert_eq!(Value::from(1i32), Value::from(1i64));
        assert_eq!(Value::from(1u64), Value::from(1i64));
        assert_eq!(Number::UInt(7), Number::Int(7));
        assert_ne!(Number::UInt(u64::MAX), Number::Int(-1));
    }

    #[test]
    fn test_unsigned_integers_normalize() {
        assert!(matches!(Value::from(5u64), Value::Number(Number::Int(5))));
        assert!(matches!(
            Value::from(u64::MAX),
            Value::Number(Number::UInt(u64::MAX))
        ));
        assert_eq!(Value::from(5u64).as_i64(), Some(5));
        assert_eq!(Value::from(3.0).as_i64(), None);
        assert_eq!(Value::from(u64::MAX).as_f64(), Some(u64::MAX as f64));
    }

    #[test]
    fn test_object_equality_is_ordered() {
        let ab = Value::from(entity_map!({ "a" => 1, "b" => 2 }));
        let ba = Value::from(entity_map!({ "b" => 2, "a" => 1 }));
        assert_ne!(ab, ba);
        assert_eq!(ab, Value::from(entity_map!({ "a" => 1, "b" => 2 })));
        assert_ne!(ab, Value::from(entity_map!({ "a" => 1 })));
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_macro_nests_objects_in_order() {
        let map = entity_map!({ "b" => 2, "a" => { "inner" => true } });
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map["a"].get("inner"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_into_plain_expands_nested_entities() {
        let inner = Entity::new(entity_map!({ "id" => 7 }));
        let value = Value::Array(vec![
            Value::from(inner.clone()),
            Value::Object(entity_map!({ "owner" => (Value::from(inner)) })),
        ]);

        let plain = value.into_plain();
        let arr = plain.as_array().unwrap();
        assert_eq!(arr[0].get("id"), Some(&Value::from(7)));
        assert_eq!(
            arr[1].get("owner").and_then(|o| o.get("id")),
            Some(&Value::from(7))
        );
    }

    #[test]
    fn test_json_conversion() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"z": 1, "a": [true, null, 2.5]}"#).unwrap();
        let value = Value::from(json);
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        // serde_json without preserve_order sorts keys
        assert_eq!(keys, vec!["a", "z"]);
        let back: serde_json::Value = value.into();
        assert_eq!(back["a"][2], serde_json::json!(2.5));
    }
}
