use serde::ser::{Serialize, SerializeMap, Serializer};
use smol_str::SmolStr;

use super::record::Entity;
use crate::error::EntityError;
use crate::value::{Map, Value};

impl Entity {
    // ════════════════════════════════════════════════════════════════════════
    // Field access
    // ════════════════════════════════════════════════════════════════════════

    /// Resolved value of `field`.
    ///
    /// With a registered getter, its result is returned, and the getter is
    /// called even when the field was never stored. Otherwise this is a copy
    /// of the stored value, or `Null` when absent. The copy is independent of
    /// the entity; use [`edit`](Self::edit) to change a value in place.
    pub fn get(&self, field: &str) -> Value {
        let raw = self.properties.get(field);
        match self.methods.resolve_getter(field) {
            Some(getter) => getter(self, raw),
            None => raw.cloned().unwrap_or_default(),
        }
    }

    /// Stored value, bypassing getters. `None` when absent, which is the only
    /// place absence and a stored `Null` differ.
    #[inline]
    pub fn get_raw(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)
    }

    /// `true` when the resolved value is not `Null`.
    ///
    /// A field stored as `Null` reports `false`, exactly like a field that
    /// was never set.
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_null()
    }

    /// Whether `field` is stored at all, `Null` included.
    #[inline]
    pub fn contains(&self, field: &str) -> bool {
        self.properties.contains_key(field)
    }

    /// Stored field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(SmolStr::as_str)
    }

    /// Raw stored properties in insertion order.
    #[inline]
    pub fn properties(&self) -> &Map {
        &self.properties
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Views
    // ════════════════════════════════════════════════════════════════════════

    /// Every stored field resolved through `get`, with nested entities (also
    /// inside arrays and objects) expanded into plain maps.
    pub fn to_array(&self) -> Map {
        self.properties
            .keys()
            .map(|field| (field.clone(), self.get(field).into_plain()))
            .collect()
    }

    /// The serialized form. Identical to [`to_array`](Self::to_array).
    #[inline]
    pub fn json_serialize(&self) -> Map {
        self.to_array()
    }

    pub fn to_json(&self) -> serde_json::Value {
        Value::Object(self.to_array()).into()
    }

    pub fn to_json_string(&self) -> Result<String, EntityError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The requested fields resolved through `get`, in request order.
    ///
    /// With `only_dirty`, fields that are not dirty are left out. Fields that
    /// were never stored still appear (as whatever `get` resolves them to)
    /// unless filtered that way.
    pub fn extract<I, S>(&self, fields: I, only_dirty: bool) -> Map
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        fields
            .into_iter()
            .filter(|field| !only_dirty || self.dirty(field.as_ref()))
            .map(|field| {
                let field = field.as_ref();
                (SmolStr::from(field), self.get(field))
            })
            .collect()
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = self.json_serialize();
        let mut m = serializer.serialize_map(Some(view.len()))?;
        for (k, v) in &view {
            m.serialize_entry(k.as_str(), v)?;
        }
        m.end()
    }
}
