use smol_str::SmolStr;
use std::sync::Arc;

use crate::accessor::{EntityKind, Methods, Plain, methods_for};
use crate::error::EntityError;
use crate::options::EntityOptions;
use crate::types::{ErrorMap, FastHashSet};
use crate::value::{Map, Value, same_entries};

// ─── Entity ─────────────────────────────────────────────────────────────────

/// One mutable result row: ordered properties, a dirty set, a persistence
/// flag and per-field validation errors.
///
/// The entity never knows a schema. Any field name is accepted, and the
/// accessor table of its kind may transform values on the way in and out.
///
/// Three independent axes of state:
///
/// | Axis        | Mutated by                                   | Reset by  |
/// |-------------|----------------------------------------------|-----------|
/// | dirty       | `set`, `set_dirty`, `edit`                   | `clean()` |
/// | errors      | `set_errors`, `set_error_map`, `validate`    | `clean()` |
/// | persistence | `set_new`, construction option `mark_new`    | never     |
#[derive(Clone)]
pub struct Entity {
    pub(crate) properties: Map,
    pub(crate) dirty: FastHashSet<SmolStr>,
    /// `None` while the persistence state is unknown.
    pub(crate) new_state: Option<bool>,
    pub(crate) errors: ErrorMap,
    pub(crate) methods: Arc<Methods>,
}

impl Entity {
    /// A plain entity with default options.
    ///
    /// Every initial field goes through `set`, so all of them start dirty.
    pub fn new<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<SmolStr>,
        V: Into<Value>,
    {
        Self::build(methods_for::<Plain>(), properties, EntityOptions::default())
    }

    pub fn with_options<I, K, V>(properties: I, options: EntityOptions) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<SmolStr>,
        V: Into<Value>,
    {
        Self::build(methods_for::<Plain>(), properties, options)
    }

    /// An entity of kind `K`, using `K`'s accessor overrides.
    pub fn of<K: EntityKind>(
        properties: impl IntoIterator<Item = (impl Into<SmolStr>, impl Into<Value>)>,
    ) -> Self {
        Self::build(methods_for::<K>(), properties, EntityOptions::default())
    }

    pub fn of_with_options<K: EntityKind>(
        properties: impl IntoIterator<Item = (impl Into<SmolStr>, impl Into<Value>)>,
        options: EntityOptions,
    ) -> Self {
        Self::build(methods_for::<K>(), properties, options)
    }

    /// A plain entity from an object-shaped JSON value.
    pub fn from_json(json: serde_json::Value, options: EntityOptions) -> Result<Self, EntityError> {
        Self::from_value(Value::from(json), options)
    }

    pub fn from_json_str(json: &str, options: EntityOptions) -> Result<Self, EntityError> {
        let json: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json(json, options)
    }

    /// A plain entity from `Value::Object`. A nested `Value::Entity` is taken
    /// over as-is, state included.
    pub fn from_value(value: Value, options: EntityOptions) -> Result<Self, EntityError> {
        match value {
            Value::Object(map) => Ok(Self::with_options(map, options)),
            Value::Entity(entity) => Ok(*entity),
            _ => Err(EntityError::NotAnObject),
        }
    }

    fn build<I, K, V>(methods: Arc<Methods>, properties: I, options: EntityOptions) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<SmolStr>,
        V: Into<Value>,
    {
        let mut entity = Entity {
            properties: Map::default(),
            dirty: FastHashSet::default(),
            new_state: None,
            errors: ErrorMap::default(),
            methods,
        };
        entity.set_many(properties, options.use_setters);

        if options.mark_clean {
            entity.clean();
        }
        if let Some(new) = options.mark_new {
            entity.set_new(new);
        }
        entity
    }

    /// Type name of the entity's kind.
    #[inline]
    pub fn kind(&self) -> &'static str {
        self.methods.kind()
    }

    #[inline]
    pub fn methods(&self) -> &Methods {
        &self.methods
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(Map::default())
    }
}

/// Same kind and same stored properties, in the same order. Dirty, error and persistence state
/// are bookkeeping and do not take part.
impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && same_entries(&self.properties, &other.properties)
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dirty: Vec<&str> = self.dirty.iter().map(SmolStr::as_str).collect();
        dirty.sort_unstable();
        f.debug_struct("Entity")
            .field("kind", &self.kind())
            .field("properties", &self.properties)
            .field("dirty", &dirty)
            .field("new", &self.new_state)
            .field("errors", &self.errors)
            .finish()
    }
}
