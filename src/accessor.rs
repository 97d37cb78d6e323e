//! Accessor overrides and the per-kind method registry.
//!
//! An entity kind registers getter/setter callbacks once. They are stored
//! under conventional method names (`getFirstName`, `setFirstName`) derived
//! from the field name, and every `get`/`set` resolves through a membership
//! test on that table. Tables are built on first use per kind and live for
//! the rest of the process.

use convert_case::{Case, Casing};
use smol_str::SmolStr;
use std::any::{TypeId, type_name};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::{Level, event};

use crate::entity::Entity;
use crate::types::FastMap;
use crate::value::Value;

/// Read override. Receives the raw stored value, or `None` when the field is
/// absent, and returns what `get` reports instead.
pub type Getter = Box<dyn Fn(&Entity, Option<&Value>) -> Value + Send + Sync>;

/// Write override. Receives the incoming value and returns what gets stored.
pub type Setter = Box<dyn Fn(&Entity, Value) -> Value + Send + Sync>;

// ─── Naming ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Get,
    Set,
}

impl Prefix {
    pub fn as_str(self) -> &'static str {
        match self {
            Prefix::Get => "get",
            Prefix::Set => "set",
        }
    }
}

/// `(Get, "first_name")` → `"getFirstName"`.
pub fn accessor_name(prefix: Prefix, field: &str) -> SmolStr {
    let mut name = String::with_capacity(field.len() + 3);
    name.push_str(prefix.as_str());
    name.push_str(&field.to_case(Case::Pascal));
    SmolStr::from(name)
}

// ─── Methods ────────────────────────────────────────────────────────────────

enum Method {
    Get(Getter),
    Set(Setter),
}

/// The accessor table of one entity kind.
pub struct Methods {
    kind: &'static str,
    table: FastMap<SmolStr, Method>,
}

impl Methods {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            table: FastMap::default(),
        }
    }

    /// Register a read override for `field`. Re-registering replaces it.
    pub fn getter<F>(&mut self, field: &str, f: F) -> &mut Self
    where
        F: Fn(&Entity, Option<&Value>) -> Value + Send + Sync + 'static,
    {
        self.table
            .insert(accessor_name(Prefix::Get, field), Method::Get(Box::new(f)));
        self
    }

    /// Register a write override for `field`. Re-registering replaces it.
    pub fn setter<F>(&mut self, field: &str, f: F) -> &mut Self
    where
        F: Fn(&Entity, Value) -> Value + Send + Sync + 'static,
    {
        self.table
            .insert(accessor_name(Prefix::Set, field), Method::Set(Box::new(f)));
        self
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn method_exists(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(SmolStr::as_str)
    }

    pub(crate) fn resolve_getter(&self, field: &str) -> Option<&Getter> {
        if self.table.is_empty() {
            return None;
        }
        match self.table.get(accessor_name(Prefix::Get, field).as_str())? {
            Method::Get(getter) => Some(getter),
            Method::Set(_) => None,
        }
    }

    pub(crate) fn resolve_setter(&self, field: &str) -> Option<&Setter> {
        if self.table.is_empty() {
            return None;
        }
        match self.table.get(accessor_name(Prefix::Set, field).as_str())? {
            Method::Set(setter) => Some(setter),
            Method::Get(_) => None,
        }
    }
}

impl std::fmt::Debug for Methods {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.method_names().collect();
        names.sort_unstable();
        f.debug_struct("Methods")
            .field("kind", &self.kind)
            .field("methods", &names)
            .finish()
    }
}

// ─── EntityKind ─────────────────────────────────────────────────────────────

/// A concrete kind of entity, identified by its Rust type.
///
/// ```
/// use entity_record::{Entity, EntityKind, Methods, Value, entity_map};
///
/// struct User;
///
/// impl EntityKind for User {
///     fn accessors(methods: &mut Methods) {
///         methods.setter("name", |_, v| {
///             v.as_str().map(|s| Value::from(s.trim())).unwrap_or(v)
///         });
///     }
/// }
///
/// let user = Entity::of::<User>(entity_map!({ "name" => "  Andrew " }));
/// assert_eq!(user.get("name"), Value::from("Andrew"));
/// ```
pub trait EntityKind: 'static {
    /// Register this kind's accessor overrides. Called once per process.
    fn accessors(methods: &mut Methods) {
        let _ = methods;
    }
}

/// The kind with no overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl EntityKind for Plain {}

// ─── Registry ───────────────────────────────────────────────────────────────

static REGISTRY: OnceLock<RwLock<FastMap<TypeId, Arc<Methods>>>> = OnceLock::new();

/// Shared accessor table for `K`, built on first request.
///
/// The table is computed outside the lock. Two threads racing on the same
/// kind both build it, and the first insert wins; the result is identical
/// either way.
pub fn methods_for<K: EntityKind>() -> Arc<Methods> {
    let registry = REGISTRY.get_or_init(RwLock::default);
    let id = TypeId::of::<K>();

    if let Some(methods) = registry
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
    {
        return Arc::clone(methods);
    }

    let mut methods = Methods::new(type_name::<K>());
    K::accessors(&mut methods);
    let built = Arc::new(methods);

    let mut guard = registry.write().unwrap_or_else(PoisonError::into_inner);
    let entry = guard.entry(id).or_insert_with(|| {
        event!(
            Level::DEBUG,
            kind = built.kind(),
            methods = built.len(),
            "entity accessors registered"
        );
        Arc::clone(&built)
    });
    if !Arc::ptr_eq(entry, &built) {
        event!(Level::DEBUG, kind = built.kind(), "entity accessors already registered");
    }
    Arc::clone(entry)
}
