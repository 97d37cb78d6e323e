use smol_str::SmolStr;
use tracing::{Level, event};

use super::record::Entity;
use crate::types::{ErrorMap, IntoErrors};
use crate::value::Value;

impl Entity {
    // ════════════════════════════════════════════════════════════════════════
    // Internal: assignment
    // ════════════════════════════════════════════════════════════════════════

    /// The one write path. Marks dirty on change, routes through the setter
    /// when asked to, then stores.
    fn assign(&mut self, field: SmolStr, value: Value, use_setters: bool) {
        let changed = match self.properties.get(&field) {
            Some(current) => *current != value,
            None => true,
        };
        if changed {
            event!(Level::TRACE, kind = self.kind(), field = %field, "field marked dirty");
            self.set_dirty(&field, true);
        }

        let value = if use_setters {
            match self.methods.resolve_setter(&field) {
                Some(setter) => setter(&*self, value),
                None => value,
            }
        } else {
            value
        };
        self.properties.insert(field, value);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Mutation
    // ════════════════════════════════════════════════════════════════════════

    /// Store `value` under `field`, through the field's setter if one is
    /// registered.
    ///
    /// Setting a field to an equal value leaves its dirty flag as it was.
    pub fn set(&mut self, field: impl Into<SmolStr>, value: impl Into<Value>) -> &mut Self {
        self.set_with(field, value, true)
    }

    /// [`set`](Self::set) with explicit setter routing.
    pub fn set_with(
        &mut self,
        field: impl Into<SmolStr>,
        value: impl Into<Value>,
        use_setters: bool,
    ) -> &mut Self {
        self.assign(field.into(), value.into(), use_setters);
        self
    }

    /// Assign several fields in iteration order.
    pub fn set_many<I, K, V>(&mut self, properties: I, use_setters: bool) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<SmolStr>,
        V: Into<Value>,
    {
        for (field, value) in properties {
            self.assign(field.into(), value.into(), use_setters);
        }
        self
    }

    /// Mutate the stored value of `field` in place.
    ///
    /// The closure works on a copy (`Null` when absent). The result is stored
    /// back without the setter, and dirty tracking runs as for `set`.
    pub fn edit<F>(&mut self, field: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Value),
    {
        let mut value = self.properties.get(field).cloned().unwrap_or_default();
        f(&mut value);
        self.assign(SmolStr::from(field), value, false);
        self
    }

    /// Remove `field` from storage. Absent fields are ignored.
    ///
    /// Dirty and error state of the field are left untouched.
    pub fn unset_property(&mut self, field: &str) -> &mut Self {
        self.properties.shift_remove(field);
        self
    }

    pub fn unset_properties<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in fields {
            self.properties.shift_remove(field.as_ref());
        }
        self
    }

    /// Alias of [`unset_property`](Self::unset_property).
    #[inline]
    pub fn remove(&mut self, field: &str) -> &mut Self {
        self.unset_property(field)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Dirty tracking
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    /// Force the dirty flag of `field`. Returns the new flag.
    pub fn set_dirty(&mut self, field: &str, is_dirty: bool) -> bool {
        if !is_dirty {
            self.dirty.remove(field);
            return false;
        }
        self.dirty.insert(SmolStr::from(field));
        true
    }

    /// Dirty field names, in no particular order.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(SmolStr::as_str)
    }

    #[inline]
    pub fn is_dirty_any(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Forget all modifications and all errors. Properties stay.
    pub fn clean(&mut self) {
        event!(Level::TRACE, kind = self.kind(), "entity cleaned");
        self.dirty.clear();
        self.errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════
    // Persistence flag
    // ════════════════════════════════════════════════════════════════════════

    /// `Some(true)` not yet persisted, `Some(false)` persisted, `None` unknown.
    #[inline]
    pub fn is_new(&self) -> Option<bool> {
        self.new_state
    }

    pub fn set_new(&mut self, new: bool) -> bool {
        self.new_state = Some(new);
        new
    }

    // ════════════════════════════════════════════════════════════════════════
    // Errors
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Errors of `field`; empty when it has none.
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Replace the errors of `field`. An empty list clears them.
    pub fn set_errors(&mut self, field: impl Into<SmolStr>, errors: impl IntoErrors) -> &mut Self {
        self.replace_errors(field.into(), errors.into_errors());
        self
    }

    /// Replace the errors of every field in `errors`; other fields keep theirs.
    pub fn set_error_map<I, K, E>(&mut self, errors: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<SmolStr>,
        E: IntoErrors,
    {
        for (field, list) in errors {
            self.replace_errors(field.into(), list.into_errors());
        }
        self
    }

    fn replace_errors(&mut self, field: SmolStr, list: Vec<String>) {
        if list.is_empty() {
            self.errors.shift_remove(&field);
        } else {
            self.errors.insert(field, list);
        }
    }
}
