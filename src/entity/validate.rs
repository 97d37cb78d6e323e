use smol_str::SmolStr;
use tracing::{Level, event};

use super::record::Entity;
use crate::types::ErrorMap;
use crate::value::Map;

/// Produces field errors for a set of extracted values.
///
/// `new_record` tells the validator whether creation rules apply. A field
/// missing from the returned map has no errors. Failures of the validator
/// itself are reported through `Error` and passed through untouched.
pub trait Validator {
    type Error;

    fn errors(&self, data: &Map, new_record: bool) -> Result<ErrorMap, Self::Error>;
}

impl<F, E> Validator for F
where
    F: Fn(&Map, bool) -> Result<ErrorMap, E>,
{
    type Error = E;

    fn errors(&self, data: &Map, new_record: bool) -> Result<ErrorMap, E> {
        self(data, new_record)
    }
}

impl Entity {
    /// Validate every stored field. See [`validate_fields`](Self::validate_fields).
    pub fn validate<V>(&mut self, validator: &V) -> Result<bool, V::Error>
    where
        V: Validator + ?Sized,
    {
        self.validate_fields::<V, &str>(validator, &[])
    }

    /// Run `validator` over `fields` (all stored fields when empty) and merge
    /// the result into the error store.
    ///
    /// Values are resolved through `get`. A requested field that is not
    /// stored and resolves to `Null` is not shown to the validator at all.
    /// An unknown persistence state counts as new. Returned fields have their
    /// errors replaced; other fields keep theirs. Returns whether the error
    /// store is empty afterwards.
    pub fn validate_fields<V, S>(&mut self, validator: &V, fields: &[S]) -> Result<bool, V::Error>
    where
        V: Validator + ?Sized,
        S: AsRef<str>,
    {
        let fields: Vec<SmolStr> = if fields.is_empty() {
            self.properties.keys().cloned().collect()
        } else {
            fields.iter().map(|f| SmolStr::from(f.as_ref())).collect()
        };

        let mut data = self.extract(&fields, false);
        data.retain(|field, value| !value.is_null() || self.properties.contains_key(field));

        let new_record = self.is_new().unwrap_or(true);
        let errors = validator.errors(&data, new_record)?;
        self.set_error_map(errors);

        let valid = self.errors.is_empty();
        event!(
            Level::DEBUG,
            kind = self.kind(),
            fields = fields.len(),
            errors = self.errors.len(),
            valid,
            "entity validated"
        );
        Ok(valid)
    }
}
